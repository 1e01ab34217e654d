//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! CHARSET — RFC 2066 character set negotiation.
//!
//! Both sides exchange `WILL`/`DO CHARSET`. Whichever side sends the
//! `REQUEST` subnegotiation is the requester; the other is the responder
//! and waits for `REQUEST` rather than also sending one. When both sides
//! offer simultaneously this engine breaks the tie by role rather than by
//! send order (send order is not meaningfully observable from inside a
//! byte-at-a-time interpreter without external timestamps): the `Server`
//! is always the requester, the `Client` is always the responder — see
//! `DESIGN.md` for why this engine settles the spec's open question this
//! way.

use super::{ModuleContext, OptionModule};
use crate::config::Mode;
use crate::trigger::{charset, option, Verb};

/// CHARSET option module.
#[derive(Debug, Default)]
pub struct CharsetModule {
    /// Encoding in effect before our own most recent `REQUEST`, restored
    /// if the peer rejects it.
    previous_encoding: Option<String>,
}

impl CharsetModule {
    fn send_request(&mut self, ctx: &mut ModuleContext<'_>) {
        if ctx.charset_order.is_empty() {
            return;
        }
        self.previous_encoding = Some(ctx.current_encoding.clone());
        let separator = b';';
        let mut body = vec![charset::REQUEST, separator];
        for (i, name) in ctx.charset_order.iter().enumerate() {
            if i > 0 {
                body.push(separator);
            }
            body.extend_from_slice(name.as_bytes());
        }
        ctx.send_subnegotiation(self.code(), &body);
    }

    fn maybe_request(&mut self, ctx: &mut ModuleContext<'_>) {
        if ctx.mode == Mode::Server && !ctx.negotiation.initiated(self.code()) {
            ctx.negotiation.mark_initiated(self.code());
            self.send_request(ctx);
        }
    }
}

impl OptionModule for CharsetModule {
    fn name(&self) -> &'static str {
        "CHARSET"
    }

    fn code(&self) -> u8 {
        option::CHARSET
    }

    fn initial_negotiation(&self, _mode: Mode) -> Option<Verb> {
        Some(Verb::Will)
    }

    fn on_negotiate(&mut self, verb: Verb, ctx: &mut ModuleContext<'_>) {
        match verb {
            Verb::Will => {
                ctx.negotiation.set_remote_enabled(self.code(), true);
                ctx.send_negotiation(Verb::Do, self.code());
                self.maybe_request(ctx);
            }
            Verb::Wont => ctx.negotiation.set_remote_enabled(self.code(), false),
            Verb::Do => {
                ctx.negotiation.set_local_enabled(self.code(), true);
                self.maybe_request(ctx);
            }
            Verb::Dont => ctx.negotiation.set_local_enabled(self.code(), false),
        }
    }

    fn on_subnegotiation(&mut self, body: &[u8], ctx: &mut ModuleContext<'_>) {
        let Some((&command, rest)) = body.split_first() else {
            return;
        };
        match command {
            charset::REQUEST => {
                let Some((&separator, names)) = rest.split_first() else {
                    ctx.send_subnegotiation(self.code(), &[charset::REJECTED]);
                    return;
                };
                let offered: Vec<&[u8]> = names
                    .split(|&b| b == separator)
                    .filter(|chunk| !chunk.is_empty())
                    .collect();
                let chosen = ctx.charset_order.iter().find(|preferred| {
                    offered
                        .iter()
                        .any(|name| name.eq_ignore_ascii_case(preferred.as_bytes()))
                });
                match chosen {
                    Some(name) => {
                        *ctx.current_encoding = name.clone();
                        let mut response = vec![charset::ACCEPTED];
                        response.extend_from_slice(name.as_bytes());
                        ctx.send_subnegotiation(self.code(), &response);
                    }
                    None => ctx.send_subnegotiation(self.code(), &[charset::REJECTED]),
                }
            }
            charset::ACCEPTED => {
                *ctx.current_encoding = String::from_utf8_lossy(rest).into_owned();
            }
            charset::REJECTED => {
                if let Some(previous) = self.previous_encoding.take() {
                    tracing::warn!(restored = %previous, "peer rejected CHARSET offer");
                    *ctx.current_encoding = previous;
                }
            }
            other => tracing::warn!(command = other, "unknown CHARSET subnegotiation command"),
        }
    }
}
