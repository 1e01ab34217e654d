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

//! TTYPE — RFC 1091 terminal type, extended by the MTTS cycling convention.
//!
//! The server side owns the asking: `IAC DO TTYPE`, then `IAC SB TTYPE SEND
//! IAC SE` each time it wants the next name. The client side owns the
//! reporting: `IAC SB TTYPE IS <name> IAC SE`. Clients that support MTTS
//! cycle through a short list of names (terminal family, then `MTTS <bitset>`
//! last) and repeat the final name once the list is exhausted; this module
//! does not interpret the names themselves, it only tracks where in the
//! configured list it is.

use super::{ModuleContext, OptionModule};
use crate::config::Mode;
use crate::trigger::{option, ttype, Verb};

/// TTYPE option module.
#[derive(Debug, Default)]
pub struct TtypeModule {
    /// Server role: have we already sent our first `SEND`?
    asked: bool,
    /// Server role: last name reported by the peer, to detect the MTTS
    /// cycle closing (the same name sent twice in a row).
    last_seen: Option<String>,
    /// Client role: index into `ctx.ttype_names` of the next name to report.
    cursor: usize,
}

impl TtypeModule {
    fn send_send(&mut self, ctx: &mut ModuleContext<'_>) {
        ctx.send_subnegotiation(self.code(), &[ttype::SEND]);
    }
}

impl OptionModule for TtypeModule {
    fn name(&self) -> &'static str {
        "TTYPE"
    }

    fn code(&self) -> u8 {
        option::TTYPE
    }

    fn initial_negotiation(&self, mode: Mode) -> Option<Verb> {
        match mode {
            Mode::Server => Some(Verb::Do),
            Mode::Client => Some(Verb::Will),
        }
    }

    fn on_negotiate(&mut self, verb: Verb, ctx: &mut ModuleContext<'_>) {
        match verb {
            Verb::Will => {
                ctx.negotiation.set_remote_enabled(self.code(), true);
                ctx.send_negotiation(Verb::Do, self.code());
                if ctx.mode == Mode::Server && !self.asked {
                    self.asked = true;
                    self.send_send(ctx);
                }
            }
            Verb::Wont => ctx.negotiation.set_remote_enabled(self.code(), false),
            Verb::Do => {
                ctx.negotiation.set_local_enabled(self.code(), true);
                ctx.send_negotiation(Verb::Will, self.code());
            }
            Verb::Dont => ctx.negotiation.set_local_enabled(self.code(), false),
        }
    }

    fn on_subnegotiation(&mut self, body: &[u8], ctx: &mut ModuleContext<'_>) {
        let Some((&command, rest)) = body.split_first() else {
            return;
        };
        match command {
            ttype::IS => {
                let name = String::from_utf8_lossy(rest).into_owned();
                tracing::debug!(name = %name, "peer reported terminal type");
                if ctx.mode == Mode::Server {
                    let cycle_closed = self.last_seen.as_deref() == Some(name.as_str());
                    self.last_seen = Some(name);
                    if !cycle_closed {
                        self.send_send(ctx);
                    }
                }
            }
            ttype::SEND => {
                if ctx.mode == Mode::Client {
                    let name = ctx
                        .ttype_names
                        .get(self.cursor)
                        .or_else(|| ctx.ttype_names.last())
                        .cloned()
                        .unwrap_or_else(|| "UNKNOWN".to_string());
                    if self.cursor + 1 < ctx.ttype_names.len() {
                        self.cursor += 1;
                    }
                    let mut response = vec![ttype::IS];
                    response.extend_from_slice(name.as_bytes());
                    ctx.send_subnegotiation(self.code(), &response);
                }
            }
            other => tracing::warn!(command = other, "unknown TTYPE subnegotiation command"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Callbacks, MsdpModel};
    use crate::negotiation::NegotiationTable;

    #[allow(clippy::too_many_arguments)]
    fn ctx<'a>(
        mode: Mode,
        negotiation: &'a mut NegotiationTable,
        callbacks: &'a mut Callbacks,
        out: &'a mut Vec<u8>,
        charset_order: &'a [String],
        current_encoding: &'a mut String,
        msdp_model: &'a mut MsdpModel,
        eor_active: &'a mut bool,
        sga_active: &'a mut bool,
        ttype_names: &'a [String],
    ) -> ModuleContext<'a> {
        ModuleContext {
            mode,
            negotiation,
            callbacks,
            out,
            charset_order,
            current_encoding,
            mssp_config: None,
            msdp_model,
            eor_active,
            sga_active,
            ttype_names,
        }
    }

    #[test]
    fn client_cycles_then_repeats_last_name() {
        let mut module = TtypeModule::default();
        let mut negotiation = NegotiationTable::new();
        let mut callbacks = Callbacks::default();
        let mut out = Vec::new();
        let charset_order = Vec::new();
        let mut encoding = "UTF-8".to_string();
        let mut msdp_model = MsdpModel::default();
        let mut eor_active = false;
        let mut sga_active = false;
        let ttype_names = vec!["XTERM".to_string(), "XTERM-256COLOR".to_string()];

        for expected in ["XTERM", "XTERM-256COLOR", "XTERM-256COLOR"] {
            out.clear();
            let mut context = ctx(
                Mode::Client,
                &mut negotiation,
                &mut callbacks,
                &mut out,
                &charset_order,
                &mut encoding,
                &mut msdp_model,
                &mut eor_active,
                &mut sga_active,
                &ttype_names,
            );
            module.on_subnegotiation(&[ttype::SEND], &mut context);
            let mut wanted = vec![ttype::IS];
            wanted.extend_from_slice(expected.as_bytes());
            assert!(out.windows(wanted.len()).any(|w| w == wanted.as_slice()));
        }
    }

    #[test]
    fn server_requests_next_name_after_is() {
        let mut module = TtypeModule::default();
        let mut negotiation = NegotiationTable::new();
        let mut callbacks = Callbacks::default();
        let mut out = Vec::new();
        let charset_order = Vec::new();
        let mut encoding = "UTF-8".to_string();
        let mut msdp_model = MsdpModel::default();
        let mut eor_active = false;
        let mut sga_active = false;
        let ttype_names = Vec::new();
        let mut context = ctx(
            Mode::Server,
            &mut negotiation,
            &mut callbacks,
            &mut out,
            &charset_order,
            &mut encoding,
            &mut msdp_model,
            &mut eor_active,
            &mut sga_active,
            &ttype_names,
        );
        let mut body = vec![ttype::IS];
        body.extend_from_slice(b"ANSI");
        module.on_subnegotiation(&body, &mut context);
        assert!(out.contains(&ttype::SEND));
    }
}
