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

//! MSSP — MUD Server Status Protocol.
//!
//! Server role: once negotiated, any subnegotiation arriving from a crawler
//! (the body is conventionally empty — MSSP is a dump, not a request
//! language) triggers a fresh `MsspTable` from the configured factory,
//! flattened to alternating `MSSP_VAR`/`MSSP_VAL` pairs and sent back.
//! Client role: an incoming MSSP subnegotiation is parsed with
//! [`crate::config::MsspTable::from_wire`] and handed to `on_mssp`.

use super::{ModuleContext, OptionModule};
use crate::config::{Mode, MsspTable};
use crate::trigger::{msdp, option, Verb};

/// MSSP option module.
#[derive(Debug, Default)]
pub struct MsspModule;

impl MsspModule {
    fn send_table(&self, table: &MsspTable, ctx: &mut ModuleContext<'_>) {
        let mut body = Vec::new();
        for (key, values) in table.entries() {
            body.push(msdp::VAR);
            body.extend_from_slice(key.as_bytes());
            for value in values {
                body.push(msdp::VAL);
                body.extend_from_slice(value.as_bytes());
            }
        }
        ctx.send_subnegotiation(self.code(), &body);
    }
}

impl OptionModule for MsspModule {
    fn name(&self) -> &'static str {
        "MSSP"
    }

    fn code(&self) -> u8 {
        option::MSSP
    }

    fn initial_negotiation(&self, mode: Mode) -> Option<Verb> {
        match mode {
            Mode::Server => Some(Verb::Will),
            Mode::Client => None,
        }
    }

    fn on_negotiate(&mut self, verb: Verb, ctx: &mut ModuleContext<'_>) {
        match verb {
            Verb::Will => ctx.negotiation.set_remote_enabled(self.code(), true),
            Verb::Wont => ctx.negotiation.set_remote_enabled(self.code(), false),
            Verb::Do => ctx.negotiation.set_local_enabled(self.code(), true),
            Verb::Dont => ctx.negotiation.set_local_enabled(self.code(), false),
        }
    }

    fn on_subnegotiation(&mut self, body: &[u8], ctx: &mut ModuleContext<'_>) {
        match ctx.mode {
            Mode::Server => {
                let Some(factory) = ctx.mssp_config else {
                    tracing::warn!("MSSP crawl requested but no mssp_config is configured");
                    return;
                };
                let table = factory();
                self.send_table(&table, ctx);
            }
            Mode::Client => {
                let table = MsspTable::from_wire(body);
                if let Some(cb) = ctx.callbacks.on_mssp.as_mut() {
                    cb(&table);
                }
            }
        }
    }
}
