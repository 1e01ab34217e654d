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

//! MSDP — MUD Server Data Protocol.
//!
//! Every subnegotiation body is decoded with [`crate::msdp_codec::decode`]
//! into a JSON object and handed to `on_msdp`. If the host callback returns
//! `Some(reply)`, that value is re-encoded and sent straight back — the host
//! is always given first refusal over the reply. If the callback returns
//! `None` (or is not configured at all), [`auto_reply`] falls back to the
//! configured [`crate::config::MsdpModel`] for the well-known
//! `LIST`/`REPORT`/`SEND` commands; `UNREPORT`/`RESET` and anything else get
//! no automatic reply.

use super::{accept_negotiation, ModuleContext, OptionModule};
use crate::config::{Mode, MsdpModel};
use crate::trigger::{option, Verb};
use serde_json::{json, Value};

/// MSDP option module.
#[derive(Debug, Default)]
pub struct MsdpModule;

/// Build a default reply for the well-known MSDP commands, using the
/// host-configured variable registry. Returns `None` when `command` has no
/// sensible automatic reply (`UNREPORT`, `RESET`, or anything unrecognised).
fn auto_reply(command: &str, argument: &Value, model: &MsdpModel) -> Option<Value> {
    match command {
        "LIST" => {
            let which = argument.as_str().unwrap_or_default();
            let names = match which {
                "REPORTABLE_VARIABLES" => model.reportable.clone(),
                "SENDABLE_VARIABLES" => model.sendable.clone(),
                "COMMANDS" => vec![
                    "LIST".to_string(),
                    "REPORT".to_string(),
                    "UNREPORT".to_string(),
                    "SEND".to_string(),
                    "RESET".to_string(),
                ],
                _ => return None,
            };
            Some(json!({ which: names }))
        }
        "SEND" => {
            let names: Vec<String> = match argument {
                Value::String(s) => vec![s.clone()],
                Value::Array(items) => items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect(),
                _ => return None,
            };
            let mut reply = serde_json::Map::new();
            for name in names {
                if model.sendable.contains(&name) {
                    if let Some(value) = model.values.get(&name) {
                        reply.insert(name, value.clone());
                    }
                }
            }
            if reply.is_empty() {
                None
            } else {
                Some(Value::Object(reply))
            }
        }
        "REPORT" => {
            let names: Vec<String> = match argument {
                Value::String(s) => vec![s.clone()],
                Value::Array(items) => items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect(),
                _ => return None,
            };
            let mut reply = serde_json::Map::new();
            for name in names {
                if model.reportable.contains(&name) {
                    if let Some(value) = model.values.get(&name) {
                        reply.insert(name, value.clone());
                    }
                }
            }
            if reply.is_empty() {
                None
            } else {
                Some(Value::Object(reply))
            }
        }
        _ => None,
    }
}

impl OptionModule for MsdpModule {
    fn name(&self) -> &'static str {
        "MSDP"
    }

    fn code(&self) -> u8 {
        option::MSDP
    }

    fn initial_negotiation(&self, mode: Mode) -> Option<Verb> {
        match mode {
            Mode::Server => Some(Verb::Will),
            Mode::Client => Some(Verb::Do),
        }
    }

    fn on_negotiate(&mut self, verb: Verb, ctx: &mut ModuleContext<'_>) {
        accept_negotiation(self.code(), verb, ctx);
    }

    fn on_subnegotiation(&mut self, body: &[u8], ctx: &mut ModuleContext<'_>) {
        let value = match crate::msdp_codec::decode(body) {
            Ok(v) => v,
            Err(err) => {
                tracing::warn!(error = %err, "malformed MSDP subnegotiation, ignoring");
                return;
            }
        };

        let reply = match ctx.callbacks.on_msdp.as_mut() {
            Some(cb) => cb(value.clone()),
            None => None,
        };
        let reply = reply.or_else(|| {
            let Value::Object(map) = &value else {
                return None;
            };
            map.iter()
                .find_map(|(command, argument)| auto_reply(command, argument, ctx.msdp_model))
        });

        if let Some(reply) = reply {
            match crate::msdp_codec::encode(&reply) {
                Ok(bytes) => ctx.send_subnegotiation(self.code(), &bytes),
                Err(err) => tracing::warn!(error = %err, "could not encode MSDP reply"),
            }
        }
    }
}
