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

//! Build-time configuration for an [`crate::Interpreter`].
//!
//! This module is deliberately free of any file-format or CLI dependency —
//! loading a [`EngineConfig`] from YAML, environment overrides, or flags is
//! the host binary's job (see the `telnetrix-gateway` example crate), not
//! this crate's.

use std::collections::BTreeMap;

/// Which side of the connection this interpreter drives.
///
/// Mirrors the asymmetry in the option modules: the `Server` role announces
/// `DO NAWS`/`DO TTYPE` and serves MSSP; the `Client` role announces
/// `WILL NAWS`/`WILL TTYPE` and consumes MSSP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// We are the MUD server talking to a player's client.
    Server,
    /// We are a client talking to a MUD server.
    Client,
}

/// A single MSSP value. Lists repeat `MSSP_VAL` once per element; booleans
/// serialise as `"1"`/`"0"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MsspValue {
    /// A single string value.
    Str(String),
    /// An integer, serialised as decimal text.
    Int(i64),
    /// A boolean, serialised as `"1"` or `"0"`.
    Bool(bool),
    /// A repeated-key list, e.g. `CRAWL DELAY` style multi-valued keys.
    List(Vec<String>),
}

impl MsspValue {
    /// The wire values this key expands to (one `MSSP_VAL` per element).
    pub fn wire_values(&self) -> Vec<String> {
        match self {
            MsspValue::Str(s) => vec![s.clone()],
            MsspValue::Int(i) => vec![i.to_string()],
            MsspValue::Bool(b) => vec![if *b { "1".to_string() } else { "0".to_string() }],
            MsspValue::List(items) => items.clone(),
        }
    }
}

/// MUD Server Status Protocol payload, built fresh per request.
///
/// Known keys are named fields so typos in well-known MSSP keys are caught
/// at compile time; anything else goes in `extended`, in insertion order
/// after the known keys, per §4.3.
#[derive(Debug, Clone, Default)]
pub struct MsspTable {
    /// The MUD's name.
    pub name: Option<String>,
    /// Current player count.
    pub players: Option<i64>,
    /// Server uptime, in seconds since epoch or since start (host's choice).
    pub uptime: Option<i64>,
    /// Codebase/engine name.
    pub codebase: Option<String>,
    /// Listening port(s).
    pub port: Option<Vec<String>>,
    /// Anything not covered by the well-known keys above.
    pub extended: BTreeMap<String, MsspValue>,
}

impl MsspTable {
    /// Parse the alternating `VAR <key> VAL <value> (VAL <value>)*` byte
    /// sequence between `IAC SB MSSP` and `IAC SE` (the client/crawler side
    /// of the exchange; servers build their table from host configuration
    /// instead, via [`MsspTable::entries`]).
    pub fn from_wire(body: &[u8]) -> MsspTable {
        use crate::trigger::msdp::{VAL, VAR};
        let mut table = MsspTable::default();
        let mut pos = 0;
        while pos < body.len() {
            if body[pos] != VAR {
                pos += 1;
                continue;
            }
            pos += 1;
            let key_start = pos;
            while pos < body.len() && body[pos] != VAL && body[pos] != VAR {
                pos += 1;
            }
            let key = String::from_utf8_lossy(&body[key_start..pos]).into_owned();
            let mut values = Vec::new();
            while pos < body.len() && body[pos] == VAL {
                pos += 1;
                let val_start = pos;
                while pos < body.len() && body[pos] != VAL && body[pos] != VAR {
                    pos += 1;
                }
                values.push(String::from_utf8_lossy(&body[val_start..pos]).into_owned());
            }
            table.assign(key, values);
        }
        table
    }

    fn assign(&mut self, key: String, values: Vec<String>) {
        match key.as_str() {
            "NAME" => self.name = values.into_iter().next(),
            "PLAYERS" => self.players = values.into_iter().next().and_then(|v| v.parse().ok()),
            "UPTIME" => self.uptime = values.into_iter().next().and_then(|v| v.parse().ok()),
            "CODEBASE" => self.codebase = values.into_iter().next(),
            "PORT" => self.port = Some(values),
            _ if values.len() > 1 => {
                self.extended.insert(key, MsspValue::List(values));
            }
            _ => {
                self.extended
                    .insert(key, MsspValue::Str(values.into_iter().next().unwrap_or_default()));
            }
        }
    }

    /// Flatten into an ordered `(key, values)` list ready for wire encoding.
    pub fn entries(&self) -> Vec<(String, Vec<String>)> {
        let mut out = Vec::new();
        if let Some(name) = &self.name {
            out.push(("NAME".to_string(), vec![name.clone()]));
        }
        if let Some(players) = self.players {
            out.push(("PLAYERS".to_string(), vec![players.to_string()]));
        }
        if let Some(uptime) = self.uptime {
            out.push(("UPTIME".to_string(), vec![uptime.to_string()]));
        }
        if let Some(codebase) = &self.codebase {
            out.push(("CODEBASE".to_string(), vec![codebase.clone()]));
        }
        if let Some(ports) = &self.port {
            out.push(("PORT".to_string(), ports.clone()));
        }
        for (key, value) in &self.extended {
            out.push((key.clone(), value.wire_values()));
        }
        out
    }
}

/// Factory invoked each time a peer requests our MSSP payload.
pub type MsspFactory = Box<dyn Fn() -> MsspTable + Send + Sync>;

/// Registry of MSDP variables this side knows how to `REPORT`/`SEND`, plus
/// their current values for `LIST`/`SEND` responses.
#[derive(Debug, Clone, Default)]
pub struct MsdpModel {
    /// Variable names that may be named in a `REPORT` command.
    pub reportable: Vec<String>,
    /// Variable names that may be named in a `SEND` command.
    pub sendable: Vec<String>,
    /// Current values, keyed by variable name, used to answer `SEND`.
    pub values: BTreeMap<String, serde_json::Value>,
}

/// Host-supplied callbacks, all optional. Mirrors the "callback zoo becomes
/// one nullable-at-construction configuration record" design note.
pub struct Callbacks {
    /// A complete line (terminated by `\n`, `\r` stripped) was accumulated.
    pub on_submit: Option<Box<dyn FnMut(&[u8]) + Send>>,
    /// Raw negotiation bytes were emitted (for logging/observability only —
    /// the bytes are also appended to the interpreter's own egress buffer).
    pub on_negotiation: Option<Box<dyn FnMut(&[u8]) + Send>>,
    /// The peer reported its window size: `(height, width)`.
    pub on_naws: Option<Box<dyn FnMut(u16, u16) + Send>>,
    /// A GMCP message arrived: `(package, json_payload)`.
    pub on_gmcp: Option<Box<dyn FnMut(&str, &str) + Send>>,
    /// An MSDP message decoded to JSON arrived; the returned value, if any,
    /// is re-encoded to MSDP and sent back to the peer.
    pub on_msdp: Option<Box<dyn FnMut(serde_json::Value) -> Option<serde_json::Value> + Send>>,
    /// The peer reported its MSSP table (client role, consuming a crawl).
    pub on_mssp: Option<Box<dyn FnMut(&MsspTable) + Send>>,
    /// A prompt boundary (`IAC EOR`/`IAC GA` with no trailing newline) was
    /// reached; the accumulated, not-yet-terminated line is handed over.
    pub on_prompt: Option<Box<dyn FnMut(&[u8]) + Send>>,
}

impl Default for Callbacks {
    fn default() -> Self {
        Callbacks {
            on_submit: None,
            on_negotiation: None,
            on_naws: None,
            on_gmcp: None,
            on_msdp: None,
            on_mssp: None,
            on_prompt: None,
        }
    }
}

/// Build-time configuration for an [`crate::Interpreter`].
pub struct EngineConfig {
    /// Server or client role.
    pub mode: Mode,
    /// Maximum accumulated line length, in bytes, before `BufferOverflow`.
    pub max_buffer_size: usize,
    /// Offer/preference order for CHARSET negotiation.
    pub charset_order: Vec<String>,
    /// Candidate terminal-type names this side offers when acting as TTYPE
    /// client, cycled in order on each `SEND`. A single-entry list (the
    /// default) causes the cycle to close on the second request, which is
    /// the correct behaviour for a client with only one terminal type to
    /// report.
    pub ttype_names: Vec<String>,
    /// Factory for the MSSP payload, consulted on each crawl request.
    pub mssp_config: Option<MsspFactory>,
    /// Registry of MSDP variables this side can report/send.
    pub msdp_model: MsdpModel,
    /// Bounded ingress channel capacity, in bytes.
    pub ingress_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            mode: Mode::Server,
            max_buffer_size: 5 * 1024 * 1024,
            charset_order: vec!["UTF-8".to_string(), "US-ASCII".to_string()],
            ttype_names: vec!["UNKNOWN".to_string()],
            mssp_config: None,
            msdp_model: MsdpModel::default(),
            ingress_capacity: 10_000,
        }
    }
}

impl EngineConfig {
    /// Start from defaults in the given role.
    pub fn new(mode: Mode) -> Self {
        EngineConfig {
            mode,
            ..Default::default()
        }
    }
}
