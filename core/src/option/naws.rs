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

//! NAWS — Negotiate About Window Size.
//!
//! Framing: `IAC SB NAWS <w_hi> <w_lo> <h_hi> <h_lo> IAC SE`, width and
//! height as 16-bit big-endian unsigned integers. A literal `0xFF` inside a
//! dimension byte is escaped as `IAC IAC` by the kernel before this module
//! ever sees the body, so `on_subnegotiation` always receives exactly four
//! raw bytes.

use super::{accept_negotiation, ModuleContext, OptionModule};
use crate::config::Mode;
use crate::trigger::{option, Verb};
use byteorder::{BigEndian, ByteOrder};

/// NAWS option module. The server announces `DO NAWS`; the client
/// announces `WILL NAWS`. `ctx.negotiation.initiated` (set once, at
/// `Machine::build` time, the moment our own `DO`/`WILL` goes out) is the
/// session-local flag that keeps us from re-asking an unsolicited peer: a
/// peer `WILL`/`DO` naming an option we already initiated is just the
/// answer to that initial ask, acknowledged silently, not a fresh offer to
/// echo back (some clients interpret a repeated `DO NAWS` as a cue to
/// resend, looping forever against naive hosts).
#[derive(Debug, Default)]
pub struct NawsModule;

impl OptionModule for NawsModule {
    fn name(&self) -> &'static str {
        "NAWS"
    }

    fn code(&self) -> u8 {
        option::NAWS
    }

    fn initial_negotiation(&self, mode: Mode) -> Option<Verb> {
        match mode {
            Mode::Server => Some(Verb::Do),
            Mode::Client => Some(Verb::Will),
        }
    }

    fn on_negotiate(&mut self, verb: Verb, ctx: &mut ModuleContext<'_>) {
        let code = self.code();
        if ctx.negotiation.initiated(code) {
            match verb {
                Verb::Will => ctx.negotiation.set_remote_enabled(code, true),
                Verb::Do => ctx.negotiation.set_local_enabled(code, true),
                Verb::Wont => ctx.negotiation.set_remote_enabled(code, false),
                Verb::Dont => ctx.negotiation.set_local_enabled(code, false),
            }
            return;
        }
        accept_negotiation(code, verb, ctx);
    }

    fn on_subnegotiation(&mut self, body: &[u8], ctx: &mut ModuleContext<'_>) {
        if body.len() != 4 {
            tracing::warn!(len = body.len(), "NAWS subnegotiation with unexpected length, ignoring");
            return;
        }
        let width = BigEndian::read_u16(&body[0..2]);
        let height = BigEndian::read_u16(&body[2..4]);
        if let Some(cb) = ctx.callbacks.on_naws.as_mut() {
            cb(height, width);
        }
    }
}
