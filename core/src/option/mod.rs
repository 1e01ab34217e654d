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

//! One module per negotiated option, behind a common trait instead of the
//! partial-class-per-option-file composition this engine's design notes
//! warn against. Every module owns its own scratch (a NAWS 4-byte buffer, a
//! TTYPE cycling list, …) and is handed an explicit [`ModuleContext`] for
//! each hook call rather than holding a back-reference to the interpreter.

pub mod charset;
pub mod eor_sga;
pub mod gmcp;
pub mod msdp;
pub mod mssp;
pub mod naws;
pub mod ttype;

use crate::config::{Callbacks, Mode, MsdpModel, MsspFactory};
use crate::negotiation::NegotiationTable;
use crate::trigger::{Verb, IAC, SB, SE};
use crate::wire::escape_iac;

/// Everything an option module's hooks may need, borrowed for the
/// duration of a single call. Constructed fresh by
/// [`crate::interpreter::Interpreter::fire_byte`] from its own fields, so
/// modules never hold a reference back into the interpreter between calls —
/// only an index into its module registry.
pub struct ModuleContext<'a> {
    /// Our negotiated role.
    pub mode: Mode,
    /// Shared local/remote enabled bits for every option code.
    pub negotiation: &'a mut NegotiationTable,
    /// Host callbacks; modules invoke these directly to report events.
    pub callbacks: &'a mut Callbacks,
    /// Pending outbound wire bytes, flushed by the host after each byte
    /// (or batch of bytes) is interpreted.
    pub out: &'a mut Vec<u8>,
    /// Configured CHARSET offer/preference order.
    pub charset_order: &'a [String],
    /// The text encoding currently in effect (a human-readable name; this
    /// crate does not itself transcode between character sets, it only
    /// negotiates and tracks which one is active — see `DESIGN.md`).
    pub current_encoding: &'a mut String,
    /// Factory for our MSSP payload, if we serve MSSP.
    pub mssp_config: Option<&'a MsspFactory>,
    /// Registry of MSDP variables we can report/send.
    pub msdp_model: &'a mut MsdpModel,
    /// Whether `IAC EOR` currently marks our prompt boundaries (peer did
    /// `DO`/`WILL TELOPT_EOR`). Read and written by
    /// [`crate::option::eor_sga`]; read by `send_prompt`.
    pub eor_active: &'a mut bool,
    /// Whether `IAC GA` currently marks our prompt boundaries, in the
    /// absence of EOR. Read and written by [`crate::option::eor_sga`].
    pub sga_active: &'a mut bool,
    /// Candidate terminal-type names offered when acting as TTYPE client.
    pub ttype_names: &'a [String],
}

impl ModuleContext<'_> {
    /// Emit `IAC <verb> <code>` and tell the host about it.
    pub fn send_negotiation(&mut self, verb: Verb, code: u8) {
        self.out.extend_from_slice(&[IAC, verb.byte(), code]);
        if let Some(cb) = self.callbacks.on_negotiation.as_mut() {
            cb(&[IAC, verb.byte(), code]);
        }
        tracing::debug!(verb = ?verb, code, "sent negotiation");
    }

    /// Emit `IAC SB <code> <escaped body> IAC SE`.
    pub fn send_subnegotiation(&mut self, code: u8, body: &[u8]) {
        let start = self.out.len();
        self.out.push(IAC);
        self.out.push(SB);
        self.out.push(code);
        self.out.extend_from_slice(&escape_iac(body));
        self.out.push(IAC);
        self.out.push(SE);
        if let Some(cb) = self.callbacks.on_negotiation.as_mut() {
            cb(&self.out[start..]);
        }
        tracing::debug!(code, len = body.len(), "sent subnegotiation");
    }
}

/// Shared accept-or-decline reaction for modules with no negotiation-time
/// side effect beyond flipping the enabled bit and acking symmetrically:
/// `WILL` from the peer is acked with `DO`, `DO` from the peer is acked
/// with `WILL`, and `WONT`/`DONT` simply clear the corresponding bit.
pub fn accept_negotiation(code: u8, verb: Verb, ctx: &mut ModuleContext<'_>) {
    match verb {
        Verb::Will => {
            ctx.negotiation.set_remote_enabled(code, true);
            ctx.send_negotiation(Verb::Do, code);
        }
        Verb::Wont => ctx.negotiation.set_remote_enabled(code, false),
        Verb::Do => {
            ctx.negotiation.set_local_enabled(code, true);
            ctx.send_negotiation(Verb::Will, code);
        }
        Verb::Dont => ctx.negotiation.set_local_enabled(code, false),
    }
}

/// A single negotiated Telnet option: NAWS, CHARSET, TTYPE, EOR/SGA, MSSP,
/// GMCP, or MSDP.
pub trait OptionModule: Send {
    /// Human-readable name, used only for tracing.
    fn name(&self) -> &'static str;

    /// The Telnet option code this module owns.
    fn code(&self) -> u8;

    /// What to announce at `build()` time, if anything — typically `Will`
    /// or `Do` depending on role; `None` for options that only ever react.
    fn initial_negotiation(&self, mode: Mode) -> Option<Verb>;

    /// The peer sent `WILL`/`WONT`/`DO`/`DONT` naming this option. The
    /// module decides how (or whether) to reply and updates
    /// `ctx.negotiation`'s enabled bits for its own code.
    fn on_negotiate(&mut self, verb: Verb, ctx: &mut ModuleContext<'_>);

    /// A complete subnegotiation body for this option arrived (already
    /// IAC-unescaped, with no leading option code or trailing `IAC SE`).
    fn on_subnegotiation(&mut self, body: &[u8], ctx: &mut ModuleContext<'_>);
}
