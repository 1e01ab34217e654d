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

//! EOR (RFC 885) and SGA — the two options that mark a prompt boundary
//! instead of a full line.
//!
//! Neither option carries a subnegotiation body; both are pure negotiation.
//! Whoever drives the kernel's `StartNegotiation` state reads
//! `ctx.eor_active`/`ctx.sga_active` after a bare `IAC EOR` or `IAC GA`
//! command byte to decide whether to fire `on_prompt` — these modules only
//! keep those two flags in sync with the negotiated state. EOR takes
//! priority when both are active, per §4.4.

use super::{accept_negotiation, ModuleContext, OptionModule};
use crate::config::Mode;
use crate::trigger::{option, Verb};

/// End-of-record option module.
#[derive(Debug, Default)]
pub struct EorModule;

impl OptionModule for EorModule {
    fn name(&self) -> &'static str {
        "EOR"
    }

    fn code(&self) -> u8 {
        option::EOR
    }

    fn initial_negotiation(&self, mode: Mode) -> Option<Verb> {
        match mode {
            Mode::Server => Some(Verb::Will),
            Mode::Client => Some(Verb::Do),
        }
    }

    fn on_negotiate(&mut self, verb: Verb, ctx: &mut ModuleContext<'_>) {
        accept_negotiation(self.code(), verb, ctx);
        *ctx.eor_active = ctx.negotiation.local_enabled(self.code()) && ctx.negotiation.remote_enabled(self.code());
    }

    fn on_subnegotiation(&mut self, _body: &[u8], _ctx: &mut ModuleContext<'_>) {
        // EOR has no subnegotiation; nothing ever dispatches one here.
    }
}

/// Suppress Go-Ahead option module.
#[derive(Debug, Default)]
pub struct SgaModule;

impl OptionModule for SgaModule {
    fn name(&self) -> &'static str {
        "SGA"
    }

    fn code(&self) -> u8 {
        option::SGA
    }

    fn initial_negotiation(&self, _mode: Mode) -> Option<Verb> {
        Some(Verb::Will)
    }

    fn on_negotiate(&mut self, verb: Verb, ctx: &mut ModuleContext<'_>) {
        accept_negotiation(self.code(), verb, ctx);
        *ctx.sga_active = ctx.negotiation.local_enabled(self.code()) || ctx.negotiation.remote_enabled(self.code());
    }

    fn on_subnegotiation(&mut self, _body: &[u8], _ctx: &mut ModuleContext<'_>) {
        // SGA has no subnegotiation either.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Callbacks, MsdpModel};
    use crate::negotiation::NegotiationTable;

    #[allow(clippy::too_many_arguments)]
    fn ctx<'a>(
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
            mode: Mode::Server,
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
    fn eor_becomes_active_once_both_sides_agree() {
        let mut module = EorModule;
        let mut negotiation = NegotiationTable::new();
        let mut callbacks = Callbacks::default();
        let mut out = Vec::new();
        let charset_order = Vec::new();
        let mut encoding = "UTF-8".to_string();
        let mut msdp_model = MsdpModel::default();
        let mut eor_active = false;
        let mut sga_active = false;
        let ttype_names = Vec::new();

        {
            let mut context = ctx(
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
            module.on_negotiate(Verb::Will, &mut context);
        }
        assert!(!eor_active, "only our local side is enabled so far");

        {
            let mut context = ctx(
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
            module.on_negotiate(Verb::Do, &mut context);
        }
        assert!(eor_active, "both sides now agree on EOR");
    }

    #[test]
    fn sga_activates_on_either_side_alone() {
        let mut module = SgaModule;
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
        module.on_negotiate(Verb::Do, &mut context);
        assert!(sga_active);
    }
}
