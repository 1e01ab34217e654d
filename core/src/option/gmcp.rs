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

//! GMCP — Generic MUD Communication Protocol.
//!
//! Framing: `IAC SB GMCP <package name> <space> <JSON payload> IAC SE`. The
//! package name is whatever precedes the first space byte; everything after
//! it is handed to the host verbatim as text — this module does not itself
//! parse the payload as JSON, since the host may want the raw text for
//! logging even when it fails to parse.

use super::{accept_negotiation, ModuleContext, OptionModule};
use crate::config::Mode;
use crate::trigger::{option, Verb};

/// GMCP option module.
#[derive(Debug, Default)]
pub struct GmcpModule;

impl OptionModule for GmcpModule {
    fn name(&self) -> &'static str {
        "GMCP"
    }

    fn code(&self) -> u8 {
        option::GMCP
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
        let text = String::from_utf8_lossy(body);
        let (package, payload) = match text.find(' ') {
            Some(idx) => (&text[..idx], text[idx + 1..].trim_start()),
            None => (text.as_ref(), ""),
        };
        if let Some(cb) = ctx.callbacks.on_gmcp.as_mut() {
            cb(package, payload);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Callbacks, MsdpModel};
    use crate::negotiation::NegotiationTable;
    use std::cell::RefCell;
    use std::rc::Rc;

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
    fn splits_package_from_payload_on_first_space() {
        let mut module = GmcpModule;
        let seen = Rc::new(RefCell::new(None));
        let seen2 = seen.clone();
        let mut callbacks = Callbacks::default();
        callbacks.on_gmcp = Some(Box::new(move |pkg, payload| {
            *seen2.borrow_mut() = Some((pkg.to_string(), payload.to_string()));
        }));
        let mut negotiation = NegotiationTable::new();
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
        module.on_subnegotiation(b"Char.Vitals {\"hp\":10}", &mut context);
        assert_eq!(
            *seen.borrow(),
            Some(("Char.Vitals".to_string(), "{\"hp\":10}".to_string()))
        );
    }

    #[test]
    fn package_with_no_payload_yields_empty_string() {
        let mut module = GmcpModule;
        let seen = Rc::new(RefCell::new(None));
        let seen2 = seen.clone();
        let mut callbacks = Callbacks::default();
        callbacks.on_gmcp = Some(Box::new(move |pkg, payload| {
            *seen2.borrow_mut() = Some((pkg.to_string(), payload.to_string()));
        }));
        let mut negotiation = NegotiationTable::new();
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
        module.on_subnegotiation(b"Core.Ping", &mut context);
        assert_eq!(*seen.borrow(), Some(("Core.Ping".to_string(), String::new())));
    }
}
