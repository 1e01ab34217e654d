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

//! The interpreter's finite automaton kernel.
//!
//! [`Machine`] is synchronous and owns every byte of mutable state the
//! engine has — the current [`State`], the line and subnegotiation buffers,
//! the negotiation table, and the registered [`OptionModule`]s. It has no
//! notion of sockets, channels, or async tasks; [`crate::interpreter`] is
//! the thin async shell that feeds it bytes from a bounded channel and
//! flushes [`Machine::take_outbound`] back to the wire.

use crate::config::{Callbacks, EngineConfig, Mode, MsdpModel, MsspFactory};
use crate::error::EngineError;
use crate::negotiation::NegotiationTable;
use crate::option::{eor_sga, gmcp, msdp, mssp, naws, ttype, charset, ModuleContext, OptionModule};
use crate::state::State;
use crate::trigger::{Verb, CR, DONT, DO, EOR_CMD, GA, IAC, LF, SB, SE, WILL, WONT};
use crate::wire::escape_iac;

/// The synchronous automaton kernel.
pub struct Machine {
    state: State,
    mode: Mode,
    negotiation: NegotiationTable,
    modules: Vec<Box<dyn OptionModule>>,
    callbacks: Callbacks,
    line_buffer: Vec<u8>,
    sub_buffer: Vec<u8>,
    max_buffer_size: usize,
    charset_order: Vec<String>,
    current_encoding: String,
    mssp_config: Option<MsspFactory>,
    msdp_model: MsdpModel,
    ttype_names: Vec<String>,
    eor_active: bool,
    sga_active: bool,
    out: Vec<u8>,
}

impl Machine {
    /// Build a new kernel in the given role and emit each registered
    /// module's initial negotiation into the outbound buffer.
    pub fn build(config: EngineConfig, callbacks: Callbacks) -> Machine {
        let modules: Vec<Box<dyn OptionModule>> = vec![
            Box::new(naws::NawsModule::default()),
            Box::new(charset::CharsetModule::default()),
            Box::new(ttype::TtypeModule::default()),
            Box::new(eor_sga::EorModule),
            Box::new(eor_sga::SgaModule),
            Box::new(mssp::MsspModule),
            Box::new(gmcp::GmcpModule),
            Box::new(msdp::MsdpModule),
        ];

        let mut machine = Machine {
            state: State::Accepting,
            mode: config.mode,
            negotiation: NegotiationTable::new(),
            modules,
            callbacks,
            line_buffer: Vec::new(),
            sub_buffer: Vec::new(),
            max_buffer_size: config.max_buffer_size,
            charset_order: config.charset_order,
            current_encoding: "US-ASCII".to_string(),
            mssp_config: config.mssp_config,
            msdp_model: config.msdp_model,
            ttype_names: config.ttype_names,
            eor_active: false,
            sga_active: false,
            out: Vec::new(),
        };

        let mode = machine.mode;
        for module in machine.modules.iter() {
            if let Some(verb) = module.initial_negotiation(mode) {
                let code = module.code();
                machine.negotiation.mark_initiated(code);
                machine.out.extend_from_slice(&[IAC, verb.byte(), code]);
                tracing::debug!(option = module.name(), verb = ?verb, "announced initial negotiation");
            }
        }
        machine
    }

    /// Feed a single wire byte through the automaton.
    pub fn fire_byte(&mut self, byte: u8) -> Result<(), EngineError> {
        match self.state {
            State::Accepting => self.accept(byte)?,
            State::StartNegotiation => self.start_negotiation(byte),
            State::Willing => self.verb_code(byte, Verb::Will),
            State::Refusing => self.verb_code(byte, Verb::Wont),
            State::Do => self.verb_code(byte, Verb::Do),
            State::Dont => self.verb_code(byte, Verb::Dont),
            State::SubNegotiationOption => {
                self.sub_buffer.clear();
                self.state = State::SubNegotiationBody(byte);
            }
            State::SubNegotiationBody(code) => {
                if byte == IAC {
                    self.state = State::SubNegotiationIac(code);
                } else {
                    self.sub_buffer.push(byte);
                }
            }
            State::SubNegotiationIac(code) => match byte {
                SE => {
                    self.finish_subnegotiation(code);
                    self.state = State::Accepting;
                }
                IAC => {
                    self.sub_buffer.push(IAC);
                    self.state = State::SubNegotiationBody(code);
                }
                _ => {
                    tracing::warn!(code, byte, "malformed subnegotiation body, draining to next IAC SE");
                    self.state = State::BadSubNegotiation;
                }
            },
            State::BadSubNegotiation => {
                if byte == IAC {
                    self.state = State::BadSubNegotiationIac;
                }
            }
            State::BadSubNegotiationIac => {
                self.state = match byte {
                    SE => State::Accepting,
                    _ => State::BadSubNegotiation,
                };
            }
            // Transient sinks: `verb_code` assigns and clears these within
            // the same call, purely so tracing can name which one fired.
            // The kernel is never left sitting in one of these between
            // calls, so a byte is never actually dispatched here.
            State::BadWilling | State::BadRefusing | State::BadDo | State::BadDont => {
                self.state = State::Accepting;
            }
        }
        Ok(())
    }

    /// Feed a whole slice through the automaton, stopping at the first
    /// fatal error (a later call can resume from wherever it left off).
    pub fn fire_bytes(&mut self, bytes: &[u8]) -> Result<(), EngineError> {
        for &byte in bytes {
            self.fire_byte(byte)?;
        }
        Ok(())
    }

    /// Take everything queued for the wire since the last call.
    pub fn take_outbound(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.out)
    }

    /// Queue raw application bytes, IAC-doubled for safety.
    pub fn send(&mut self, bytes: &[u8]) {
        self.out.extend_from_slice(&escape_iac(bytes));
    }

    /// Queue `bytes` followed by whatever currently marks a prompt boundary:
    /// `IAC EOR` if EOR is active (it takes priority), `IAC GA` if only SGA
    /// is active, or nothing if neither side negotiated a boundary marker.
    pub fn send_prompt(&mut self, bytes: &[u8]) {
        self.out.extend_from_slice(&escape_iac(bytes));
        if self.eor_active {
            self.out.extend_from_slice(&[IAC, EOR_CMD]);
        } else if self.sga_active {
            self.out.extend_from_slice(&[IAC, GA]);
        }
    }

    /// Queue a GMCP message: `IAC SB GMCP <package> <payload> IAC SE`.
    pub fn send_gmcp(&mut self, package: &str, payload: &str) {
        let mut body = package.as_bytes().to_vec();
        body.push(b' ');
        body.extend_from_slice(payload.as_bytes());
        self.send_subnegotiation(crate::trigger::option::GMCP, &body);
    }

    /// Queue an MSDP message built from a JSON object.
    pub fn send_msdp(&mut self, value: &serde_json::Value) -> Result<(), EngineError> {
        let body = crate::msdp_codec::encode(value)?;
        self.send_subnegotiation(crate::trigger::option::MSDP, &body);
        Ok(())
    }

    fn send_subnegotiation(&mut self, code: u8, body: &[u8]) {
        self.out.push(IAC);
        self.out.push(SB);
        self.out.push(code);
        self.out.extend_from_slice(&escape_iac(body));
        self.out.push(IAC);
        self.out.push(SE);
    }

    fn accept(&mut self, byte: u8) -> Result<(), EngineError> {
        if byte == IAC {
            self.state = State::StartNegotiation;
            return Ok(());
        }
        if byte == CR {
            return Ok(());
        }
        if byte == LF {
            let line = std::mem::take(&mut self.line_buffer);
            if let Some(cb) = self.callbacks.on_submit.as_mut() {
                cb(&line);
            }
            return Ok(());
        }
        let attempted = self.line_buffer.len() + 1;
        if attempted > self.max_buffer_size {
            return Err(EngineError::BufferOverflow {
                limit: self.max_buffer_size,
                attempted,
            });
        }
        self.line_buffer.push(byte);
        Ok(())
    }

    fn start_negotiation(&mut self, byte: u8) {
        self.state = match byte {
            WILL => State::Willing,
            WONT => State::Refusing,
            DO => State::Do,
            DONT => State::Dont,
            SB => State::SubNegotiationOption,
            IAC => {
                self.line_buffer.push(IAC);
                State::Accepting
            }
            GA | EOR_CMD => {
                self.fire_prompt_boundary();
                State::Accepting
            }
            _ => State::Accepting,
        };
    }

    fn fire_prompt_boundary(&mut self) {
        let line = std::mem::take(&mut self.line_buffer);
        if let Some(cb) = self.callbacks.on_prompt.as_mut() {
            cb(&line);
        }
    }

    fn verb_code(&mut self, code: u8, verb: Verb) {
        if self.dispatch_negotiate(code, verb) {
            self.state = State::Accepting;
            return;
        }
        self.state = match verb {
            Verb::Will => State::BadWilling,
            Verb::Wont => State::BadRefusing,
            Verb::Do => State::BadDo,
            Verb::Dont => State::BadDont,
        };
        tracing::debug!(code, verb = ?verb, state = ?self.state, "unknown option, safe-refusing");
        if let Some(refusal) = verb.refusal() {
            self.out.extend_from_slice(&[IAC, refusal, code]);
        }
        self.state = State::Accepting;
    }

    fn dispatch_negotiate(&mut self, code: u8, verb: Verb) -> bool {
        let Some(module) = self.modules.iter_mut().find(|m| m.code() == code) else {
            return false;
        };
        let mut ctx = ModuleContext {
            mode: self.mode,
            negotiation: &mut self.negotiation,
            callbacks: &mut self.callbacks,
            out: &mut self.out,
            charset_order: &self.charset_order,
            current_encoding: &mut self.current_encoding,
            mssp_config: self.mssp_config.as_ref(),
            msdp_model: &mut self.msdp_model,
            eor_active: &mut self.eor_active,
            sga_active: &mut self.sga_active,
            ttype_names: &self.ttype_names,
        };
        module.on_negotiate(verb, &mut ctx);
        true
    }

    fn finish_subnegotiation(&mut self, code: u8) {
        let body = std::mem::take(&mut self.sub_buffer);
        let Some(module) = self.modules.iter_mut().find(|m| m.code() == code) else {
            tracing::debug!(code, len = body.len(), "subnegotiation for unregistered option, dropped");
            return;
        };
        let mut ctx = ModuleContext {
            mode: self.mode,
            negotiation: &mut self.negotiation,
            callbacks: &mut self.callbacks,
            out: &mut self.out,
            charset_order: &self.charset_order,
            current_encoding: &mut self.current_encoding,
            mssp_config: self.mssp_config.as_ref(),
            msdp_model: &mut self.msdp_model,
            eor_active: &mut self.eor_active,
            sga_active: &mut self.sga_active,
            ttype_names: &self.ttype_names,
        };
        module.on_subnegotiation(&body, &mut ctx);
    }
}
