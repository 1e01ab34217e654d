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

//! A bidirectional Telnet protocol engine: the IAC negotiation kernel plus
//! NAWS, CHARSET, TTYPE, EOR/SGA, MSSP, GMCP, and MSDP option modules.
//!
//! This crate owns the wire protocol only. It has no notion of a TCP
//! listener, a connection pool, a config file format, or a log sink — see
//! the `wyldlands-gateway` crate for a minimal example host that wires an
//! [`Interpreter`] to a real socket.
//!
//! # Example
//!
//! ```no_run
//! use telnetrix_core::{Callbacks, EngineConfig, Interpreter, Mode};
//!
//! # async fn run() {
//! let mut callbacks = Callbacks::default();
//! callbacks.on_submit = Some(Box::new(|line: &[u8]| {
//!     println!("{}", String::from_utf8_lossy(line));
//! }));
//!
//! let interpreter = Interpreter::build(
//!     EngineConfig::new(Mode::Server),
//!     callbacks,
//!     |bytes: &[u8]| { /* write bytes to the socket */ let _ = bytes; },
//! );
//!
//! interpreter.interpret_slice(b"look\r\n").await.unwrap();
//! interpreter.dispose().await.unwrap();
//! # }
//! ```

pub mod config;
pub mod error;
pub mod interpreter;
pub mod machine;
pub mod msdp_codec;
pub mod negotiation;
pub mod option;
pub mod state;
pub mod trigger;
pub mod wire;

pub use config::{Callbacks, EngineConfig, Mode, MsdpModel, MsspFactory, MsspTable, MsspValue};
pub use error::{EngineError, MsdpError};
pub use interpreter::Interpreter;
pub use machine::Machine;
