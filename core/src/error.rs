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

//! Error taxonomy for the protocol engine.
//!
//! Only the fatal branches of the interpreter's error taxonomy ever surface
//! as a [`Result::Err`] from a public method. Recoverable desyncs (unknown
//! options, malformed subnegotiations, rejected encodings, callback panics)
//! are handled locally and only traced, never returned.

use thiserror::Error;

/// Fatal conditions that terminate an [`crate::Interpreter`] session.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The line buffer grew past its configured limit.
    #[error("line buffer overflow: attempted {attempted} bytes, limit is {limit}")]
    BufferOverflow {
        /// Configured maximum.
        limit: usize,
        /// Size that would have resulted from accepting the offending byte.
        attempted: usize,
    },

    /// The ingress channel was closed while the consumer was still running.
    #[error("ingress channel closed")]
    ChannelClosed,

    /// A malformed MSDP payload could not be decoded.
    #[error("MSDP codec error: {0}")]
    Msdp(#[from] MsdpError),

    /// The consumer task could not be joined during disposal.
    #[error("consumer task join failure: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Errors raised by the standalone MSDP binary/JSON codec (see [`crate::msdp_codec`]).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MsdpError {
    /// A VAR was not followed by a VAL before the enclosing container closed.
    #[error("dangling MSDP variable name: {0:?}")]
    DanglingVariable(String),

    /// TABLE_CLOSE or ARRAY_CLOSE seen with no matching open.
    #[error("unbalanced MSDP container close")]
    UnbalancedClose,

    /// Input ended before a container or variable was terminated.
    #[error("unexpected end of MSDP payload")]
    UnexpectedEnd,

    /// A JSON value outside the subset MSDP can express (nested arrays of
    /// objects under a key that is itself non-scalar, non-string map keys, …).
    #[error("value is not representable in MSDP: {0}")]
    Unrepresentable(String),
}
