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

//! Per-option negotiation bookkeeping.
//!
//! An option is "locally enabled" only after the peer has issued `DO` (for
//! our `WILL`) or `WILL` (for our `DO`), and stays enabled until we issue
//! `WONT`/`DONT` ourselves or the peer does. A flat, fixed-size table of one
//! [`Entry`] per option code holds this, rather than scattering the bit
//! across each option module's own scratch state, so nothing needs a
//! back-reference to ask "is my option enabled right now" — it looks itself
//! up by code.

const TABLE_SIZE: usize = 1 + u8::MAX as usize;

/// Negotiation bits for a single option code.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Entry(u8);

impl Entry {
    /// Option is enabled on our side (peer answered our `WILL` with `DO`).
    const LOCAL_ENABLED: u8 = 1;
    /// Option is enabled on the peer's side (we answered their `WILL` with `DO`).
    const REMOTE_ENABLED: u8 = 1 << 1;
    /// We have already sent our own initial negotiation for this option
    /// (suppresses re-asking an unsolicited peer, per the NAWS module note).
    const INITIATED: u8 = 1 << 2;

    pub fn local_enabled(self) -> bool {
        self.0 & Entry::LOCAL_ENABLED != 0
    }

    pub fn remote_enabled(self) -> bool {
        self.0 & Entry::REMOTE_ENABLED != 0
    }

    pub fn initiated(self) -> bool {
        self.0 & Entry::INITIATED != 0
    }

    fn set(&mut self, bit: u8, on: bool) {
        if on {
            self.0 |= bit;
        } else {
            self.0 &= !bit;
        }
    }
}

/// Tracks, per option code, whether it is enabled locally/remotely.
#[derive(Debug)]
pub struct NegotiationTable {
    options: Box<[Entry; TABLE_SIZE]>,
}

impl Default for NegotiationTable {
    fn default() -> Self {
        NegotiationTable {
            options: Box::new([Entry::default(); TABLE_SIZE]),
        }
    }
}

impl NegotiationTable {
    /// New, empty table — every option starts disabled and un-initiated.
    pub fn new() -> Self {
        NegotiationTable::default()
    }

    /// Read-only view of an option's current bits.
    pub fn option(&self, code: u8) -> Entry {
        self.options[code as usize]
    }

    /// Mark that we have sent our own initial negotiation for `code`.
    pub fn mark_initiated(&mut self, code: u8) {
        self.options[code as usize].set(Entry::INITIATED, true);
    }

    /// Record whether `code` is enabled on our side.
    pub fn set_local_enabled(&mut self, code: u8, enabled: bool) {
        self.options[code as usize].set(Entry::LOCAL_ENABLED, enabled);
    }

    /// Record whether `code` is enabled on the peer's side.
    pub fn set_remote_enabled(&mut self, code: u8, enabled: bool) {
        self.options[code as usize].set(Entry::REMOTE_ENABLED, enabled);
    }

    /// Is `code` enabled on our side?
    pub fn local_enabled(&self, code: u8) -> bool {
        self.option(code).local_enabled()
    }

    /// Is `code` enabled on the peer's side?
    pub fn remote_enabled(&self, code: u8) -> bool {
        self.option(code).remote_enabled()
    }

    /// Have we already sent our own initial negotiation for `code`?
    pub fn initiated(&self, code: u8) -> bool {
        self.option(code).initiated()
    }
}
