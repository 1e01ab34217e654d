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

//! Named states of the interpreter's automaton.
//!
//! The reference this engine is modelled on built its state/trigger table at
//! runtime through reflection and a fluent `configure(state)` builder, then
//! validated completeness with a separate safe-negotiation pass. In Rust the
//! compiler's own exhaustiveness check on `match` is the native form of that
//! validation: [`crate::machine::Machine::fire`] matches on `(State, u8)` and
//! will fail to compile if a reachable arm is left unhandled, so the "every
//! (state, trigger) has exactly one transition" invariant is enforced at
//! build time rather than walked at startup.

/// A node in the interpreter's automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Ground state: plain data bytes accumulate into the line buffer.
    Accepting,
    /// Saw `IAC`; waiting to see what kind of command follows.
    StartNegotiation,
    /// Saw `IAC WILL`; waiting for the option code.
    Willing,
    /// Saw `IAC WONT`; waiting for the option code.
    Refusing,
    /// Saw `IAC DO`; waiting for the option code.
    Do,
    /// Saw `IAC DONT`; waiting for the option code.
    Dont,
    /// Saw `IAC SB`; waiting for the option code that owns this body.
    SubNegotiationOption,
    /// Accumulating a subnegotiation body for the named option code.
    SubNegotiationBody(u8),
    /// Saw `IAC` while accumulating a subnegotiation body; one more byte
    /// decides whether this is an escaped literal 0xFF or the closing `SE`.
    SubNegotiationIac(u8),
    /// `Bad<Verb>` safe-negotiation sink: polite refusal, then straight back
    /// to `Accepting`. Kept as distinct states purely so tracing/tests can
    /// see which refusal fired.
    BadWilling,
    BadRefusing,
    BadDo,
    BadDont,
    /// A subnegotiation body contained a byte that could not follow `IAC`
    /// (neither `SE` nor a second `IAC`). Tolerates arbitrary bytes until
    /// the next unescaped `IAC SE`, per the safe-negotiation layer's
    /// "never desynchronise the stream" rule.
    BadSubNegotiation,
    /// Saw `IAC` while draining a [`State::BadSubNegotiation`] body.
    BadSubNegotiationIac,
}

impl State {
    /// True for the transient `Bad<Verb>` states, which never wait on more
    /// bytes — they run their on-entry refusal and fall straight through to
    /// [`State::Accepting`].
    pub fn is_bad_verb(self) -> bool {
        matches!(
            self,
            State::BadWilling | State::BadRefusing | State::BadDo | State::BadDont
        )
    }

    /// True for the two `BadSubNegotiation*` draining states.
    pub fn is_draining(self) -> bool {
        matches!(
            self,
            State::BadSubNegotiation | State::BadSubNegotiationIac
        )
    }
}
