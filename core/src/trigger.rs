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

//! The trigger alphabet: Telnet command bytes, well-known option codes, and
//! the MSDP/MSSP/CHARSET/TTYPE subnegotiation vocabularies.
//!
//! A wire byte means different things depending on where the state machine
//! currently is — byte `1` is `ECHO` as an option code, `SEND` inside a TTYPE
//! body, and `VAR`/`MSSP_VAR` inside an MSDP or MSSP body. Rather than three
//! overlapping constant sets fighting for the same discriminant space, this
//! module keeps one canonical `u8` per concern and lets [`crate::machine`]
//! derive meaning from the state it is in, exactly as the engine's own
//! design notes prescribe.

/// Interpret-As-Command escape byte.
pub const IAC: u8 = 255;
/// Begin option negotiation: "you do".
pub const DO: u8 = 253;
/// Begin option negotiation: "you don't".
pub const DONT: u8 = 254;
/// Begin option negotiation: "I will".
pub const WILL: u8 = 251;
/// Begin option negotiation: "I won't".
pub const WONT: u8 = 252;
/// Begin a subnegotiation.
pub const SB: u8 = 250;
/// End a subnegotiation.
pub const SE: u8 = 240;
/// No operation.
pub const NOP: u8 = 241;
/// Data mark.
pub const DM: u8 = 242;
/// Break.
pub const BRK: u8 = 243;
/// Interrupt process.
pub const IP: u8 = 244;
/// Abort output.
pub const AO: u8 = 245;
/// Are you there.
pub const AYT: u8 = 246;
/// Erase character.
pub const EC: u8 = 247;
/// Erase line.
pub const EL: u8 = 248;
/// Go ahead.
pub const GA: u8 = 249;
/// End of record (RFC 885).
pub const EOR_CMD: u8 = 239;

/// ASCII carriage return.
pub const CR: u8 = 0x0D;
/// ASCII line feed.
pub const LF: u8 = 0x0A;

/// Well-known Telnet option codes used by this crate's option modules.
pub mod option {
    /// Echo.
    pub const ECHO: u8 = 1;
    /// Suppress Go-Ahead.
    pub const SGA: u8 = 3;
    /// Terminal type (RFC 1091 / MTTS).
    pub const TTYPE: u8 = 24;
    /// End-of-record.
    pub const EOR: u8 = 25;
    /// Negotiate About Window Size.
    pub const NAWS: u8 = 31;
    /// Character set (RFC 2066).
    pub const CHARSET: u8 = 42;
    /// MUD Server Data Protocol.
    pub const MSDP: u8 = 69;
    /// MUD Server Status Protocol.
    pub const MSSP: u8 = 70;
    /// Generic MUD Communication Protocol.
    pub const GMCP: u8 = 201;
}

/// CHARSET (RFC 2066) subnegotiation command bytes.
pub mod charset {
    /// `IAC SB CHARSET REQUEST <sep> <name>...`
    pub const REQUEST: u8 = 1;
    /// `IAC SB CHARSET ACCEPTED <name>`
    pub const ACCEPTED: u8 = 2;
    /// `IAC SB CHARSET REJECTED`
    pub const REJECTED: u8 = 3;
}

/// TTYPE (RFC 1091) subnegotiation command bytes.
pub mod ttype {
    /// Server asks the client to report its next terminal type.
    pub const SEND: u8 = 1;
    /// Client reports a terminal type name.
    pub const IS: u8 = 0;
}

/// MSDP (and, by the spec's own aliasing note, MSSP) framing bytes.
pub mod msdp {
    /// Marks the following bytes as a variable name.
    pub const VAR: u8 = 1;
    /// Marks the following bytes as a value.
    pub const VAL: u8 = 2;
    /// Begins a nested table (object).
    pub const TABLE_OPEN: u8 = 3;
    /// Ends a nested table (object).
    pub const TABLE_CLOSE: u8 = 4;
    /// Begins an array.
    pub const ARRAY_OPEN: u8 = 5;
    /// Ends an array.
    pub const ARRAY_CLOSE: u8 = 6;
}

/// The four negotiation verbs, and the identity of the `Bad<Verb>`
/// safe-negotiation sink each maps to (see [`crate::machine`] §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// Peer announced `WILL <opt>`.
    Will,
    /// Peer announced `WONT <opt>`.
    Wont,
    /// Peer announced `DO <opt>`.
    Do,
    /// Peer announced `DONT <opt>`.
    Dont,
}

impl Verb {
    /// The wire byte for this verb.
    pub fn byte(self) -> u8 {
        match self {
            Verb::Will => WILL,
            Verb::Wont => WONT,
            Verb::Do => DO,
            Verb::Dont => DONT,
        }
    }

    /// The polite refusal verb a `Bad<Verb>` state emits, if any.
    /// `Wont`/`Dont` already communicate refusal, so the peer gets silence.
    pub fn refusal(self) -> Option<u8> {
        match self {
            Verb::Will => Some(DONT),
            Verb::Do => Some(WONT),
            Verb::Wont | Verb::Dont => None,
        }
    }
}
