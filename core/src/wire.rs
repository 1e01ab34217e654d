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

//! IAC-doubling: the one escaping rule shared by every data position in the
//! protocol, whether that's raw application text or a subnegotiation body.

use crate::trigger::IAC;

/// Double every `0xFF` byte so it survives as literal data through the
/// negotiation layer.
pub fn escape_iac(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    for &byte in input {
        out.push(byte);
        if byte == IAC {
            out.push(IAC);
        }
    }
    out
}

/// Collapse `IAC IAC` pairs back into a single literal `0xFF`. Used by
/// tests exercising the round-trip invariant; the interpreter itself
/// unescapes incrementally as bytes arrive (see [`crate::machine`]).
pub fn unescape_iac(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut iter = input.iter().copied();
    while let Some(byte) = iter.next() {
        out.push(byte);
        if byte == IAC {
            // Swallow the doubled IAC, if present.
            iter.next();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn escapes_literal_iac() {
        assert_eq!(escape_iac(&[0x41, 0xFF, 0x42]), vec![0x41, 0xFF, 0xFF, 0x42]);
    }

    proptest! {
        #[test]
        fn roundtrip(bytes: Vec<u8>) {
            prop_assert_eq!(unescape_iac(&escape_iac(&bytes)), bytes);
        }
    }
}
