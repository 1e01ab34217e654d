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

//! The MSDP binary/JSON codec.
//!
//! This module has no notion of `Interpreter`, sessions, or sockets — it is
//! a pair of pure functions over `&[u8]` and [`serde_json::Value`], so it
//! can be fuzzed or benchmarked standalone. [`crate::option::msdp`] is the
//! glue that wires it into the state machine.
//!
//! The top-level MSDP payload (the bytes between `IAC SB MSDP` and `IAC SE`)
//! is always an implicit table: zero or more `VAR <key> VAL <value>` pairs
//! with no wrapping `TABLE_OPEN`/`TABLE_CLOSE`. Nested objects, reached as
//! the value of some `VAR`, *are* wrapped. This asymmetry is why the public
//! entry points require/produce a JSON object rather than an arbitrary
//! [`Value`].

use crate::error::MsdpError;
use crate::trigger::msdp;
use serde_json::{Map, Value};

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Cursor { data, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn take(&mut self) -> Option<u8> {
        let byte = self.peek();
        if byte.is_some() {
            self.advance();
        }
        byte
    }
}

fn decode_string(cur: &mut Cursor<'_>) -> String {
    let start = cur.pos;
    while let Some(b) = cur.peek() {
        if (1..=6).contains(&b) {
            break;
        }
        cur.advance();
    }
    String::from_utf8_lossy(&cur.data[start..cur.pos]).into_owned()
}

fn decode_value(cur: &mut Cursor<'_>) -> Result<Value, MsdpError> {
    match cur.peek() {
        Some(msdp::TABLE_OPEN) => {
            cur.advance();
            Ok(Value::Object(decode_table_body(cur, false)?))
        }
        Some(msdp::ARRAY_OPEN) => {
            cur.advance();
            Ok(Value::Array(decode_array_body(cur)?))
        }
        _ => Ok(Value::String(decode_string(cur))),
    }
}

fn decode_array_body(cur: &mut Cursor<'_>) -> Result<Vec<Value>, MsdpError> {
    let mut items = Vec::new();
    loop {
        match cur.peek() {
            None => return Err(MsdpError::UnexpectedEnd),
            Some(msdp::ARRAY_CLOSE) => {
                cur.advance();
                return Ok(items);
            }
            Some(msdp::VAL) => {
                cur.advance();
                items.push(decode_value(cur)?);
            }
            Some(_) => return Err(MsdpError::UnbalancedClose),
        }
    }
}

fn decode_table_body(cur: &mut Cursor<'_>, top_level: bool) -> Result<Map<String, Value>, MsdpError> {
    let mut map = Map::new();
    loop {
        match cur.peek() {
            None if top_level => return Ok(map),
            None => return Err(MsdpError::UnexpectedEnd),
            Some(msdp::TABLE_CLOSE) if !top_level => {
                cur.advance();
                return Ok(map);
            }
            Some(msdp::VAR) => {
                cur.advance();
                let key = decode_string(cur);
                match cur.take() {
                    Some(msdp::VAL) => {}
                    _ => return Err(MsdpError::DanglingVariable(key)),
                }
                let value = decode_value(cur)?;
                map.insert(key, value);
            }
            Some(_) => return Err(MsdpError::UnbalancedClose),
        }
    }
}

/// Decode the payload between `IAC SB MSDP` and `IAC SE` into a JSON object.
pub fn decode(input: &[u8]) -> Result<Value, MsdpError> {
    let mut cursor = Cursor::new(input);
    Ok(Value::Object(decode_table_body(&mut cursor, true)?))
}

fn encode_value(value: &Value, out: &mut Vec<u8>) -> Result<(), MsdpError> {
    match value {
        Value::Object(map) => {
            out.push(msdp::TABLE_OPEN);
            encode_pairs(map, out)?;
            out.push(msdp::TABLE_CLOSE);
        }
        Value::Array(items) => {
            out.push(msdp::ARRAY_OPEN);
            for item in items {
                out.push(msdp::VAL);
                encode_value(item, out)?;
            }
            out.push(msdp::ARRAY_CLOSE);
        }
        Value::String(s) => out.extend_from_slice(s.as_bytes()),
        Value::Number(n) => out.extend_from_slice(n.to_string().as_bytes()),
        Value::Bool(b) => out.push(if *b { b'1' } else { b'0' }),
        Value::Null => out.extend_from_slice(b"-1"),
    }
    Ok(())
}

fn encode_pairs(map: &Map<String, Value>, out: &mut Vec<u8>) -> Result<(), MsdpError> {
    for (key, value) in map {
        out.push(msdp::VAR);
        out.extend_from_slice(key.as_bytes());
        out.push(msdp::VAL);
        encode_value(value, out)?;
    }
    Ok(())
}

/// Encode a JSON object into the MSDP payload bytes (without the
/// `IAC SB MSDP` / `IAC SE` wrapper — [`crate::option::msdp`] adds that).
pub fn encode(value: &Value) -> Result<Vec<u8>, MsdpError> {
    match value {
        Value::Object(map) => {
            let mut out = Vec::new();
            encode_pairs(map, &mut out)?;
            Ok(out)
        }
        other => Err(MsdpError::Unrepresentable(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_simple_pair() {
        let mut bytes = vec![msdp::VAR];
        bytes.extend_from_slice(b"LIST");
        bytes.push(msdp::VAL);
        bytes.extend_from_slice(b"COMMANDS");
        assert_eq!(decode(&bytes).unwrap(), json!({"LIST": "COMMANDS"}));
    }

    #[test]
    fn decode_nested_table() {
        // VAR ROOM VAL TABLE_OPEN VAR NAME VAL "Hall" TABLE_CLOSE
        let mut bytes = vec![msdp::VAR];
        bytes.extend_from_slice(b"ROOM");
        bytes.push(msdp::VAL);
        bytes.push(msdp::TABLE_OPEN);
        bytes.push(msdp::VAR);
        bytes.extend_from_slice(b"NAME");
        bytes.push(msdp::VAL);
        bytes.extend_from_slice(b"Hall");
        bytes.push(msdp::TABLE_CLOSE);
        assert_eq!(decode(&bytes).unwrap(), json!({"ROOM": {"NAME": "Hall"}}));
    }

    #[test]
    fn decode_array_value() {
        let mut bytes = vec![msdp::VAR];
        bytes.extend_from_slice(b"EXITS");
        bytes.push(msdp::VAL);
        bytes.push(msdp::ARRAY_OPEN);
        bytes.push(msdp::VAL);
        bytes.extend_from_slice(b"north");
        bytes.push(msdp::VAL);
        bytes.extend_from_slice(b"south");
        bytes.push(msdp::ARRAY_CLOSE);
        assert_eq!(decode(&bytes).unwrap(), json!({"EXITS": ["north", "south"]}));
    }

    #[test]
    fn decode_rejects_dangling_variable() {
        let bytes = vec![msdp::VAR, b'X'];
        assert_eq!(
            decode(&bytes).unwrap_err(),
            MsdpError::DanglingVariable("X".to_string())
        );
    }

    #[test]
    fn decode_rejects_unbalanced_array_close() {
        let bytes = vec![msdp::ARRAY_CLOSE];
        assert_eq!(decode(&bytes).unwrap_err(), MsdpError::UnbalancedClose);
    }

    #[test]
    fn encode_simple_pair() {
        let encoded = encode(&json!({"LIST": "COMMANDS"})).unwrap();
        let mut expected = vec![msdp::VAR];
        expected.extend_from_slice(b"LIST");
        expected.push(msdp::VAL);
        expected.extend_from_slice(b"COMMANDS");
        assert_eq!(encoded, expected);
    }

    #[test]
    fn encode_rejects_non_object_top_level() {
        assert!(encode(&json!(["a", "b"])).is_err());
    }

    #[test]
    fn round_trips_objects_arrays_and_scalars() {
        let value = json!({
            "NAME": "Test",
            "HEALTH": 100,
            "VITALS": {"HP": 50, "MP": 20},
            "EXITS": ["north", "south", "east"],
            "DEAD": false,
        });
        let encoded = encode(&value).unwrap();
        let decoded = decode(&encoded).unwrap();
        assert_eq!(
            decoded.get("NAME").unwrap(),
            &json!("Test"),
            "string round-trips verbatim"
        );
        assert_eq!(
            decoded.get("HEALTH").unwrap(),
            &json!("100"),
            "numbers round-trip as their decimal text, MSDP has no numeric type"
        );
        assert_eq!(decoded.get("VITALS").unwrap(), &json!({"HP": "50", "MP": "20"}));
        assert_eq!(decoded.get("EXITS").unwrap(), &json!(["north", "south", "east"]));
        assert_eq!(decoded.get("DEAD").unwrap(), &json!("0"));
    }
}
