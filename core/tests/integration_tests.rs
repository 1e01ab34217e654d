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

//! End-to-end scenarios driving a real `Interpreter` byte-stream-in,
//! byte-stream-out, mirroring how a socket-backed host would exercise it.

use bytes::BytesMut;
use std::sync::{Arc, Mutex};
use telnetrix_core::{Callbacks, EngineConfig, Interpreter, Mode};

fn egress_sink() -> (Arc<Mutex<BytesMut>>, impl FnMut(&[u8]) + Send + 'static) {
    let buffer = Arc::new(Mutex::new(BytesMut::new()));
    let sink = buffer.clone();
    (buffer, move |bytes: &[u8]| sink.lock().unwrap().extend_from_slice(bytes))
}

#[tokio::test]
async fn server_offers_will_charset_and_client_answers_do() {
    let (seen, sink) = egress_sink();
    let interpreter = Interpreter::build(EngineConfig::new(Mode::Client), Callbacks::default(), sink);
    seen.lock().unwrap().clear(); // discard this side's own initial negotiation

    interpreter.interpret_slice(&[0xFF, 0xFB, 0x2A]).await.unwrap();
    interpreter.drain().await.unwrap();

    assert_eq!(&seen.lock().unwrap()[..], &[0xFF, 0xFD, 0x2A][..]);
    interpreter.dispose().await.unwrap();
}

#[tokio::test]
async fn naws_subnegotiation_reports_height_and_width() {
    let (seen, sink) = egress_sink();
    let reported = Arc::new(Mutex::new(None));
    let reported2 = reported.clone();
    let mut callbacks = Callbacks::default();
    callbacks.on_naws = Some(Box::new(move |h, w| *reported2.lock().unwrap() = Some((h, w))));

    let interpreter = Interpreter::build(EngineConfig::new(Mode::Server), callbacks, sink);
    seen.lock().unwrap().clear();

    interpreter
        .interpret_slice(&[0xFF, 0xFA, 0x1F, 0x00, 0x50, 0x00, 0x18, 0xFF, 0xF0])
        .await
        .unwrap();
    interpreter.drain().await.unwrap();

    assert_eq!(*reported.lock().unwrap(), Some((24, 80)));
    interpreter.dispose().await.unwrap();
}

#[tokio::test]
async fn gmcp_subnegotiation_delivers_package_and_payload() {
    let (_seen, sink) = egress_sink();
    let reported = Arc::new(Mutex::new(None));
    let reported2 = reported.clone();
    let mut callbacks = Callbacks::default();
    callbacks.on_gmcp = Some(Box::new(move |pkg: &str, payload: &str| {
        *reported2.lock().unwrap() = Some((pkg.to_string(), payload.to_string()));
    }));

    let interpreter = Interpreter::build(EngineConfig::new(Mode::Server), callbacks, sink);

    let mut input = vec![0xFF, 0xFA, 0xC9];
    input.extend_from_slice(b"Core.Hello");
    input.push(b' ');
    input.extend_from_slice(br#"{"client":"x"}"#);
    input.extend_from_slice(&[0xFF, 0xF0]);
    interpreter.interpret_slice(&input).await.unwrap();
    interpreter.drain().await.unwrap();

    assert_eq!(
        *reported.lock().unwrap(),
        Some(("Core.Hello".to_string(), r#"{"client":"x"}"#.to_string()))
    );
    interpreter.dispose().await.unwrap();
}

#[tokio::test]
async fn msdp_payload_decodes_to_json_and_auto_replies_with_command_list() {
    let (seen, sink) = egress_sink();
    let reported = Arc::new(Mutex::new(None));
    let reported2 = reported.clone();
    let mut callbacks = Callbacks::default();
    callbacks.on_msdp = Some(Box::new(move |value: serde_json::Value| {
        *reported2.lock().unwrap() = Some(value);
        None
    }));

    let interpreter = Interpreter::build(EngineConfig::new(Mode::Server), callbacks, sink);
    seen.lock().unwrap().clear();

    let mut input = vec![0xFF, 0xFA, 0x45, 0x01];
    input.extend_from_slice(b"LIST");
    input.push(0x02);
    input.extend_from_slice(b"COMMANDS");
    input.extend_from_slice(&[0xFF, 0xF0]);
    interpreter.interpret_slice(&input).await.unwrap();
    interpreter.drain().await.unwrap();

    assert_eq!(
        reported.lock().unwrap().clone(),
        Some(serde_json::json!({"LIST": "COMMANDS"}))
    );
    let reply = seen.lock().unwrap().clone();
    let text = String::from_utf8_lossy(&reply);
    assert!(text.contains("REPORT"), "auto-reply should list the command vocabulary");
    interpreter.dispose().await.unwrap();
}

#[tokio::test]
async fn unassigned_option_do_is_safely_refused_with_wont() {
    let (seen, sink) = egress_sink();
    let interpreter = Interpreter::build(EngineConfig::new(Mode::Server), Callbacks::default(), sink);
    seen.lock().unwrap().clear();

    interpreter.interpret_slice(&[0xFF, 0xFD, 0x7E]).await.unwrap();
    interpreter.drain().await.unwrap();

    assert_eq!(&seen.lock().unwrap()[..], &[0xFF, 0xFC, 0x7E][..]);
    interpreter.dispose().await.unwrap();
}

#[tokio::test]
async fn literal_iac_in_text_survives_unescaped_into_the_submitted_line() {
    let (_seen, sink) = egress_sink();
    let reported = Arc::new(Mutex::new(None));
    let reported2 = reported.clone();
    let mut callbacks = Callbacks::default();
    callbacks.on_submit = Some(Box::new(move |line: &[u8]| {
        *reported2.lock().unwrap() = Some(line.to_vec());
    }));

    let interpreter = Interpreter::build(EngineConfig::new(Mode::Server), callbacks, sink);
    interpreter
        .interpret_slice(&[0x41, 0xFF, 0xFF, 0x42, 0x0A])
        .await
        .unwrap();
    interpreter.drain().await.unwrap();

    assert_eq!(reported.lock().unwrap().as_deref(), Some([0x41, 0xFF, 0x42].as_slice()));
    interpreter.dispose().await.unwrap();
}
