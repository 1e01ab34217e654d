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

//! The public, async-facing handle to a single connection's engine.
//!
//! [`Interpreter`] is a thin shell around a bounded command channel and one
//! consumer task that owns the whole [`Machine`]. Every operation that
//! touches engine state — ingress bytes, outbound sends, prompt delivery, a
//! drain barrier — is a message on the same FIFO channel, so the consumer
//! task is the only place `Machine` is ever borrowed and ordering between
//! "interpret this" and "now send this" is exactly the order callers issued
//! them in. No locking is required anywhere in this crate as a result.

use crate::config::{Callbacks, EngineConfig};
use crate::error::EngineError;
use crate::machine::Machine;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

enum Command {
    Bytes(Vec<u8>),
    Send(Vec<u8>),
    SendPrompt(Vec<u8>),
    Gmcp(String, String),
    Msdp(serde_json::Value),
    Drain(oneshot::Sender<()>),
}

/// A running connection's protocol engine.
///
/// Dropping an `Interpreter` without calling [`Interpreter::dispose`]
/// cancels the consumer task on the next scheduling opportunity but does
/// not wait for it to finish; call `dispose` to join it deterministically.
pub struct Interpreter {
    tx: mpsc::Sender<Command>,
    cancel: CancellationToken,
    handle: Option<tokio::task::JoinHandle<()>>,
    fatal: Arc<Mutex<Option<EngineError>>>,
}

impl Interpreter {
    /// Build a new interpreter and spawn its consumer task. `egress` is
    /// called, possibly more than once and never concurrently, with wire
    /// bytes that must be written to the peer in the order given —
    /// including the module registry's initial negotiation, flushed
    /// synchronously before this function returns.
    pub fn build(
        config: EngineConfig,
        callbacks: Callbacks,
        mut egress: impl FnMut(&[u8]) + Send + 'static,
    ) -> Interpreter {
        let capacity = config.ingress_capacity;
        let (tx, mut rx) = mpsc::channel::<Command>(capacity);
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        let fatal = Arc::new(Mutex::new(None));
        let task_fatal = fatal.clone();

        let mut machine = Machine::build(config, callbacks);
        let initial = machine.take_outbound();
        if !initial.is_empty() {
            egress(&initial);
        }

        let handle = tokio::spawn(async move {
            loop {
                let command = tokio::select! {
                    biased;
                    _ = task_cancel.cancelled() => break,
                    received = rx.recv() => match received {
                        Some(command) => command,
                        None => break,
                    },
                };

                match command {
                    Command::Bytes(bytes) => {
                        if let Err(error) = machine.fire_bytes(&bytes) {
                            tracing::error!(%error, "fatal engine error, consumer task exiting");
                            *task_fatal.lock().unwrap() = Some(error);
                            break;
                        }
                    }
                    Command::Send(bytes) => machine.send(&bytes),
                    Command::SendPrompt(bytes) => machine.send_prompt(&bytes),
                    Command::Gmcp(package, payload) => machine.send_gmcp(&package, &payload),
                    Command::Msdp(value) => {
                        if let Err(error) = machine.send_msdp(&value) {
                            tracing::warn!(%error, "could not encode outbound MSDP value");
                        }
                    }
                    Command::Drain(done) => {
                        let _ = done.send(());
                        continue;
                    }
                }

                let out = machine.take_outbound();
                if !out.is_empty() {
                    egress(&out);
                }
            }
            tracing::debug!("consumer task stopped");
        });

        Interpreter {
            tx,
            cancel,
            handle: Some(handle),
            fatal,
        }
    }

    /// Interpret a single wire byte. Backpressures (awaits) if the ingress
    /// channel is full.
    pub async fn interpret(&self, byte: u8) -> Result<(), EngineError> {
        self.interpret_slice(&[byte]).await
    }

    /// Interpret a whole slice of wire bytes as one enqueued unit.
    pub async fn interpret_slice(&self, bytes: &[u8]) -> Result<(), EngineError> {
        self.tx
            .send(Command::Bytes(bytes.to_vec()))
            .await
            .map_err(|_| EngineError::ChannelClosed)
    }

    /// Queue raw application bytes for the peer, IAC-doubled automatically.
    pub async fn send(&self, bytes: &[u8]) -> Result<(), EngineError> {
        self.tx
            .send(Command::Send(bytes.to_vec()))
            .await
            .map_err(|_| EngineError::ChannelClosed)
    }

    /// Queue `bytes` followed by whatever currently marks a prompt boundary
    /// (`IAC EOR`, `IAC GA`, or nothing, in that priority order).
    pub async fn send_prompt(&self, bytes: &[u8]) -> Result<(), EngineError> {
        self.tx
            .send(Command::SendPrompt(bytes.to_vec()))
            .await
            .map_err(|_| EngineError::ChannelClosed)
    }

    /// Queue a GMCP message: package name plus a JSON-text payload.
    pub async fn send_gmcp(&self, package: &str, payload: &str) -> Result<(), EngineError> {
        self.tx
            .send(Command::Gmcp(package.to_string(), payload.to_string()))
            .await
            .map_err(|_| EngineError::ChannelClosed)
    }

    /// Queue an MSDP message built from a JSON object.
    pub async fn send_msdp(&self, value: serde_json::Value) -> Result<(), EngineError> {
        self.tx
            .send(Command::Msdp(value))
            .await
            .map_err(|_| EngineError::ChannelClosed)
    }

    /// Suspend until every command enqueued before this call has been
    /// processed by the consumer task. Enqueuing the drain marker on the
    /// same FIFO channel as everything else is what makes this exact,
    /// rather than an approximate "probably settled by now" wait.
    pub async fn drain(&self) -> Result<(), EngineError> {
        let (tx, rx) = oneshot::channel();
        self.tx
            .send(Command::Drain(tx))
            .await
            .map_err(|_| EngineError::ChannelClosed)?;
        rx.await.map_err(|_| EngineError::ChannelClosed)
    }

    /// Cancel the consumer task and wait for it to actually stop. Returns
    /// the fatal error that ended the session, if the consumer exited on
    /// one (buffer overflow) rather than on cancellation/channel closure.
    pub async fn dispose(mut self) -> Result<(), EngineError> {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            handle.await?;
        }
        if let Some(error) = self.fatal.lock().unwrap().take() {
            return Err(error);
        }
        Ok(())
    }
}

impl Drop for Interpreter {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Mode;
    use std::sync::{Arc, Mutex};

    fn egress_sink() -> (Arc<Mutex<Vec<u8>>>, impl FnMut(&[u8]) + Send + 'static) {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let sink = buffer.clone();
        (buffer, move |bytes: &[u8]| sink.lock().unwrap().extend_from_slice(bytes))
    }

    #[tokio::test]
    async fn interpret_slice_delivers_submitted_line() {
        let (seen, sink) = egress_sink();
        let _ = seen;
        let mut callbacks = Callbacks::default();
        let line_seen = Arc::new(Mutex::new(None));
        let line_seen2 = line_seen.clone();
        callbacks.on_submit = Some(Box::new(move |line: &[u8]| {
            *line_seen2.lock().unwrap() = Some(line.to_vec());
        }));
        let interpreter = Interpreter::build(EngineConfig::new(Mode::Server), callbacks, sink);
        interpreter.interpret_slice(b"look\r\n").await.unwrap();
        interpreter.drain().await.unwrap();
        assert_eq!(line_seen.lock().unwrap().as_deref(), Some(b"look".as_slice()));
        interpreter.dispose().await.unwrap();
    }

    #[tokio::test]
    async fn send_and_drain_observe_egress_in_order() {
        let (seen, sink) = egress_sink();
        let interpreter = Interpreter::build(EngineConfig::new(Mode::Server), Callbacks::default(), sink);
        interpreter.send(b"hello").await.unwrap();
        interpreter.drain().await.unwrap();
        assert!(seen.lock().unwrap().ends_with(b"hello"));
        interpreter.dispose().await.unwrap();
    }

    #[tokio::test]
    async fn dispose_surfaces_buffer_overflow_as_a_fatal_error() {
        let (_seen, sink) = egress_sink();
        let mut config = EngineConfig::new(Mode::Server);
        config.max_buffer_size = 2;
        let interpreter = Interpreter::build(config, Callbacks::default(), sink);
        interpreter.interpret_slice(b"abc").await.unwrap();
        let result = interpreter.dispose().await;
        assert!(matches!(result, Err(EngineError::BufferOverflow { .. })));
    }

    #[tokio::test]
    async fn dispose_stops_consumer_task() {
        let (_seen, sink) = egress_sink();
        let interpreter = Interpreter::build(EngineConfig::new(Mode::Server), Callbacks::default(), sink);
        interpreter.dispose().await.unwrap();
    }
}
