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

use clap::Parser;
use telnetrix_core::{Callbacks, EngineConfig, Interpreter, Mode, MsspTable};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use wyldlands_gateway::config::{Arguments, Configuration};

#[tokio::main]
async fn main() {
    let arguments = Arguments::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&arguments.log_filter).unwrap_or_else(|_| EnvFilter::from_default_env()))
        .with_target(false)
        .with_level(true)
        .init();

    if let Some(env_file) = &arguments.env_file {
        if std::path::Path::new(env_file).exists() {
            debug!(path = %env_file, "loading environment file");
            dotenv::from_filename(env_file).ok();
        }
    }

    let config = Configuration::load(&arguments.config_file).unwrap_or_else(|err| {
        warn!(%err, "could not load configuration file, falling back to defaults");
        Configuration::default()
    });

    let addr = config.telnet.addr.to_addr();
    let listener = TcpListener::bind(addr)
        .await
        .unwrap_or_else(|err| panic!("unable to bind telnet listener on {addr}: {err}"));
    info!(%addr, "telnetrix example gateway listening");

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(err) => {
                error!(%err, "accept failed");
                continue;
            }
        };
        debug!(%peer, "accepted connection");
        tokio::spawn(async move {
            if let Err(err) = serve(stream).await {
                warn!(%peer, %err, "connection ended with error");
            } else {
                debug!(%peer, "connection closed");
            }
        });
    }
}

/// Drive a single Telnet connection: bytes read from the socket are handed
/// to the interpreter, and whatever the interpreter queues for egress is
/// written straight back out. The interpreter's own consumer task holds all
/// protocol state; this function is just the socket's read/write pump.
async fn serve(stream: TcpStream) -> std::io::Result<()> {
    let (mut reader, writer) = stream.into_split();
    let (egress_tx, mut egress_rx) = tokio::sync::mpsc::unbounded_channel::<Vec<u8>>();

    let writer_task = tokio::spawn(async move {
        let mut writer = writer;
        while let Some(bytes) = egress_rx.recv().await {
            if let Err(err) = writer.write_all(&bytes).await {
                warn!(%err, "write to socket failed, closing connection");
                break;
            }
        }
    });

    let mut callbacks = Callbacks::default();
    callbacks.on_submit = Some(Box::new(|line: &[u8]| {
        info!(line = %String::from_utf8_lossy(line), "line submitted");
    }));
    callbacks.on_naws = Some(Box::new(|height: u16, width: u16| {
        debug!(height, width, "client reported window size");
    }));
    callbacks.on_gmcp = Some(Box::new(|package: &str, payload: &str| {
        debug!(package, payload, "GMCP message received");
    }));
    callbacks.on_msdp = Some(Box::new(|value: serde_json::Value| {
        debug!(%value, "MSDP message received");
        None
    }));
    callbacks.on_mssp = Some(Box::new(|table: &MsspTable| {
        debug!(?table, "MSSP table received");
    }));

    let interpreter = Interpreter::build(EngineConfig::new(Mode::Server), callbacks, move |bytes: &[u8]| {
        let _ = egress_tx.send(bytes.to_vec());
    });

    let mut buffer = [0u8; 4096];
    loop {
        let read = reader.read(&mut buffer).await?;
        if read == 0 {
            break;
        }
        if interpreter.interpret_slice(&buffer[..read]).await.is_err() {
            break;
        }
    }

    interpreter.dispose().await.ok();
    let _ = writer_task.await;
    Ok(())
}
