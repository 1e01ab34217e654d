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

//! Layered configuration for the example gateway: defaults, overridden by a
//! YAML file, overridden in turn by `${VAR}` environment expansions inside
//! that file via [`EnvField`], overridden last by CLI flags. The core crate
//! never sees any of this — it only ever receives a plain `EngineConfig`.

use clap::Parser;
use serde::{Deserialize, Serialize};
use serde_env_field::EnvField;
use std::net::{AddrParseError, IpAddr, Ipv4Addr, SocketAddr, SocketAddrV4};
use std::str::FromStr;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Arguments {
    #[arg(
        short = 'c',
        long = "config",
        help = "Path to configuration file",
        default_value = "gateway/config.yaml"
    )]
    pub config_file: String,

    #[arg(
        short = 'e',
        long = "env",
        help = "Path to environment file",
        default_value = "gateway/.env"
    )]
    pub env_file: Option<String>,

    #[arg(
        short = 'l',
        long = "log-filter",
        help = "tracing-subscriber EnvFilter directive, e.g. telnetrix_core=debug",
        default_value = "info"
    )]
    pub log_filter: String,
}

impl Default for Arguments {
    fn default() -> Self {
        Self {
            config_file: "config.yaml".to_string(),
            env_file: Some(".env".to_string()),
            log_filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub telnet: TelnetConfig,
}

impl Configuration {
    pub fn load(path: &str) -> Result<Self, String> {
        tracing::debug!("Loading configuration from file: {}", path);
        let file =
            std::fs::File::open(path).map_err(|e| format!("Failed to open config file: {}", e))?;

        let conf = serde_yaml::from_reader(file)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;

        Ok(conf)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TelnetConfig {
    pub addr: EnvField<TelnetBinding>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TelnetBinding(SocketAddr);

impl TelnetBinding {
    pub fn to_addr(&self) -> SocketAddr {
        self.0
    }
    pub fn to_ip(&self) -> IpAddr {
        self.0.ip()
    }
    pub fn to_port(&self) -> u16 {
        self.0.port()
    }
}

impl FromStr for TelnetBinding {
    type Err = AddrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(SocketAddr::from_str(s)?))
    }
}

impl Default for TelnetBinding {
    fn default() -> Self {
        Self(SocketAddr::V4(SocketAddrV4::new(
            Ipv4Addr::new(0, 0, 0, 0),
            4000,
        )))
    }
}

impl std::fmt::Display for TelnetBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_telnet_config_default() {
        let config = TelnetConfig::default();
        assert_eq!(
            config.addr.to_addr(),
            SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(0, 0, 0, 0), 4000))
        );
        assert_eq!(config.addr.to_ip(), Ipv4Addr::new(0, 0, 0, 0));
        assert_eq!(config.addr.to_port(), 4000);
    }

    #[test]
    fn test_configuration_new_from_file() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(
            file,
            r#"
telnet:
  addr: 127.0.0.1:4001
"#
        )
        .unwrap();

        let path = file.path().to_str().unwrap();
        let config = Configuration::load(path).unwrap();

        assert_eq!(config.telnet.addr.to_port(), 4001);
    }

    #[test]
    fn test_configuration_env_override() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(
            file,
            r#"
telnet:
  addr: "${{WYLDLANDS_TELNET_ADDR:-127.0.0.1:4000}}"
"#
        )
        .unwrap();

        let path = file.path().to_str().unwrap();

        unsafe {
            std::env::set_var("WYLDLANDS_TELNET_ADDR", "127.0.0.1:9000");
        }

        let config = Configuration::load(path).unwrap();

        unsafe {
            std::env::remove_var("WYLDLANDS_TELNET_ADDR");
        }

        assert_eq!(
            config.telnet.addr.to_addr(),
            SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), 9000))
        );
    }
}
