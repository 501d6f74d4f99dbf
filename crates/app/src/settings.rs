//! Handles settings for the application. Configuration is read from an
//! optional `settings.toml` and overridden by `SPLITLEDGER__*` environment
//! variables (for example `SPLITLEDGER__SERVER__PORT=8080`).
use std::{net::SocketAddr, path::PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    /// JSON file (`{"groups": [...]}`) loaded into the store at startup.
    pub seed: Option<PathBuf>,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3000,
            seed: None,
        }
    }
}

impl Server {
    pub fn addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.bind, self.port).parse()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_file("settings")
    }

    pub fn from_file(name: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(name).required(false))
            .add_source(Environment::with_prefix("SPLITLEDGER").separator("__"))
            .build()?
            .try_deserialize()
    }
}
