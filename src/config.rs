use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::rpc::{DuplicateIdPolicy, HttpTransport, SessionOptions};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 15702;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid timeout '{value}': {source}")]
    Timeout {
        value: String,
        source: humantime::DurationError,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub simulator: SimulatorConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulatorConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Per-request deadline, e.g. "30s"
    #[serde(default)]
    pub timeout: Option<String>,
    #[serde(default)]
    pub method_prefix: String,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout: None,
            method_prefix: String::new(),
        }
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchConfig {
    #[serde(default)]
    pub duplicate_ids: DuplicateIdPolicy,
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.timeout()?;
        Ok(config)
    }

    pub fn timeout(&self) -> Result<Option<Duration>, ConfigError> {
        self.simulator
            .timeout
            .as_deref()
            .map(|value| {
                humantime::parse_duration(value.trim()).map_err(|source| ConfigError::Timeout {
                    value: value.to_string(),
                    source,
                })
            })
            .transpose()
    }

    pub fn transport(&self) -> Result<HttpTransport, ConfigError> {
        let transport = HttpTransport::new(&self.simulator.host, self.simulator.port);
        Ok(match self.timeout()? {
            Some(timeout) => transport.with_timeout(timeout),
            None => transport,
        })
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            duplicate_ids: self.batch.duplicate_ids,
            method_prefix: self.simulator.method_prefix.clone(),
        }
    }
}
