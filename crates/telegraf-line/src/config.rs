// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Client configuration.
//!
//! Supports both programmatic and file-based (TOML) configuration:
//!
//! ```toml
//! address = "udp://127.0.0.1:8094"
//! write_timeout_ms = 500
//!
//! [default_tags]
//! host = "web-1"
//! ```

use crate::transport::{ConnectOptions, Endpoint};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Telegraf service address, e.g. `udp://127.0.0.1:8094`.
    #[serde(default = "default_address")]
    pub address: String,

    /// Tags merged into every measurement written by the client.
    #[serde(default)]
    pub default_tags: BTreeMap<String, String>,

    /// Socket write timeout in milliseconds. Unset blocks indefinitely.
    #[serde(default)]
    pub write_timeout_ms: Option<u64>,
}

fn default_address() -> String {
    "udp://127.0.0.1:8094".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            default_tags: BTreeMap::new(),
            write_timeout_ms: None,
        }
    }
}

impl ClientConfig {
    /// Configuration for a single address with no defaults.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.endpoint()?;
        if self.write_timeout_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "write_timeout_ms must be greater than zero".into(),
            ));
        }
        if let Some(key) = self.default_tags.keys().find(|k| k.is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "default tag with empty key (value '{}')",
                self.default_tags[key]
            )));
        }
        Ok(())
    }

    /// Parsed service address.
    pub fn endpoint(&self) -> Result<Endpoint, ConfigError> {
        Endpoint::parse(&self.address)
            .map_err(|e| ConfigError::Invalid(format!("address '{}': {}", self.address, e)))
    }

    /// Socket options derived from this configuration.
    pub fn connect_options(&self) -> ConnectOptions {
        ConnectOptions {
            write_timeout: self.write_timeout_ms.map(Duration::from_millis),
        }
    }

    /// Add a default tag.
    pub fn default_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_tags.insert(key.into(), value.into());
        self
    }
}
