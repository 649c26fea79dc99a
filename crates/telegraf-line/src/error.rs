// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use crate::config::ConfigError;
use thiserror::Error;

/// Errors returned by the transport and client layers.
///
/// Encoding never fails; every variant here comes from address parsing,
/// configuration, or the underlying socket.
#[derive(Debug, Error)]
pub enum Error {
    /// Dial, write or close failure, passed through unchanged.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Malformed service address, e.g. a missing scheme or port.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Scheme that is unknown or unavailable on this platform.
    #[error("Unsupported scheme: {0}")]
    UnsupportedScheme(String),

    /// Configuration file could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result alias for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;
