// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Telegraf line protocol client
//!
//! Builds measurements, encodes them to InfluxDB Line Protocol and writes
//! them to a Telegraf `socket_listener` over UDP, TCP or unix sockets.
//!
//! This crate provides:
//! - An immutable [`Measurement`] assembled through a consuming [`MeasurementBuilder`]
//! - A pure, deterministic encoder (tags and fields sorted by key)
//! - Context-specific escapers for names, keys and string values
//! - A thin [`Client`] that writes one line per measurement
//! - TOML-based client configuration
//!
//! # Overview
//!
//! ```text
//! MeasurementBuilder --build()--> Measurement --encode()--> String --Client::write()--> LineSink
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use telegraf_line::{Client, Measurement};
//!
//! let mut client = Client::udp("127.0.0.1:8094")?;
//! let m = Measurement::builder("cpu")
//!     .tag("host", "web-1")
//!     .field("load_avg", 1.4)
//!     .field("counter", 1)
//!     .build();
//! client.write(&m)?;
//! # Ok::<(), telegraf_line::Error>(())
//! ```

pub mod clock;
pub mod config;
pub mod encoder;
pub mod escape;
pub mod field;
pub mod measurement;
pub mod transport;

mod client;
mod error;

pub use client::Client;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ClientConfig, ConfigError};
pub use encoder::{encode, encode_into, encode_with_default_tags};
pub use error::{Error, Result};
pub use field::FieldValue;
pub use measurement::{measure, measure_duration_since, Measurement, MeasurementBuilder, TimeUnit};
pub use transport::{connect, ConnectOptions, Connection, Endpoint, LineSink, Scheme};
