// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Client writing measurements to a line sink.

use crate::config::ClientConfig;
use crate::encoder;
use crate::error::Result;
use crate::measurement::Measurement;
use crate::transport::{connect, ConnectOptions, Connection, Endpoint, LineSink, Scheme};
use std::collections::BTreeMap;

/// Writes measurements to Telegraf, one line per write.
///
/// Default tags are merged into every measurement at write time; a tag set on
/// the measurement itself always wins over a default with the same key.
///
/// `write` takes `&mut self`; share a client between threads behind a mutex.
#[derive(Debug)]
pub struct Client<S: LineSink = Connection> {
    sink: S,
    default_tags: BTreeMap<String, String>,
    buf: String,
}

impl Client<Connection> {
    /// Connect over UDP, e.g. `Client::udp("127.0.0.1:8094")`.
    pub fn udp(address: &str) -> Result<Self> {
        Ok(Self::new(connect(Scheme::Udp, address)?))
    }

    /// Connect over TCP.
    pub fn tcp(address: &str) -> Result<Self> {
        Ok(Self::new(connect(Scheme::Tcp, address)?))
    }

    /// Connect to a unix stream socket at `path`.
    pub fn unix(path: &str) -> Result<Self> {
        Ok(Self::new(connect(Scheme::Unix, path)?))
    }

    /// Connect to a `scheme://address` URL.
    pub fn connect(url: &str) -> Result<Self> {
        let endpoint = Endpoint::parse(url)?;
        Ok(Self::new(Connection::open(&endpoint, &ConnectOptions::default())?))
    }

    /// Connect using a loaded configuration, applying its default tags.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let endpoint = config.endpoint()?;
        let conn = Connection::open(&endpoint, &config.connect_options())?;
        Ok(Self::new(conn).with_default_tags(config.default_tags.clone()))
    }
}

impl<S: LineSink> Client<S> {
    /// Wrap an already-open sink.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            default_tags: BTreeMap::new(),
            buf: String::new(),
        }
    }

    /// Add default tags applied to every written measurement.
    pub fn with_default_tags<I, K, V>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in tags {
            self.default_tags.insert(key.into(), value.into());
        }
        self
    }

    /// Add or replace a single default tag.
    pub fn default_tag(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.default_tags.insert(key.into(), value.into());
    }

    /// Current default tags.
    pub fn default_tags(&self) -> &BTreeMap<String, String> {
        &self.default_tags
    }

    /// Encode `m` and send it as a single newline-terminated line.
    pub fn write(&mut self, m: &Measurement) -> Result<()> {
        self.buf.clear();
        encoder::encode_with_default_tags(m, &self.default_tags, &mut self.buf);
        self.buf.push('\n');
        self.sink.send(self.buf.as_bytes())?;
        Ok(())
    }

    /// Write each measurement in order, stopping at the first failure.
    ///
    /// Lines sent before the failure are not retracted.
    pub fn write_all<'a, I>(&mut self, measurements: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Measurement>,
    {
        for (i, m) in measurements.into_iter().enumerate() {
            if let Err(e) = self.write(m) {
                log::warn!("[CLIENT] batch aborted at index {}: {}", i, e);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Send an already-encoded line, adding the terminator if it is missing.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        if line.ends_with('\n') {
            self.sink.send(line.as_bytes())?;
        } else {
            self.buf.clear();
            self.buf.push_str(line);
            self.buf.push('\n');
            self.sink.send(self.buf.as_bytes())?;
        }
        Ok(())
    }

    /// Borrow the underlying sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Take the underlying sink back without closing it.
    pub fn into_inner(self) -> S {
        self.sink
    }

    /// Close the underlying sink.
    pub fn close(self) -> Result<()> {
        self.sink.close()?;
        Ok(())
    }
}
