// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Measurement data model and builder.
//!
//! A [`Measurement`] is one data point: a name, a tag set, a field set and an
//! optional nanosecond timestamp. It is immutable once built; all mutation
//! goes through [`MeasurementBuilder`], whose methods consume and return the
//! builder.
//!
//! ```rust
//! use telegraf_line::Measurement;
//!
//! let m = Measurement::builder("app")
//!     .field("size", 5042)
//!     .tag("path", "/api")
//!     .timestamp_nanos(1_000_000_000)
//!     .build();
//! assert_eq!(m.to_string(), "app,path=/api size=5042i 1000000000");
//! ```

use crate::clock::{Clock, SystemClock};
use crate::field::FieldValue;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// A finalized data point ready for encoding.
///
/// Tags and fields are keyed maps ordered by key, so encoding the same
/// measurement always yields the same line.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    name: String,
    tags: BTreeMap<String, String>,
    fields: BTreeMap<String, FieldValue>,
    timestamp: Option<i64>,
}

impl Measurement {
    /// Start a measurement stamped with the current system time.
    pub fn builder(name: impl Into<String>) -> MeasurementBuilder {
        MeasurementBuilder::new(name)
    }

    /// Start a measurement whose timestamp and duration fields come from `clock`.
    pub fn builder_with_clock(name: impl Into<String>, clock: Arc<dyn Clock>) -> MeasurementBuilder {
        MeasurementBuilder::with_clock(name, clock)
    }

    /// Reopen this measurement for further edits, keeping its timestamp.
    ///
    /// The builder reads the system clock; a measurement does not remember
    /// the clock it was built with. Use [`Measurement::into_builder_with_clock`]
    /// to keep `duration_since` on an injected clock.
    pub fn into_builder(self) -> MeasurementBuilder {
        self.into_builder_with_clock(Arc::new(SystemClock))
    }

    /// Reopen this measurement, reading time from `clock`.
    pub fn into_builder_with_clock(self, clock: Arc<dyn Clock>) -> MeasurementBuilder {
        MeasurementBuilder { inner: self, clock }
    }

    /// Measurement name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tags, ordered by key.
    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    /// Fields, ordered by key.
    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    /// Look up a single tag value.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Look up a single field value.
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Timestamp in nanoseconds since the Unix epoch, `None` when the
    /// receiver should stamp arrival time instead.
    pub fn timestamp(&self) -> Option<i64> {
        self.timestamp
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::encoder::encode(self))
    }
}

/// Unit used when storing an elapsed duration as a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    /// Whole nanoseconds, stored as an integer.
    Nanoseconds,
    /// Fractional milliseconds, stored as a float.
    Milliseconds,
    /// Fractional seconds, stored as a float.
    Seconds,
    /// Fractional minutes, stored as a float.
    Minutes,
    /// Fractional hours, stored as a float.
    Hours,
}

impl TimeUnit {
    /// Convert an elapsed duration to the field value for this unit.
    pub fn to_field(self, elapsed: Duration) -> FieldValue {
        match self {
            TimeUnit::Nanoseconds => {
                FieldValue::Int(i64::try_from(elapsed.as_nanos()).unwrap_or(i64::MAX))
            }
            TimeUnit::Milliseconds => FieldValue::Float64(elapsed.as_nanos() as f64 / 1e6),
            TimeUnit::Seconds => FieldValue::Float64(elapsed.as_secs_f64()),
            TimeUnit::Minutes => FieldValue::Float64(elapsed.as_secs_f64() / 60.0),
            TimeUnit::Hours => FieldValue::Float64(elapsed.as_secs_f64() / 3600.0),
        }
    }
}

/// Builder for [`Measurement`].
///
/// Every method takes the builder by value and hands it back, so a chain of
/// calls always works on a single owned value.
pub struct MeasurementBuilder {
    inner: Measurement,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for MeasurementBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeasurementBuilder")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl MeasurementBuilder {
    /// Create a builder with no tags or fields, stamped with the current time.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_clock(name, Arc::new(SystemClock))
    }

    /// Create a builder that reads time from `clock`.
    pub fn with_clock(name: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        let timestamp = system_time_to_nanos(clock.now_system());
        Self {
            inner: Measurement {
                name: name.into(),
                tags: BTreeMap::new(),
                fields: BTreeMap::new(),
                timestamp,
            },
            clock,
        }
    }

    /// Set a tag, replacing any previous value for `key`.
    ///
    /// Empty values are stored as-is.
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner.tags.insert(key.into(), value.into());
        self
    }

    /// Set several tags at once.
    pub fn tags<I, K, V>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in tags {
            self.inner.tags.insert(key.into(), value.into());
        }
        self
    }

    /// Set a field, replacing any previous value for `key`.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.inner.fields.insert(key.into(), value.into());
        self
    }

    /// Store the time elapsed since `start` as a field in the given unit.
    ///
    /// Reads the builder's clock; a `start` in the future records zero.
    pub fn duration_since(self, key: impl Into<String>, start: Instant, unit: TimeUnit) -> Self {
        let elapsed = self.clock.now_instant().saturating_duration_since(start);
        self.field(key, unit.to_field(elapsed))
    }

    /// Override the timestamp. `UNIX_EPOCH` clears it.
    pub fn timestamp(mut self, time: SystemTime) -> Self {
        self.inner.timestamp = system_time_to_nanos(time);
        self
    }

    /// Override the timestamp with raw nanoseconds since the epoch. `0` clears it.
    pub fn timestamp_nanos(mut self, nanos: i64) -> Self {
        self.inner.timestamp = (nanos != 0).then_some(nanos);
        self
    }

    /// Drop the timestamp so the receiver stamps arrival time.
    pub fn no_timestamp(mut self) -> Self {
        self.inner.timestamp = None;
        self
    }

    /// Finalize the measurement.
    pub fn build(self) -> Measurement {
        self.inner
    }
}

/// Build a measurement holding a single field.
pub fn measure(
    name: impl Into<String>,
    field: impl Into<String>,
    value: impl Into<FieldValue>,
) -> Measurement {
    MeasurementBuilder::new(name).field(field, value).build()
}

/// Build a measurement holding a single elapsed-time field.
pub fn measure_duration_since(
    name: impl Into<String>,
    field: impl Into<String>,
    start: Instant,
    unit: TimeUnit,
) -> Measurement {
    MeasurementBuilder::new(name)
        .duration_since(field, start, unit)
        .build()
}

fn system_time_to_nanos(time: SystemTime) -> Option<i64> {
    let nanos = match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_nanos()).unwrap_or(i64::MAX),
        Err(before) => i64::try_from(before.duration().as_nanos())
            .map(|n| -n)
            .unwrap_or(i64::MIN),
    };
    (nanos != 0).then_some(nanos)
}
