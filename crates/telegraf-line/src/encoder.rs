// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! InfluxDB Line Protocol encoder.
//!
//! Line Protocol format:
//! ```text
//! measurement,tag1=val1,tag2=val2 field1=val1,field2=val2 timestamp_ns
//! ```
//!
//! Tags and fields are written in ascending key order. Sections with no
//! entries are left out entirely, as is a cleared timestamp. No line
//! terminator is written; that is the transport's job.
//!
//! See: <https://docs.influxdata.com/influxdb/v2/reference/syntax/line-protocol/>

use crate::escape;
use crate::measurement::Measurement;
use std::cmp::Ordering;
use std::collections::{btree_map, BTreeMap};
use std::fmt::Write as _;
use std::iter::Peekable;

/// Encode a measurement into a single Line Protocol line.
pub fn encode(m: &Measurement) -> String {
    let mut line = String::with_capacity(estimated_len(m));
    encode_into(m, &mut line);
    line
}

/// Append the Line Protocol line for `m` to `out`.
pub fn encode_into(m: &Measurement, out: &mut String) {
    write_line(m, m.tags().iter(), out);
}

/// Append the Line Protocol line for `m` to `out`, adding every tag from
/// `defaults` whose key the measurement does not already carry.
pub fn encode_with_default_tags(
    m: &Measurement,
    defaults: &BTreeMap<String, String>,
    out: &mut String,
) {
    if defaults.is_empty() {
        return encode_into(m, out);
    }
    let merged = MergeTags {
        own: m.tags().iter().peekable(),
        defaults: defaults.iter().peekable(),
    };
    write_line(m, merged, out);
}

fn write_line<'a>(
    m: &Measurement,
    tags: impl Iterator<Item = (&'a String, &'a String)>,
    out: &mut String,
) {
    escape::MEASUREMENT.escape_into(m.name(), out);

    for (key, value) in tags {
        out.push(',');
        escape::KEY.escape_into(key, out);
        out.push('=');
        escape::KEY.escape_into(value, out);
    }

    for (i, (key, value)) in m.fields().iter().enumerate() {
        out.push(if i == 0 { ' ' } else { ',' });
        escape::KEY.escape_into(key, out);
        out.push('=');
        value.write_line_protocol(out);
    }

    if let Some(ts) = m.timestamp() {
        let _ = write!(out, " {}", ts);
    }
}

fn estimated_len(m: &Measurement) -> usize {
    let tags: usize = m.tags().iter().map(|(k, v)| k.len() + v.len() + 2).sum();
    let fields: usize = m.fields().keys().map(|k| k.len() + 12).sum();
    m.name().len() + tags + fields + 21
}

/// Sorted union of two ordered tag maps; on equal keys the measurement's own
/// tag is kept and the default is skipped.
struct MergeTags<'a> {
    own: Peekable<btree_map::Iter<'a, String, String>>,
    defaults: Peekable<btree_map::Iter<'a, String, String>>,
}

impl<'a> Iterator for MergeTags<'a> {
    type Item = (&'a String, &'a String);

    fn next(&mut self) -> Option<Self::Item> {
        let order = match (self.own.peek(), self.defaults.peek()) {
            (None, None) => return None,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some((own, _)), Some((default, _))) => own.cmp(default),
        };
        match order {
            Ordering::Less => self.own.next(),
            Ordering::Greater => self.defaults.next(),
            Ordering::Equal => {
                self.defaults.next();
                self.own.next()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldValue;
    use crate::measurement::{measure, MeasurementBuilder};

    const T: i64 = 1_700_000_000_123_456_789;

    fn at(name: &str) -> MeasurementBuilder {
        Measurement::builder(name).timestamp_nanos(T)
    }

    fn line(b: MeasurementBuilder) -> String {
        encode(&b.build())
    }

    #[test]
    fn test_simple() {
        assert_eq!(line(at("simple")), format!("simple {}", T));
    }

    #[test]
    fn test_measure_float() {
        let m = measure("cpu", "load", 1.4).into_builder().timestamp_nanos(T).build();
        assert_eq!(encode(&m), format!("cpu load=1.4 {}", T));
    }

    #[test]
    fn test_field_and_tag() {
        let b = at("app").field("size", 5042).tag("path", "/api");
        assert_eq!(line(b), format!("app,path=/api size=5042i {}", T));
    }

    #[test]
    fn test_each_field_type() {
        let cases: Vec<(FieldValue, &str)> = vec![
            (FieldValue::from("value"), "\"value\""),
            (FieldValue::from(42), "42i"),
            (FieldValue::from(42u32), "42i"),
            (FieldValue::from(41u8), "41i"),
            (FieldValue::from(40u16), "40i"),
            (FieldValue::from(38u64), "38i"),
            (FieldValue::from(-43i8), "-43i"),
            (FieldValue::from(-44i16), "-44i"),
            (FieldValue::from(-46i64), "-46i"),
            (FieldValue::from(42.5f32), "42.5"),
            (FieldValue::from(42.5f64), "42.5"),
            (FieldValue::from(true), "true"),
            (FieldValue::from(false), "false"),
        ];
        for (value, literal) in cases {
            let out = line(at("measurement").field("key", value));
            assert_eq!(out, format!("measurement key={} {}", literal, T));
            assert_eq!(out.matches("key=").count(), 1);
        }
    }

    #[test]
    fn test_multiple_fields_sorted_by_key() {
        let b = at("measurement")
            .field("key3", 23.0)
            .field("key1", 5)
            .field("key2", "value");
        assert_eq!(
            line(b),
            format!("measurement key1=5i,key2=\"value\",key3=23 {}", T)
        );
    }

    #[test]
    fn test_multiple_tags_sorted_by_key() {
        let b = at("measurement")
            .tag("key2", "value2")
            .tag("key1", "value1")
            .field("f", 1);
        assert_eq!(
            line(b),
            format!("measurement,key1=value1,key2=value2 f=1i {}", T)
        );
    }

    #[test]
    fn test_multiline_string_field_encodes_one_line() {
        let out = line(at("m").field("msg", "a\nb"));
        assert_eq!(out, format!("m msg=\"a\\nb\" {}", T));
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn test_tag_only() {
        let b = at("measurement").tag("key", "value");
        assert_eq!(line(b), format!("measurement,key=value {}", T));
    }

    #[test]
    fn test_escaped_tag_name() {
        let b = at("measurement").tag("tag,= \"-", "value");
        assert_eq!(line(b), format!("measurement,tag\\,\\=\\ \"-=value {}", T));
    }

    #[test]
    fn test_escaped_tag_value() {
        let b = at("measurement").tag("key", "tag,= \"-");
        assert_eq!(line(b), format!("measurement,key=tag\\,\\=\\ \"- {}", T));
    }

    #[test]
    fn test_escaped_field_name() {
        let b = at("measurement").field("field,= \"-", "value");
        assert_eq!(
            line(b),
            format!("measurement field\\,\\=\\ \"-=\"value\" {}", T)
        );
    }

    #[test]
    fn test_escaped_field_value() {
        let b = at("measurement").field("key", "field,= \"-");
        assert_eq!(line(b), format!("measurement key=\"field,= \\\"-\" {}", T));
    }

    #[test]
    fn test_escaped_measurement_with_string_field() {
        let b = at("meas,ure ment").field("key", "field,= \"-");
        assert_eq!(
            line(b),
            format!("meas\\,ure\\ ment key=\"field,= \\\"-\" {}", T)
        );
    }

    #[test]
    fn test_escaped_measurement() {
        assert_eq!(line(at("meas,ure ment")), format!("meas\\,ure\\ ment {}", T));
    }

    #[test]
    fn test_no_timestamp_no_fields() {
        let b = Measurement::builder("meas ure").no_timestamp();
        assert_eq!(line(b), "meas\\ ure");
    }

    #[test]
    fn test_no_timestamp_with_field() {
        let b = Measurement::builder("m").field("v", 1).timestamp_nanos(0);
        assert_eq!(line(b), "m v=1i");
    }

    #[test]
    fn test_empty_name_is_not_quoted() {
        let b = Measurement::builder("").field("v", true).no_timestamp();
        assert_eq!(line(b), " v=true");
    }

    #[test]
    fn test_empty_tag_value_is_written() {
        let b = at("m").tag("region", "").field("v", 1);
        assert_eq!(line(b), format!("m,region= v=1i {}", T));
    }

    #[test]
    fn test_negative_timestamp() {
        let b = Measurement::builder("m").timestamp_nanos(-5);
        assert_eq!(line(b), "m -5");
    }

    #[test]
    fn test_encode_is_deterministic() {
        let m = at("m")
            .tag("z", "1")
            .tag("a", "2")
            .field("y", 1.25)
            .field("b", "s")
            .build();
        assert_eq!(encode(&m), encode(&m));
        assert_eq!(encode(&m), m.to_string());
    }

    #[test]
    fn test_encode_into_appends() {
        let m = at("m").field("v", 1).build();
        let mut out = String::from("prev\n");
        encode_into(&m, &mut out);
        assert_eq!(out, format!("prev\nm v=1i {}", T));
    }

    #[test]
    fn test_default_tags_merge_in_order() {
        let m = at("m").tag("host", "own").tag("path", "/").field("v", 1).build();
        let defaults: BTreeMap<String, String> = [("app", "svc"), ("host", "default"), ("zone", "eu")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let mut out = String::new();
        encode_with_default_tags(&m, &defaults, &mut out);
        assert_eq!(
            out,
            format!("m,app=svc,host=own,path=/,zone=eu v=1i {}", T)
        );
    }

    #[test]
    fn test_default_tags_only() {
        let m = at("m").field("v", 1).build();
        let defaults = BTreeMap::from([("dc".to_string(), "a b".to_string())]);
        let mut out = String::new();
        encode_with_default_tags(&m, &defaults, &mut out);
        assert_eq!(out, format!("m,dc=a\\ b v=1i {}", T));
    }

    #[test]
    fn test_default_tags_empty_matches_encode() {
        let m = at("m").tag("t", "1").field("v", 1).build();
        let mut out = String::new();
        encode_with_default_tags(&m, &BTreeMap::new(), &mut out);
        assert_eq!(out, encode(&m));
    }
}
