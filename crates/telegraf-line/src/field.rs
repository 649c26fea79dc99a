// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed field values and their Line Protocol literal forms.

use crate::escape;
use std::borrow::Cow;
use std::fmt::{self, Write as _};

/// A value that can be stored in a measurement field.
///
/// The variant set is closed: only the types with a `From` impl below can be
/// turned into a field, anything else fails to compile.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Boolean value.
    Bool(bool),
    /// Signed integer of any width, widened to 64 bits.
    Int(i64),
    /// Unsigned integer of any width, widened to 64 bits.
    UInt(u64),
    /// 32-bit floating point.
    Float32(f32),
    /// 64-bit floating point.
    Float64(f64),
    /// UTF-8 string.
    String(String),
}

impl FieldValue {
    /// Append the Line Protocol literal for this value to `out`.
    ///
    /// - Int / UInt: decimal digits suffixed with `i` (e.g., `42i`)
    /// - Float32 / Float64: shortest round-trippable decimal, no exponent (e.g., `3.14`)
    /// - String: quoted, inner `"` and `\` escaped, line breaks as `\n` / `\r`
    ///   (e.g., `"say \"hi\""`)
    /// - Bool: `true` or `false`
    pub fn write_line_protocol(&self, out: &mut String) {
        // Writing into a String cannot fail.
        let _ = match self {
            FieldValue::Bool(v) => {
                out.push_str(if *v { "true" } else { "false" });
                Ok(())
            }
            FieldValue::Int(v) => write!(out, "{}i", v),
            FieldValue::UInt(v) => write!(out, "{}i", v),
            FieldValue::Float32(v) => write!(out, "{}", v),
            FieldValue::Float64(v) => write!(out, "{}", v),
            FieldValue::String(v) => {
                out.push('"');
                escape::STRING_FIELD.escape_into(v, out);
                out.push('"');
                Ok(())
            }
        };
    }

    /// Format this value as a standalone Line Protocol literal.
    pub fn to_line_protocol(&self) -> String {
        let mut out = String::new();
        self.write_line_protocol(&mut out);
        out
    }

    /// Name of the wire type, as used by InfluxDB schema errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Bool(_) => "boolean",
            FieldValue::Int(_) | FieldValue::UInt(_) => "integer",
            FieldValue::Float32(_) | FieldValue::Float64(_) => "float",
            FieldValue::String(_) => "string",
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line_protocol())
    }
}

macro_rules! impl_from_int {
    ($variant:ident, $wide:ty: $($t:ty),+) => {
        $(
            impl From<$t> for FieldValue {
                fn from(v: $t) -> Self {
                    FieldValue::$variant(v as $wide)
                }
            }
        )+
    };
}

impl_from_int!(Int, i64: i8, i16, i32, i64, isize);
impl_from_int!(UInt, u64: u8, u16, u32, u64, usize);

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        FieldValue::Float32(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float64(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::String(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::String(v.to_owned())
    }
}

impl From<&String> for FieldValue {
    fn from(v: &String) -> Self {
        FieldValue::String(v.clone())
    }
}

impl From<Cow<'_, str>> for FieldValue {
    fn from(v: Cow<'_, str>) -> Self {
        FieldValue::String(v.into_owned())
    }
}
