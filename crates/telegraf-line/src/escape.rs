// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Line Protocol escapers.
//!
//! | Context | Escaped characters |
//! |---|---|
//! | measurement name | `,` and space |
//! | tag key, tag value, field key | `,`, space and `=` |
//! | string field value | `"` and `\`; newline and carriage return become `\n` and `\r` |
//!
//! See: <https://docs.influxdata.com/influxdb/v2/reference/syntax/line-protocol/#special-characters>

use std::borrow::Cow;

/// A stateless character-substitution rule: every listed character is
/// prefixed with a backslash. Line breaks are written as `\n` / `\r` so a
/// value never splits a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Escaper {
    specials: &'static [char],
}

/// Escaper for measurement names.
pub const MEASUREMENT: Escaper = Escaper::new(&[',', ' ']);

/// Escaper shared by tag keys, tag values and field keys.
pub const KEY: Escaper = Escaper::new(&[',', ' ', '=']);

/// Escaper for the body of a string field value. The surrounding quotes are
/// written by the field formatter.
pub const STRING_FIELD: Escaper = Escaper::new(&['"', '\\', '\n', '\r']);

impl Escaper {
    /// Create an escaper for the given set of characters.
    pub const fn new(specials: &'static [char]) -> Self {
        Self { specials }
    }

    /// Characters this escaper prefixes with a backslash.
    pub fn specials(&self) -> &'static [char] {
        self.specials
    }

    fn needs_escape(&self, c: char) -> bool {
        self.specials.contains(&c)
    }

    /// Escape `s`, borrowing it unchanged when nothing needs escaping.
    pub fn escape<'a>(&self, s: &'a str) -> Cow<'a, str> {
        match s.find(|c: char| self.needs_escape(c)) {
            None => Cow::Borrowed(s),
            Some(first) => {
                let mut escaped = String::with_capacity(s.len() + 8);
                escaped.push_str(&s[..first]);
                self.push_escaped(&s[first..], &mut escaped);
                Cow::Owned(escaped)
            }
        }
    }

    /// Append the escaped form of `s` to `out`.
    pub fn escape_into(&self, s: &str, out: &mut String) {
        match s.find(|c: char| self.needs_escape(c)) {
            None => out.push_str(s),
            Some(first) => {
                out.push_str(&s[..first]);
                self.push_escaped(&s[first..], out);
            }
        }
    }

    fn push_escaped(&self, s: &str, out: &mut String) {
        for c in s.chars() {
            if !self.needs_escape(c) {
                out.push(c);
                continue;
            }
            out.push('\\');
            match c {
                '\n' => out.push('n'),
                '\r' => out.push('r'),
                _ => out.push(c),
            }
        }
    }
}
