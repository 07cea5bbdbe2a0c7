// src/config/value.rs

//! Value classification and typed accessors for tree nodes.
//!
//! Values are stored as raw strings; the type is inferred on read. The
//! classifier checks list shape first, then absence, then booleans, then a
//! digits-and-dots scan that separates integers from doubles. Anything left
//! over is a plain string.
//!
//! The boolean *classifier* accepts more spellings (`f`, `no`, ...) than the
//! boolean *accessor* treats as true; a value can classify as `Bool` and
//! still read as `false`.

use crate::config::tree::{NodeId, NodeTree};

/// Inferred type of a node's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    None,
    Bool,
    Int,
    Double,
    String,
    List,
}

impl NodeTree {
    /// Whether `id` holds a list: either a bracketed inline value, or no
    /// value but at least one child, all of them anonymous and childless.
    pub fn has_list_value(&self, id: NodeId) -> bool {
        if let Some(value) = self.value_str(id) {
            return value.starts_with('[') && value.ends_with(']');
        }
        let mut children = self.children(id).peekable();
        if children.peek().is_none() {
            return false;
        }
        children.all(|child| self.name(child).is_none() && self.first_child(child).is_none())
    }

    /// Classify the value of `id`. List shape wins over everything else, so
    /// e.g. `[3]` is a `List`, not an `Int`.
    pub fn value_kind(&self, id: NodeId) -> ValueKind {
        if self.has_list_value(id) {
            return ValueKind::List;
        }
        let Some(value) = self.value_str(id) else {
            return ValueKind::None;
        };
        if value.len() == 1
            && matches!(
                value.as_bytes()[0],
                b't' | b'T' | b'y' | b'Y' | b'f' | b'F' | b'n' | b'N'
            )
        {
            return ValueKind::Bool;
        }
        if ["true", "false", "yes", "no"]
            .iter()
            .any(|word| value.eq_ignore_ascii_case(word))
        {
            return ValueKind::Bool;
        }
        let mut kind = ValueKind::Int;
        for ch in value.chars() {
            if ch.is_ascii_digit() {
                continue;
            }
            if ch == '.' {
                if kind == ValueKind::Double {
                    // Two dots, e.g. a version string.
                    return ValueKind::String;
                }
                kind = ValueKind::Double;
            } else {
                return ValueKind::String;
            }
        }
        kind
    }

    /// Boolean reading of the value: true iff it starts with `t`, `T`, `y`,
    /// `Y` or `1`. Absent values are false.
    pub fn value_bool(&self, id: NodeId) -> bool {
        matches!(
            self.value_str(id).and_then(|value| value.chars().next()),
            Some('t' | 'T' | 'y' | 'Y' | '1')
        )
    }

    /// Integer reading of the longest numeric prefix, 0 if there is none.
    pub fn value_i64(&self, id: NodeId) -> i64 {
        self.value_str(id).map_or(0, parse_i64_prefix)
    }

    /// Double reading of the longest numeric prefix, 0.0 if there is none.
    pub fn value_f64(&self, id: NodeId) -> f64 {
        self.value_str(id).map_or(0.0, parse_f64_prefix)
    }
}

/// `atoi`-style parse: optional whitespace and sign, then digits until the
/// first non-digit. Out-of-range values saturate.
fn parse_i64_prefix(text: &str) -> i64 {
    let bytes = text.trim_start().as_bytes();
    let mut index = 0;
    let mut negative = false;
    match bytes.first() {
        Some(b'+') => index = 1,
        Some(b'-') => {
            negative = true;
            index = 1;
        }
        _ => {}
    }
    let mut value: i64 = 0;
    while index < bytes.len() && bytes[index].is_ascii_digit() {
        let digit = i64::from(bytes[index] - b'0');
        value = match value.checked_mul(10).and_then(|v| v.checked_add(digit)) {
            Some(next) => next,
            None => return if negative { i64::MIN } else { i64::MAX },
        };
        index += 1;
    }
    if negative { -value } else { value }
}

/// `strtod`-style parse: scan the longest prefix that forms a decimal number
/// (optional sign, digits, fraction, exponent) and convert that.
fn parse_f64_prefix(text: &str) -> f64 {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let mut digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        let mut frac_digits = 0;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
            frac_digits += 1;
        }
        // A bare dot with no digits on either side is not a number.
        if digits > 0 || frac_digits > 0 {
            end = frac_end;
            digits += frac_digits;
        }
    }
    if digits == 0 {
        return 0.0;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let mut exp_digits = 0;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
            exp_digits += 1;
        }
        // The exponent only counts if it has at least one digit.
        if exp_digits > 0 {
            end = exp_end;
        }
    }
    trimmed[..end].parse().unwrap_or(0.0)
}
