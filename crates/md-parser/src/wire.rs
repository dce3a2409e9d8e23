//! Field-level tokenizer for the metadata wire format.
//!
//! Values inside a record are joined by [`SEPARATOR`]. Dimension and
//! attribute lists are sequences of bracketed groups, `[...]` and `<...>`
//! respectively; text between groups is ignored.

use crate::error::{DecodeError, DecodeResult, WireField};

/// Separator between fields of one record.
pub const SEPARATOR: &str = ";;;";

/// Split a record on the separator, keeping trailing empty fields.
pub fn split_fields(s: &str) -> Vec<&str> {
    s.split(SEPARATOR).collect()
}

/// Split a record that must have exactly `expected` fields.
pub fn split_exact(s: &str, expected: usize, field: WireField) -> DecodeResult<Vec<&str>> {
    let fields = split_fields(s);
    if fields.len() != expected {
        return Err(DecodeError::WrongArity {
            field,
            expected,
            found: fields.len(),
        });
    }
    Ok(fields)
}

/// Contents of every `open ... close` group, in order.
///
/// Groups do not nest: the first `close` after an `open` ends the group.
pub fn groups(s: &str, open: char, close: char, field: WireField) -> DecodeResult<Vec<&str>> {
    let mut out = Vec::new();
    let mut rest = s;
    while let Some(start) = rest.find(open) {
        let body = &rest[start + open.len_utf8()..];
        let end = body
            .find(close)
            .ok_or(DecodeError::UnterminatedGroup { field })?;
        out.push(&body[..end]);
        rest = &body[end + close.len_utf8()..];
    }
    Ok(out)
}

pub fn parse_i64(value: &str, field: WireField) -> DecodeResult<i64> {
    value
        .trim()
        .parse()
        .map_err(|e| DecodeError::scalar(field, value, e))
}

pub fn parse_f64(value: &str, field: WireField) -> DecodeResult<f64> {
    value
        .trim()
        .parse()
        .map_err(|e| DecodeError::scalar(field, value, e))
}

/// Boolean flag: `true` in any letter case, anything else is false.
pub fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// `None` for an empty or blank field.
pub fn non_empty(value: &str) -> Option<&str> {
    let v = value.trim();
    (!v.is_empty()).then_some(v)
}
