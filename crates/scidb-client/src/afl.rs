//! AFL query construction.

use crate::error::{TransportError, TransportResult};

/// Whether `name` is a plain array identifier `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// The metadata query for the given arrays, or for all arrays if empty.
pub fn eo_all_query(names: &[String]) -> TransportResult<String> {
    if let Some(bad) = names.iter().find(|n| !is_identifier(n)) {
        return Err(TransportError::InvalidArrayName(bad.clone()));
    }
    Ok(format!("eo_all({})", names.join(",")))
}
