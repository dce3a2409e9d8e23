//! Error types for metadata decoding.

use std::fmt;

use thiserror::Error;

/// Result type for decoder operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// The wire field a problem was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireField {
    Name,
    Dimensions,
    Attributes,
    Srs,
    Trs,
    Extent,
}

impl fmt::Display for WireField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WireField::Name => "name",
            WireField::Dimensions => "dimensions",
            WireField::Attributes => "attributes",
            WireField::Srs => "srs",
            WireField::Trs => "trs",
            WireField::Extent => "extent",
        };
        f.write_str(s)
    }
}

/// Why one array's metadata could not be decoded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// A group or record has the wrong number of fields.
    #[error("{field}: expected {expected} fields, found {found}")]
    WrongArity {
        field: WireField,
        expected: usize,
        found: usize,
    },

    /// A field could not be read as the scalar it should hold.
    #[error("{field}: cannot parse '{value}': {reason}")]
    InvalidScalar {
        field: WireField,
        value: String,
        reason: String,
    },

    /// An opening bracket without its closing counterpart.
    #[error("{field}: unterminated group")]
    UnterminatedGroup { field: WireField },

    /// Fields parsed but do not form a valid reference system.
    #[error("{field}: invalid reference: {reason}")]
    InvalidReference { field: WireField, reason: String },
}

impl DecodeError {
    pub(crate) fn scalar(field: WireField, value: &str, reason: impl ToString) -> Self {
        DecodeError::InvalidScalar {
            field,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    /// The wire field the error refers to.
    pub fn field(&self) -> WireField {
        match self {
            DecodeError::WrongArity { field, .. }
            | DecodeError::InvalidScalar { field, .. }
            | DecodeError::UnterminatedGroup { field }
            | DecodeError::InvalidReference { field, .. } => *field,
        }
    }

    pub fn is_arity(&self) -> bool {
        matches!(self, DecodeError::WrongArity { .. })
    }
}
