//! Error types for coverage metadata operations.

use thiserror::Error;

/// Result type alias using CoverageError.
pub type CoverageResult<T> = Result<T, CoverageError>;

/// Primary error type for coverage metadata operations.
#[derive(Debug, Error)]
pub enum CoverageError {
    // === Affine transform errors ===
    #[error("Affine transformation is ill-conditioned (det={determinant})")]
    IllConditionedTransform { determinant: f64 },

    #[error("Invalid affine transformation string: {0}")]
    InvalidAffineTransform(String),

    // === Temporal reference errors ===
    #[error("Invalid instant: {0}")]
    InvalidInstant(String),

    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    #[error("Temporal index {index} exceeds the calendar arithmetic range")]
    TemporalOverflow { index: i64 },

    #[error("Temporal reference has a zero-length period")]
    ZeroPeriod,

    #[error("Requested time is out of the coverage's range: index {index} not in [{min}, {max}]")]
    TimeOutOfRange { index: i64, min: i64, max: i64 },

    // === Descriptor errors ===
    #[error("Array '{0}' has no temporal reference")]
    NotTemporal(String),

    #[error("Array '{0}' has no spatial reference")]
    NotSpatial(String),

    #[error("Array not found: {0}")]
    ArrayNotFound(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    // === Infrastructure errors ===
    #[error("Metadata unavailable: {0}")]
    MetadataUnavailable(String),

    #[error("Projection error: {0}")]
    ProjectionError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl CoverageError {
    /// Create an InvalidParameter error.
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Get the OGC exception code reported to protocol clients.
    pub fn exception_code(&self) -> &'static str {
        match self {
            CoverageError::InvalidInstant(_)
            | CoverageError::TimeOutOfRange { .. }
            | CoverageError::NotTemporal(_)
            | CoverageError::NotSpatial(_)
            | CoverageError::InvalidParameter { .. } => "InvalidParameterValue",
            CoverageError::ArrayNotFound(_) => "CoverageNotDefined",
            _ => "NoApplicableCode",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            CoverageError::InvalidInstant(_)
            | CoverageError::TimeOutOfRange { .. }
            | CoverageError::NotTemporal(_)
            | CoverageError::NotSpatial(_)
            | CoverageError::InvalidParameter { .. } => 400,

            CoverageError::ArrayNotFound(_) => 404,

            CoverageError::MetadataUnavailable(_) => 503,

            _ => 500,
        }
    }

    /// Whether the error stems from client input rather than an internal fault.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.http_status_code())
    }
}

impl From<serde_json::Error> for CoverageError {
    fn from(err: serde_json::Error) -> Self {
        CoverageError::InternalError(format!("JSON error: {}", err))
    }
}
