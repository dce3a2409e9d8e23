//! Error types for reprojection.

use coverage_common::CoverageError;
use thiserror::Error;

pub type ProjectionResult<T> = Result<T, ProjectionError>;

#[derive(Debug, Error)]
pub enum ProjectionError {
    /// No definition is known for the CRS.
    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),

    /// The PROJ string was rejected.
    #[error("Invalid CRS definition '{definition}': {reason}")]
    InvalidDefinition { definition: String, reason: String },

    /// The transformation of a point failed.
    #[error("Transform failed: {0}")]
    TransformFailed(String),
}

impl From<ProjectionError> for CoverageError {
    fn from(err: ProjectionError) -> Self {
        CoverageError::ProjectionError(err.to_string())
    }
}
