//! Error types for tensor export.

use qcir_ir::IrError;
use thiserror::Error;

/// Errors produced while exporting a circuit as a tensor network.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TensorError {
    /// The operation has no tensor representation.
    #[error(
        "Tensor export supports standard gates, compounds, barriers and measurements, got '{0}'"
    )]
    UnsupportedOperation(String),

    /// The decision-diagram backend could not represent the operation.
    #[error("Decision diagram backend error: {0}")]
    Backend(String),

    /// Circuit IR error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] IrError),

    /// Writing the listing failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing a record failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for tensor export.
pub type TensorResult<T> = Result<T, TensorError>;
