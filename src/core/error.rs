//! Error types for SVM training and feature selection

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SVMError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("Invalid label encoding at sample {index}: expected -1 or +1, got {label}")]
    InvalidLabelEncoding { index: usize, label: f64 },

    #[error("Feature matrix has no columns left")]
    EmptyFeatureSet,

    #[error("Empty dataset")]
    EmptyDataset,

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Design matrix is singular")]
    SingularMatrix,

    #[error("Numeric instability: {0}")]
    NumericInstability(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SVMError>;
