use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Object '{0}' already exists in the model")]
    DuplicateTag(String),

    #[error("Object '{0}' does not exist in the model")]
    UnknownTag(String),

    #[error("Operation '{0}' is not supported by this backend")]
    Unsupported(&'static str),

    #[error("Backend rejected '{operation}': {reason}")]
    Rejected { operation: String, reason: String },

    #[error("Failed to save model to '{path}': {source}", path = path.display())]
    Save {
        path: PathBuf,
        source: std::io::Error,
    },
}
