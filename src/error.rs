//! Error types for the quad-store coordination layer

use thiserror::Error;

/// Store error type
#[derive(Error, Debug)]
pub enum StoreError {
    /// Operation invoked after the dataset has been closed
    #[error("dataset closed")]
    DatasetClosed,

    /// Operation not permitted by this storage model
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    /// Internal contract violation (programming error)
    #[error("internal error: {0}")]
    Internal(String),

    /// Transaction lifecycle error
    #[error("transaction error: {0}")]
    Transaction(String),

    /// A stored node-id with no dictionary mapping
    #[error("invalid node id: {0}")]
    InvalidNodeId(u64),

    /// I/O error from a storage-backed collaborator
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
