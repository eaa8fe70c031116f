use folio_types::StorageKey;

/// Errors from document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested document was not found.
    #[error("document not found: {0}")]
    NotFound(StorageKey),

    /// The stored bytes could not be decoded as a document.
    #[error("malformed document {key}: {reason}")]
    MalformedDocument { key: StorageKey, reason: String },

    /// A key cannot be mapped onto the backend's layout.
    #[error("invalid key {key}: {reason}")]
    InvalidKey { key: StorageKey, reason: String },

    /// Serialization or deserialization failure of store metadata.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
