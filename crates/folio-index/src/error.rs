//! Error types for corpus index construction.

use thiserror::Error;

use folio_store::StoreError;
use folio_types::ObjectRef;

/// Errors that abort building a corpus index.
///
/// Index construction is all-or-nothing: there is no partially built index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Scanning the store failed.
    #[error("store scan failed: {0}")]
    Store(#[from] StoreError),

    /// A stored key has a qualified path that cannot be placed in the tree.
    #[error("invalid qualified path for {key}: {reason}")]
    InvalidPath { key: ObjectRef, reason: String },
}

/// Convenience type alias for index operations.
pub type IndexResult<T> = std::result::Result<T, IndexError>;
