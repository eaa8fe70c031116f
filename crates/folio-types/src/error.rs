use thiserror::Error;

use crate::identity::RefKind;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown ref kind: {0:?}")]
    UnknownKind(String),

    #[error("cannot build a URL for a {0} ref")]
    UnsupportedUrlKind(RefKind),

    #[error("ref {path} has a package but no version")]
    MissingVersion { path: String },
}
