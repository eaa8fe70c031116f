use thiserror::Error;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("store error: {0}")]
    Store(#[from] folio_store::StoreError),

    #[error("index error: {0}")]
    Index(#[from] folio_index::IndexError),

    #[error("url error: {0}")]
    Url(#[from] folio_types::TypeError),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SiteResult<T> = Result<T, SiteError>;
