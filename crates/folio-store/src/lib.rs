//! Document storage for Folio.
//!
//! Every documented object -- module pages, API entries, examples, assets --
//! is stored as immutable bytes addressed by its [`StorageKey`]. Alongside the
//! bytes each document records the refs it mentions (its forward refs), and
//! the store maintains the inverse: for any key, the set of documents that
//! reference it (its backrefs).
//!
//! # Storage Backends
//!
//! All backends implement the [`DocumentStore`] trait:
//!
//! - [`InMemoryDocumentStore`] -- `BTreeMap`-based store for tests and embedding
//! - [`FsDocumentStore`] -- directory tree under an ingest root
//!
//! # Design Rules
//!
//! 1. Documents are written once by ingestion and read many times by rendering.
//! 2. Backrefs are derived from forward refs and never stored inline.
//! 3. A missing backref entry is an empty set, not an error.
//! 4. The store never interprets document bytes; [`IngestedDocument`] does.
//!
//! [`StorageKey`]: folio_types::StorageKey

mod backref;
pub mod document;
pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use document::IngestedDocument;
pub use error::{StoreError, StoreResult};
pub use fs::FsDocumentStore;
pub use memory::InMemoryDocumentStore;
pub use traits::DocumentStore;
