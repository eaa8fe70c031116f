//! Corpus index for Folio.
//!
//! A render batch starts by scanning the document store once. The scan
//! produces a [`CorpusIndex`] (every known identity plus a qualified-name
//! lookup) and a [`PrefixTree`] over all qualified names. Both are wrapped in
//! a [`CorpusSnapshot`], which is immutable: navigation for the whole batch is
//! computed against the same snapshot, and a changed store means building a
//! new one.
//!
//! # Modules
//!
//! - [`corpus`] -- [`CorpusIndex`]: known refs and the name map
//! - [`tree`] -- [`PrefixTree`]: dotted-name hierarchy
//! - [`snapshot`] -- [`CorpusSnapshot`]: the two together
//! - [`error`] -- Error types for index construction

pub mod corpus;
pub mod error;
pub mod snapshot;
pub mod tree;

pub use corpus::CorpusIndex;
pub use error::{IndexError, IndexResult};
pub use snapshot::CorpusSnapshot;
pub use tree::PrefixTree;
