//! Site assembly for Folio.
//!
//! [`Site`] ties a [`DocumentStore`] to a [`SiteConfig`] and the corpus
//! snapshot built from it, and produces everything a renderer consumes:
//!
//! - [`RenderContext`] per document (siblings, breadcrumbs, backrefs, graph)
//! - [`ExampleContext`] per example, with the package navigation list
//! - [`MissingPage`] for names without a document
//! - [`GalleryEntry`] lists per package version
//! - a batch driver over every module and example page ([`Site::render_all`])
//!
//! [`DocumentStore`]: folio_store::DocumentStore

pub mod config;
pub mod context;
pub mod error;
pub mod pages;
pub mod site;

pub use config::{SiteConfig, DEFAULT_BACKREF_GROUP_THRESHOLD};
pub use context::{BackrefListing, ExampleContext, PackageLink, PageContext, RenderContext};
pub use error::{SiteError, SiteResult};
pub use pages::{GalleryEntry, MissingPage, MissingTree};
pub use site::{RenderSummary, Site};
