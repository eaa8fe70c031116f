//! Foundation types for Folio.
//!
//! This crate provides the identity and addressing types shared by every other
//! Folio crate: how a documented object is named, how names are matched, how
//! versions are ordered, and how an identity becomes a page URL.
//!
//! # Key Types
//!
//! - [`ObjectRef`] -- Structural identity of a documented object
//! - [`StorageKey`] -- The store's addressing key (same shape as [`ObjectRef`])
//! - [`RefKind`] -- What sort of object a ref names (module, api, examples, ...)
//! - [`RefPattern`] -- A 4-tuple pattern with wildcard components, for globbing
//! - [`NavTarget`] -- A navigation entry: either resolved or a placeholder
//! - [`compare_versions`] -- Version-aware ordering used for "latest" selection
//! - [`to_url`] -- Identity to display URL mapping

pub mod error;
pub mod identity;
pub mod pattern;
pub mod url;
pub mod version;

pub use error::TypeError;
pub use identity::{NavTarget, ObjectRef, RefKind, StorageKey};
pub use pattern::RefPattern;
pub use url::{to_url, DEFAULT_PATH_PREFIX};
pub use version::{compare_versions, latest_by_version, VersionKey};
