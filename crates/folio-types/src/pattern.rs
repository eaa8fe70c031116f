//! Glob patterns over [`ObjectRef`] tuples.

use serde::{Deserialize, Serialize};

use crate::identity::{ObjectRef, RefKind};

/// A 4-tuple pattern where any component may be a wildcard (`None`).
///
/// Components match exactly; there is no sub-string matching.
///
/// ```
/// use folio_types::{ObjectRef, RefKind, RefPattern};
///
/// let assets = RefPattern::any().package("numpy").kind(RefKind::Assets);
/// assert!(assets.matches(&ObjectRef::new("numpy", "1.0", RefKind::Assets, "fig1.png")));
/// assert!(!assets.matches(&ObjectRef::module("numpy", "1.0", "numpy")));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefPattern {
    pub package: Option<String>,
    pub version: Option<String>,
    pub kind: Option<RefKind>,
    pub path: Option<String>,
}

impl RefPattern {
    /// The pattern matching every key.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn kind(mut self, kind: RefKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Whether `r` matches every non-wildcard component.
    pub fn matches(&self, r: &ObjectRef) -> bool {
        fn component(want: &Option<String>, have: &Option<String>) -> bool {
            match want {
                None => true,
                Some(w) => have.as_deref() == Some(w.as_str()),
            }
        }
        component(&self.package, &r.package)
            && component(&self.version, &r.version)
            && self.kind.map_or(true, |k| k == r.kind)
            && self.path.as_ref().map_or(true, |p| *p == r.path)
    }
}
