use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::version::compare_versions;

/// The kind of documented object a ref names.
///
/// Variants are declared in the order of their string forms so that the
/// derived `Ord` matches comparing the kinds as text (`"?"` sorts first).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RefKind {
    /// Kind could not be determined (navigation placeholders, dangling refs).
    #[serde(rename = "?")]
    Unknown,
    /// A documented function, class, method or attribute.
    #[serde(rename = "api")]
    Api,
    /// A binary asset (figure, image).
    #[serde(rename = "assets")]
    Assets,
    /// A narrative documentation page.
    #[serde(rename = "docs")]
    Docs,
    /// A rendered example.
    #[serde(rename = "examples")]
    Examples,
    /// A module-level document.
    #[serde(rename = "module")]
    Module,
}

impl RefKind {
    /// All kinds, in ordering order.
    pub const ALL: [RefKind; 6] = [
        RefKind::Unknown,
        RefKind::Api,
        RefKind::Assets,
        RefKind::Docs,
        RefKind::Examples,
        RefKind::Module,
    ];

    /// The on-disk / wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "?",
            Self::Api => "api",
            Self::Assets => "assets",
            Self::Docs => "docs",
            Self::Examples => "examples",
            Self::Module => "module",
        }
    }
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RefKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RefKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| TypeError::UnknownKind(s.to_string()))
    }
}

/// Structural identity of a documented object.
///
/// An `ObjectRef` names one object across packages and versions:
/// `(package, version, kind, path)`. Equality and ordering are the tuple
/// comparison of those four fields, in that order. `path` is the dotted
/// qualified name (`numpy.linalg.norm`) or, for examples and assets, a file
/// name.
///
/// A ref with no `package` is a same-page ref; it maps to its bare path when
/// turned into a URL.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectRef {
    pub package: Option<String>,
    pub version: Option<String>,
    pub kind: RefKind,
    pub path: String,
}

/// The store's addressing key. Interchangeable with [`ObjectRef`].
pub type StorageKey = ObjectRef;

impl ObjectRef {
    /// A fully qualified ref.
    pub fn new(
        package: impl Into<String>,
        version: impl Into<String>,
        kind: RefKind,
        path: impl Into<String>,
    ) -> Self {
        Self {
            package: Some(package.into()),
            version: Some(version.into()),
            kind,
            path: path.into(),
        }
    }

    /// A same-page ref with no package or version.
    pub fn local(kind: RefKind, path: impl Into<String>) -> Self {
        Self {
            package: None,
            version: None,
            kind,
            path: path.into(),
        }
    }

    /// Shorthand for an `api` ref.
    pub fn api(package: impl Into<String>, version: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(package, version, RefKind::Api, path)
    }

    /// Shorthand for a `module` ref.
    pub fn module(
        package: impl Into<String>,
        version: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self::new(package, version, RefKind::Module, path)
    }

    /// The dot-separated segments of the path.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('.')
    }

    /// The first path segment (the top-level package name for API refs).
    pub fn top_level(&self) -> &str {
        self.path.split('.').next().unwrap_or(&self.path)
    }

    /// The last path segment.
    pub fn short_name(&self) -> &str {
        self.path.rsplit('.').next().unwrap_or(&self.path)
    }

    /// A copy of this ref with the path cut down to its first `depth` segments.
    pub fn truncated(&self, depth: usize) -> Self {
        let path = self.segments().take(depth).collect::<Vec<_>>().join(".");
        Self {
            path,
            ..self.clone()
        }
    }

    /// Compare as the tuple ordering does, but with a version-aware comparison
    /// of the version component.
    pub fn cmp_by_version(&self, other: &Self) -> Ordering {
        self.package
            .cmp(&other.package)
            .then_with(|| match (&self.version, &other.version) {
                (Some(a), Some(b)) => compare_versions(a, b),
                (a, b) => a.cmp(b),
            })
            .then_with(|| self.kind.cmp(&other.kind))
            .then_with(|| self.path.cmp(&other.path))
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.package, &self.version) {
            (Some(p), Some(v)) => write!(f, "{p}/{v}/{}/{}", self.kind, self.path),
            (Some(p), None) => write!(f, "{p}/?/{}/{}", self.kind, self.path),
            _ => write!(f, "{}/{}", self.kind, self.path),
        }
    }
}

/// A navigation entry.
///
/// Navigation candidates are derived from qualified names, and not every name
/// in the hierarchy has a document of its own (a class documented only
/// through its constructor, a re-exported name stored under another path).
/// Those surface as `Placeholder` so that callers must check before treating
/// an entry as a real identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NavTarget {
    Resolved { target: ObjectRef },
    Placeholder { path: String },
}

impl NavTarget {
    pub fn resolved(target: ObjectRef) -> Self {
        Self::Resolved { target }
    }

    pub fn placeholder(path: impl Into<String>) -> Self {
        Self::Placeholder { path: path.into() }
    }

    /// The qualified path this entry stands for.
    pub fn path(&self) -> &str {
        match self {
            Self::Resolved { target } => &target.path,
            Self::Placeholder { path } => path,
        }
    }

    /// The resolved identity, if any.
    pub fn as_resolved(&self) -> Option<&ObjectRef> {
        match self {
            Self::Resolved { target } => Some(target),
            Self::Placeholder { .. } => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }

    /// The identity to hand to the URL mapping. Placeholders become
    /// unknown-kind refs with `?` package and version.
    pub fn to_object_ref(&self) -> ObjectRef {
        match self {
            Self::Resolved { target } => target.clone(),
            Self::Placeholder { path } => ObjectRef::new("?", "?", RefKind::Unknown, path.clone()),
        }
    }
}
