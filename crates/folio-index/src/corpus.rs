//! The set of every known identity, and lookup by qualified name.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use folio_store::DocumentStore;
use folio_types::{ObjectRef, RefPattern};

use crate::error::{IndexError, IndexResult};

/// Every identity in a store, plus a qualified-path lookup.
///
/// Several refs can share one qualified path (the same object in two
/// versions, or a module page and an API entry). The name map keeps one of
/// them: refs are indexed in [`ObjectRef::cmp_by_version`] order and a later
/// ref overwrites an earlier one, so the newest version of the greatest
/// package wins. The outcome depends only on the set of refs, never on the
/// order the store enumerated them in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CorpusIndex {
    known_refs: BTreeSet<ObjectRef>,
    name_map: BTreeMap<String, ObjectRef>,
}

impl CorpusIndex {
    /// Scan every key in `store` (all packages, versions and kinds).
    ///
    /// Fails without a partial result if the store cannot be enumerated or
    /// any key has an unusable path.
    pub fn build<S: DocumentStore + ?Sized>(store: &S) -> IndexResult<Self> {
        let keys = store.glob(&RefPattern::any())?;
        debug!(keys = keys.len(), "scanned store for corpus index");
        let index = Self::from_refs(keys)?;
        info!(
            known = index.known_refs.len(),
            names = index.name_map.len(),
            "built corpus index"
        );
        Ok(index)
    }

    /// Build from an explicit set of refs.
    pub fn from_refs(refs: impl IntoIterator<Item = ObjectRef>) -> IndexResult<Self> {
        let known_refs: BTreeSet<ObjectRef> = refs.into_iter().collect();
        for r in &known_refs {
            validate_path(r)?;
        }

        let mut ordered: Vec<&ObjectRef> = known_refs.iter().collect();
        ordered.sort_by(|a, b| a.cmp_by_version(b));
        let mut name_map = BTreeMap::new();
        for r in ordered {
            name_map.insert(r.path.clone(), r.clone());
        }

        Ok(Self {
            known_refs,
            name_map,
        })
    }

    /// Every known identity, sorted.
    pub fn known_refs(&self) -> &BTreeSet<ObjectRef> {
        &self.known_refs
    }

    /// Qualified path to the identity chosen for it.
    pub fn name_map(&self) -> &BTreeMap<String, ObjectRef> {
        &self.name_map
    }

    /// The identity indexed under `path`, if any.
    pub fn resolve(&self, path: &str) -> Option<&ObjectRef> {
        self.name_map.get(path)
    }

    /// Whether `r` is a known identity.
    pub fn contains(&self, r: &ObjectRef) -> bool {
        self.known_refs.contains(r)
    }

    /// Every distinct qualified path, sorted.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.name_map.keys().map(String::as_str)
    }

    /// Every known identity whose path is exactly `path`, in any version.
    pub fn refs_with_path<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a ObjectRef> {
        self.known_refs.iter().filter(move |r| r.path == path)
    }

    pub fn len(&self) -> usize {
        self.known_refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known_refs.is_empty()
    }
}

fn validate_path(r: &ObjectRef) -> IndexResult<()> {
    if r.path.is_empty() {
        return Err(IndexError::InvalidPath {
            key: r.clone(),
            reason: "empty path".into(),
        });
    }
    if r.path.split('.').any(str::is_empty) {
        return Err(IndexError::InvalidPath {
            key: r.clone(),
            reason: "empty path segment".into(),
        });
    }
    Ok(())
}
