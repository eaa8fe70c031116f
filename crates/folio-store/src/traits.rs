use std::collections::BTreeSet;

use folio_types::{ObjectRef, RefKind, RefPattern, StorageKey};

use crate::document::IngestedDocument;
use crate::error::StoreResult;

/// Identity-addressed document store with a backreference index.
///
/// All implementations must satisfy these invariants:
/// - A key identifies at most one document.
/// - `backrefs(k)` contains exactly the keys whose stored forward refs
///   include `k`. A key nobody references has an empty set, not an error.
/// - `glob` returns keys in sorted order.
/// - Reads never observe a partially written document.
pub trait DocumentStore: Send + Sync {
    /// Read the bytes of a document.
    ///
    /// Returns `StoreError::NotFound` if no document is stored under `key`.
    fn get(&self, key: &StorageKey) -> StoreResult<Vec<u8>>;

    /// The set of documents that reference `key`.
    fn backrefs(&self, key: &ObjectRef) -> StoreResult<BTreeSet<ObjectRef>>;

    /// The documents referencing any key that matches `pattern`.
    ///
    /// Referenced keys need not be stored, so this reaches refs to objects
    /// that were never ingested (the same name in another version, say).
    fn backrefs_matching(&self, pattern: &RefPattern) -> StoreResult<BTreeSet<ObjectRef>>;

    /// All stored keys matching `pattern`, sorted.
    fn glob(&self, pattern: &RefPattern) -> StoreResult<Vec<StorageKey>>;

    /// Store a document and its forward refs.
    ///
    /// Writing an existing key replaces its bytes and forward refs; the
    /// backreference index is updated to match.
    fn put(&self, key: &StorageKey, data: &[u8], refs: &[ObjectRef]) -> StoreResult<()>;

    /// Whether a document is stored under `key`.
    fn exists(&self, key: &StorageKey) -> StoreResult<bool> {
        let pattern = RefPattern {
            package: key.package.clone(),
            version: key.version.clone(),
            kind: Some(key.kind),
            path: Some(key.path.clone()),
        };
        Ok(!self.glob(&pattern)?.is_empty())
    }

    /// Every `(package, version)` pair with at least one stored document.
    fn packages(&self) -> StoreResult<Vec<(String, String)>> {
        let mut pairs: Vec<(String, String)> = self
            .glob(&RefPattern::any())?
            .into_iter()
            .filter_map(|k| Some((k.package?, k.version?)))
            .collect();
        pairs.dedup();
        Ok(pairs)
    }

    /// Fetch and decode a document, attaching its backrefs.
    ///
    /// A missing document is `NotFound`; undecodable bytes are
    /// `MalformedDocument` carrying `key`.
    fn load(&self, key: &StorageKey) -> StoreResult<IngestedDocument> {
        let data = self.get(key)?;
        let mut doc = IngestedDocument::decode(key, &data)?;
        doc.backrefs = self.backrefs(key)?.into_iter().collect();
        Ok(doc)
    }

    /// Keys of every stored document of the given kind.
    fn keys_of_kind(&self, kind: RefKind) -> StoreResult<Vec<StorageKey>> {
        self.glob(&RefPattern::any().kind(kind))
    }
}
