use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use folio_types::{ObjectRef, RefPattern, StorageKey};

use crate::backref::BackrefIndex;
use crate::error::{StoreError, StoreResult};
use crate::traits::DocumentStore;

#[derive(Debug, Clone)]
struct Entry {
    data: Vec<u8>,
    refs: Vec<ObjectRef>,
}

#[derive(Debug, Default)]
struct Inner {
    documents: BTreeMap<StorageKey, Entry>,
    backrefs: BackrefIndex,
}

/// In-memory, `BTreeMap`-based document store.
///
/// Intended for tests and embedding. Documents and the backreference index
/// live behind one `RwLock` so a reader never sees bytes without their index
/// entries.
pub struct InMemoryDocumentStore {
    inner: RwLock<Inner>,
}

impl InMemoryDocumentStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Number of documents currently stored.
    pub fn len(&self) -> usize {
        self.inner.read().expect("lock poisoned").documents.len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.read().expect("lock poisoned").documents.is_empty()
    }

    /// Total bytes across all stored documents.
    pub fn total_bytes(&self) -> u64 {
        self.inner
            .read()
            .expect("lock poisoned")
            .documents
            .values()
            .map(|e| e.data.len() as u64)
            .sum()
    }

    /// Remove every document and index entry.
    pub fn clear(&self) {
        let mut inner = self.inner.write().expect("lock poisoned");
        inner.documents.clear();
        inner.backrefs.clear();
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn get(&self, key: &StorageKey) -> StoreResult<Vec<u8>> {
        let inner = self.inner.read().expect("lock poisoned");
        inner
            .documents
            .get(key)
            .map(|e| e.data.clone())
            .ok_or_else(|| StoreError::NotFound(key.clone()))
    }

    fn backrefs(&self, key: &ObjectRef) -> StoreResult<BTreeSet<ObjectRef>> {
        let inner = self.inner.read().expect("lock poisoned");
        Ok(inner.backrefs.get(key))
    }

    fn backrefs_matching(&self, pattern: &RefPattern) -> StoreResult<BTreeSet<ObjectRef>> {
        let inner = self.inner.read().expect("lock poisoned");
        Ok(inner.backrefs.matching(pattern))
    }

    fn glob(&self, pattern: &RefPattern) -> StoreResult<Vec<StorageKey>> {
        let inner = self.inner.read().expect("lock poisoned");
        Ok(inner
            .documents
            .keys()
            .filter(|k| pattern.matches(k))
            .cloned()
            .collect())
    }

    fn put(&self, key: &StorageKey, data: &[u8], refs: &[ObjectRef]) -> StoreResult<()> {
        let mut inner = self.inner.write().expect("lock poisoned");
        let entry = Entry {
            data: data.to_vec(),
            refs: refs.to_vec(),
        };
        if let Some(previous) = inner.documents.insert(key.clone(), entry) {
            inner.backrefs.unlink(key, &previous.refs);
        }
        inner.backrefs.link(key, refs);
        Ok(())
    }

    fn exists(&self, key: &StorageKey) -> StoreResult<bool> {
        let inner = self.inner.read().expect("lock poisoned");
        Ok(inner.documents.contains_key(key))
    }
}

impl std::fmt::Debug for InMemoryDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len();
        f.debug_struct("InMemoryDocumentStore")
            .field("document_count", &count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::IngestedDocument;
    use folio_types::RefKind;

    fn key(path: &str) -> StorageKey {
        ObjectRef::module("pkg", "1.0", path)
    }

    fn put_doc(store: &InMemoryDocumentStore, path: &str, refs: &[&str]) {
        let mut doc = IngestedDocument::new(path);
        doc.refs = refs.iter().map(|r| key(r)).collect();
        store.put(&key(path), &doc.encode().unwrap(), &doc.refs).unwrap();
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    #[test]
    fn put_and_get() {
        let store = InMemoryDocumentStore::new();
        store.put(&key("pkg.a"), b"bytes", &[]).unwrap();
        assert_eq!(store.get(&key("pkg.a")).unwrap(), b"bytes");
    }

    #[test]
    fn get_missing_is_not_found() {
        let store = InMemoryDocumentStore::new();
        match store.get(&key("pkg.missing")) {
            Err(StoreError::NotFound(k)) => assert_eq!(k, key("pkg.missing")),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn load_attaches_backrefs() {
        let store = InMemoryDocumentStore::new();
        put_doc(&store, "pkg.a", &["pkg.b"]);
        put_doc(&store, "pkg.b", &[]);
        let doc = store.load(&key("pkg.b")).unwrap();
        assert_eq!(doc.backrefs, vec![key("pkg.a")]);
    }

    #[test]
    fn load_malformed_reports_key() {
        let store = InMemoryDocumentStore::new();
        store.put(&key("pkg.bad"), b"{", &[]).unwrap();
        assert!(matches!(
            store.load(&key("pkg.bad")),
            Err(StoreError::MalformedDocument { key: k, .. }) if k == key("pkg.bad")
        ));
    }

    // -----------------------------------------------------------------------
    // Backreferences
    // -----------------------------------------------------------------------

    #[test]
    fn unreferenced_key_has_empty_backrefs() {
        let store = InMemoryDocumentStore::new();
        assert!(store.backrefs(&key("pkg.nobody")).unwrap().is_empty());
    }

    #[test]
    fn backrefs_to_unstored_keys_are_searchable() {
        let store = InMemoryDocumentStore::new();
        put_doc(&store, "pkg.a", &["pkg.ghost"]);
        assert!(!store.exists(&key("pkg.ghost")).unwrap());
        let found = store
            .backrefs_matching(&RefPattern::any().path("pkg.ghost"))
            .unwrap();
        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec![key("pkg.a")]);
    }

    #[test]
    fn rewrite_replaces_backrefs() {
        let store = InMemoryDocumentStore::new();
        put_doc(&store, "pkg.a", &["pkg.b"]);
        assert_eq!(store.backrefs(&key("pkg.b")).unwrap().len(), 1);

        put_doc(&store, "pkg.a", &["pkg.c"]);
        assert!(store.backrefs(&key("pkg.b")).unwrap().is_empty());
        assert_eq!(store.backrefs(&key("pkg.c")).unwrap().len(), 1);
        assert_eq!(store.len(), 1);
    }

    // -----------------------------------------------------------------------
    // Glob
    // -----------------------------------------------------------------------

    #[test]
    fn glob_filters_and_sorts() {
        let store = InMemoryDocumentStore::new();
        store.put(&key("pkg.z"), b"", &[]).unwrap();
        store.put(&key("pkg.a"), b"", &[]).unwrap();
        let asset = ObjectRef::new("pkg", "1.0", RefKind::Assets, "fig.png");
        store.put(&asset, b"png", &[]).unwrap();

        let modules = store.keys_of_kind(RefKind::Module).unwrap();
        assert_eq!(modules, vec![key("pkg.a"), key("pkg.z")]);

        let assets = store.glob(&RefPattern::any().kind(RefKind::Assets)).unwrap();
        assert_eq!(assets, vec![asset]);
    }

    #[test]
    fn packages_are_deduplicated() {
        let store = InMemoryDocumentStore::new();
        store.put(&key("pkg.a"), b"", &[]).unwrap();
        store.put(&key("pkg.b"), b"", &[]).unwrap();
        store
            .put(&ObjectRef::module("other", "2.0", "other"), b"", &[])
            .unwrap();
        assert_eq!(
            store.packages().unwrap(),
            vec![
                ("other".to_string(), "2.0".to_string()),
                ("pkg".to_string(), "1.0".to_string())
            ]
        );
    }

    #[test]
    fn exists_and_clear() {
        let store = InMemoryDocumentStore::new();
        store.put(&key("pkg.a"), b"12345", &[]).unwrap();
        assert!(store.exists(&key("pkg.a")).unwrap());
        assert_eq!(store.total_bytes(), 5);
        store.clear();
        assert!(store.is_empty());
        assert!(!store.exists(&key("pkg.a")).unwrap());
    }

    #[test]
    fn debug_format() {
        let store = InMemoryDocumentStore::new();
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryDocumentStore"));
        assert!(debug.contains("document_count"));
    }
}
