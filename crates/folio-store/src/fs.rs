//! Filesystem-backed document store.
//!
//! Layout under the ingest root:
//!
//! ```text
//! <root>/<package>/<version>/<kind>/<path>             document bytes
//! <root>/<package>/<version>/<kind>/<path>.refs.json   forward refs (JSON list)
//! ```
//!
//! The backreference index is not persisted; it is rebuilt from the
//! `.refs.json` sidecars when the store is opened.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use folio_types::{ObjectRef, RefKind, RefPattern, StorageKey};

use crate::backref::BackrefIndex;
use crate::error::{StoreError, StoreResult};
use crate::traits::DocumentStore;

/// Suffix of the forward-ref sidecar written next to each document.
pub const REFS_SUFFIX: &str = ".refs.json";

/// Name prefix of in-flight writes; a crash can leave these behind.
const PARTIAL_PREFIX: &str = ".folio-partial-";

#[derive(Debug, Default)]
struct Inner {
    refs: BTreeMap<StorageKey, Vec<ObjectRef>>,
    backrefs: BackrefIndex,
}

/// A [`DocumentStore`] over a directory tree.
#[derive(Debug)]
pub struct FsDocumentStore {
    root: PathBuf,
    inner: RwLock<Inner>,
}

impl FsDocumentStore {
    /// Open (or create) a store rooted at `root`, scanning existing documents.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        let mut inner = Inner::default();

        for entry in WalkDir::new(&root).min_depth(4).max_depth(4) {
            let entry = entry.map_err(|e| StoreError::Io(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(key) = key_for_path(&root, entry.path()) else {
                continue;
            };
            let refs = read_sidecar(&sidecar_path(entry.path()))?;
            inner.backrefs.link(&key, &refs);
            inner.refs.insert(key, refs);
        }

        info!(root = %root.display(), documents = inner.refs.len(), "opened document store");
        Ok(Self {
            root,
            inner: RwLock::new(inner),
        })
    }

    /// The ingest root this store reads from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of documents in the store.
    pub fn len(&self) -> usize {
        self.inner.read().expect("lock poisoned").refs.len()
    }

    /// Returns `true` if the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn document_path(&self, key: &StorageKey) -> StoreResult<PathBuf> {
        let invalid = |reason: &str| StoreError::InvalidKey {
            key: key.clone(),
            reason: reason.to_string(),
        };
        let package = key.package.as_deref().ok_or_else(|| invalid("missing package"))?;
        let version = key.version.as_deref().ok_or_else(|| invalid("missing version"))?;
        for component in [package, version, key.path.as_str()] {
            if !is_safe_component(component) {
                return Err(invalid("component is not a single path segment"));
            }
        }
        if key.path.ends_with(REFS_SUFFIX) {
            return Err(invalid("path collides with the refs sidecar suffix"));
        }
        if key.path.starts_with(PARTIAL_PREFIX) {
            return Err(invalid("path collides with the partial-write prefix"));
        }
        Ok(self
            .root
            .join(package)
            .join(version)
            .join(key.kind.as_str())
            .join(&key.path))
    }
}

impl DocumentStore for FsDocumentStore {
    fn get(&self, key: &StorageKey) -> StoreResult<Vec<u8>> {
        let path = self.document_path(key)?;
        match fs::read(&path) {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(key.clone())),
            Err(e) => Err(e.into()),
        }
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
            .refs
            .keys()
            .filter(|k| pattern.matches(k))
            .cloned()
            .collect())
    }

    fn put(&self, key: &StorageKey, data: &[u8], refs: &[ObjectRef]) -> StoreResult<()> {
        let path = self.document_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let sidecar = serde_json::to_vec(refs).map_err(|e| StoreError::Serialization(e.to_string()))?;
        write_atomic(&sidecar_path(&path), &sidecar)?;
        write_atomic(&path, data)?;

        let mut inner = self.inner.write().expect("lock poisoned");
        if let Some(previous) = inner.refs.insert(key.clone(), refs.to_vec()) {
            inner.backrefs.unlink(key, &previous);
        }
        inner.backrefs.link(key, refs);
        debug!(key = %key, bytes = data.len(), refs = refs.len(), "stored document");
        Ok(())
    }

    fn exists(&self, key: &StorageKey) -> StoreResult<bool> {
        let inner = self.inner.read().expect("lock poisoned");
        Ok(inner.refs.contains_key(key))
    }
}

fn is_safe_component(s: &str) -> bool {
    !s.is_empty() && s != "." && s != ".." && !s.contains('/') && !s.contains('\\')
}

fn sidecar_path(document: &Path) -> PathBuf {
    let mut name = document.as_os_str().to_os_string();
    name.push(REFS_SUFFIX);
    PathBuf::from(name)
}

fn key_for_path(root: &Path, path: &Path) -> Option<StorageKey> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<&str> = relative.iter().filter_map(|c| c.to_str()).collect();
    let [package, version, kind, name] = parts.as_slice() else {
        return None;
    };
    if name.ends_with(REFS_SUFFIX) || name.starts_with(PARTIAL_PREFIX) {
        return None;
    }
    match kind.parse::<RefKind>() {
        Ok(kind) => Some(ObjectRef::new(*package, *version, kind, *name)),
        Err(_) => {
            warn!(path = %path.display(), "skipping file under unknown kind directory");
            None
        }
    }
}

fn read_sidecar(path: &Path) -> StoreResult<Vec<ObjectRef>> {
    match fs::read(path) {
        Ok(data) => serde_json::from_slice(&data).map_err(|e| {
            StoreError::Serialization(format!("{}: {e}", path.display()))
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

fn write_atomic(path: &Path, data: &[u8]) -> StoreResult<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    let mut file = tempfile::Builder::new()
        .prefix(PARTIAL_PREFIX)
        .tempfile_in(parent)?;
    file.write_all(data)?;
    file.persist(path).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}
