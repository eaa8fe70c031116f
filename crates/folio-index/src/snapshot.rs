use folio_store::DocumentStore;
use folio_types::ObjectRef;

use crate::corpus::CorpusIndex;
use crate::error::IndexResult;
use crate::tree::PrefixTree;

/// An immutable view of the corpus for one render batch.
///
/// Built once from the store and then only read. There is no way to rebuild
/// a snapshot in place; if the store changes, build a new snapshot and hand
/// the new one to subsequent calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorpusSnapshot {
    index: CorpusIndex,
    tree: PrefixTree,
}

impl CorpusSnapshot {
    /// Scan `store` and build the index and tree.
    pub fn build<S: DocumentStore + ?Sized>(store: &S) -> IndexResult<Self> {
        Ok(Self::from_index(CorpusIndex::build(store)?))
    }

    /// Wrap an existing index, deriving the tree from its paths.
    pub fn from_index(index: CorpusIndex) -> Self {
        let tree = PrefixTree::from_paths(index.paths());
        Self { index, tree }
    }

    pub fn index(&self) -> &CorpusIndex {
        &self.index
    }

    pub fn tree(&self) -> &PrefixTree {
        &self.tree
    }

    /// The identity indexed under `path`.
    pub fn resolve(&self, path: &str) -> Option<&ObjectRef> {
        self.index.resolve(path)
    }
}
