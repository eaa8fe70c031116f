//! Sibling resolution against a prebuilt prefix tree.

use std::collections::BTreeMap;

use tracing::trace;

use folio_index::{CorpusSnapshot, PrefixTree};
use folio_types::{NavTarget, ObjectRef};

use crate::siblings::{SiblingEntry, SiblingMap, SiblingResolver, TRAILING_LEVEL};

/// Resolves siblings by walking a [`PrefixTree`], one level per segment.
///
/// This is the per-page strategy: with the tree and name map built once for
/// the batch, each call costs one tree step per segment. Candidates missing
/// from the name map (a class documented only through `__init__`, an object
/// stored under a different qualified name) become placeholders.
#[derive(Clone, Copy, Debug)]
pub struct TreeSiblings<'a> {
    tree: &'a PrefixTree,
    names: &'a BTreeMap<String, ObjectRef>,
}

impl<'a> TreeSiblings<'a> {
    pub fn new(snapshot: &'a CorpusSnapshot) -> Self {
        Self::from_parts(snapshot.tree(), snapshot.index().name_map())
    }

    pub fn from_parts(tree: &'a PrefixTree, names: &'a BTreeMap<String, ObjectRef>) -> Self {
        Self { tree, names }
    }

    fn lookup(&self, path: String) -> NavTarget {
        match self.names.get(&path) {
            Some(r) => NavTarget::resolved(r.clone()),
            None => {
                trace!(path = %path, "sibling has no document; using placeholder");
                NavTarget::placeholder(path)
            }
        }
    }
}

impl SiblingResolver for TreeSiblings<'_> {
    fn siblings(&self, path: &str) -> SiblingMap {
        let mut map = SiblingMap::new();
        let mut prefix = String::new();
        let mut node = Some(self.tree);

        for segment in path.split('.').chain([TRAILING_LEVEL]) {
            let Some(current) = node else { break };
            let entries: Vec<SiblingEntry> = current
                .child_names()
                .filter(|name| *name != TRAILING_LEVEL)
                .map(|name| SiblingEntry::new(self.lookup(format!("{prefix}{name}"))))
                .collect();
            if entries.is_empty() {
                break;
            }
            map.push(segment, entries);

            node = current.child(segment);
            prefix.push_str(segment);
            prefix.push('.');
        }
        map
    }
}
