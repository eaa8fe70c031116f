//! Inverted index from a referenced key to the documents that reference it.

use std::collections::{BTreeMap, BTreeSet};

use folio_types::{ObjectRef, RefPattern, StorageKey};

#[derive(Debug, Default)]
pub(crate) struct BackrefIndex {
    inverse: BTreeMap<ObjectRef, BTreeSet<StorageKey>>,
}

impl BackrefIndex {
    /// Record that `source` references each of `refs`.
    pub(crate) fn link(&mut self, source: &StorageKey, refs: &[ObjectRef]) {
        for target in refs {
            self.inverse
                .entry(target.clone())
                .or_default()
                .insert(source.clone());
        }
    }

    /// Forget that `source` references each of `refs`.
    pub(crate) fn unlink(&mut self, source: &StorageKey, refs: &[ObjectRef]) {
        for target in refs {
            if let Some(sources) = self.inverse.get_mut(target) {
                sources.remove(source);
                if sources.is_empty() {
                    self.inverse.remove(target);
                }
            }
        }
    }

    pub(crate) fn get(&self, target: &ObjectRef) -> BTreeSet<ObjectRef> {
        self.inverse.get(target).cloned().unwrap_or_default()
    }

    /// Union of the backrefs of every referenced key matching `pattern`.
    pub(crate) fn matching(&self, pattern: &RefPattern) -> BTreeSet<ObjectRef> {
        self.inverse
            .iter()
            .filter(|(target, _)| pattern.matches(target))
            .flat_map(|(_, sources)| sources.iter().cloned())
            .collect()
    }

    pub(crate) fn clear(&mut self) {
        self.inverse.clear();
    }
}
