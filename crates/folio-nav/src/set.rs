//! Sibling resolution by filtering the set of known refs.

use std::collections::{BTreeMap, BTreeSet};

use folio_types::{compare_versions, NavTarget, ObjectRef, RefKind};

use crate::siblings::{SiblingEntry, SiblingMap, SiblingResolver, TRAILING_LEVEL};

/// Resolves siblings by scanning a family of refs at every level.
///
/// Used when no prefix tree has been built. The family is first narrowed to
/// the newest version of each package (see [`compare_versions`]); each level
/// then keeps the dotted names under the current prefix, truncated to the
/// level's depth. Entries are reported as `api` refs of the package they were
/// found in.
#[derive(Clone, Debug)]
pub struct SetSiblings {
    family: Vec<ObjectRef>,
}

impl SetSiblings {
    pub fn new<'a>(family: impl IntoIterator<Item = &'a ObjectRef>) -> Self {
        let family: Vec<&ObjectRef> = family.into_iter().collect();

        let mut newest: BTreeMap<Option<&str>, &str> = BTreeMap::new();
        for r in family.iter().copied() {
            let Some(version) = r.version.as_deref() else {
                continue;
            };
            newest
                .entry(r.package.as_deref())
                .and_modify(|v| {
                    if compare_versions(version, *v).is_gt() {
                        *v = version;
                    }
                })
                .or_insert(version);
        }

        let family = family
            .into_iter()
            .filter(|r| newest.get(&r.package.as_deref()).copied() == r.version.as_deref())
            .cloned()
            .collect();
        Self { family }
    }

    /// The refs left after version collapsing.
    pub fn family(&self) -> &[ObjectRef] {
        &self.family
    }
}

impl SiblingResolver for SetSiblings {
    fn siblings(&self, path: &str) -> SiblingMap {
        let mut map = SiblingMap::new();
        let mut prefix = String::new();

        for (depth, segment) in path.split('.').chain([TRAILING_LEVEL]).enumerate() {
            let candidates: BTreeSet<ObjectRef> = self
                .family
                .iter()
                .filter(|r| r.path.starts_with(&prefix) && r.path.contains('.'))
                .map(|r| ObjectRef {
                    kind: RefKind::Api,
                    ..r.truncated(depth + 1)
                })
                .collect();
            let mut candidates: Vec<ObjectRef> = candidates.into_iter().collect();
            candidates.sort_by(|a, b| a.path.cmp(&b.path));

            let entries = candidates
                .into_iter()
                .map(|r| SiblingEntry::new(NavTarget::resolved(r)))
                .collect();
            map.push(segment, entries);

            prefix.push_str(segment);
            prefix.push('.');
        }

        map.pop_empty_trailing();
        map
    }
}
