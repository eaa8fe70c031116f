//! Sibling maps and the resolver interface.

use serde::Serialize;

use folio_types::NavTarget;

/// Segment used for the level listing the children of the target itself.
pub const TRAILING_LEVEL: &str = "+";

/// One navigable entry at a level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SiblingEntry {
    pub target: NavTarget,
    /// Last segment of the entry's path, used as the menu label.
    pub short_name: String,
}

impl SiblingEntry {
    pub fn new(target: NavTarget) -> Self {
        let short_name = target.path().rsplit('.').next().unwrap_or_default().to_string();
        Self { target, short_name }
    }

    pub fn path(&self) -> &str {
        self.target.path()
    }
}

/// The entries offered at one level of a qualified name.
///
/// For `numpy.linalg.norm`, the level with segment `linalg` lists every child
/// of `numpy` (`numpy.fft`, `numpy.linalg`, ...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SiblingLevel {
    pub segment: String,
    pub entries: Vec<SiblingEntry>,
}

impl SiblingLevel {
    pub fn is_trailing(&self) -> bool {
        self.segment == TRAILING_LEVEL
    }

    /// Paths of the entries that resolved to a real identity.
    pub fn resolved_paths(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| !e.target.is_placeholder())
            .map(SiblingEntry::path)
    }
}

/// Per-level navigation for one qualified name, ordered root to leaf.
///
/// Levels are kept in a `Vec` rather than keyed by segment: a name such as
/// `pkg.pkg` repeats a segment and both levels must survive.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SiblingMap {
    levels: Vec<SiblingLevel>,
}

impl SiblingMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, segment: &str, entries: Vec<SiblingEntry>) {
        self.levels.push(SiblingLevel {
            segment: segment.to_string(),
            entries,
        });
    }

    pub(crate) fn pop_empty_trailing(&mut self) {
        if self
            .levels
            .last()
            .is_some_and(|l| l.is_trailing() && l.entries.is_empty())
        {
            self.levels.pop();
        }
    }

    pub fn levels(&self) -> &[SiblingLevel] {
        &self.levels
    }

    /// Level segments in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.levels.iter().map(|l| l.segment.as_str())
    }

    /// The level listing the target's children, if present.
    pub fn trailing(&self) -> Option<&SiblingLevel> {
        self.levels.last().filter(|l| l.is_trailing())
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Computes the sibling map of a qualified name.
///
/// Implementations differ in what they precompute, not in what they model:
/// given the same corpus they must agree on the resolved entries of every
/// level both produce.
pub trait SiblingResolver {
    fn siblings(&self, path: &str) -> SiblingMap;
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_types::ObjectRef;

    #[test]
    fn entry_short_name_is_last_segment() {
        let e = SiblingEntry::new(NavTarget::resolved(ObjectRef::api("p", "1", "p.mod.Cls")));
        assert_eq!(e.short_name, "Cls");
        let p = SiblingEntry::new(NavTarget::placeholder("top"));
        assert_eq!(p.short_name, "top");
    }

    #[test]
    fn only_an_empty_trailing_level_is_dropped() {
        let mut map = SiblingMap::new();
        map.push("a", Vec::new());
        map.pop_empty_trailing();
        assert_eq!(map.len(), 1);

        map.push(TRAILING_LEVEL, Vec::new());
        map.pop_empty_trailing();
        assert_eq!(map.len(), 1);
        assert!(map.trailing().is_none());
    }

    #[test]
    fn serializes_as_a_list_of_levels() {
        let mut map = SiblingMap::new();
        map.push("p", vec![SiblingEntry::new(NavTarget::placeholder("p"))]);
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json[0]["segment"], "p");
        assert_eq!(json[0]["entries"][0]["target"]["status"], "placeholder");
    }
}
