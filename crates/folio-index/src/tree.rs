//! Prefix tree over dotted qualified names.
//!
//! `numpy.linalg.norm` and `numpy.linalg.svd` share the `numpy` and
//! `numpy.linalg` nodes. Nodes carry no payload; a name is in the tree iff
//! every one of its segments can be followed from the root.

use std::collections::BTreeMap;

/// A node of the prefix tree. The root is a node with no name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrefixTree {
    children: BTreeMap<String, PrefixTree>,
}

impl PrefixTree {
    /// An empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from qualified names. The result does not depend on the
    /// order of `paths`.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = Self::new();
        for path in paths {
            tree.insert(path.as_ref());
        }
        tree
    }

    /// Insert a qualified name, creating intermediate nodes as needed.
    pub fn insert(&mut self, path: &str) {
        let mut node = self;
        for segment in path.split('.') {
            node = node.children.entry(segment.to_string()).or_default();
        }
    }

    /// The child node for `segment`.
    pub fn child(&self, segment: &str) -> Option<&PrefixTree> {
        self.children.get(segment)
    }

    /// Child segments and their subtrees, sorted by segment.
    pub fn children(&self) -> impl Iterator<Item = (&str, &PrefixTree)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Child segment names, sorted.
    pub fn child_names(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    /// Whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Follow `path` from this node. `None` if any segment is missing.
    pub fn descend(&self, path: &str) -> Option<&PrefixTree> {
        path.split('.').try_fold(self, |node, segment| node.child(segment))
    }

    /// Whether `path` can be followed from this node.
    pub fn contains(&self, path: &str) -> bool {
        self.descend(path).is_some()
    }

    /// Number of nodes below this one.
    pub fn node_count(&self) -> usize {
        self.children
            .values()
            .map(|c| 1 + c.node_count())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn shared_prefixes_merge() {
        let tree = PrefixTree::from_paths(["numpy.linalg.norm", "numpy.linalg.svd", "numpy"]);
        let linalg = tree.descend("numpy.linalg").unwrap();
        assert_eq!(linalg.child_names().collect::<Vec<_>>(), vec!["norm", "svd"]);
        assert_eq!(tree.node_count(), 4);
        assert!(tree.descend("numpy.linalg.norm").unwrap().is_leaf());
    }

    #[test]
    fn unknown_paths_fail_to_descend() {
        let tree = PrefixTree::from_paths(["a.b.c"]);
        assert!(tree.contains("a.b"));
        assert!(!tree.contains("a.c"));
        assert!(!tree.contains("a.b.c.d"));
    }

    #[test]
    fn empty_tree() {
        let tree = PrefixTree::new();
        assert!(tree.is_leaf());
        assert!(!tree.contains("x"));
        assert_eq!(tree.children().count(), 0);
    }

    proptest! {
        #[test]
        fn every_inserted_path_descends(paths in prop::collection::vec("[a-c]{1,2}(\\.[a-c]{1,2}){0,4}", 0..30)) {
            let tree = PrefixTree::from_paths(&paths);
            for p in &paths {
                prop_assert!(tree.contains(p));
                let segments: Vec<&str> = p.split('.').collect();
                for depth in 1..=segments.len() {
                    prop_assert!(tree.contains(&segments[..depth].join(".")));
                }
            }
        }

        #[test]
        fn insertion_order_does_not_matter(mut paths in prop::collection::vec("[a-c]{1,2}(\\.[a-c]{1,2}){0,3}", 0..20)) {
            let forward = PrefixTree::from_paths(&paths);
            paths.reverse();
            prop_assert_eq!(forward, PrefixTree::from_paths(&paths));
        }
    }
}
