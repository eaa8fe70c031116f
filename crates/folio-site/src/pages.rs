//! Auxiliary pages: the not-found page and the figure gallery.

use std::collections::BTreeMap;

use serde::Serialize;

use folio_types::ObjectRef;

/// Nested browse tree of the known names under a missing one.
///
/// Children are keyed by the next path segment; `link` is set on nodes that
/// correspond to a documented name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MissingTree {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, MissingTree>,
}

impl MissingTree {
    /// Insert `path` under its segments past the first `base_depth`.
    pub(crate) fn insert(&mut self, base_depth: usize, path: &str) {
        let mut node = self;
        for segment in path.split('.').skip(base_depth) {
            node = node.children.entry(segment.to_string()).or_default();
        }
        node.link = Some(path.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.link.is_none() && self.children.is_empty()
    }
}

/// What the site serves for a qualified name with no document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MissingPage {
    pub qualname: String,
    /// Top-level package of the requested name.
    pub module: String,
    pub tree: MissingTree,
    /// Documents referencing the name in any version.
    pub backrefs: Vec<ObjectRef>,
}

/// One figure in a package gallery.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct GalleryEntry {
    pub image_url: String,
    /// The page showing the figure.
    pub page_url: String,
    /// Path of that page's document.
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_nests_remaining_segments() {
        let mut tree = MissingTree::default();
        tree.insert(2, "pkg.sub.a.f");
        tree.insert(2, "pkg.sub.a");
        tree.insert(2, "pkg.sub.b");

        assert_eq!(tree.children.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        let a = &tree.children["a"];
        assert_eq!(a.link.as_deref(), Some("pkg.sub.a"));
        assert_eq!(a.children["f"].link.as_deref(), Some("pkg.sub.a.f"));
        assert!(tree.link.is_none());
    }

    #[test]
    fn exact_name_links_the_root() {
        let mut tree = MissingTree::default();
        tree.insert(2, "pkg.sub");
        assert_eq!(tree.link.as_deref(), Some("pkg.sub"));
        assert!(tree.children.is_empty());
    }
}
