//! Breadcrumb links derived from a sibling map.

use serde::Serialize;

use crate::siblings::SiblingMap;

/// One breadcrumb: the level's segment and the dotted prefix it links to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub segment: String,
    pub link: String,
}

/// Accumulate level segments into link targets: `a`, `a.b`, `a.b.+`.
pub fn breadcrumbs(map: &SiblingMap) -> Vec<Breadcrumb> {
    let mut acc = String::new();
    map.segments()
        .map(|segment| {
            if !acc.is_empty() {
                acc.push('.');
            }
            acc.push_str(segment);
            Breadcrumb {
                segment: segment.to_string(),
                link: acc.clone(),
            }
        })
        .collect()
}
