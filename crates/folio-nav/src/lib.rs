//! Sibling navigation for Folio.
//!
//! Every page shows a breadcrumb of its qualified name where each segment
//! opens a menu of that segment's siblings, plus a final `+` menu listing the
//! page's own children. For `IPython.lib.display`:
//!
//! - `IPython` lists the other top-level packages (`numpy`, `scipy`, ...)
//! - `lib` lists the children of `IPython` (`core`, `lib`, `terminal`, ...)
//! - `display` lists the children of `IPython.lib`
//! - `+` lists the children of `IPython.lib.display`
//!
//! Two strategies compute the same [`SiblingMap`] behind [`SiblingResolver`]:
//!
//! - [`TreeSiblings`] -- walks a prebuilt prefix tree; used per page
//! - [`SetSiblings`] -- filters the known-ref set; used when no tree exists

pub mod breadcrumbs;
pub mod set;
pub mod siblings;
pub mod tree;

pub use breadcrumbs::{breadcrumbs, Breadcrumb};
pub use set::SetSiblings;
pub use siblings::{SiblingEntry, SiblingLevel, SiblingMap, SiblingResolver, TRAILING_LEVEL};
pub use tree::TreeSiblings;
