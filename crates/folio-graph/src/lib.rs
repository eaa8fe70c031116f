//! Relationship graphs for Folio.
//!
//! Each rendered page embeds a small force-directed graph of the objects it
//! references and is referenced by. [`GraphBuilder`] collects that
//! neighbourhood from the store, weights each neighbour by how often it is
//! referenced, prunes light nodes until the graph fits its node budget, and
//! resolves a page URL per node.
//!
//! The graph is advisory: every lookup failure degrades to a missing edge or
//! a node without a URL rather than an error.

pub mod builder;
pub mod graph;

pub use builder::{GraphBuilder, DEFAULT_MAX_NODES};
pub use graph::{GraphLink, GraphNode, VisualizationGraph};
