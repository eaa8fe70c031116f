use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use folio_store::{DocumentStore, IngestedDocument};
use folio_types::{to_url, ObjectRef, DEFAULT_PATH_PREFIX};

use crate::graph::{GraphLink, GraphNode, VisualizationGraph};

/// Default node budget for a relationship graph.
pub const DEFAULT_MAX_NODES: usize = 50;

const BASE_DIAMETER: f64 = 8.0;

/// Builds the relationship graph around one document.
///
/// Nodes are the document's forward refs and backrefs, keyed by qualified
/// path. A node's weight is the number of documents referencing it. When
/// there are more than `max_nodes` nodes, whole weight classes are dropped
/// from the lightest up until fewer than `max_nodes` remain; nodes sharing a
/// weight are always kept or dropped together, so the result does not depend
/// on enumeration order.
///
/// The target itself is never a node, and links touching it are left out:
/// the page is the implicit centre of its own graph.
#[derive(Clone, Debug)]
pub struct GraphBuilder {
    max_nodes: usize,
    path_prefix: String,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self {
            max_nodes: DEFAULT_MAX_NODES,
            path_prefix: DEFAULT_PATH_PREFIX.to_string(),
        }
    }
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub fn with_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = prefix.into();
        self
    }

    pub fn max_nodes(&self) -> usize {
        self.max_nodes
    }

    /// Graph for a loaded document stored under `key`.
    pub fn build_for<S: DocumentStore + ?Sized>(
        &self,
        store: &S,
        key: &ObjectRef,
        doc: &IngestedDocument,
    ) -> VisualizationGraph {
        self.build(store, key, &doc.refs, &doc.backrefs)
    }

    /// Graph for `target` given its forward refs and backrefs.
    pub fn build<S: DocumentStore + ?Sized>(
        &self,
        store: &S,
        target: &ObjectRef,
        refs: &[ObjectRef],
        backrefs: &[ObjectRef],
    ) -> VisualizationGraph {
        let mut weights: BTreeMap<String, usize> = BTreeMap::new();
        let mut identities: BTreeMap<String, BTreeSet<ObjectRef>> = BTreeMap::new();
        let mut edges: Vec<(String, String)> = Vec::new();

        for candidate in backrefs.iter().chain(refs) {
            identities
                .entry(candidate.path.clone())
                .or_default()
                .insert(candidate.clone());

            let neighbours = store.backrefs(candidate).unwrap_or_else(|e| {
                warn!(key = %candidate, error = %e, "backref lookup failed; treating as unreferenced");
                BTreeSet::new()
            });
            weights.insert(candidate.path.clone(), neighbours.len());

            for neighbour in neighbours {
                edges.push((candidate.path.clone(), neighbour.path.clone()));
                identities
                    .entry(neighbour.path.clone())
                    .or_default()
                    .insert(neighbour);
            }
        }

        prune(&mut weights, self.max_nodes);
        weights.remove(&target.path);

        let ids: BTreeMap<&str, usize> = weights
            .keys()
            .enumerate()
            .map(|(i, path)| (path.as_str(), i + 1))
            .collect();

        let links = edges
            .iter()
            .enumerate()
            .filter(|(_, (from, to))| from != to)
            .filter_map(|(i, (from, to))| {
                Some(GraphLink {
                    source: *ids.get(from.as_str())?,
                    target: *ids.get(to.as_str())?,
                    id: i,
                })
            })
            .collect();

        let nodes = weights
            .iter()
            .map(|(path, weight)| GraphNode {
                id: ids[path.as_str()],
                diameter: BASE_DIAMETER + (*weight as f64).sqrt(),
                label: path.clone(),
                module: path.split('.').next().unwrap_or_default().to_string(),
                url: identities.get(path).and_then(|known| self.latest_url(known)),
            })
            .collect();

        VisualizationGraph { nodes, links }
    }

    fn latest_url(&self, identities: &BTreeSet<ObjectRef>) -> Option<String> {
        let latest = identities
            .iter()
            .filter(|r| is_addressable(r))
            .max_by(|a, b| a.cmp_by_version(b))?;
        to_url(latest, &self.path_prefix).ok()
    }
}

/// Identities with a real package and version; placeholders are skipped.
fn is_addressable(r: &ObjectRef) -> bool {
    let real = |s: &Option<String>| s.as_deref().is_some_and(|s| !s.starts_with('?'));
    real(&r.package) && real(&r.version)
}

/// Drop whole weight classes, lightest first, until fewer than `max_nodes`
/// nodes remain. Does nothing if the graph already fits.
fn prune(weights: &mut BTreeMap<String, usize>, max_nodes: usize) {
    if weights.len() <= max_nodes {
        return;
    }
    let thresholds: BTreeSet<usize> = weights.values().copied().collect();
    for threshold in thresholds {
        let before = weights.len();
        weights.retain(|_, w| *w > threshold);
        debug!(before, after = weights.len(), threshold, "pruned graph nodes");
        if weights.len() < max_nodes {
            break;
        }
    }
}
