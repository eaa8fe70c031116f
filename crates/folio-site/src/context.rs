//! Everything a page template needs for one document.

use std::collections::BTreeMap;

use serde::Serialize;

use folio_graph::VisualizationGraph;
use folio_nav::{Breadcrumb, SiblingMap};
use folio_store::IngestedDocument;
use folio_types::ObjectRef;

/// How a page lists the documents referencing it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "layout", content = "refs", rename_all = "snake_case")]
pub enum BackrefListing {
    Flat(Vec<ObjectRef>),
    /// Keyed by the referring document's top-level package.
    Grouped(BTreeMap<String, Vec<ObjectRef>>),
}

impl BackrefListing {
    /// Flat up to `threshold` refs, grouped above it.
    pub fn new(backrefs: Vec<ObjectRef>, threshold: usize) -> Self {
        if backrefs.len() <= threshold {
            return Self::Flat(backrefs);
        }
        let mut groups: BTreeMap<String, Vec<ObjectRef>> = BTreeMap::new();
        for r in backrefs {
            groups.entry(r.top_level().to_string()).or_default().push(r);
        }
        Self::Grouped(groups)
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Flat(refs) => refs.len(),
            Self::Grouped(groups) => groups.values().map(Vec::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct RenderContext {
    pub key: ObjectRef,
    pub qualname: String,
    /// Top-level package of the qualified name.
    pub module: String,
    pub version: Option<String>,
    pub document: IngestedDocument,
    pub siblings: SiblingMap,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub backrefs: BackrefListing,
    pub graph: VisualizationGraph,
    pub path_prefix: String,
    pub sidebar: bool,
}

impl RenderContext {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// One entry of the package navigation shown on example pages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PackageLink {
    /// The package's top-level API page.
    pub target: ObjectRef,
    pub label: String,
}

impl PackageLink {
    pub fn new(package: &str, version: &str) -> Self {
        Self {
            target: ObjectRef::api(package, version, package),
            label: package.to_string(),
        }
    }
}

/// Context of an example page: the document plus the package list.
#[derive(Clone, Debug, Serialize)]
pub struct ExampleContext {
    pub key: ObjectRef,
    pub document: IngestedDocument,
    pub packages: Vec<PackageLink>,
    pub path_prefix: String,
    pub sidebar: bool,
}

/// Any page the batch driver produces.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum PageContext {
    Module(RenderContext),
    Example(ExampleContext),
}

impl PageContext {
    pub fn key(&self) -> &ObjectRef {
        match self {
            Self::Module(ctx) => &ctx.key,
            Self::Example(ctx) => &ctx.key,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        match self {
            Self::Module(ctx) => ctx.to_json(),
            Self::Example(ctx) => serde_json::to_string(ctx),
        }
    }
}
