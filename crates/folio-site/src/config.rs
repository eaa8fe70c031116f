use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use folio_graph::DEFAULT_MAX_NODES;
use folio_types::DEFAULT_PATH_PREFIX;

use crate::error::SiteResult;

/// Above this many backrefs a page lists them grouped by top-level package.
pub const DEFAULT_BACKREF_GROUP_THRESHOLD: usize = 30;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Root of the ingested document tree.
    pub ingest_dir: PathBuf,
    /// Where rendered contexts are written; `None` means dry run.
    pub output_dir: Option<PathBuf>,
    pub path_prefix: String,
    pub max_graph_nodes: usize,
    pub backref_group_threshold: usize,
    pub sidebar: bool,
    /// Render in random order, to catch accidental dependence on order.
    pub shuffle: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            ingest_dir: PathBuf::from("ingest"),
            output_dir: None,
            path_prefix: DEFAULT_PATH_PREFIX.to_string(),
            max_graph_nodes: DEFAULT_MAX_NODES,
            backref_group_threshold: DEFAULT_BACKREF_GROUP_THRESHOLD,
            sidebar: false,
            shuffle: false,
        }
    }
}

impl SiteConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> SiteResult<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> SiteResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
