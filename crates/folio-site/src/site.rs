use std::collections::BTreeSet;
use std::ops::ControlFlow;
use std::sync::Arc;

use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::{debug, info, warn};

use folio_graph::GraphBuilder;
use folio_index::CorpusSnapshot;
use folio_nav::{breadcrumbs, SetSiblings, SiblingMap, SiblingResolver, TreeSiblings};
use folio_store::{DocumentStore, FsDocumentStore};
use folio_types::{to_url, ObjectRef, RefKind, RefPattern, StorageKey};

use crate::config::SiteConfig;
use crate::context::{BackrefListing, ExampleContext, PackageLink, PageContext, RenderContext};
use crate::error::SiteResult;
use crate::pages::{GalleryEntry, MissingPage, MissingTree};

/// Log batch progress every this many documents.
const PROGRESS_EVERY: usize = 100;

/// Outcome of a [`Site::render_all`] batch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RenderSummary {
    pub total: usize,
    pub rendered: usize,
    pub failed: usize,
    /// The sink asked to stop before every document was visited.
    pub stopped: bool,
}

/// A documentation site: a store, its configuration, and the corpus snapshot
/// navigation is computed against.
pub struct Site<S> {
    store: S,
    config: SiteConfig,
    snapshot: Arc<CorpusSnapshot>,
    graphs: GraphBuilder,
}

impl Site<FsDocumentStore> {
    /// Open the store under `config.ingest_dir` and index it.
    pub fn open(config: SiteConfig) -> SiteResult<Self> {
        let store = FsDocumentStore::open(&config.ingest_dir)?;
        Self::new(store, config)
    }
}

impl<S: DocumentStore> Site<S> {
    /// Build the corpus snapshot for `store`. Fails if the store cannot be
    /// enumerated or holds an unusable key.
    pub fn new(store: S, config: SiteConfig) -> SiteResult<Self> {
        let snapshot = Arc::new(CorpusSnapshot::build(&store)?);
        let graphs = GraphBuilder::new()
            .with_max_nodes(config.max_graph_nodes)
            .with_path_prefix(config.path_prefix.clone());
        Ok(Self {
            store,
            config,
            snapshot,
            graphs,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// The current snapshot. Holders keep seeing it after a [`refresh`].
    ///
    /// [`refresh`]: Site::refresh
    pub fn snapshot(&self) -> Arc<CorpusSnapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Rescan the store and swap in a new snapshot.
    pub fn refresh(&mut self) -> SiteResult<()> {
        self.snapshot = Arc::new(CorpusSnapshot::build(&self.store)?);
        Ok(())
    }

    // ---- Navigation ----

    /// Per-page siblings from the prefix tree.
    pub fn siblings(&self, qualname: &str) -> SiblingMap {
        TreeSiblings::new(&self.snapshot).siblings(qualname)
    }

    /// Siblings computed by scanning every known ref.
    pub fn siblings_bulk(&self, qualname: &str) -> SiblingMap {
        SetSiblings::new(self.snapshot.index().known_refs()).siblings(qualname)
    }

    /// Every `(package, version)` pair in the store.
    pub fn packages(&self) -> SiteResult<Vec<(String, String)>> {
        Ok(self.store.packages()?)
    }

    // ---- Pages ----

    /// Assemble the render context of the document stored under `key`.
    ///
    /// A missing document is `NotFound` and undecodable bytes are
    /// `MalformedDocument`, both carrying `key`.
    pub fn context_for(&self, key: &StorageKey) -> SiteResult<RenderContext> {
        let document = self.store.load(key)?;
        let siblings = self.siblings(&key.path);
        let crumbs = breadcrumbs(&siblings);
        let graph = self.graphs.build_for(&self.store, key, &document);
        let backrefs =
            BackrefListing::new(document.backrefs.clone(), self.config.backref_group_threshold);
        debug!(
            key = %key,
            levels = siblings.len(),
            backrefs = backrefs.len(),
            nodes = graph.nodes.len(),
            "built render context"
        );

        Ok(RenderContext {
            key: key.clone(),
            qualname: document.qualname.clone(),
            module: key.top_level().to_string(),
            version: document.version.clone().or_else(|| key.version.clone()),
            document,
            siblings,
            breadcrumbs: crumbs,
            backrefs,
            graph,
            path_prefix: self.config.path_prefix.clone(),
            sidebar: self.config.sidebar,
        })
    }

    /// The package navigation list: one link per ingested package version.
    pub fn package_links(&self) -> SiteResult<Vec<PackageLink>> {
        Ok(self
            .packages()?
            .iter()
            .map(|(package, version)| PackageLink::new(package, version))
            .collect())
    }

    /// Assemble the context of the example stored under `key`.
    pub fn example_context(&self, key: &StorageKey) -> SiteResult<ExampleContext> {
        let packages = self.package_links()?;
        self.example_context_with(key, packages)
    }

    fn example_context_with(
        &self,
        key: &StorageKey,
        packages: Vec<PackageLink>,
    ) -> SiteResult<ExampleContext> {
        let document = self.store.load(key)?;
        debug!(key = %key, packages = packages.len(), "built example context");
        Ok(ExampleContext {
            key: key.clone(),
            document,
            packages,
            path_prefix: self.config.path_prefix.clone(),
            sidebar: self.config.sidebar,
        })
    }

    /// The page for a qualified name that has no module document.
    ///
    /// Lists the module pages of the same top-level package found under the
    /// name, and every document referencing the name in any version.
    pub fn missing_page(&self, qualname: &str) -> SiteResult<MissingPage> {
        let module = qualname.split('.').next().unwrap_or(qualname);
        let depth = qualname.split('.').count();
        let nested = format!("{qualname}.");

        let known: BTreeSet<&str> = self
            .snapshot
            .index()
            .known_refs()
            .iter()
            .filter(|r| r.kind == RefKind::Module && r.package.as_deref() == Some(module))
            .map(|r| r.path.as_str())
            .filter(|p| *p == qualname || p.starts_with(&nested))
            .collect();

        let mut tree = MissingTree::default();
        for path in &known {
            tree.insert(depth, path);
        }

        let backrefs: Vec<ObjectRef> = self
            .store
            .backrefs_matching(&RefPattern::any().path(qualname))?
            .into_iter()
            .collect();
        debug!(qualname, known = known.len(), backrefs = backrefs.len(), "built missing page");

        Ok(MissingPage {
            qualname: qualname.to_string(),
            module: module.to_string(),
            tree,
            backrefs,
        })
    }

    /// Figures of one package version and the pages that show them.
    ///
    /// Every stored asset contributes one entry per referring document, and
    /// every example contributes one entry per asset it references.
    pub fn gallery(&self, package: &str, version: &str) -> SiteResult<Vec<GalleryEntry>> {
        let release = RefPattern::any().package(package).version(version);
        let mut entries = BTreeSet::new();

        for asset in self.store.glob(&release.clone().kind(RefKind::Assets))? {
            for page in self.store.backrefs(&asset)? {
                entries.extend(self.gallery_entry(&asset, &page));
            }
        }

        for example in self.store.glob(&release.kind(RefKind::Examples))? {
            let doc = match self.store.load(&example) {
                Ok(doc) => doc,
                Err(e) => {
                    warn!(key = %example, error = %e, "skipping unreadable example");
                    continue;
                }
            };
            for r in doc.refs.iter().filter(|r| r.kind == RefKind::Assets) {
                let asset = ObjectRef {
                    package: r.package.clone().or_else(|| example.package.clone()),
                    version: r.version.clone().or_else(|| example.version.clone()),
                    ..r.clone()
                };
                entries.extend(self.gallery_entry(&asset, &example));
            }
        }

        info!(package, version, figures = entries.len(), "built gallery");
        Ok(entries.into_iter().collect())
    }

    fn gallery_entry(&self, asset: &ObjectRef, page: &ObjectRef) -> Option<GalleryEntry> {
        let (Some(package), Some(version)) = (&asset.package, &asset.version) else {
            return None;
        };
        let page_url = match to_url(page, &self.config.path_prefix) {
            Ok(url) => url,
            Err(e) => {
                debug!(page = %page, error = %e, "page has no url; leaving it out of the gallery");
                return None;
            }
        };
        Some(GalleryEntry {
            image_url: format!(
                "{}{package}/{version}/img/{}",
                self.config.path_prefix, asset.path
            ),
            page_url,
            path: page.path.clone(),
        })
    }

    // ---- Batch ----

    /// Build a context for every module page and every example, and hand
    /// each to `sink`.
    ///
    /// Module pages come first, then examples, each in key order; the whole
    /// batch is shuffled when `config.shuffle` is set. A page whose context
    /// cannot be built is logged and counted and the batch carries on.
    /// `sink` returning `Break` stops the batch before the next page.
    pub fn render_all<F>(&self, mut sink: F) -> SiteResult<RenderSummary>
    where
        F: FnMut(PageContext) -> ControlFlow<()>,
    {
        let mut keys = self.store.keys_of_kind(RefKind::Module)?;
        keys.extend(self.store.keys_of_kind(RefKind::Examples)?);
        if self.config.shuffle {
            keys.shuffle(&mut rand::thread_rng());
        }
        let packages = self.package_links()?;

        let mut summary = RenderSummary {
            total: keys.len(),
            ..RenderSummary::default()
        };
        info!(total = summary.total, shuffled = self.config.shuffle, "rendering pages");

        for (i, key) in keys.iter().enumerate() {
            if i > 0 && i % PROGRESS_EVERY == 0 {
                info!(done = i, total = summary.total, "render progress");
            }
            let page = match key.kind {
                RefKind::Examples => self
                    .example_context_with(key, packages.clone())
                    .map(PageContext::Example),
                _ => self.context_for(key).map(PageContext::Module),
            };
            match page {
                Ok(context) => {
                    summary.rendered += 1;
                    if sink(context).is_break() {
                        summary.stopped = true;
                        break;
                    }
                }
                Err(e) => {
                    summary.failed += 1;
                    warn!(key = %key, error = %e, "failed to build render context");
                }
            }
        }

        info!(
            rendered = summary.rendered,
            failed = summary.failed,
            stopped = summary.stopped,
            "render batch finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SiteError;
    use folio_store::{InMemoryDocumentStore, IngestedDocument, StoreError};

    fn m(path: &str) -> ObjectRef {
        ObjectRef::module("pkg", "1.0", path)
    }

    fn put(store: &impl DocumentStore, key: &ObjectRef, refs: &[ObjectRef]) {
        let mut doc = IngestedDocument::new(key.path.clone());
        doc.version = key.version.clone();
        doc.refs = refs.to_vec();
        store.put(key, &doc.encode().unwrap(), refs).unwrap();
    }

    fn fig(name: &str) -> ObjectRef {
        ObjectRef::new("pkg", "1.0", RefKind::Assets, name)
    }

    fn demo() -> ObjectRef {
        ObjectRef::new("pkg", "1.0", RefKind::Examples, "demo.py")
    }

    /// A small package: `pkg`, `pkg.linalg`, `pkg.linalg.norm`, `pkg.fft`,
    /// `pkg.plotting`, one figure and one example.
    fn fixture() -> InMemoryDocumentStore {
        let store = InMemoryDocumentStore::new();
        put(&store, &m("pkg"), &[]);
        put(&store, &m("pkg.linalg"), &[]);
        put(&store, &m("pkg.linalg.norm"), &[m("pkg.linalg")]);
        put(&store, &m("pkg.fft"), &[m("pkg.linalg.norm")]);
        put(&store, &m("pkg.plotting"), &[fig("fig-1.png")]);
        store.put(&fig("fig-1.png"), b"\x89PNG", &[]).unwrap();
        put(&store, &demo(), &[ObjectRef::local(RefKind::Assets, "fig-2.png")]);
        store
    }

    fn site(store: InMemoryDocumentStore) -> Site<InMemoryDocumentStore> {
        Site::new(store, SiteConfig::default()).unwrap()
    }

    // ---- Render contexts ----

    #[test]
    fn context_carries_navigation_and_graph() {
        let site = site(fixture());
        let ctx = site.context_for(&m("pkg.linalg.norm")).unwrap();

        assert_eq!(ctx.qualname, "pkg.linalg.norm");
        assert_eq!(ctx.module, "pkg");
        assert_eq!(ctx.version.as_deref(), Some("1.0"));
        let links: Vec<&str> = ctx.breadcrumbs.iter().map(|b| b.link.as_str()).collect();
        assert_eq!(links, vec!["pkg", "pkg.linalg", "pkg.linalg.norm"]);
        assert_eq!(ctx.backrefs, BackrefListing::Flat(vec![m("pkg.fft")]));
        assert_eq!(ctx.graph.nodes.len(), 2);
        assert!(ctx.graph.node("pkg.linalg.norm").is_none());
        assert!(ctx.to_json().unwrap().contains("\"qualname\":\"pkg.linalg.norm\""));
    }

    #[test]
    fn missing_document_is_not_found() {
        let site = site(fixture());
        let err = site.context_for(&m("pkg.nothing")).unwrap_err();
        assert!(matches!(err, SiteError::Store(StoreError::NotFound(_))));
    }

    #[test]
    fn malformed_document_reports_its_key() {
        let store = fixture();
        store.put(&m("pkg.bad"), b"not json", &[]).unwrap();
        let site = site(store);
        match site.context_for(&m("pkg.bad")).unwrap_err() {
            SiteError::Store(StoreError::MalformedDocument { key, .. }) => {
                assert_eq!(key, m("pkg.bad"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn many_backrefs_are_grouped() {
        let store = fixture();
        put(&store, &m("other.user"), &[m("pkg.linalg")]);
        let config = SiteConfig {
            backref_group_threshold: 1,
            ..SiteConfig::default()
        };
        let site = Site::new(store, config).unwrap();
        let ctx = site.context_for(&m("pkg.linalg")).unwrap();
        let BackrefListing::Grouped(groups) = &ctx.backrefs else {
            panic!("expected grouped backrefs");
        };
        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["other", "pkg"]);
    }

    // ---- Snapshot lifecycle ----

    #[test]
    fn snapshot_is_stable_until_refresh() {
        let mut site = site(fixture());
        let before = site.snapshot();
        put(site.store(), &m("pkg.new"), &[]);
        assert!(site.snapshot().resolve("pkg.new").is_none());

        site.refresh().unwrap();
        assert!(site.snapshot().resolve("pkg.new").is_some());
        assert!(before.resolve("pkg.new").is_none());
    }

    #[test]
    fn open_reads_the_ingest_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsDocumentStore::open(dir.path()).unwrap();
        put(&store, &m("pkg.f"), &[]);
        drop(store);

        let config = SiteConfig {
            ingest_dir: dir.path().to_path_buf(),
            ..SiteConfig::default()
        };
        let site = Site::open(config).unwrap();
        assert!(site.snapshot().resolve("pkg.f").is_some());
        assert_eq!(site.packages().unwrap(), vec![("pkg".to_string(), "1.0".to_string())]);
    }

    #[test]
    fn bulk_siblings_see_the_same_parents() {
        let site = site(fixture());
        let bulk = site.siblings_bulk("pkg.linalg.norm");
        let level: Vec<&str> = bulk.levels()[1].resolved_paths().collect();
        assert!(level.contains(&"pkg.linalg"));
        assert!(level.contains(&"pkg.fft"));
    }

    // ---- Missing pages ----

    #[test]
    fn missing_page_lists_known_names_below() {
        let store = InMemoryDocumentStore::new();
        put(&store, &m("pkg.sub.a"), &[]);
        put(&store, &m("pkg.sub.a.f"), &[]);
        put(&store, &m("pkg.sub.b"), &[]);
        put(&store, &m("pkg.subway"), &[]);
        put(&store, &ObjectRef::module("other", "2", "pkg.sub.c"), &[]);
        put(
            &store,
            &m("pkg.user"),
            &[ObjectRef::module("pkg", "0.9", "pkg.sub")],
        );
        let site = site(store);

        let page = site.missing_page("pkg.sub").unwrap();
        assert_eq!(page.module, "pkg");
        assert!(page.tree.link.is_none());
        assert_eq!(page.tree.children.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(
            page.tree.children["a"].children["f"].link.as_deref(),
            Some("pkg.sub.a.f")
        );
        assert_eq!(page.backrefs, vec![m("pkg.user")]);
    }

    #[test]
    fn missing_page_for_unknown_package_is_empty() {
        let site = site(fixture());
        let page = site.missing_page("nowhere.at.all").unwrap();
        assert!(page.tree.is_empty());
        assert!(page.backrefs.is_empty());
    }

    // ---- Gallery ----

    #[test]
    fn gallery_collects_asset_pages_and_examples() {
        let site = site(fixture());
        let entries = site.gallery("pkg", "1.0").unwrap();
        assert_eq!(
            entries,
            vec![
                GalleryEntry {
                    image_url: "/p/pkg/1.0/img/fig-1.png".into(),
                    page_url: "/p/pkg/1.0/api/pkg.plotting".into(),
                    path: "pkg.plotting".into(),
                },
                GalleryEntry {
                    image_url: "/p/pkg/1.0/img/fig-2.png".into(),
                    page_url: "/p/pkg/1.0/examples/demo.py".into(),
                    path: "demo.py".into(),
                },
            ]
        );
        assert!(site.gallery("pkg", "9.9").unwrap().is_empty());
    }

    // ---- Batch ----

    #[test]
    fn render_all_visits_every_module_page() {
        let site = site(fixture());
        let mut seen = Vec::new();
        let summary = site
            .render_all(|page| {
                seen.push(page.key().clone());
                ControlFlow::Continue(())
            })
            .unwrap();
        assert_eq!(summary.total, 6);
        assert_eq!(summary.rendered, 6);
        assert_eq!(summary.failed, 0);
        assert!(!summary.stopped);
        assert_eq!(seen[0], m("pkg"));
        assert_eq!(seen.last(), Some(&demo()));
    }

    #[test]
    fn render_all_emits_example_pages_with_package_nav() {
        let store = fixture();
        put(&store, &ObjectRef::module("other", "2.1", "other"), &[]);
        let site = site(store);
        let mut examples = Vec::new();
        site.render_all(|page| {
            if let PageContext::Example(ctx) = page {
                examples.push(ctx);
            }
            ControlFlow::Continue(())
        })
        .unwrap();

        assert_eq!(examples.len(), 1);
        let ctx = &examples[0];
        assert_eq!(ctx.key, demo());
        assert_eq!(ctx.document.qualname, "demo.py");
        assert_eq!(
            ctx.packages,
            vec![PackageLink::new("other", "2.1"), PackageLink::new("pkg", "1.0")]
        );
        assert_eq!(ctx.packages[1].target, ObjectRef::api("pkg", "1.0", "pkg"));
    }

    #[test]
    fn example_context_reports_missing_examples() {
        let site = site(fixture());
        assert!(site.example_context(&demo()).is_ok());
        let absent = ObjectRef::new("pkg", "1.0", RefKind::Examples, "gone.py");
        let err = site.example_context(&absent).unwrap_err();
        assert!(matches!(err, SiteError::Store(StoreError::NotFound(_))));
    }

    #[test]
    fn render_all_counts_failures_and_continues() {
        let store = fixture();
        store.put(&m("pkg.bad"), b"{", &[]).unwrap();
        let site = site(store);
        let summary = site.render_all(|_| ControlFlow::Continue(())).unwrap();
        assert_eq!(summary.total, 7);
        assert_eq!(summary.rendered, 6);
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn render_all_stops_on_break() {
        let site = site(fixture());
        let summary = site.render_all(|_| ControlFlow::Break(())).unwrap();
        assert_eq!(summary.rendered, 1);
        assert!(summary.stopped);
    }

    #[test]
    fn shuffled_batch_covers_the_same_pages() {
        let config = SiteConfig {
            shuffle: true,
            ..SiteConfig::default()
        };
        let site = Site::new(fixture(), config).unwrap();
        let mut seen = BTreeSet::new();
        site.render_all(|page| {
            seen.insert(page.key().path.clone());
            ControlFlow::Continue(())
        })
        .unwrap();
        let expected: BTreeSet<String> = [
            "demo.py",
            "pkg",
            "pkg.fft",
            "pkg.linalg",
            "pkg.linalg.norm",
            "pkg.plotting",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        assert_eq!(seen, expected);
    }
}
