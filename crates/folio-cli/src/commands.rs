use std::ops::ControlFlow;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use colored::Colorize;
use serde::Serialize;
use serde_json::json;
use tokio::sync::mpsc;
use tracing::debug;

use folio_graph::GraphBuilder;
use folio_nav::SiblingMap;
use folio_site::{MissingTree, RenderSummary, Site, SiteConfig};
use folio_store::{DocumentStore, FsDocumentStore};
use folio_types::{to_url, ObjectRef, RefKind};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let format = cli.format;
    match cli.command {
        Command::Stats(_) => cmd_stats(&open_site(config)?, format),
        Command::Siblings(args) => cmd_siblings(&open_site(config)?, args, format),
        Command::Graph(args) => cmd_graph(&open_site(config)?, args, format),
        Command::Url(args) => cmd_url(&config, args, format),
        Command::Render(args) => cmd_render(config, args, format).await,
        Command::Missing(args) => cmd_missing(&open_site(config)?, args, format),
        Command::Gallery(args) => cmd_gallery(&open_site(config)?, args, format),
        Command::Packages(_) => cmd_packages(&open_site(config)?, format),
    }
}

/// Configuration file values, with command-line overrides applied.
fn load_config(cli: &Cli) -> anyhow::Result<SiteConfig> {
    let mut config = match &cli.config {
        Some(path) => SiteConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => SiteConfig::default(),
    };
    if let Some(dir) = &cli.ingest_dir {
        config.ingest_dir = dir.clone();
    }
    debug!(ingest_dir = %config.ingest_dir.display(), prefix = %config.path_prefix, "loaded configuration");
    Ok(config)
}

fn open_site(config: SiteConfig) -> anyhow::Result<Site<FsDocumentStore>> {
    let dir = config.ingest_dir.clone();
    Site::open(config).with_context(|| format!("indexing {}", dir.display()))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_stats(site: &Site<FsDocumentStore>, format: OutputFormat) -> anyhow::Result<()> {
    let snapshot = site.snapshot();
    let index = snapshot.index();
    let packages = site.packages()?;
    if format == OutputFormat::Json {
        return print_json(&json!({
            "known_refs": index.len(),
            "names": index.name_map().len(),
            "tree_nodes": snapshot.tree().node_count(),
            "packages": packages.len(),
        }));
    }
    println!("{}", site.config().ingest_dir.display().to_string().bold());
    println!("  Known refs: {}", index.len().to_string().cyan());
    println!("  Names: {}", index.name_map().len().to_string().cyan());
    println!("  Tree nodes: {}", snapshot.tree().node_count().to_string().cyan());
    println!("  Packages: {}", packages.len().to_string().cyan());
    Ok(())
}

fn cmd_siblings(
    site: &Site<FsDocumentStore>,
    args: SiblingsArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let map = if args.bulk {
        site.siblings_bulk(&args.qualname)
    } else {
        site.siblings(&args.qualname)
    };
    if format == OutputFormat::Json {
        return print_json(&map);
    }
    print_siblings(&map);
    Ok(())
}

fn print_siblings(map: &SiblingMap) {
    if map.is_empty() {
        println!("No siblings.");
        return;
    }
    for level in map.levels() {
        let entries: Vec<String> = level
            .entries
            .iter()
            .map(|e| {
                if e.target.is_placeholder() {
                    e.short_name.dimmed().to_string()
                } else {
                    e.short_name.green().to_string()
                }
            })
            .collect();
        println!("{} {}", level.segment.yellow().bold(), entries.join(" "));
    }
}

fn cmd_graph(
    site: &Site<FsDocumentStore>,
    args: GraphArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let key = ObjectRef::module(args.package, args.version, args.qualname);
    let doc = site.store().load(&key)?;
    let config = site.config();
    let graph = GraphBuilder::new()
        .with_max_nodes(args.max_nodes.unwrap_or(config.max_graph_nodes))
        .with_path_prefix(config.path_prefix.clone())
        .build_for(site.store(), &key, &doc);

    if format == OutputFormat::Json {
        println!("{}", graph.to_json()?);
        return Ok(());
    }
    println!(
        "Graph for {}: {} nodes, {} links",
        key.path.bold(),
        graph.nodes.len(),
        graph.links.len()
    );
    for node in &graph.nodes {
        let url = node.url.as_deref().unwrap_or("-");
        println!(
            "  {:>3} {} {:.2} {}",
            node.id,
            node.label.cyan(),
            node.diameter,
            url.dimmed()
        );
    }
    Ok(())
}

fn cmd_url(config: &SiteConfig, args: UrlArgs, format: OutputFormat) -> anyhow::Result<()> {
    let kind: RefKind = args.kind.parse()?;
    let r = ObjectRef::new(args.package, args.version, kind, args.path);
    let prefix = args.prefix.as_deref().unwrap_or(&config.path_prefix);
    let url = to_url(&r, prefix)?;
    if format == OutputFormat::Json {
        return print_json(&json!({ "ref": r, "url": url }));
    }
    println!("{url}");
    Ok(())
}

/// Relative output file of a page's context.
fn page_path(key: &ObjectRef) -> PathBuf {
    let mut path = PathBuf::new();
    path.push(key.package.as_deref().unwrap_or("_"));
    path.push(key.version.as_deref().unwrap_or("_"));
    path.push(match key.kind {
        RefKind::Examples => "examples",
        _ => "api",
    });
    path.push(format!("{}.json", key.path));
    path
}

/// Encoded pages waiting for the writer.
const WRITE_QUEUE: usize = 32;

async fn cmd_render(
    mut config: SiteConfig,
    args: RenderArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    if args.shuffle {
        config.shuffle = true;
    }
    if args.output.is_some() {
        config.output_dir = args.output;
    }
    let output = if args.dry_run { None } else { config.output_dir.clone() };
    let limit = args.limit.unwrap_or(usize::MAX);
    let site = open_site(config)?;

    let (pages, writer) = match output.clone() {
        Some(root) => {
            let (tx, rx) = mpsc::channel(WRITE_QUEUE);
            (Some(tx), Some(tokio::spawn(write_pages(root, rx))))
        }
        None => (None, None),
    };

    let rendering = tokio::task::spawn_blocking(move || -> anyhow::Result<RenderSummary> {
        let mut visited = 0usize;
        let mut failure = None;
        let summary = site.render_all(|page| {
            visited += 1;
            if let Some(pages) = &pages {
                let queued = page
                    .to_json()
                    .context("encoding render context")
                    .and_then(|body| {
                        pages
                            .blocking_send((page_path(page.key()), body))
                            .map_err(|_| anyhow!("page writer stopped"))
                    });
                if let Err(e) = queued {
                    failure = Some(e);
                    return ControlFlow::Break(());
                }
            }
            if visited >= limit {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })?;
        match failure {
            Some(e) => Err(e),
            None => Ok(summary),
        }
    })
    .await?;
    let written = match writer {
        Some(writer) => writer.await??,
        None => 0,
    };
    let summary = rendering?;

    if format == OutputFormat::Json {
        return print_json(&json!({ "summary": summary, "written": written }));
    }
    println!(
        "{} Rendered {} of {} pages",
        "✓".green().bold(),
        summary.rendered.to_string().bold(),
        summary.total
    );
    if summary.failed > 0 {
        println!("  {} {} pages failed", "!".red().bold(), summary.failed);
    }
    match &output {
        Some(root) => println!("  Wrote {} files under {}", written, root.display()),
        None => println!("  {}", "dry run: nothing written".dimmed()),
    }
    Ok(())
}

/// Write queued pages under `root` until the sender is dropped.
async fn write_pages(
    root: PathBuf,
    mut pages: mpsc::Receiver<(PathBuf, String)>,
) -> anyhow::Result<usize> {
    let mut written = 0;
    while let Some((relative, body)) = pages.recv().await {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, body)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        written += 1;
    }
    debug!(written, root = %root.display(), "page writer finished");
    Ok(written)
}

fn cmd_missing(
    site: &Site<FsDocumentStore>,
    args: MissingArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let page = site.missing_page(&args.qualname)?;
    if format == OutputFormat::Json {
        return print_json(&page);
    }
    println!("{} is not documented", page.qualname.yellow().bold());
    if !page.tree.is_empty() {
        println!("Known names below it:");
        print_tree(&page.tree, 1);
    }
    if !page.backrefs.is_empty() {
        println!("Referenced by:");
        for r in &page.backrefs {
            println!("  {}", r.to_string().cyan());
        }
    }
    Ok(())
}

fn print_tree(tree: &MissingTree, depth: usize) {
    for (segment, child) in &tree.children {
        let indent = "  ".repeat(depth);
        match &child.link {
            Some(link) => println!("{indent}{} {}", segment.green(), link.dimmed()),
            None => println!("{indent}{segment}"),
        }
        print_tree(child, depth + 1);
    }
}

fn cmd_gallery(
    site: &Site<FsDocumentStore>,
    args: GalleryArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let entries = site.gallery(&args.package, &args.version)?;
    if format == OutputFormat::Json {
        return print_json(&entries);
    }
    if entries.is_empty() {
        println!("No figures for {} {}.", args.package.bold(), args.version);
        return Ok(());
    }
    for entry in &entries {
        println!("{} {} {}", entry.path.cyan(), entry.image_url, entry.page_url.dimmed());
    }
    Ok(())
}

fn cmd_packages(site: &Site<FsDocumentStore>, format: OutputFormat) -> anyhow::Result<()> {
    let packages = site.packages()?;
    if format == OutputFormat::Json {
        return print_json(&packages);
    }
    if packages.is_empty() {
        println!("No packages ingested.");
    }
    for (package, version) in &packages {
        println!("{} {}", package.bold(), version.yellow());
    }
    Ok(())
}
