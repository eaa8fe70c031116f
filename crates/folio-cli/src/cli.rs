use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "folio",
    about = "Folio: cross-reference navigation for versioned API documentation",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML site configuration
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Ingest directory, overriding the configuration file
    #[arg(long, global = true)]
    pub ingest_dir: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Summarize the indexed corpus
    Stats(StatsArgs),
    /// Show the sibling menus of a qualified name
    Siblings(SiblingsArgs),
    /// Build the relationship graph of a module page
    Graph(GraphArgs),
    /// Print the page URL of an identity
    Url(UrlArgs),
    /// Build render contexts for every module and example page
    Render(RenderArgs),
    /// Show the not-found page for a qualified name
    Missing(MissingArgs),
    /// List the figures of a package version
    Gallery(GalleryArgs),
    /// List ingested packages and versions
    Packages(PackagesArgs),
}

#[derive(Args)]
pub struct StatsArgs {}

#[derive(Args)]
pub struct SiblingsArgs {
    pub qualname: String,
    /// Scan the known-ref set instead of walking the prefix tree
    #[arg(long)]
    pub bulk: bool,
}

#[derive(Args)]
pub struct GraphArgs {
    pub package: String,
    pub version: String,
    pub qualname: String,
    #[arg(long)]
    pub max_nodes: Option<usize>,
}

#[derive(Args)]
pub struct UrlArgs {
    pub package: String,
    pub version: String,
    pub kind: String,
    pub path: String,
    #[arg(long)]
    pub prefix: Option<String>,
}

#[derive(Args)]
pub struct RenderArgs {
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Build contexts without writing them
    #[arg(long)]
    pub dry_run: bool,
    #[arg(long)]
    pub shuffle: bool,
    /// Stop after this many pages
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct MissingArgs {
    pub qualname: String,
}

#[derive(Args)]
pub struct GalleryArgs {
    pub package: String,
    pub version: String,
}

#[derive(Args)]
pub struct PackagesArgs {}
