use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Output as JSON
    #[arg(short = 'j', long, global = true)]
    pub json: bool,

    /// Suppress progress output
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Debug output to stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Parser)]
#[command(
    name = "commons-icons",
    version,
    about = "Wikimedia Commons category icon fetcher",
    long_about = "commons-icons - Resolve and download one representative icon per topical category.",
    after_help = "EXAMPLES:\n  commons-icons fetch\n  commons-icons fetch --out assets/images/categories\n  commons-icons fetch --category Mathematics --category Time --json\n  commons-icons fetch --width 300 --timeout-secs 10\n  commons-icons categories -j"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Download an icon for each category
    Fetch(FetchArgs),
    /// List the built-in category names
    Categories,
}

#[derive(Debug, Clone, Args)]
pub struct FetchArgs {
    /// Output directory for saved icons
    #[arg(long, default_value = "assets/images/categories")]
    pub out: PathBuf,

    /// Category to fetch (repeatable; defaults to the built-in list)
    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// Preferred thumbnail width in pixels
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}
