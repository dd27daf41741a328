use std::path::PathBuf;

use clap::Parser;

/// wktriage — correlate failing generated WebKit tests with upstream revisions
#[derive(Parser, Debug, Clone)]
#[command(name = "wktriage", version, about)]
pub struct Cli {
    /// Root directory searched for result sets
    #[arg(long)]
    pub results_dir: Option<PathBuf>,

    /// Directory containing the generated test sources
    #[arg(long)]
    pub generated_dir: Option<PathBuf>,

    /// Root of the checked-out LayoutTests tree
    #[arg(long)]
    pub layout_tests_dir: Option<PathBuf>,

    /// Path to config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Width of the history worker pool
    #[arg(long)]
    pub workers: Option<usize>,

    /// Version-control binary used for history queries (default: svn)
    #[arg(long)]
    pub history_command: Option<String>,

    /// Maximum attempts per history query
    #[arg(long)]
    pub history_retries: Option<u32>,

    /// Per-attempt timeout for history queries, in seconds
    #[arg(long)]
    pub history_timeout: Option<u64>,

    /// Skip device diagnostics capture and symbolication
    #[arg(long)]
    pub skip_diagnostics: bool,
}
