use std::path::PathBuf;
use clap::Parser;
use crate::config::OutputFormat;
use crate::diff::DiffEngineKind;
use crate::mimetype::MimeSnifferKind;

#[derive(Parser, Debug)]
#[command(
    name = "rescue-match",
    version,
    about = "Compares two trees of files and tells which ones from the left tree match best with which ones from the right tree"
)]
pub struct Cli {
    /// For each file in this tree, a matching equivalent is searched in RIGHT_TREE
    pub left_tree: PathBuf,

    /// The tree in which matching files are searched for
    pub right_tree: PathBuf,

    /// Only print matches with a line match ratio >= MIN_RATIO
    #[arg(long, value_name = "RATIO")]
    pub min_ratio: Option<f64>,

    /// Skip comparisons whose files have different mimetypes
    #[arg(long)]
    pub mimetype_filter: bool,

    /// Copy the best match of each left file to DIR, under the left file's relative path
    #[arg(long, value_name = "DIR")]
    pub copy_dest: Option<PathBuf>,

    /// Copy the least matching file that still reaches MIN_RATIO instead of the best one
    /// (useful when the rescued files are revisions, the least matching being the newest)
    #[arg(long)]
    pub copy_least_matching: bool,

    /// YAML file with defaults for the options above
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Concurrent comparisons [default: available parallelism]
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Give up on a single comparison after SECS seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Line diff implementation
    #[arg(long, value_enum)]
    pub diff_engine: Option<DiffEngineKind>,

    /// Diff binary used by the external engine
    #[arg(long, env = "DIFF", value_name = "PATH")]
    pub diff_program: Option<PathBuf>,

    /// Mimetype detection used by --mimetype-filter
    #[arg(long, value_enum)]
    pub mime_sniffer: Option<MimeSnifferKind>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress per-comparison error diagnostics
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
