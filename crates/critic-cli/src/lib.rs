//! CLI argument parsing for critic.

use camino::Utf8PathBuf;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "critic")]
#[command(about = "Run static analyzers over a fileset and collect a normalized review")]
pub struct Args {
    /// Project root directory
    #[arg(default_value = ".")]
    pub dir: Utf8PathBuf,

    /// Project-relative files to review
    pub files: Vec<Utf8PathBuf>,

    /// Read additional files from this list, one relative path per line
    #[arg(long)]
    pub list: Option<Utf8PathBuf>,

    /// Analyzers to run
    #[arg(long, value_delimiter = ',', default_value = "eslint,bandit,patterns")]
    pub analyzers: Vec<String>,

    /// Issue categories to keep
    #[arg(long, value_delimiter = ',', default_value = "security,performance,quality")]
    pub categories: Vec<String>,

    /// Concurrent analyzer batches
    #[arg(long, default_value = "2")]
    pub jobs: usize,

    /// Per-batch tool deadline in seconds
    #[arg(long, default_value = "60")]
    pub timeout: u64,

    /// Cache analyzer results under <dir>/.critic
    #[arg(long)]
    pub cache: bool,

    /// Write the JSON result here instead of stdout
    #[arg(long)]
    pub output: Option<Utf8PathBuf>,

    /// Suppress progress output
    #[arg(long, short)]
    pub quiet: bool,

    /// Explicit path to the eslint binary
    #[arg(long)]
    pub eslint_bin: Option<String>,

    /// Explicit path to the bandit binary
    #[arg(long)]
    pub bandit_bin: Option<String>,
}
