use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "collabnet",
    version,
    about = "Social-network analysis of music collaborations"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
    /// Configuration file (default: ./collabnet.toml if present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// SQLite database, overriding `store.path`
    #[arg(long, global = true, value_name = "FILE")]
    pub db: Option<PathBuf>,
    /// Community detection seed, overriding `analysis.seed`
    #[arg(long, global = true)]
    pub seed: Option<u64>,
    /// Print reports as JSON
    #[arg(long, global = true)]
    pub json: bool,
    /// Debug-level logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Replace the store content with a JSON dataset
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Build the graph, compute and persist artist and song metrics
    Analyze,
    /// Detect communities and profile their genres
    Communities,
    /// Fit the popularity regression and judge the hypothesis
    Regress,
    /// Descriptive statistics of the song catalogue
    Stats,
    /// Export songs with their metrics as JSON
    Export {
        /// Output file; stdout when omitted
        #[arg(long, short, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Analyze, detect communities and regress in one run
    Run,
}
