use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level `collabnet.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { path: default_db_path() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Seed for the community detector's visiting order.
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_resolution")]
    pub resolution: f64,
    #[serde(default = "default_significance")]
    pub significance: f64,
    #[serde(default = "default_min_complete_rows")]
    pub min_complete_rows: usize,
    #[serde(default = "default_top_genres")]
    pub top_genres: usize,
    #[serde(default = "default_top_artists")]
    pub top_artists: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            resolution: default_resolution(),
            significance: default_significance(),
            min_complete_rows: default_min_complete_rows(),
            top_genres: default_top_genres(),
            top_artists: default_top_artists(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    /// Append run events to `<dir>/events.jsonl`.
    #[serde(default = "default_true")]
    pub events: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            events: default_true(),
        }
    }
}

fn default_db_path() -> PathBuf { PathBuf::from("collabnet.db") }
fn default_output_dir() -> PathBuf { PathBuf::from(".collabnet") }
const fn default_true() -> bool { true }
const fn default_seed() -> u64 { 42 }
const fn default_resolution() -> f64 { 1.0 }
const fn default_significance() -> f64 { 0.05 }
const fn default_min_complete_rows() -> usize { 6 }
const fn default_top_genres() -> usize { 3 }
const fn default_top_artists() -> usize { 10 }
