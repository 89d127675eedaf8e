pub mod cli;
pub mod communities;
pub mod config;
pub mod dataset;
pub mod error;
pub mod events;
pub mod exit;
pub mod export;
pub mod genres;
pub mod graph;
pub mod hypothesis;
pub mod metrics;
pub mod pipeline;
pub mod reporting;
pub mod stats;
pub mod store;
pub mod types;

pub use error::{CollabError, Result};
