// src/events.rs
//! Machine-readable event logging for analysis runs.
//!
//! Events are appended to `<output dir>/events.jsonl`, one JSON object per
//! line.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    DatasetImported {
        artists: usize,
        songs: usize,
        links: usize,
        dropped_links: usize,
    },
    RunStarted {
        seed: u64,
    },
    SnapshotLoaded {
        artists: usize,
        songs: usize,
        genre_recoveries: usize,
    },
    GraphBuilt {
        nodes: usize,
        edges: usize,
    },
    ArtistMetricsWritten {
        count: usize,
    },
    SongMetricsWritten {
        count: usize,
    },
    CommunitiesDetected {
        count: usize,
        modularity: f64,
    },
    RegressionFitted {
        complete_rows: usize,
        r_squared: f64,
        betweenness_confirmed: bool,
        heterogeneity_confirmed: bool,
    },
    RegressionFailed {
        reason: String,
    },
    RunFailed {
        error: String,
    },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RunEvent {
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
}

#[derive(Debug, Clone)]
pub struct EventLogger {
    log_path: Option<PathBuf>,
}

impl EventLogger {
    #[must_use]
    pub fn new(output_dir: &Path) -> Self {
        Self {
            log_path: Some(output_dir.join("events.jsonl")),
        }
    }

    /// A logger that records nothing.
    #[must_use]
    pub fn disabled() -> Self {
        Self { log_path: None }
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.log_path.as_deref()
    }

    pub fn log(&self, kind: EventKind) {
        let Some(path) = &self.log_path else {
            return;
        };
        // Best-effort: a failed write never interrupts the run.
        if let Err(e) = Self::serialize_event(kind).and_then(|json| Self::append(path, &json)) {
            tracing::debug!(error = %e, "event not recorded");
        }
    }

    fn serialize_event(kind: EventKind) -> Result<String> {
        let event = RunEvent {
            timestamp: Utc::now(),
            kind,
        };
        Ok(serde_json::to_string(&event)?)
    }

    fn append(path: &Path, line: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}

/// Reads every event back from a log file.
///
/// # Errors
/// Returns an error if the file cannot be read or a line is not an event.
pub fn read_events(path: &Path) -> Result<Vec<RunEvent>> {
    let content = fs::read_to_string(path)?;
    content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| Ok(serde_json::from_str(l)?))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_append_in_order() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let logger = EventLogger::new(&dir.path().join("out"));

        logger.log(EventKind::RunStarted { seed: 42 });
        logger.log(EventKind::GraphBuilt { nodes: 3, edges: 3 });

        let events = read_events(&dir.path().join("out").join("events.jsonl"))?;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, EventKind::RunStarted { seed: 42 });
        assert_eq!(events[1].kind, EventKind::GraphBuilt { nodes: 3, edges: 3 });
        Ok(())
    }

    #[test]
    fn test_disabled_logger_writes_nothing() {
        let logger = EventLogger::disabled();
        logger.log(EventKind::RunStarted { seed: 1 });
        assert!(logger.path().is_none());
    }
}
