// src/cli/handlers.rs
//! Command handlers: load configuration, open the store, run one stage and
//! report.

use std::path::Path;

use anyhow::{Context, Result};

use super::args::Cli;
use crate::config::Config;
use crate::dataset::Dataset;
use crate::events::{EventKind, EventLogger};
use crate::exit::CollabExit;
use crate::export;
use crate::hypothesis::HypothesisOutcome;
use crate::pipeline::Pipeline;
use crate::reporting::{self, console};
use crate::stats::DescriptiveReport;
use crate::store::SqliteStore;

/// Resolved configuration plus output mode for one invocation.
pub struct Session {
    pub config: Config,
    pub json: bool,
}

impl Session {
    /// Loads the configuration and applies the global CLI overrides.
    ///
    /// # Errors
    /// Returns error if the configuration cannot be loaded.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = Config::load(cli.config.as_deref())
            .context("Failed to load configuration")?
            .with_overrides(cli.db.clone(), cli.seed);
        Ok(Self {
            config,
            json: cli.json,
        })
    }

    fn open_store(&self) -> Result<SqliteStore> {
        let path = &self.config.store.path;
        SqliteStore::open(path).with_context(|| format!("Failed to open store {}", path.display()))
    }

    fn events(&self) -> EventLogger {
        self.config.event_logger()
    }
}

/// Handles `import`.
pub fn handle_import(session: &Session, file: &Path) -> Result<CollabExit> {
    let dataset = Dataset::load(file)
        .with_context(|| format!("Failed to read dataset {}", file.display()))?;
    let mut store = session.open_store()?;
    let summary = store.replace_dataset(&dataset).context("Import failed")?;

    session.events().log(EventKind::DatasetImported {
        artists: summary.artists,
        songs: summary.songs,
        links: summary.links,
        dropped_links: summary.dropped_links,
    });

    if session.json {
        reporting::print_json(&summary)?;
    } else {
        console::print_import(&summary);
    }
    Ok(CollabExit::Success)
}

/// Handles `analyze`.
pub fn handle_analyze(session: &Session) -> Result<CollabExit> {
    let mut store = session.open_store()?;
    let report = Pipeline::new(&mut store, &session.config.analysis, session.events())
        .analyze()
        .context("Analysis failed")?;

    if session.json {
        reporting::print_json(&report)?;
    } else {
        console::print_analysis(&report);
    }
    Ok(CollabExit::Success)
}

/// Handles `communities`.
pub fn handle_communities(session: &Session) -> Result<CollabExit> {
    let mut store = session.open_store()?;
    let report = Pipeline::new(&mut store, &session.config.analysis, session.events())
        .communities()
        .context("Community detection failed")?;

    if session.json {
        reporting::print_json(&report)?;
    } else {
        console::print_communities(&report);
    }
    Ok(CollabExit::Success)
}

/// Handles `regress`.
pub fn handle_regress(session: &Session) -> Result<CollabExit> {
    let mut store = session.open_store()?;
    let outcome = Pipeline::new(&mut store, &session.config.analysis, session.events())
        .regress()
        .context("Regression failed")?;

    if session.json {
        reporting::print_json(&outcome)?;
    } else {
        console::print_hypothesis(&outcome);
    }
    Ok(exit_for(&outcome))
}

/// Handles `stats`.
pub fn handle_stats(session: &Session) -> Result<CollabExit> {
    let store = session.open_store()?;
    let snapshot = store.snapshot().context("Failed to read store")?;
    let report = DescriptiveReport::from_songs(&snapshot.songs);

    if session.json {
        reporting::print_json(&report)?;
    } else {
        console::print_stats(&report);
    }
    Ok(CollabExit::Success)
}

/// Handles `export`. Without `out` the JSON goes to stdout.
pub fn handle_export(session: &Session, out: Option<&Path>) -> Result<CollabExit> {
    let store = session.open_store()?;
    let snapshot = store.snapshot().context("Failed to read store")?;
    let rows = export::rows(&snapshot);

    match out {
        Some(path) => {
            export::write_file(&rows, path)
                .with_context(|| format!("Failed to export to {}", path.display()))?;
            if !session.json {
                console::print_export(rows.len(), &path.display().to_string());
            }
        }
        None => export::write_json(&rows, std::io::stdout().lock())?,
    }
    Ok(CollabExit::Success)
}

/// Handles `run`.
pub fn handle_run(session: &Session) -> Result<CollabExit> {
    let mut store = session.open_store()?;
    let report = Pipeline::new(&mut store, &session.config.analysis, session.events())
        .run()
        .context("Analysis run failed")?;

    if session.json {
        reporting::print_json(&report)?;
    } else {
        console::print_run(&report);
    }
    Ok(exit_for(&report.hypothesis))
}

fn exit_for(outcome: &HypothesisOutcome) -> CollabExit {
    if outcome.is_fitted() {
        CollabExit::Success
    } else {
        CollabExit::FitFailed
    }
}
