// src/pipeline.rs
//! Staged, strictly sequential analysis run.
//!
//! snapshot → graph → centrality → artist batch → re-read → song batch →
//! communities → regression. Each stage completes before the next starts;
//! any error except a failed fit aborts the run.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{info, warn};

use crate::communities::{self, CommunityProfile};
use crate::config::AnalysisConfig;
use crate::error::{CollabError, Result};
use crate::events::{EventKind, EventLogger};
use crate::graph::{CollabGraph, GraphEngine};
use crate::hypothesis::{self, HypothesisOutcome};
use crate::metrics::{self, NetworkSummary};
use crate::store::SqliteStore;
use crate::types::Snapshot;

/// Size of the data the run started from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotStats {
    pub artists: usize,
    pub songs: usize,
    pub collaborations: usize,
    pub genre_recoveries: usize,
}

/// Output of the metric stages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub snapshot: SnapshotStats,
    pub network: NetworkSummary,
    pub artists_written: usize,
    pub songs_written: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunityReport {
    pub seed: u64,
    pub resolution: f64,
    pub count: usize,
    pub modularity: f64,
    pub profiles: Vec<CommunityProfile>,
    /// Artist identifier to community id, for every graph node.
    pub membership: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub analysis: AnalysisReport,
    pub communities: CommunityReport,
    pub hypothesis: HypothesisOutcome,
}

pub struct Pipeline<'a> {
    store: &'a mut SqliteStore,
    config: &'a AnalysisConfig,
    events: EventLogger,
}

impl<'a> Pipeline<'a> {
    #[must_use]
    pub fn new(store: &'a mut SqliteStore, config: &'a AnalysisConfig, events: EventLogger) -> Self {
        Self {
            store,
            config,
            events,
        }
    }

    /// Runs every stage.
    ///
    /// # Errors
    /// Returns the first stage error. A regression that cannot be fitted is
    /// reported in [`RunReport::hypothesis`] instead.
    pub fn run(&mut self) -> Result<RunReport> {
        self.events.log(EventKind::RunStarted {
            seed: self.config.seed,
        });
        let result = self.run_stages();
        if let Err(e) = &result {
            self.events.log(EventKind::RunFailed {
                error: e.to_string(),
            });
        }
        result
    }

    fn run_stages(&mut self) -> Result<RunReport> {
        let (analysis, graph, snapshot) = self.compute_metrics()?;
        let communities = self.detect_communities(&graph, &snapshot);
        let hypothesis = self.regress_snapshot(&snapshot)?;
        info!("analysis run complete");
        Ok(RunReport {
            analysis,
            communities,
            hypothesis,
        })
    }

    /// Computes and persists every artist and song metric.
    ///
    /// # Errors
    /// [`CollabError::MissingData`] on an empty store; store errors abort
    /// with the failing batch rolled back.
    pub fn analyze(&mut self) -> Result<AnalysisReport> {
        self.compute_metrics().map(|(report, _, _)| report)
    }

    /// Detects communities on the current store content.
    ///
    /// # Errors
    /// [`CollabError::MissingData`] on an empty store.
    pub fn communities(&mut self) -> Result<CommunityReport> {
        let snapshot = self.load_snapshot()?;
        let graph = GraphEngine::build(&snapshot.songs);
        Ok(self.detect_communities(&graph, &snapshot))
    }

    /// Runs the regression on the persisted song metrics.
    ///
    /// # Errors
    /// [`CollabError::MissingData`] when there are no songs.
    pub fn regress(&mut self) -> Result<HypothesisOutcome> {
        let snapshot = self.store.snapshot()?;
        self.regress_snapshot(&snapshot)
    }

    fn load_snapshot(&mut self) -> Result<Snapshot> {
        let snapshot = self.store.snapshot()?;
        if snapshot.artists.is_empty() {
            return Err(CollabError::MissingData(
                "the store holds no artists; run `import` first".into(),
            ));
        }
        if snapshot.songs.is_empty() {
            return Err(CollabError::MissingData(
                "the store holds no hit songs; run `import` first".into(),
            ));
        }

        for artist in snapshot.artists.values() {
            if artist.genre_parse.is_recovery() && !artist.raw_genres.trim().is_empty() {
                warn!(
                    artist = %artist.id,
                    raw = %artist.raw_genres,
                    outcome = ?artist.genre_parse,
                    "genre text recovered leniently"
                );
            }
        }
        self.events.log(EventKind::SnapshotLoaded {
            artists: snapshot.artists.len(),
            songs: snapshot.songs.len(),
            genre_recoveries: snapshot.genre_recoveries(),
        });
        Ok(snapshot)
    }

    fn compute_metrics(&mut self) -> Result<(AnalysisReport, CollabGraph, Snapshot)> {
        let snapshot = self.load_snapshot()?;
        let stats = SnapshotStats {
            artists: snapshot.artists.len(),
            songs: snapshot.songs.len(),
            collaborations: metrics::collaboration_count(&snapshot.songs),
            genre_recoveries: snapshot.genre_recoveries(),
        };

        let graph = GraphEngine::build(&snapshot.songs);
        self.events.log(EventKind::GraphBuilt {
            nodes: graph.num_nodes(),
            edges: graph.num_edges(),
        });
        let centrality = GraphEngine::centrality(&graph);

        let artist_updates = metrics::artist_metrics(&snapshot, &centrality);
        let artists_written = self.store.write_artist_metrics(&artist_updates)?;
        self.events.log(EventKind::ArtistMetricsWritten {
            count: artists_written,
        });

        // Song metrics must see the committed artist values.
        let refreshed = self.store.snapshot()?;
        let song_updates = metrics::song_metrics(&refreshed);
        let songs_written = self.store.write_song_metrics(&song_updates)?;
        self.events.log(EventKind::SongMetricsWritten {
            count: songs_written,
        });

        let network =
            NetworkSummary::new(&graph, &centrality, &refreshed.artists, self.config.top_artists);
        let snapshot = self.store.snapshot()?;

        Ok((
            AnalysisReport {
                snapshot: stats,
                network,
                artists_written,
                songs_written,
            },
            graph,
            snapshot,
        ))
    }

    fn detect_communities(&self, graph: &CollabGraph, snapshot: &Snapshot) -> CommunityReport {
        let partition = GraphEngine::communities(graph, self.config.seed, self.config.resolution);
        let profiles =
            communities::profiles(graph, &partition, &snapshot.artists, self.config.top_genres);
        self.events.log(EventKind::CommunitiesDetected {
            count: partition.count,
            modularity: partition.modularity,
        });
        info!(
            communities = partition.count,
            modularity = partition.modularity,
            "communities detected"
        );

        CommunityReport {
            seed: self.config.seed,
            resolution: self.config.resolution,
            count: partition.count,
            modularity: partition.modularity,
            profiles,
            membership: communities::membership(graph, &partition),
        }
    }

    fn regress_snapshot(&self, snapshot: &Snapshot) -> Result<HypothesisOutcome> {
        let outcome = hypothesis::outcome(
            &snapshot.songs,
            self.config.significance,
            self.config.min_complete_rows,
        )?;
        match &outcome {
            HypothesisOutcome::Fitted(report) => self.events.log(EventKind::RegressionFitted {
                complete_rows: report.complete_rows,
                r_squared: report.fit.r_squared,
                betweenness_confirmed: report.betweenness.confirmed,
                heterogeneity_confirmed: report.heterogeneity.confirmed,
            }),
            HypothesisOutcome::Failed { reason, .. } => {
                self.events.log(EventKind::RegressionFailed {
                    reason: reason.clone(),
                });
            }
        }
        Ok(outcome)
    }
}
