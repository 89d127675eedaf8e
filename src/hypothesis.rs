// src/hypothesis.rs
//! Validates the collaboration hypothesis with a multiple regression:
//!
//! `popularity ~ avg_artist_betweenness + genre_heterogeneity_index
//!               + danceability + energy`
//!
//! The betweenness coefficient confirms the hypothesis when it is positive
//! and significant; the heterogeneity coefficient is judged the same way,
//! independently.

use serde::Serialize;
use tracing::{info, warn};

use crate::error::{CollabError, Result};
use crate::stats::ols::{self, OlsFit};
use crate::types::HitSong;

pub const BETWEENNESS: &str = "avg_artist_betweenness";
pub const HETEROGENEITY: &str = "genre_heterogeneity_index";
pub const DANCEABILITY: &str = "danceability";
pub const ENERGY: &str = "energy";

/// The fit never runs on fewer rows than this, whatever the configuration.
pub const MIN_ROWS_FLOOR: usize = 6;

/// Verdict on one predictor of interest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub term: String,
    pub coefficient: f64,
    pub p_value: f64,
    pub confirmed: bool,
}

impl Verdict {
    fn judge(fit: &OlsFit, term: &str, significance: f64) -> Self {
        let (coefficient, p_value) = fit
            .term(term)
            .map_or((f64::NAN, f64::NAN), |t| (t.coefficient, t.p_value));
        Self {
            term: term.to_string(),
            coefficient,
            p_value,
            confirmed: coefficient > 0.0 && p_value < significance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HypothesisReport {
    pub total_rows: usize,
    pub complete_rows: usize,
    pub significance: f64,
    pub fit: OlsFit,
    pub betweenness: Verdict,
    pub heterogeneity: Verdict,
}

/// Result of the regression stage. A failed fit is a reportable outcome,
/// not an abort.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HypothesisOutcome {
    Fitted(HypothesisReport),
    Failed {
        reason: String,
        guidance: String,
        total_rows: usize,
        complete_rows: usize,
    },
}

impl HypothesisOutcome {
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        matches!(self, Self::Fitted(_))
    }
}

/// One complete regression row.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Row {
    popularity: f64,
    betweenness: f64,
    heterogeneity: f64,
    danceability: f64,
    energy: f64,
}

#[allow(clippy::cast_precision_loss)]
fn complete_row(song: &HitSong) -> Option<Row> {
    Some(Row {
        popularity: song.popularity as f64,
        betweenness: song.avg_artist_betweenness?,
        heterogeneity: song.genre_heterogeneity?,
        danceability: song.features.danceability?,
        energy: song.features.energy?,
    })
}

/// Fits the model over every song with all five fields present.
///
/// # Errors
/// [`CollabError::MissingData`] when `songs` is empty;
/// [`CollabError::StatisticalFit`] when fewer than
/// `max(min_complete_rows, 6)` complete rows remain or the design matrix is
/// singular.
pub fn validate(
    songs: &[HitSong],
    significance: f64,
    min_complete_rows: usize,
) -> Result<HypothesisReport> {
    if songs.is_empty() {
        return Err(CollabError::MissingData(
            "no hit songs in the store; nothing to regress".into(),
        ));
    }

    let rows: Vec<Row> = songs.iter().filter_map(complete_row).collect();
    let threshold = min_complete_rows.max(MIN_ROWS_FLOOR);
    info!(total = songs.len(), complete = rows.len(), "regression rows prepared");

    if rows.len() < threshold {
        return Err(CollabError::fit(
            format!(
                "only {} complete rows of {}, need at least {threshold}",
                rows.len(),
                songs.len()
            ),
            "run `analyze` first so every song has its derived metrics, \
             and check for missing danceability or energy values",
        ));
    }

    let column = |get: fn(&Row) -> f64| rows.iter().map(get).collect::<Vec<_>>();
    let fit = ols::fit(
        &column(|r| r.popularity),
        &[
            (BETWEENNESS, column(|r| r.betweenness)),
            (HETEROGENEITY, column(|r| r.heterogeneity)),
            (DANCEABILITY, column(|r| r.danceability)),
            (ENERGY, column(|r| r.energy)),
        ],
    )?;

    let betweenness = Verdict::judge(&fit, BETWEENNESS, significance);
    let heterogeneity = Verdict::judge(&fit, HETEROGENEITY, significance);
    info!(
        r_squared = fit.r_squared,
        betweenness_confirmed = betweenness.confirmed,
        heterogeneity_confirmed = heterogeneity.confirmed,
        "regression fitted"
    );

    Ok(HypothesisReport {
        total_rows: songs.len(),
        complete_rows: rows.len(),
        significance,
        fit,
        betweenness,
        heterogeneity,
    })
}

/// Like [`validate`], but turns a fit failure into
/// [`HypothesisOutcome::Failed`].
///
/// # Errors
/// Propagates every error other than [`CollabError::StatisticalFit`].
pub fn outcome(
    songs: &[HitSong],
    significance: f64,
    min_complete_rows: usize,
) -> Result<HypothesisOutcome> {
    match validate(songs, significance, min_complete_rows) {
        Ok(report) => Ok(HypothesisOutcome::Fitted(report)),
        Err(CollabError::StatisticalFit { reason, guidance }) => {
            warn!(%reason, "regression could not be fitted");
            Ok(HypothesisOutcome::Failed {
                reason,
                guidance,
                total_rows: songs.len(),
                complete_rows: songs.iter().filter_map(complete_row).count(),
            })
        }
        Err(e) => Err(e),
    }
}
