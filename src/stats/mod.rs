// src/stats/mod.rs
//! Numerical statistics used by the hypothesis validator and the `stats`
//! report.

pub mod descriptive;
pub mod distribution;
pub mod ols;

use serde::Serialize;

pub use descriptive::Summary;
pub use ols::OlsFit;

use crate::types::HitSong;

type Extractor = fn(&HitSong) -> Option<f64>;

#[allow(clippy::cast_precision_loss)]
const COLUMNS: [(&str, Extractor); 5] = [
    ("popularity", |s| Some(s.popularity as f64)),
    ("danceability", |s| s.features.danceability),
    ("energy", |s| s.features.energy),
    ("valence", |s| s.features.valence),
    ("tempo", |s| s.features.tempo),
];

/// One described column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub missing: usize,
    pub summary: Option<Summary>,
}

/// Descriptive statistics over the song catalogue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveReport {
    pub songs: usize,
    pub columns: Vec<ColumnSummary>,
    /// Pairwise-complete Pearson matrix in column order.
    pub correlations: Vec<Vec<Option<f64>>>,
}

impl DescriptiveReport {
    #[must_use]
    pub fn from_songs(songs: &[HitSong]) -> Self {
        let raw: Vec<Vec<Option<f64>>> = COLUMNS
            .iter()
            .map(|(_, get)| songs.iter().map(*get).collect())
            .collect();

        let columns = COLUMNS
            .iter()
            .zip(&raw)
            .map(|((name, _), values)| {
                let present: Vec<f64> = values.iter().flatten().copied().collect();
                ColumnSummary {
                    name: (*name).to_string(),
                    missing: values.len() - present.len(),
                    summary: descriptive::describe(&present),
                }
            })
            .collect();

        let correlations = raw
            .iter()
            .map(|a| raw.iter().map(|b| descriptive::pearson(a, b)).collect())
            .collect();

        Self {
            songs: songs.len(),
            columns,
            correlations,
        }
    }
}
