// src/types.rs
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::genres::{GenreSet, ParseOutcome};

/// A graph node candidate: one performer, keyed by a stable identifier.
#[derive(Debug, Clone, Serialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    /// Genre text exactly as stored.
    pub raw_genres: String,
    /// Canonical genre set, parsed once when the row is loaded.
    pub genres: GenreSet,
    #[serde(skip)]
    pub genre_parse: ParseOutcome,
    pub popularity: Option<i64>,
    pub num_hits: Option<i64>,
    pub num_collab_hits: Option<i64>,
    pub betweenness: Option<f64>,
    pub degree: Option<f64>,
}

/// Audio descriptors; any of them may be missing upstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AudioFeatures {
    pub danceability: Option<f64>,
    pub energy: Option<f64>,
    pub valence: Option<f64>,
    pub tempo: Option<f64>,
    pub liveness: Option<f64>,
    pub acousticness: Option<f64>,
    pub speechiness: Option<f64>,
    pub instrumentalness: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HitSong {
    pub id: String,
    pub name: String,
    pub album: String,
    pub popularity: i64,
    pub release_date: Option<NaiveDate>,
    pub explicit: bool,
    pub is_collaboration: bool,
    pub market_of_origin: String,
    pub features: AudioFeatures,
    /// Linked artists, sorted and unique.
    pub artist_ids: Vec<String>,
    pub genre_heterogeneity: Option<f64>,
    pub avg_artist_betweenness: Option<f64>,
}

/// A full-scan, read-only view of the store.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub artists: BTreeMap<String, Artist>,
    /// Ordered by song identifier.
    pub songs: Vec<HitSong>,
}

impl Snapshot {
    /// Number of artists whose genre text needed recovery.
    #[must_use]
    pub fn genre_recoveries(&self) -> usize {
        self.artists
            .values()
            .filter(|a| a.genre_parse.is_recovery() && !a.raw_genres.trim().is_empty())
            .count()
    }
}

/// Phase-one write: centrality and hit counts for one artist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistMetrics {
    pub id: String,
    pub betweenness: f64,
    pub degree: f64,
    pub num_hits: i64,
    pub num_collab_hits: i64,
}

/// Phase-two write: derived indices for one song.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongMetrics {
    pub id: String,
    pub genre_heterogeneity: f64,
    pub avg_artist_betweenness: f64,
}
