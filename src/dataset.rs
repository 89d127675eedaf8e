// src/dataset.rs
//! JSON dataset documents accepted by `collabnet import`.
//!
//! ```json
//! {
//!   "artists": [{ "id": "a1", "name": "Anitta", "genres": "['funk carioca', 'pop']" }],
//!   "songs": [{ "id": "s1", "name": "Girl From Rio", "popularity": 71, "artist_ids": ["a1"] }]
//! }
//! ```

use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{CollabError, Result};
use crate::types::AudioFeatures;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Dataset {
    #[serde(default)]
    pub artists: Vec<ArtistRecord>,
    #[serde(default)]
    pub songs: Vec<SongRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistRecord {
    pub id: String,
    pub name: String,
    /// Free-form genre text, kept verbatim.
    #[serde(default)]
    pub genres: String,
    #[serde(default)]
    pub popularity: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SongRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub popularity: Option<i64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub explicit: Option<bool>,
    #[serde(default)]
    pub market_of_origin: Option<String>,
    #[serde(default)]
    pub danceability: Option<f64>,
    #[serde(default)]
    pub energy: Option<f64>,
    #[serde(default)]
    pub valence: Option<f64>,
    #[serde(default)]
    pub tempo: Option<f64>,
    #[serde(default)]
    pub liveness: Option<f64>,
    #[serde(default)]
    pub acousticness: Option<f64>,
    #[serde(default)]
    pub speechiness: Option<f64>,
    #[serde(default)]
    pub instrumentalness: Option<f64>,
    #[serde(default)]
    pub artist_ids: Vec<String>,
}

impl SongRecord {
    /// Display name, substituting a placeholder for blank names.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Unknown Name (ID: {})", self.id),
        }
    }

    #[must_use]
    pub fn features(&self) -> AudioFeatures {
        AudioFeatures {
            danceability: finite(self.danceability),
            energy: finite(self.energy),
            valence: finite(self.valence),
            tempo: finite(self.tempo),
            liveness: finite(self.liveness),
            acousticness: finite(self.acousticness),
            speechiness: finite(self.speechiness),
            instrumentalness: finite(self.instrumentalness),
        }
    }

    #[must_use]
    pub fn parsed_release_date(&self) -> Option<NaiveDate> {
        self.release_date.as_deref().and_then(parse_release_date)
    }
}

fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}

/// Parses `YYYY-MM-DD`, `YYYY-MM` or `YYYY`. Anything else yields `None`.
#[must_use]
pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d") {
        return Some(date);
    }
    if raw.len() == 4 {
        let year: i32 = raw.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }
    None
}

impl Dataset {
    /// Reads a dataset document from disk.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or is not a valid document.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CollabError::io(e, path))?;
        Self::parse(&content)
    }

    /// Parses a dataset document.
    ///
    /// # Errors
    /// Returns error on malformed JSON or duplicate identifiers.
    pub fn parse(content: &str) -> Result<Self> {
        let mut dataset: Dataset = serde_json::from_str(content)?;
        dataset.normalize_ids();
        dataset.validate()?;
        Ok(dataset)
    }

    /// Trims every identifier and drops blank artist references, so that
    /// `" a"` and `"a"` name the same artist everywhere.
    fn normalize_ids(&mut self) {
        for artist in &mut self.artists {
            trim_in_place(&mut artist.id);
        }
        for song in &mut self.songs {
            trim_in_place(&mut song.id);
            song.artist_ids.iter_mut().for_each(trim_in_place);
            song.artist_ids.retain(|id| !id.is_empty());
        }
    }

    fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for artist in &self.artists {
            if artist.id.is_empty() {
                return Err(CollabError::Dataset("artist with empty id".into()));
            }
            if !seen.insert(artist.id.as_str()) {
                return Err(CollabError::Dataset(format!("duplicate artist id `{}`", artist.id)));
            }
        }
        seen.clear();
        for song in &self.songs {
            if song.id.is_empty() {
                return Err(CollabError::Dataset("song with empty id".into()));
            }
            if !seen.insert(song.id.as_str()) {
                return Err(CollabError::Dataset(format!("duplicate song id `{}`", song.id)));
            }
        }
        Ok(())
    }
}

fn trim_in_place(id: &mut String) {
    if id.trim().len() != id.len() {
        *id = id.trim().to_string();
    }
}
