// src/store/import.rs
//! Full re-import of a dataset into the store.

use std::collections::{BTreeSet, HashSet};

use rusqlite::params;
use serde::Serialize;
use tracing::{info, warn};

use super::SqliteStore;
use crate::dataset::Dataset;
use crate::error::Result;

/// Outcome of a dataset import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub artists: usize,
    pub songs: usize,
    pub links: usize,
    /// Artist references that did not match any imported artist.
    pub dropped_links: usize,
}

impl SqliteStore {
    /// Replaces the entire store content with `dataset`.
    ///
    /// Existing rows are deleted and the new batch inserted inside one
    /// transaction. `is_collaboration` is derived from the number of
    /// resolved artist links, never taken from the input.
    ///
    /// # Errors
    /// Returns a store error if any statement fails; the previous content is
    /// left untouched in that case.
    pub fn replace_dataset(&mut self, dataset: &Dataset) -> Result<ImportSummary> {
        let known: HashSet<&str> = dataset.artists.iter().map(|a| a.id.trim()).collect();
        let mut summary = ImportSummary::default();

        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM hit_song_artists", [])?;
        tx.execute("DELETE FROM hit_songs", [])?;
        tx.execute("DELETE FROM artists", [])?;

        {
            let mut insert_artist = tx.prepare_cached(
                "INSERT INTO artists (spotify_id, name, genres, artist_popularity)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for a in &dataset.artists {
                insert_artist.execute(params![a.id.trim(), a.name, a.genres, a.popularity])?;
                summary.artists += 1;
            }

            let mut insert_song = tx.prepare_cached(
                "INSERT INTO hit_songs (
                    spotify_id, name, album, popularity, release_date, explicit,
                    is_collaboration, market_of_origin, danceability, energy, valence,
                    tempo, liveness, acousticness, speechiness, instrumentalness
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            )?;
            let mut insert_link = tx.prepare_cached(
                "INSERT INTO hit_song_artists (song_id, artist_id) VALUES (?1, ?2)",
            )?;

            for s in &dataset.songs {
                let mut linked = BTreeSet::new();
                for id in s.artist_ids.iter().map(|id| id.trim()).filter(|id| !id.is_empty()) {
                    if known.contains(id) {
                        linked.insert(id);
                    } else {
                        warn!(song = %s.id, artist = id, "dropping link to unknown artist");
                        summary.dropped_links += 1;
                    }
                }

                let f = s.features();
                insert_song.execute(params![
                    s.id.trim(),
                    s.display_name(),
                    s.album.clone().unwrap_or_default(),
                    s.popularity.unwrap_or(0),
                    s.parsed_release_date(),
                    s.explicit.unwrap_or(false),
                    linked.len() >= 2,
                    s.market_of_origin.clone().unwrap_or_else(|| "BR".to_string()),
                    f.danceability,
                    f.energy,
                    f.valence,
                    f.tempo,
                    f.liveness,
                    f.acousticness,
                    f.speechiness,
                    f.instrumentalness,
                ])?;
                summary.songs += 1;

                for artist_id in &linked {
                    insert_link.execute(params![s.id.trim(), artist_id])?;
                    summary.links += 1;
                }
            }
        }

        tx.commit()?;
        info!(
            artists = summary.artists,
            songs = summary.songs,
            links = summary.links,
            dropped = summary.dropped_links,
            "dataset imported"
        );
        Ok(summary)
    }
}
