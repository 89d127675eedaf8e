// src/export.rs
//! Flat per-song export for inspection outside the tool.

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::{CollabError, Result};
use crate::types::Snapshot;

/// One exported song row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongRow {
    pub song_id: String,
    pub song_name: String,
    pub popularity: i64,
    pub is_collaboration: bool,
    /// Artist names joined with `"; "`.
    pub artist_names: String,
    pub artist_count: usize,
    /// Each collaborator's genre text exactly as stored.
    pub all_genres_list: Vec<String>,
    pub avg_artist_betweenness: Option<f64>,
    pub genre_heterogeneity_index: Option<f64>,
    pub danceability: Option<f64>,
    pub energy: Option<f64>,
    pub valence: Option<f64>,
}

/// Builds the export rows in song identifier order.
#[must_use]
pub fn rows(snapshot: &Snapshot) -> Vec<SongRow> {
    snapshot
        .songs
        .iter()
        .map(|song| {
            let artists: Vec<_> = song
                .artist_ids
                .iter()
                .filter_map(|id| snapshot.artists.get(id))
                .collect();
            SongRow {
                song_id: song.id.clone(),
                song_name: song.name.clone(),
                popularity: song.popularity,
                is_collaboration: song.is_collaboration,
                artist_names: artists
                    .iter()
                    .map(|a| a.name.as_str())
                    .collect::<Vec<_>>()
                    .join("; "),
                artist_count: artists.len(),
                all_genres_list: artists.iter().map(|a| a.raw_genres.clone()).collect(),
                avg_artist_betweenness: song.avg_artist_betweenness,
                genre_heterogeneity_index: song.genre_heterogeneity,
                danceability: song.features.danceability,
                energy: song.features.energy,
                valence: song.features.valence,
            }
        })
        .collect()
}

/// Writes the rows as pretty JSON to `out`.
///
/// # Errors
/// Returns an error if serialization or the write fails.
pub fn write_json<W: Write>(rows: &[SongRow], mut out: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, rows)?;
    writeln!(out)?;
    Ok(())
}

/// Writes the rows to a file, creating parent directories.
///
/// # Errors
/// Returns [`CollabError::Io`] if the file cannot be created.
pub fn write_file(rows: &[SongRow], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| CollabError::io(e, parent))?;
    }
    let file = std::fs::File::create(path).map_err(|e| CollabError::io(e, path))?;
    write_json(rows, std::io::BufWriter::new(file))?;
    tracing::info!(rows = rows.len(), path = %path.display(), "export written");
    Ok(())
}
