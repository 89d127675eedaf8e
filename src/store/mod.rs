// src/store/mod.rs
//! Data access layer.
//!
//! The store holds artists, hit songs and their collaboration links in
//! SQLite. The analytical core never keeps a cursor open: it takes a full
//! [`Snapshot`], computes, and writes results back in batches.
//!
//! # Write discipline
//!
//! Derived values are persisted in two disjoint batches, each in its own
//! transaction: every artist update first, then every song update. A failure
//! inside a batch drops the transaction, so the store shows either the
//! previous values or the complete new ones for that entity class.

mod import;
mod model;
mod schema;

use std::collections::HashMap;
use std::path::Path;

use rusqlite::{params, Connection};
use tracing::{debug, info};

use crate::error::{CollabError, Result};
use crate::types::{Artist, ArtistMetrics, HitSong, Snapshot, SongMetrics};

pub use import::ImportSummary;

/// SQLite-backed entity store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and ensures the schema exists.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or the schema cannot be
    /// created.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CollabError::io(e, parent))?;
        }
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "opened store");
        Self::init(conn)
    }

    /// Opens a private in-memory store.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.set_prepared_statement_cache_capacity(32);
        schema::create_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Full-scan read of every artist and every song with its linked artist
    /// identifiers resolved.
    ///
    /// # Errors
    /// Returns [`CollabError::MissingData`] if a link points at an artist
    /// that does not exist, or a store error if a query fails.
    pub fn snapshot(&self) -> Result<Snapshot> {
        let artists = self.load_artists()?;
        let mut links = self.load_links()?;

        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT {} FROM hit_songs ORDER BY spotify_id",
            model::SONG_COLUMNS
        ))?;
        let mut songs = stmt
            .query_map([], HitSong::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for song in &mut songs {
            let ids = links.remove(&song.id).unwrap_or_default();
            if let Some(missing) = ids.iter().find(|id| !artists.contains_key(*id)) {
                return Err(CollabError::MissingData(format!(
                    "song `{}` links unknown artist `{missing}`",
                    song.id
                )));
            }
            song.artist_ids = ids;
        }

        if let Some(orphan) = links.keys().next() {
            return Err(CollabError::MissingData(format!(
                "links reference unknown song `{orphan}`"
            )));
        }

        debug!(artists = artists.len(), songs = songs.len(), "snapshot loaded");
        Ok(Snapshot { artists, songs })
    }

    fn load_artists(&self) -> Result<std::collections::BTreeMap<String, Artist>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT {} FROM artists ORDER BY spotify_id",
            model::ARTIST_COLUMNS
        ))?;
        let rows = stmt.query_map([], Artist::from_row)?;

        let mut artists = std::collections::BTreeMap::new();
        for row in rows {
            let artist = row?;
            artists.insert(artist.id.clone(), artist);
        }
        Ok(artists)
    }

    fn load_links(&self) -> Result<HashMap<String, Vec<String>>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT song_id, artist_id FROM hit_song_artists ORDER BY song_id, artist_id",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

        let mut links: HashMap<String, Vec<String>> = HashMap::new();
        for row in rows {
            let (song, artist) = row?;
            links.entry(song).or_default().push(artist);
        }
        Ok(links)
    }

    /// Persists centrality and hit counts for every artist in one transaction.
    ///
    /// # Errors
    /// Returns [`CollabError::MissingData`] if an update targets an unknown
    /// artist; nothing from the batch is kept in that case.
    pub fn write_artist_metrics(&mut self, updates: &[ArtistMetrics]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "UPDATE artists
                 SET betweenness_centrality = ?2, degree_centrality = ?3,
                     num_hits = ?4, num_collab_hits = ?5
                 WHERE spotify_id = ?1",
            )?;
            for u in updates {
                let changed = stmt.execute(params![
                    u.id,
                    u.betweenness,
                    u.degree,
                    u.num_hits,
                    u.num_collab_hits
                ])?;
                if changed == 0 {
                    return Err(CollabError::MissingData(format!(
                        "artist `{}` vanished before its metrics were written",
                        u.id
                    )));
                }
            }
        }
        tx.commit()?;
        info!(count = updates.len(), "artist metrics persisted");
        Ok(updates.len())
    }

    /// Persists the derived song indices in one transaction.
    ///
    /// # Errors
    /// Returns [`CollabError::MissingData`] if an update targets an unknown
    /// song; nothing from the batch is kept in that case.
    pub fn write_song_metrics(&mut self, updates: &[SongMetrics]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "UPDATE hit_songs
                 SET genre_heterogeneity_index = ?2, avg_artist_betweenness = ?3
                 WHERE spotify_id = ?1",
            )?;
            for u in updates {
                let changed =
                    stmt.execute(params![u.id, u.genre_heterogeneity, u.avg_artist_betweenness])?;
                if changed == 0 {
                    return Err(CollabError::MissingData(format!(
                        "song `{}` vanished before its metrics were written",
                        u.id
                    )));
                }
            }
        }
        tx.commit()?;
        info!(count = updates.len(), "song metrics persisted");
        Ok(updates.len())
    }

    /// Returns `(artists, songs, links)` row counts.
    ///
    /// # Errors
    /// Returns a store error if a count query fails.
    pub fn counts(&self) -> Result<(usize, usize, usize)> {
        let count = |table: &str| -> Result<usize> {
            let n: i64 = self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?;
            Ok(usize::try_from(n).unwrap_or(0))
        };
        Ok((count("artists")?, count("hit_songs")?, count("hit_song_artists")?))
    }
}
