// src/store/schema.rs
use rusqlite::Connection;

use crate::error::Result;

/// Creates the database schema.
///
/// * `artists` - graph node candidates with their persisted centralities.
/// * `hit_songs` - songs, audio features and derived indices.
/// * `hit_song_artists` - the many-to-many collaboration links.
///
/// The composite primary key on `hit_song_artists` makes a duplicate credit
/// impossible. This operation is wrapped in a single SQL transaction.
///
/// # Errors
///
/// Returns an error if the transaction fails or the database is read-only.
pub(crate) fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "BEGIN;

        CREATE TABLE IF NOT EXISTS artists (
            spotify_id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            genres TEXT NOT NULL DEFAULT '',
            artist_popularity INTEGER,
            num_hits INTEGER,
            num_collab_hits INTEGER,
            betweenness_centrality REAL,
            degree_centrality REAL
        );

        CREATE TABLE IF NOT EXISTS hit_songs (
            spotify_id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            album TEXT NOT NULL DEFAULT '',
            popularity INTEGER NOT NULL,
            release_date TEXT,
            explicit INTEGER NOT NULL DEFAULT 0,
            is_collaboration INTEGER NOT NULL DEFAULT 0,
            market_of_origin TEXT NOT NULL DEFAULT 'BR',
            danceability REAL,
            energy REAL,
            valence REAL,
            tempo REAL,
            liveness REAL,
            acousticness REAL,
            speechiness REAL,
            instrumentalness REAL,
            genre_heterogeneity_index REAL,
            avg_artist_betweenness REAL
        );

        CREATE TABLE IF NOT EXISTS hit_song_artists (
            song_id TEXT NOT NULL,
            artist_id TEXT NOT NULL,
            PRIMARY KEY (song_id, artist_id),
            FOREIGN KEY (song_id) REFERENCES hit_songs (spotify_id) ON DELETE CASCADE,
            FOREIGN KEY (artist_id) REFERENCES artists (spotify_id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_hit_song_artists_artist ON hit_song_artists (artist_id);

        COMMIT;",
    )?;
    Ok(())
}
