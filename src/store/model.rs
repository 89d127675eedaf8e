// src/store/model.rs
//! Row mapping between SQLite result rows and domain entities.

use rusqlite::Row;

use crate::genres;
use crate::types::{Artist, AudioFeatures, HitSong};

pub(crate) const ARTIST_COLUMNS: &str = "spotify_id, name, genres, artist_popularity, num_hits, \
     num_collab_hits, betweenness_centrality, degree_centrality";

pub(crate) const SONG_COLUMNS: &str = "spotify_id, name, album, popularity, release_date, explicit, \
     is_collaboration, market_of_origin, danceability, energy, valence, tempo, liveness, \
     acousticness, speechiness, instrumentalness, genre_heterogeneity_index, avg_artist_betweenness";

impl Artist {
    /// Maps a row selected with [`ARTIST_COLUMNS`]. The genre text is parsed
    /// here, once.
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let raw_genres: String = row.get(2)?;
        let (genres, genre_parse) = genres::parse(&raw_genres);
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            raw_genres,
            genres,
            genre_parse,
            popularity: row.get(3)?,
            num_hits: row.get(4)?,
            num_collab_hits: row.get(5)?,
            betweenness: row.get(6)?,
            degree: row.get(7)?,
        })
    }
}

impl HitSong {
    /// Maps a row selected with [`SONG_COLUMNS`]. Linked artists are filled
    /// in by the caller.
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            album: row.get(2)?,
            popularity: row.get(3)?,
            release_date: row.get(4)?,
            explicit: row.get(5)?,
            is_collaboration: row.get(6)?,
            market_of_origin: row.get(7)?,
            features: AudioFeatures {
                danceability: row.get(8)?,
                energy: row.get(9)?,
                valence: row.get(10)?,
                tempo: row.get(11)?,
                liveness: row.get(12)?,
                acousticness: row.get(13)?,
                speechiness: row.get(14)?,
                instrumentalness: row.get(15)?,
            },
            artist_ids: Vec::new(),
            genre_heterogeneity: row.get(16)?,
            avg_artist_betweenness: row.get(17)?,
        })
    }
}
