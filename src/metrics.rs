// src/metrics.rs
//! Per-artist and per-song derived metrics.
//!
//! Artist metrics come from the centrality scores of the freshly built
//! graph. Song metrics read the *persisted* artist betweenness, so they are
//! computed from a snapshot taken after the artist batch was committed.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::graph::{Centrality, CollabGraph};
use crate::types::{Artist, ArtistMetrics, HitSong, Snapshot, SongMetrics};

/// Centrality and hit counts for every artist in the store. Artists that
/// never collaborated score 0.0 on both centralities.
#[must_use]
pub fn artist_metrics(snapshot: &Snapshot, centrality: &Centrality) -> Vec<ArtistMetrics> {
    let mut hits: BTreeMap<&str, (i64, i64)> = BTreeMap::new();
    for song in &snapshot.songs {
        for id in &song.artist_ids {
            let entry = hits.entry(id.as_str()).or_default();
            entry.0 += 1;
            if song.is_collaboration {
                entry.1 += 1;
            }
        }
    }

    snapshot
        .artists
        .keys()
        .map(|id| {
            let (num_hits, num_collab_hits) = hits.get(id.as_str()).copied().unwrap_or_default();
            ArtistMetrics {
                id: id.clone(),
                betweenness: centrality.betweenness.get(id).copied().unwrap_or(0.0),
                degree: centrality.degree.get(id).copied().unwrap_or(0.0),
                num_hits,
                num_collab_hits,
            }
        })
        .collect()
}

/// Genre-heterogeneity index: distinct genres across the collaborators
/// divided by the number of collaborators. Zero collaborators yield 0.0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn genre_heterogeneity(artist_ids: &[String], artists: &BTreeMap<String, Artist>) -> f64 {
    if artist_ids.is_empty() {
        return 0.0;
    }
    let union: HashSet<&str> = artist_ids
        .iter()
        .filter_map(|id| artists.get(id))
        .flat_map(|a| a.genres.iter())
        .collect();
    union.len() as f64 / artist_ids.len() as f64
}

/// Mean persisted betweenness of the collaborators; 0.0 without any.
/// An artist whose betweenness was never written counts as 0.0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_betweenness(artist_ids: &[String], artists: &BTreeMap<String, Artist>) -> f64 {
    if artist_ids.is_empty() {
        return 0.0;
    }
    let total: f64 = artist_ids
        .iter()
        .map(|id| artists.get(id).and_then(|a| a.betweenness).unwrap_or(0.0))
        .sum();
    total / artist_ids.len() as f64
}

/// Derived indices for every song of `snapshot`.
#[must_use]
pub fn song_metrics(snapshot: &Snapshot) -> Vec<SongMetrics> {
    snapshot
        .songs
        .iter()
        .map(|song| SongMetrics {
            id: song.id.clone(),
            genre_heterogeneity: genre_heterogeneity(&song.artist_ids, &snapshot.artists),
            avg_artist_betweenness: average_betweenness(&song.artist_ids, &snapshot.artists),
        })
        .collect()
}

/// An artist ranked by betweenness.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedArtist {
    pub id: String,
    pub name: String,
    pub betweenness: f64,
    pub degree: f64,
}

/// Size and shape of the collaboration network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkSummary {
    pub nodes: usize,
    pub edges: usize,
    pub total_weight: usize,
    pub density: f64,
    pub isolated_artists: usize,
    pub top_betweenness: Vec<RankedArtist>,
}

impl NetworkSummary {
    /// Summarizes `graph`, keeping the `top_n` artists by betweenness.
    /// Ties are broken by identifier.
    #[must_use]
    pub fn new(
        graph: &CollabGraph,
        centrality: &Centrality,
        artists: &BTreeMap<String, Artist>,
        top_n: usize,
    ) -> Self {
        let mut ranked: Vec<RankedArtist> = centrality
            .betweenness
            .iter()
            .map(|(id, &b)| RankedArtist {
                id: id.clone(),
                name: artists.get(id).map_or_else(|| id.clone(), |a| a.name.clone()),
                betweenness: b,
                degree: centrality.degree.get(id).copied().unwrap_or(0.0),
            })
            .collect();
        ranked.sort_by(|a, b| b.betweenness.total_cmp(&a.betweenness).then_with(|| a.id.cmp(&b.id)));
        ranked.truncate(top_n);

        Self {
            nodes: graph.num_nodes(),
            edges: graph.num_edges(),
            total_weight: graph.total_weight(),
            density: graph.density(),
            isolated_artists: artists.len().saturating_sub(graph.num_nodes()),
            top_betweenness: ranked,
        }
    }
}

/// Songs crediting at least two artists.
#[must_use]
pub fn collaboration_count(songs: &[HitSong]) -> usize {
    songs.iter().filter(|s| s.is_collaboration).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genres;

    fn artist(id: &str, raw_genres: &str, betweenness: Option<f64>) -> Artist {
        let (genres, genre_parse) = genres::parse(raw_genres);
        Artist {
            id: id.to_string(),
            name: id.to_uppercase(),
            raw_genres: raw_genres.to_string(),
            genres,
            genre_parse,
            popularity: None,
            num_hits: None,
            num_collab_hits: None,
            betweenness,
            degree: None,
        }
    }

    fn roster(artists: Vec<Artist>) -> BTreeMap<String, Artist> {
        artists.into_iter().map(|a| (a.id.clone(), a)).collect()
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_genre_heterogeneity() {
        let artists = roster(vec![
            artist("a", "['pop']", None),
            artist("b", "['rock']", None),
            artist("c", "['pop']", None),
            artist("d", "", None),
            artist("e", "['pop', 'funk', 'axe']", None),
        ]);
        let cases = vec![
            (ids(&[]), 0.0, "no collaborators"),
            (ids(&["a", "b"]), 1.0, "disjoint single genres"),
            (ids(&["a", "c"]), 0.5, "one shared genre"),
            (ids(&["d"]), 0.0, "no genres declared"),
            (ids(&["a", "e"]), 1.5, "more genres than artists"),
        ];
        for (list, expected, desc) in cases {
            let got = genre_heterogeneity(&list, &artists);
            assert!((got - expected).abs() < 1e-12, "{desc}: {got}");
        }
    }

    #[test]
    fn test_average_betweenness() {
        let artists = roster(vec![
            artist("a", "", Some(0.2)),
            artist("b", "", Some(0.4)),
            artist("c", "", None),
        ]);
        let cases = vec![
            (ids(&[]), 0.0, "no collaborators"),
            (ids(&["a", "b"]), 0.3, "plain mean"),
            (ids(&["b", "c"]), 0.2, "unset counts as zero"),
        ];
        for (list, expected, desc) in cases {
            let got = average_betweenness(&list, &artists);
            assert!((got - expected).abs() < 1e-12, "{desc}: {got}");
        }
    }

    #[test]
    fn test_artist_metrics_cover_isolated_artists() {
        let mut snapshot = Snapshot {
            artists: roster(vec![artist("a", "", None), artist("b", "", None), artist("solo", "", None)]),
            songs: Vec::new(),
        };
        snapshot.songs.push(HitSong {
            id: "s1".into(),
            name: "x".into(),
            album: String::new(),
            popularity: 10,
            release_date: None,
            explicit: false,
            is_collaboration: true,
            market_of_origin: "BR".into(),
            features: crate::types::AudioFeatures::default(),
            artist_ids: ids(&["a", "b"]),
            genre_heterogeneity: None,
            avg_artist_betweenness: None,
        });
        let mut solo = snapshot.songs[0].clone();
        solo.id = "s2".into();
        solo.is_collaboration = false;
        solo.artist_ids = ids(&["a"]);
        snapshot.songs.push(solo);

        let mut centrality = Centrality::default();
        centrality.degree.insert("a".into(), 1.0);
        centrality.degree.insert("b".into(), 1.0);

        let metrics = artist_metrics(&snapshot, &centrality);
        assert_eq!(metrics.len(), 3);
        assert_eq!((metrics[0].num_hits, metrics[0].num_collab_hits), (2, 1));
        assert_eq!(metrics[2].id, "solo");
        assert_eq!(metrics[2].degree, 0.0);
        assert_eq!(metrics[2].num_hits, 0);
        assert_eq!(collaboration_count(&snapshot.songs), 1);
    }
}
