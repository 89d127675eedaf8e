// src/graph/builder.rs
//! Graph construction logic: pair enumeration and edge weighting.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::HitSong;

/// Weighted edge map keyed by the lexicographically smaller identifier.
/// `edges[a][b]` with `a < b` is the number of songs crediting both.
pub type EdgeMap = BTreeMap<String, BTreeMap<String, usize>>;

/// Counts co-credits for every unordered pair of distinct artists.
///
/// Songs with fewer than two distinct artists contribute nothing. A song
/// listing the same artist twice counts that artist once.
#[must_use]
pub fn build_edges(songs: &[HitSong]) -> EdgeMap {
    let mut edges = EdgeMap::new();

    for song in songs {
        let credited: BTreeSet<&str> = song.artist_ids.iter().map(String::as_str).collect();
        add_song_edges(&credited.into_iter().collect::<Vec<_>>(), &mut edges);
    }

    edges
}

fn add_song_edges(artists: &[&str], edges: &mut EdgeMap) {
    for (i, a) in artists.iter().enumerate() {
        for b in artists.iter().skip(i + 1) {
            let (lo, hi) = canonical(a, b);
            *edges
                .entry(lo.to_string())
                .or_default()
                .entry(hi.to_string())
                .or_default() += 1;
        }
    }
}

fn canonical<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Every identifier that appears in at least one pair.
#[must_use]
pub fn collect_nodes(edges: &EdgeMap) -> BTreeSet<String> {
    let mut nodes = BTreeSet::new();
    for (src, targets) in edges {
        nodes.insert(src.clone());
        nodes.extend(targets.keys().cloned());
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AudioFeatures;

    fn song(id: &str, artists: &[&str]) -> HitSong {
        HitSong {
            id: id.to_string(),
            name: id.to_string(),
            album: String::new(),
            popularity: 0,
            release_date: None,
            explicit: false,
            is_collaboration: artists.len() > 1,
            market_of_origin: "BR".to_string(),
            features: AudioFeatures::default(),
            artist_ids: artists.iter().map(|s| (*s).to_string()).collect(),
            genre_heterogeneity: None,
            avg_artist_betweenness: None,
        }
    }

    fn weight(edges: &EdgeMap, a: &str, b: &str) -> Option<usize> {
        let (lo, hi) = canonical(a, b);
        edges.get(lo).and_then(|t| t.get(hi)).copied()
    }

    #[test]
    fn test_three_song_scenario() {
        let songs = vec![
            song("s1", &["A", "B"]),
            song("s2", &["B", "C"]),
            song("s3", &["A", "B", "C"]),
        ];
        let edges = build_edges(&songs);

        assert_eq!(weight(&edges, "A", "B"), Some(2));
        assert_eq!(weight(&edges, "B", "C"), Some(2));
        assert_eq!(weight(&edges, "C", "A"), Some(1));
        assert_eq!(collect_nodes(&edges).len(), 3);
    }

    #[test]
    fn test_solo_and_duplicate_credits() {
        let songs = vec![
            song("solo", &["A"]),
            song("empty", &[]),
            song("twice", &["A", "A"]),
            song("dup", &["B", "A", "B"]),
        ];
        let edges = build_edges(&songs);

        assert_eq!(weight(&edges, "A", "A"), None, "no self loops");
        assert_eq!(weight(&edges, "A", "B"), Some(1));
        assert_eq!(collect_nodes(&edges).len(), 2);
    }

    #[test]
    fn test_weights_match_bruteforce_count() {
        let songs = vec![
            song("1", &["d", "a", "c"]),
            song("2", &["a", "c"]),
            song("3", &["c", "b", "a", "d"]),
            song("4", &["b"]),
            song("5", &["d", "b"]),
        ];
        let edges = build_edges(&songs);
        let ids = ["a", "b", "c", "d"];

        for x in ids {
            for y in ids {
                if x >= y {
                    continue;
                }
                let brute = songs
                    .iter()
                    .filter(|s| s.artist_ids.iter().any(|i| i == x) && s.artist_ids.iter().any(|i| i == y))
                    .count();
                assert_eq!(weight(&edges, x, y).unwrap_or(0), brute, "pair {x}-{y}");
            }
        }
    }

    #[test]
    fn test_input_order_does_not_change_weights() {
        let forward = vec![song("1", &["a", "b", "c"]), song("2", &["c", "a"])];
        let backward = vec![song("2", &["a", "c"]), song("1", &["c", "b", "a"])];
        assert_eq!(build_edges(&forward), build_edges(&backward));
    }
}
