// src/communities.rs
//! Genre profiles of detected communities.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::graph::{CollabGraph, Partition};
use crate::types::Artist;

/// One community with its genre tally.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunityProfile {
    pub id: usize,
    pub members: usize,
    /// Most frequent lower-cased genre; `None` when no member declares one.
    pub dominant_genre: Option<String>,
    /// Up to N `(genre, count)` pairs, most frequent first.
    pub top_genres: Vec<(String, usize)>,
}

/// Identifier to community id for every graph node.
#[must_use]
pub fn membership(graph: &CollabGraph, partition: &Partition) -> BTreeMap<String, usize> {
    graph
        .labels()
        .iter()
        .cloned()
        .zip(partition.membership.iter().copied())
        .collect()
}

/// Builds one profile per community, ordered by community id.
///
/// Members are tallied in identifier order and genres in their declared
/// order, so ties resolve to the genre encountered first.
#[must_use]
pub fn profiles(
    graph: &CollabGraph,
    partition: &Partition,
    artists: &BTreeMap<String, Artist>,
    top_n: usize,
) -> Vec<CommunityProfile> {
    let mut tallies: Vec<GenreTally> = vec![GenreTally::default(); partition.count];
    let mut sizes = vec![0_usize; partition.count];

    for (id, artist) in artists {
        let Some(node) = graph.index_of(id) else {
            continue;
        };
        let community = partition.membership[node];
        sizes[community] += 1;
        for genre in artist.genres.lowercased().iter() {
            tallies[community].add(genre);
        }
    }

    tallies
        .into_iter()
        .zip(sizes)
        .enumerate()
        .map(|(id, (tally, members))| CommunityProfile {
            id,
            members,
            dominant_genre: tally.dominant().map(str::to_string),
            top_genres: tally.top(top_n),
        })
        .collect()
}

/// Frequency count that remembers first-encounter order.
#[derive(Debug, Clone, Default)]
struct GenreTally {
    counts: Vec<(String, usize)>,
}

impl GenreTally {
    fn add(&mut self, genre: &str) {
        match self.counts.iter_mut().find(|(g, _)| g == genre) {
            Some((_, n)) => *n += 1,
            None => self.counts.push((genre.to_string(), 1)),
        }
    }

    fn dominant(&self) -> Option<&str> {
        let mut best: Option<&(String, usize)> = None;
        for entry in &self.counts {
            if best.map_or(true, |b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(g, _)| g.as_str())
    }

    fn top(mut self, n: usize) -> Vec<(String, usize)> {
        // Stable sort keeps encounter order among equal counts.
        self.counts.sort_by(|a, b| b.1.cmp(&a.1));
        self.counts.truncate(n);
        self.counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genres;
    use crate::graph::builder::EdgeMap;

    fn artist(id: &str, raw_genres: &str) -> Artist {
        let (genres, genre_parse) = genres::parse(raw_genres);
        Artist {
            id: id.to_string(),
            name: id.to_string(),
            raw_genres: raw_genres.to_string(),
            genres,
            genre_parse,
            popularity: None,
            num_hits: None,
            num_collab_hits: None,
            betweenness: None,
            degree: None,
        }
    }

    #[test]
    fn test_tally_tie_break_is_first_encountered() {
        let mut tally = GenreTally::default();
        for g in ["funk", "pop", "pop", "funk", "axe"] {
            tally.add(g);
        }
        assert_eq!(tally.dominant(), Some("funk"));
        assert_eq!(
            tally.top(2),
            vec![("funk".to_string(), 2), ("pop".to_string(), 2)]
        );
        assert_eq!(GenreTally::default().dominant(), None);
    }

    #[test]
    fn test_profiles_skip_isolated_artists() {
        let mut edges = EdgeMap::new();
        edges.entry("a".into()).or_default().insert("b".into(), 1);
        let graph = CollabGraph::from_edges(&edges);
        let partition = Partition {
            membership: vec![0, 0],
            count: 1,
            modularity: 0.0,
        };
        let artists: BTreeMap<String, Artist> = [
            artist("a", "['Sertanejo', 'pop']"),
            artist("b", "['sertanejo universitario', 'POP']"),
            artist("loner", "['pop', 'pop rock', 'mpb']"),
        ]
        .into_iter()
        .map(|a| (a.id.clone(), a))
        .collect();

        let profiles = profiles(&graph, &partition, &artists, 3);
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].members, 2);
        assert_eq!(profiles[0].dominant_genre.as_deref(), Some("pop"));
        assert_eq!(profiles[0].top_genres.len(), 3);
        assert_eq!(profiles[0].top_genres[1], ("sertanejo".to_string(), 1));
        assert_eq!(membership(&graph, &partition).get("a"), Some(&0));
    }

    #[test]
    fn test_community_without_genres() {
        let mut edges = EdgeMap::new();
        edges.entry("x".into()).or_default().insert("y".into(), 2);
        let graph = CollabGraph::from_edges(&edges);
        let partition = Partition {
            membership: vec![0, 0],
            count: 1,
            modularity: 0.0,
        };
        let artists = [artist("x", ""), artist("y", "[]")]
            .into_iter()
            .map(|a| (a.id.clone(), a))
            .collect();

        let profiles = profiles(&graph, &partition, &artists, 3);
        assert_eq!(profiles[0].dominant_genre, None);
        assert!(profiles[0].top_genres.is_empty());
    }
}
