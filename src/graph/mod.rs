// src/graph/mod.rs
pub mod builder;
pub mod centrality;
pub mod community;
pub mod network;

use std::collections::BTreeMap;

pub use community::Partition;
pub use network::CollabGraph;

use crate::types::HitSong;

/// Per-artist centrality scores keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Centrality {
    pub betweenness: BTreeMap<String, f64>,
    pub degree: BTreeMap<String, f64>,
}

/// Orchestrates graph construction and scoring.
pub struct GraphEngine;

impl GraphEngine {
    #[must_use]
    pub fn build(songs: &[HitSong]) -> CollabGraph {
        let edges = builder::build_edges(songs);
        let graph = CollabGraph::from_edges(&edges);
        tracing::info!(
            nodes = graph.num_nodes(),
            edges = graph.num_edges(),
            "collaboration graph built"
        );
        graph
    }

    #[must_use]
    pub fn centrality(graph: &CollabGraph) -> Centrality {
        let by_label = |scores: Vec<f64>| -> BTreeMap<String, f64> {
            graph.labels().iter().cloned().zip(scores).collect()
        };
        Centrality {
            betweenness: by_label(centrality::betweenness_centrality(graph)),
            degree: by_label(centrality::degree_centrality(graph)),
        }
    }

    #[must_use]
    pub fn communities(graph: &CollabGraph, seed: u64, resolution: f64) -> Partition {
        community::detect(graph, seed, resolution)
    }
}
