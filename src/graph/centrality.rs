// src/graph/centrality.rs
//! Degree and weighted betweenness centrality.
//!
//! Betweenness uses Brandes' accumulation over Dijkstra searches. The edge
//! weight is taken as the edge *length*: two artists who share more songs are
//! farther apart on a shortest path, not closer.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::network::CollabGraph;

/// Degree divided by `n - 1`. A lone node scores 1.0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn degree_centrality(graph: &CollabGraph) -> Vec<f64> {
    let n = graph.num_nodes();
    if n == 1 {
        return vec![1.0];
    }
    let scale = 1.0 / (n.saturating_sub(1)).max(1) as f64;
    (0..n).map(|v| graph.degree(v) as f64 * scale).collect()
}

/// Normalized weighted betweenness for every node, in index order.
///
/// Sources are processed in index order so the floating-point sums are
/// identical between runs. Graphs with two or fewer nodes are not rescaled.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn betweenness_centrality(graph: &CollabGraph) -> Vec<f64> {
    let n = graph.num_nodes();
    let mut scores = vec![0.0; n];

    for source in 0..n {
        let search = ShortestPaths::from(graph, source);
        accumulate(&search, source, &mut scores);
    }

    if n > 2 {
        let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
        for s in &mut scores {
            *s *= scale;
        }
    }
    scores
}

/// Single-source shortest-path DAG: settle order, path counts, predecessors.
struct ShortestPaths {
    order: Vec<usize>,
    sigma: Vec<f64>,
    preds: Vec<Vec<usize>>,
}

impl ShortestPaths {
    fn from(graph: &CollabGraph, source: usize) -> Self {
        let n = graph.num_nodes();
        let mut dist: Vec<Option<u64>> = vec![None; n];
        let mut settled = vec![false; n];
        let mut sigma = vec![0.0; n];
        let mut preds = vec![Vec::new(); n];
        let mut order = Vec::with_capacity(n);
        let mut heap = BinaryHeap::new();

        dist[source] = Some(0);
        sigma[source] = 1.0;
        heap.push(Reverse((0_u64, source)));

        while let Some(Reverse((d, v))) = heap.pop() {
            if settled[v] || dist[v].is_some_and(|best| d > best) {
                continue;
            }
            settled[v] = true;
            order.push(v);

            for &(w, weight) in graph.neighbors(v) {
                if settled[w] {
                    continue;
                }
                let candidate = d + weight as u64;
                match dist[w] {
                    Some(best) if candidate > best => {}
                    Some(best) if candidate == best => {
                        sigma[w] += sigma[v];
                        preds[w].push(v);
                    }
                    _ => {
                        dist[w] = Some(candidate);
                        sigma[w] = sigma[v];
                        preds[w] = vec![v];
                        heap.push(Reverse((candidate, w)));
                    }
                }
            }
        }

        Self { order, sigma, preds }
    }
}

fn accumulate(search: &ShortestPaths, source: usize, scores: &mut [f64]) {
    let mut delta = vec![0.0; scores.len()];
    for &w in search.order.iter().rev() {
        let coeff = (1.0 + delta[w]) / search.sigma[w];
        for &v in &search.preds[w] {
            delta[v] += search.sigma[v] * coeff;
        }
        if w != source {
            scores[w] += delta[w];
        }
    }
}
