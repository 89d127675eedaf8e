// src/graph/network.rs
//! The collaboration graph structure and query interface.

use std::collections::HashMap;

use super::builder::EdgeMap;

/// Weighted undirected simple graph over artist identifiers.
///
/// Nodes are indexed in sorted identifier order and every adjacency list is
/// sorted by neighbour index, so traversals are reproducible.
#[derive(Debug, Clone, Default)]
pub struct CollabGraph {
    labels: Vec<String>,
    index: HashMap<String, usize>,
    adjacency: Vec<Vec<(usize, usize)>>,
    n_edges: usize,
}

impl CollabGraph {
    /// Materializes one node per identifier in `edges` and one edge per pair.
    #[must_use]
    pub fn from_edges(edges: &EdgeMap) -> Self {
        let labels: Vec<String> = super::builder::collect_nodes(edges).into_iter().collect();
        let index: HashMap<String, usize> = labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.clone(), i))
            .collect();

        let mut adjacency = vec![Vec::new(); labels.len()];
        let mut n_edges = 0;
        for (a, targets) in edges {
            for (b, &w) in targets {
                let (Some(&i), Some(&j)) = (index.get(a), index.get(b)) else {
                    continue;
                };
                if i == j || w == 0 {
                    continue;
                }
                adjacency[i].push((j, w));
                adjacency[j].push((i, w));
                n_edges += 1;
            }
        }
        for list in &mut adjacency {
            list.sort_unstable();
        }

        Self {
            labels,
            index,
            adjacency,
            n_edges,
        }
    }

    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.n_edges
    }

    /// Node identifiers in index order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[must_use]
    pub fn label(&self, node: usize) -> &str {
        &self.labels[node]
    }

    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// `(neighbour, weight)` pairs sorted by neighbour index.
    #[must_use]
    pub fn neighbors(&self, node: usize) -> &[(usize, usize)] {
        &self.adjacency[node]
    }

    /// Weight of the edge between two identifiers, if any.
    #[must_use]
    pub fn weight(&self, a: &str, b: &str) -> Option<usize> {
        let (i, j) = (self.index_of(a)?, self.index_of(b)?);
        self.adjacency[i]
            .binary_search_by_key(&j, |&(n, _)| n)
            .ok()
            .map(|pos| self.adjacency[i][pos].1)
    }

    /// Unweighted degree.
    #[must_use]
    pub fn degree(&self, node: usize) -> usize {
        self.adjacency[node].len()
    }

    /// Sum of incident edge weights.
    #[must_use]
    pub fn strength(&self, node: usize) -> usize {
        self.adjacency[node].iter().map(|&(_, w)| w).sum()
    }

    /// Every edge once, as `(i, j, weight)` with `i < j`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(i, list)| {
            list.iter()
                .filter(move |&&(j, _)| i < j)
                .map(move |&(j, w)| (i, j, w))
        })
    }

    #[must_use]
    pub fn total_weight(&self) -> usize {
        self.edges().map(|(_, _, w)| w).sum()
    }

    /// Edge density `2m / (n(n-1))`; zero for fewer than two nodes.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn density(&self) -> f64 {
        let n = self.num_nodes();
        if n < 2 {
            return 0.0;
        }
        2.0 * self.n_edges as f64 / (n * (n - 1)) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge_map(pairs: &[(&str, &str, usize)]) -> EdgeMap {
        let mut edges = EdgeMap::new();
        for &(a, b, w) in pairs {
            edges.entry(a.to_string()).or_default().insert(b.to_string(), w);
        }
        edges
    }

    #[test]
    fn test_sorted_indexing_and_lookup() {
        let g = CollabGraph::from_edges(&edge_map(&[("b", "c", 2), ("a", "b", 1)]));

        assert_eq!(g.labels(), ["a", "b", "c"]);
        assert_eq!(g.index_of("c"), Some(2));
        assert_eq!(g.weight("c", "b"), Some(2));
        assert_eq!(g.weight("a", "c"), None);
        assert_eq!(g.num_edges(), 2);
        assert_eq!(g.total_weight(), 3);
    }

    #[test]
    fn test_handshake() {
        let g = CollabGraph::from_edges(&edge_map(&[
            ("a", "b", 1),
            ("a", "c", 4),
            ("b", "c", 1),
            ("c", "d", 2),
            ("d", "e", 1),
        ]));
        let degree_sum: usize = (0..g.num_nodes()).map(|v| g.degree(v)).sum();
        assert_eq!(degree_sum, 2 * g.num_edges());
    }

    #[test]
    fn test_density() {
        let cases = vec![
            (edge_map(&[]), 0.0, "empty"),
            (edge_map(&[("a", "b", 3)]), 1.0, "single edge"),
            (edge_map(&[("a", "b", 1), ("b", "c", 1)]), 2.0 / 3.0, "path"),
        ];
        for (edges, expected, desc) in cases {
            let d = CollabGraph::from_edges(&edges).density();
            assert!((d - expected).abs() < 1e-12, "{desc}: {d}");
        }
    }
}
