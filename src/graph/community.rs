// src/graph/community.rs
//! Multi-level Louvain community detection.
//!
//! Each level greedily moves nodes between neighbouring communities while
//! modularity improves, then collapses every community into a single node
//! (internal weight kept as a self-loop) and repeats on the smaller graph.
//! Node visiting order and candidate order are shuffled with a seeded
//! [`StdRng`], so a fixed seed gives a fixed partition.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use super::network::CollabGraph;

/// Smallest modularity gain that still counts as progress.
const MIN_GAIN: f64 = 1e-7;

/// A node-to-community assignment over a [`CollabGraph`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Partition {
    /// Community id per node index. Ids are dense and numbered by first
    /// appearance in node order.
    pub membership: Vec<usize>,
    pub count: usize,
    pub modularity: f64,
}

impl Partition {
    /// Node indices grouped by community id.
    #[must_use]
    pub fn members(&self) -> Vec<Vec<usize>> {
        let mut groups = vec![Vec::new(); self.count];
        for (node, &c) in self.membership.iter().enumerate() {
            groups[c].push(node);
        }
        groups
    }
}

/// Runs Louvain on `graph` with the given seed and resolution.
#[must_use]
pub fn detect(graph: &CollabGraph, seed: u64, resolution: f64) -> Partition {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut level = Level::from_graph(graph);
    let mut membership: Vec<usize> = (0..graph.num_nodes()).collect();

    if level.total_weight > 0.0 {
        let mut state = State::new(&level);
        state.one_level(&level, resolution, &mut rng);
        let mut current_mod = state.modularity(resolution);
        let mut assignment = renumber(&state.node2com);
        compose(&mut membership, &assignment);
        level = level.induced(&assignment);

        loop {
            let mut state = State::new(&level);
            state.one_level(&level, resolution, &mut rng);
            let new_mod = state.modularity(resolution);
            if new_mod - current_mod < MIN_GAIN {
                break;
            }
            current_mod = new_mod;
            assignment = renumber(&state.node2com);
            compose(&mut membership, &assignment);
            level = level.induced(&assignment);
        }
    }

    let membership = renumber(&membership);
    let count = membership.iter().max().map_or(0, |&m| m + 1);
    let q = modularity(graph, &membership, resolution);
    tracing::debug!(communities = count, modularity = q, "louvain finished");

    Partition {
        membership,
        count,
        modularity: q,
    }
}

/// Weighted modularity `sum_c [ in_c / m - resolution * (tot_c / 2m)^2 ]`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn modularity(graph: &CollabGraph, membership: &[usize], resolution: f64) -> f64 {
    let m = graph.total_weight() as f64;
    if m == 0.0 {
        return 0.0;
    }
    let k = membership.iter().max().map_or(0, |&c| c + 1);
    let mut internal = vec![0.0; k];
    let mut total = vec![0.0; k];

    for (i, j, w) in graph.edges() {
        if membership[i] == membership[j] {
            internal[membership[i]] += w as f64;
        }
    }
    for (v, &c) in membership.iter().enumerate() {
        total[c] += graph.strength(v) as f64;
    }

    internal
        .iter()
        .zip(&total)
        .map(|(&inside, &tot)| inside / m - resolution * (tot / (2.0 * m)).powi(2))
        .sum()
}

/// One level of the hierarchy: adjacency without self-loops plus a
/// separate self-loop weight per node.
struct Level {
    adjacency: Vec<Vec<(usize, f64)>>,
    loops: Vec<f64>,
    total_weight: f64,
}

impl Level {
    #[allow(clippy::cast_precision_loss)]
    fn from_graph(graph: &CollabGraph) -> Self {
        let adjacency = (0..graph.num_nodes())
            .map(|v| {
                graph
                    .neighbors(v)
                    .iter()
                    .map(|&(w, weight)| (w, weight as f64))
                    .collect()
            })
            .collect();
        Self {
            adjacency,
            loops: vec![0.0; graph.num_nodes()],
            total_weight: graph.total_weight() as f64,
        }
    }

    fn len(&self) -> usize {
        self.loops.len()
    }

    /// Weighted degree, self-loops counted twice.
    fn node_degree(&self, v: usize) -> f64 {
        self.adjacency[v].iter().map(|&(_, w)| w).sum::<f64>() + 2.0 * self.loops[v]
    }

    /// Collapses each community of `assignment` into one node.
    fn induced(&self, assignment: &[usize]) -> Self {
        let k = assignment.iter().max().map_or(0, |&c| c + 1);
        let mut loops = vec![0.0; k];
        let mut links: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); k];

        for v in 0..self.len() {
            let cv = assignment[v];
            loops[cv] += self.loops[v];
            for &(u, w) in &self.adjacency[v] {
                if v >= u {
                    continue;
                }
                let cu = assignment[u];
                if cu == cv {
                    loops[cv] += w;
                } else {
                    *links[cv].entry(cu).or_default() += w;
                    *links[cu].entry(cv).or_default() += w;
                }
            }
        }

        Self {
            adjacency: links.into_iter().map(|m| m.into_iter().collect()).collect(),
            loops,
            total_weight: self.total_weight,
        }
    }
}

/// Mutable community bookkeeping for one level.
struct State {
    node2com: Vec<usize>,
    /// Total weighted degree per community.
    degrees: Vec<f64>,
    /// Weighted degree per node.
    gdegrees: Vec<f64>,
    /// Internal weight per community.
    internals: Vec<f64>,
    loops: Vec<f64>,
    total_weight: f64,
}

impl State {
    fn new(level: &Level) -> Self {
        let gdegrees: Vec<f64> = (0..level.len()).map(|v| level.node_degree(v)).collect();
        Self {
            node2com: (0..level.len()).collect(),
            degrees: gdegrees.clone(),
            gdegrees,
            internals: level.loops.clone(),
            loops: level.loops.clone(),
            total_weight: level.total_weight,
        }
    }

    fn modularity(&self, resolution: f64) -> f64 {
        let m = self.total_weight;
        if m == 0.0 {
            return 0.0;
        }
        self.internals
            .iter()
            .zip(&self.degrees)
            .filter(|&(_, &deg)| deg > 0.0)
            .map(|(&inside, &deg)| inside / m - resolution * (deg / (2.0 * m)).powi(2))
            .sum()
    }

    /// Weight from `node` to each neighbouring community, self-loop excluded.
    fn neighbour_communities(&self, level: &Level, node: usize) -> BTreeMap<usize, f64> {
        let mut weights = BTreeMap::new();
        for &(u, w) in &level.adjacency[node] {
            *weights.entry(self.node2com[u]).or_default() += w;
        }
        weights
    }

    fn remove(&mut self, node: usize, com: usize, weight: f64) {
        self.degrees[com] -= self.gdegrees[node];
        self.internals[com] -= weight + self.loops[node];
    }

    fn insert(&mut self, node: usize, com: usize, weight: f64) {
        self.node2com[node] = com;
        self.degrees[com] += self.gdegrees[node];
        self.internals[com] += weight + self.loops[node];
    }

    /// Local moving phase: repeat passes until nothing moves or the gain
    /// of a pass falls below [`MIN_GAIN`].
    fn one_level(&mut self, level: &Level, resolution: f64, rng: &mut StdRng) {
        let two_m = 2.0 * self.total_weight;
        let mut new_mod = self.modularity(resolution);
        let mut order: Vec<usize> = (0..level.len()).collect();

        loop {
            let cur_mod = new_mod;
            let mut moved = false;
            order.shuffle(rng);

            for &node in &order {
                let home = self.node2com[node];
                let share = self.gdegrees[node] / two_m;
                let neighbours = self.neighbour_communities(level, node);
                let home_weight = neighbours.get(&home).copied().unwrap_or(0.0);
                let remove_cost = -home_weight
                    + resolution * (self.degrees[home] - self.gdegrees[node]) * share;
                self.remove(node, home, home_weight);

                let mut candidates: Vec<(usize, f64)> = neighbours.into_iter().collect();
                candidates.shuffle(rng);

                let mut best = (home, home_weight, 0.0);
                for (com, dnc) in candidates {
                    let gain = remove_cost + dnc - resolution * self.degrees[com] * share;
                    if gain > best.2 {
                        best = (com, dnc, gain);
                    }
                }

                self.insert(node, best.0, best.1);
                moved |= best.0 != home;
            }

            new_mod = self.modularity(resolution);
            if !moved || new_mod - cur_mod < MIN_GAIN {
                break;
            }
        }
    }
}

/// Maps arbitrary ids to `0..k` by first appearance.
fn renumber(ids: &[usize]) -> Vec<usize> {
    let mut seen = BTreeMap::new();
    ids.iter()
        .map(|&id| {
            let next = seen.len();
            *seen.entry(id).or_insert(next)
        })
        .collect()
}

fn compose(membership: &mut [usize], assignment: &[usize]) {
    for m in membership.iter_mut() {
        *m = assignment[*m];
    }
}
