//! Contact network topology for the Epinet simulation
//!
//! Provides the arena-backed [`Graph`] and the Barabási–Albert
//! preferential-attachment generator that grows the scale-free contact
//! network a run spreads over.

use std::collections::VecDeque;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::rng::RandomSource;
use crate::types::NodeId;

/// An undirected contact network
///
/// Nodes are the integers `0..node_count`; adjacency lists are indexed by
/// [`NodeId`]. Self-loops and duplicate edges are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Graph {
    adjacency: Vec<Vec<NodeId>>,
    edge_count: usize,
}

impl Graph {
    /// Create a graph of `node_count` isolated nodes
    pub fn new(node_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); node_count],
            edge_count: 0,
        }
    }

    /// Add an undirected edge. Returns `false` (and changes nothing) for
    /// self-loops, duplicates and unknown nodes.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> bool {
        if a == b || a.index() >= self.node_count() || b.index() >= self.node_count() {
            return false;
        }
        if self.contains_edge(a, b) {
            return false;
        }

        self.adjacency[a.index()].push(b);
        self.adjacency[b.index()].push(a);
        self.edge_count += 1;
        true
    }

    /// Neighbors of a node, in the order their edges were added
    pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
        &self.adjacency[id.index()]
    }

    /// Number of edges incident to a node
    pub fn degree(&self, id: NodeId) -> usize {
        self.adjacency[id.index()].len()
    }

    /// Check if two nodes are directly connected
    pub fn contains_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.adjacency
            .get(a.index())
            .map(|neighbors| neighbors.contains(&b))
            .unwrap_or(false)
    }

    /// Get number of nodes
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Get number of edges
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Every edge once, as `(low, high)` pairs
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(a, neighbors)| {
            neighbors
                .iter()
                .filter(move |b| a < b.index())
                .map(move |b| (NodeId(a), *b))
        })
    }

    /// Hop distance from `source` to every node (`None` when unreachable)
    pub fn hop_distances(&self, source: NodeId) -> Vec<Option<usize>> {
        let mut distances = vec![None; self.node_count()];
        let mut queue = VecDeque::new();
        distances[source.index()] = Some(0);
        queue.push_back(source);

        while let Some(node) = queue.pop_front() {
            let next = distances[node.index()].map(|d| d + 1);
            for neighbor in self.neighbors(node) {
                if distances[neighbor.index()].is_none() {
                    distances[neighbor.index()] = next;
                    queue.push_back(*neighbor);
                }
            }
        }
        distances
    }

    /// Degree statistics for reporting and tail checks
    pub fn degree_summary(&self) -> DegreeSummary {
        let degrees: Vec<usize> = self.adjacency.iter().map(Vec::len).collect();
        let max = degrees.iter().copied().max().unwrap_or(0);
        let min = degrees.iter().copied().min().unwrap_or(0);
        let mean = if degrees.is_empty() {
            0.0
        } else {
            degrees.iter().sum::<usize>() as f64 / degrees.len() as f64
        };

        let mut histogram = vec![0; max + 1];
        for degree in degrees {
            histogram[degree] += 1;
        }

        DegreeSummary {
            min,
            max,
            mean,
            histogram,
        }
    }

    /// Print a simple ASCII listing of the first `limit` nodes
    pub fn visualize(&self, limit: usize) -> String {
        let mut output = String::new();
        output.push_str("Contact Network:\n");
        output.push_str(&format!("  Nodes: {}\n", self.node_count()));
        output.push_str(&format!("  Edges: {}\n\n", self.edge_count()));

        for (node, neighbors) in self.adjacency.iter().enumerate().take(limit) {
            let neighbor_str: Vec<String> = neighbors.iter().map(|n| n.0.to_string()).collect();
            output.push_str(&format!("  {} -> [{}]\n", node, neighbor_str.join(", ")));
        }
        if self.node_count() > limit {
            output.push_str(&format!("  ... ({} more)\n", self.node_count() - limit));
        }
        output
    }
}

/// Degree distribution of a graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DegreeSummary {
    pub min: usize,
    pub max: usize,
    pub mean: f64,
    /// `histogram[d]` is the number of nodes with degree `d`
    pub histogram: Vec<usize>,
}

/// One ticket per edge endpoint: a uniform draw picks a node with
/// probability proportional to its degree.
struct DegreeUrn {
    tickets: Vec<NodeId>,
}

impl DegreeUrn {
    fn with_capacity(edges: usize) -> Self {
        Self {
            tickets: Vec::with_capacity(edges * 2),
        }
    }

    fn push_edge(&mut self, a: NodeId, b: NodeId) {
        self.tickets.push(a);
        self.tickets.push(b);
    }

    fn draw(&self, rng: &mut RandomSource) -> Option<NodeId> {
        if self.tickets.is_empty() {
            None
        } else {
            Some(self.tickets[rng.index(self.tickets.len())])
        }
    }
}

/// Grow a Barabási–Albert scale-free network
///
/// The seed graph is the complete graph on nodes `0..m` (a single isolated
/// node when `m == 1`). Each later node `v` attaches to `m` distinct earlier
/// nodes drawn proportionally to their degree before `v` joined; a draw that
/// repeats an already chosen target is rejected and redrawn. The result has
/// `m * (population - m) + m * (m - 1) / 2` edges.
pub fn generate(
    population: usize,
    attachment_degree: usize,
    rng: &mut RandomSource,
) -> Result<Graph, ConfigError> {
    if population < 1 {
        return Err(ConfigError::Population(population as i64));
    }
    if attachment_degree < 1 || attachment_degree >= population {
        return Err(ConfigError::AttachmentDegree {
            degree: attachment_degree as i64,
            population: population as i64,
        });
    }

    let m = attachment_degree;
    let seed_edges = m * (m - 1) / 2;
    let mut graph = Graph::new(population);
    let mut urn = DegreeUrn::with_capacity(seed_edges + m * (population - m));

    for a in 0..m {
        for b in (a + 1)..m {
            graph.add_edge(NodeId(a), NodeId(b));
            urn.push_edge(NodeId(a), NodeId(b));
        }
    }
    debug!(seed_nodes = m, seed_edges, "Seed clique built");

    let mut targets: Vec<NodeId> = Vec::with_capacity(m);
    for v in m..population {
        targets.clear();
        // The urn only lacks m distinct nodes while it is empty (m == 1, v == 1)
        while targets.len() < m {
            let candidate = urn.draw(rng).unwrap_or_else(|| NodeId(rng.index(v)));
            if !targets.contains(&candidate) {
                targets.push(candidate);
            }
        }

        let new_node = NodeId(v);
        for &target in &targets {
            graph.add_edge(new_node, target);
            urn.push_edge(new_node, target);
        }
    }

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        attachment_degree = m,
        "Generated Barabási–Albert network"
    );
    Ok(graph)
}
