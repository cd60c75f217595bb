//! Core types for the Epinet simulation
//!
//! Models a population of numbered individuals (0..N-1) connected by an
//! undirected contact network, each carrying an SIR health status.

use serde::{Deserialize, Serialize};

/// Unique identifier for a node in the contact network (0..N-1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Position of this node in arena-backed storage
    pub fn index(self) -> usize {
        self.0
    }

    /// All node IDs for a population of the given size
    pub fn range(population: usize) -> impl Iterator<Item = NodeId> {
        (0..population).map(NodeId)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<usize> for NodeId {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

/// Health status of an individual
///
/// The derived ordering follows the only permitted direction of travel:
/// `Susceptible < Infected < Recovered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HealthStatus {
    Susceptible,
    Infected,
    Recovered,
}

impl HealthStatus {
    /// Every status, in progression order
    pub const ALL: [HealthStatus; 3] = [
        HealthStatus::Susceptible,
        HealthStatus::Infected,
        HealthStatus::Recovered,
    ];

    /// Single-letter code used in compact output (S, I, R)
    pub fn code(self) -> char {
        match self {
            HealthStatus::Susceptible => 'S',
            HealthStatus::Infected => 'I',
            HealthStatus::Recovered => 'R',
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HealthStatus::Susceptible => "Susceptible",
            HealthStatus::Infected => "Infected",
            HealthStatus::Recovered => "Recovered",
        };
        f.write_str(name)
    }
}

/// Number of individuals in each health status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub susceptible: usize,
    pub infected: usize,
    pub recovered: usize,
}

impl StatusCounts {
    /// Tally a slice of statuses
    pub fn tally(statuses: &[HealthStatus]) -> Self {
        let mut counts = Self::default();
        for status in statuses {
            *counts.get_mut(*status) += 1;
        }
        counts
    }

    /// Count for one status
    pub fn get(&self, status: HealthStatus) -> usize {
        match status {
            HealthStatus::Susceptible => self.susceptible,
            HealthStatus::Infected => self.infected,
            HealthStatus::Recovered => self.recovered,
        }
    }

    pub(crate) fn get_mut(&mut self, status: HealthStatus) -> &mut usize {
        match status {
            HealthStatus::Susceptible => &mut self.susceptible,
            HealthStatus::Infected => &mut self.infected,
            HealthStatus::Recovered => &mut self.recovered,
        }
    }

    /// Total population covered by these counts
    pub fn total(&self) -> usize {
        self.susceptible + self.infected + self.recovered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_ordering_follows_progression() {
        assert!(HealthStatus::Susceptible < HealthStatus::Infected);
        assert!(HealthStatus::Infected < HealthStatus::Recovered);
        assert_eq!(HealthStatus::ALL.iter().max(), Some(&HealthStatus::Recovered));
    }

    #[test]
    fn test_node_range() {
        let nodes: Vec<NodeId> = NodeId::range(3).collect();
        assert_eq!(nodes, vec![NodeId(0), NodeId(1), NodeId(2)]);
        assert_eq!(nodes[2].index(), 2);
        assert_eq!(nodes[1].to_string(), "#1");
    }

    #[test]
    fn test_tally() {
        use HealthStatus::*;
        let counts = StatusCounts::tally(&[Susceptible, Infected, Infected, Recovered, Susceptible]);
        assert_eq!(counts.susceptible, 2);
        assert_eq!(counts.infected, 2);
        assert_eq!(counts.recovered, 1);
        assert_eq!(counts.total(), 5);
        assert_eq!(counts.get(Infected), 2);
    }
}
