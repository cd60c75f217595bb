//! Per-node SIR state and the daily snapshot transition rule

use tracing::trace;

use crate::rng::RandomSource;
use crate::topology::Graph;
use crate::types::{HealthStatus, NodeId, StatusCounts};

/// Daily transition probabilities
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionRates {
    /// Probability that one infected-susceptible contact transmits in a day
    pub infection: f64,
    /// Probability that an infected individual recovers in a day
    pub recovery: f64,
}

/// Health status of every node, indexed by [`NodeId`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpidemicState {
    statuses: Vec<HealthStatus>,
    counts: StatusCounts,
}

/// What one day changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transition {
    /// Previously susceptible nodes that became infected, in ascending order
    pub newly_infected: Vec<NodeId>,
    /// Previously infected nodes that recovered, in ascending order
    pub newly_recovered: Vec<NodeId>,
}

impl EpidemicState {
    /// Everyone susceptible except `patient_zero`, who starts infected
    pub fn new(population: usize, patient_zero: NodeId) -> Self {
        let mut statuses = vec![HealthStatus::Susceptible; population];
        statuses[patient_zero.index()] = HealthStatus::Infected;
        let counts = StatusCounts {
            susceptible: population - 1,
            infected: 1,
            recovered: 0,
        };
        Self { statuses, counts }
    }

    pub fn statuses(&self) -> &[HealthStatus] {
        &self.statuses
    }

    pub fn status(&self, id: NodeId) -> HealthStatus {
        self.statuses[id.index()]
    }

    pub fn counts(&self) -> StatusCounts {
        self.counts
    }

    pub fn population(&self) -> usize {
        self.statuses.len()
    }

    /// Nodes currently infected, in ascending order
    pub fn infected_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.statuses
            .iter()
            .enumerate()
            .filter(|(_, status)| **status == HealthStatus::Infected)
            .map(|(id, _)| NodeId(id))
    }

    /// Advance one day
    ///
    /// Every decision reads the statuses as they were at the start of the
    /// day; marks are applied together at the end, so nothing infected today
    /// transmits or recovers before tomorrow. Trials are drawn per infected
    /// node in ascending order: one per susceptible neighbor, then one for
    /// its own recovery.
    pub fn step(
        &mut self,
        graph: &Graph,
        rates: TransitionRates,
        rng: &mut RandomSource,
    ) -> Transition {
        let mut marked = vec![false; self.statuses.len()];
        let mut transition = Transition::default();

        for (index, status) in self.statuses.iter().enumerate() {
            if *status != HealthStatus::Infected {
                continue;
            }
            let node = NodeId(index);

            for &neighbor in graph.neighbors(node) {
                if self.statuses[neighbor.index()] == HealthStatus::Susceptible
                    && rng.bernoulli(rates.infection)
                {
                    trace!(from = %node, to = %neighbor, "Transmission");
                    marked[neighbor.index()] = true;
                }
            }

            if rng.bernoulli(rates.recovery) {
                trace!(node = %node, "Recovery");
                transition.newly_recovered.push(node);
            }
        }

        transition.newly_infected = marked
            .iter()
            .enumerate()
            .filter(|(_, hit)| **hit)
            .map(|(id, _)| NodeId(id))
            .collect();

        for node in &transition.newly_infected {
            self.statuses[node.index()] = HealthStatus::Infected;
        }
        for node in &transition.newly_recovered {
            self.statuses[node.index()] = HealthStatus::Recovered;
        }

        let infected = transition.newly_infected.len();
        let recovered = transition.newly_recovered.len();
        self.counts.susceptible -= infected;
        self.counts.infected = self.counts.infected + infected - recovered;
        self.counts.recovered += recovered;

        transition
    }
}
