//! Simulation engine for Epinet
//!
//! Implements the discrete-time SIR run:
//! - Network generated once from the seeded random source
//! - One patient zero chosen uniformly at random
//! - Each day: record counts, apply the snapshot transition, advance
//! - Exactly `steps` days, whether or not the epidemic has died out

use serde::Serialize;
use tracing::{debug, info};

use crate::config::SimConfig;
use crate::epidemic::{EpidemicState, TransitionRates};
use crate::error::ConfigError;
use crate::history::{History, HistoryEntry, HistoryRecorder};
use crate::rng::RandomSource;
use crate::topology::{self, Graph};
use crate::types::{HealthStatus, NodeId, StatusCounts};

/// The simulation state
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    rng: RandomSource,
    graph: Graph,
    state: EpidemicState,
    patient_zero: NodeId,
    /// Next day to simulate
    day: u64,
    recorder: HistoryRecorder,
    /// Statistics
    pub stats: SimStats,
}

/// Running totals over a simulation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimStats {
    /// Susceptible-to-infected transitions, not counting patient zero
    pub total_infections: u64,
    pub total_recoveries: u64,
    /// Largest infected count seen at the start of a day
    pub peak_infected: usize,
    pub peak_day: u64,
    /// First recorded day with nobody infected
    pub extinction_day: Option<u64>,
}

/// Everything a finished run hands to reporting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationOutcome {
    pub config: SimConfig,
    /// Seed that reproduces this run
    pub seed: u64,
    pub patient_zero: NodeId,
    pub graph: Graph,
    /// Terminal status of every node
    pub statuses: Vec<HealthStatus>,
    pub history: History,
    pub stats: SimStats,
}

impl SimulationOutcome {
    /// Counts over the terminal statuses (after the last simulated day)
    pub fn final_counts(&self) -> StatusCounts {
        StatusCounts::tally(&self.statuses)
    }
}

impl Simulation {
    /// Validate the configuration, grow the network and seed patient zero
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = RandomSource::new(config.seed);
        let graph = topology::generate(config.population, config.attachment_degree, &mut rng)?;
        let patient_zero = NodeId(rng.index(config.population));
        let state = EpidemicState::new(config.population, patient_zero);
        let recorder = HistoryRecorder::new(
            config.population,
            usize::try_from(config.steps).unwrap_or(0),
        );

        info!(
            seed = rng.seed(),
            patient_zero = %patient_zero,
            days = config.steps,
            "Outbreak seeded"
        );

        Ok(Self {
            config,
            rng,
            graph,
            state,
            patient_zero,
            day: 0,
            recorder,
            stats: SimStats::default(),
        })
    }

    fn rates(&self) -> TransitionRates {
        TransitionRates {
            infection: self.config.infection_rate,
            recovery: self.config.recovery_rate,
        }
    }

    /// Simulate one day. Returns `false` without doing anything once all
    /// configured days have run.
    pub fn step(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }

        let counts = self.state.counts();
        self.recorder.record(self.day, counts);

        if counts.infected > self.stats.peak_infected {
            self.stats.peak_infected = counts.infected;
            self.stats.peak_day = self.day;
        }
        if counts.infected == 0 && self.stats.extinction_day.is_none() {
            self.stats.extinction_day = Some(self.day);
            info!(day = self.day, "Epidemic extinct");
        }

        let rates = self.rates();
        let transition = self.state.step(&self.graph, rates, &mut self.rng);
        self.stats.total_infections += transition.newly_infected.len() as u64;
        self.stats.total_recoveries += transition.newly_recovered.len() as u64;

        debug!(
            day = self.day,
            susceptible = counts.susceptible,
            infected = counts.infected,
            recovered = counts.recovered,
            new_infections = transition.newly_infected.len(),
            new_recoveries = transition.newly_recovered.len(),
            "Day simulated"
        );

        self.day += 1;
        true
    }

    /// Run for up to `days` more days; returns how many were simulated
    pub fn run_days(&mut self, days: u64) -> u64 {
        let mut simulated = 0;
        while simulated < days && self.step() {
            simulated += 1;
        }
        simulated
    }

    /// Run every remaining day and hand over the results
    pub fn run(mut self) -> SimulationOutcome {
        while self.step() {}

        info!("Simulation complete after {} days", self.day);
        info!("Stats: {:?}", self.stats);
        self.into_outcome()
    }

    fn into_outcome(self) -> SimulationOutcome {
        SimulationOutcome {
            seed: self.rng.seed(),
            patient_zero: self.patient_zero,
            statuses: self.state.statuses().to_vec(),
            history: self.recorder.finish(),
            graph: self.graph,
            stats: self.stats,
            config: self.config,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn statuses(&self) -> &[HealthStatus] {
        self.state.statuses()
    }

    pub fn counts(&self) -> StatusCounts {
        self.state.counts()
    }

    pub fn patient_zero(&self) -> NodeId {
        self.patient_zero
    }

    /// Seed that reproduces this run
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Number of days simulated so far
    pub fn day(&self) -> u64 {
        self.day
    }

    pub fn is_finished(&self) -> bool {
        self.day >= self.config.steps
    }

    /// History recorded so far
    pub fn history(&self) -> &[HistoryEntry] {
        self.recorder.entries()
    }

    /// Get a summary of the current state
    pub fn state_summary(&self) -> String {
        let counts = self.state.counts();
        format!(
            "Day {}: {} susceptible, {} infected, {} recovered",
            self.day, counts.susceptible, counts.infected, counts.recovered
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(population: usize, m: usize, beta: f64, gamma: f64, steps: u64, seed: u64) -> SimConfig {
        SimConfig {
            population,
            attachment_degree: m,
            infection_rate: beta,
            recovery_rate: gamma,
            steps,
            seed: Some(seed),
        }
    }

    #[test]
    fn test_invalid_config_builds_nothing() {
        let err = Simulation::new(config(10, 10, 0.5, 0.5, 5, 1)).unwrap_err();
        assert_eq!(err.parameter(), Some("attachment_degree"));

        let err = Simulation::new(config(10, 2, 0.5, 2.0, 5, 1)).unwrap_err();
        assert_eq!(err.parameter(), Some("recovery_rate"));
    }

    #[test]
    fn test_huge_step_count_is_accepted() {
        let mut sim = Simulation::new(config(10, 2, 0.5, 0.5, u64::MAX, 1)).unwrap();
        assert_eq!(sim.run_days(3), 3);
        assert_eq!(sim.day(), 3);
        assert_eq!(sim.history().len(), 3);
    }

    #[test]
    fn test_runs_exact_number_of_days() {
        let outcome = Simulation::new(config(50, 2, 0.3, 0.1, 17, 3)).unwrap().run();
        assert_eq!(outcome.history.len(), 17);
        let days: Vec<u64> = outcome.history.entries().iter().map(|e| e.day).collect();
        assert_eq!(days, (0..17).collect::<Vec<_>>());
    }

    #[test]
    fn test_zero_steps() {
        let outcome = Simulation::new(config(20, 2, 0.5, 0.5, 0, 3)).unwrap().run();
        assert!(outcome.history.is_empty());
        assert_eq!(outcome.final_counts().infected, 1);
    }

    #[test]
    fn test_no_early_termination_after_extinction() {
        // Patient zero recovers on day 0 without infecting anyone
        let outcome = Simulation::new(config(30, 2, 0.0, 1.0, 10, 8)).unwrap().run();
        assert_eq!(outcome.history.len(), 10);
        assert_eq!(outcome.stats.extinction_day, Some(1));
        for entry in &outcome.history.entries()[1..] {
            assert_eq!((entry.susceptible, entry.infected, entry.recovered), (29, 0, 1));
        }
    }

    #[test]
    fn test_step_after_finish_is_noop() {
        let mut sim = Simulation::new(config(20, 2, 0.5, 0.2, 3, 5)).unwrap();
        assert_eq!(sim.run_days(10), 3);
        assert!(sim.is_finished());
        assert!(!sim.step());
        assert_eq!(sim.history().len(), 3);
    }

    #[test]
    fn test_population_conserved() {
        let outcome = Simulation::new(config(300, 3, 0.2, 0.1, 40, 21)).unwrap().run();
        for entry in outcome.history.entries() {
            assert_eq!(entry.total(), 300);
        }
        assert_eq!(outcome.final_counts().total(), 300);
    }

    #[test]
    fn test_statuses_never_revert() {
        let mut sim = Simulation::new(config(200, 2, 0.35, 0.15, 40, 17)).unwrap();
        let mut previous = sim.statuses().to_vec();
        while sim.step() {
            let current = sim.statuses();
            for (before, after) in previous.iter().zip(current) {
                assert!(before <= after, "{:?} reverted to {:?}", before, after);
            }
            previous = current.to_vec();
        }
    }

    #[test]
    fn test_frozen_epidemic_is_constant() {
        let outcome = Simulation::new(config(64, 3, 0.0, 0.0, 25, 4)).unwrap().run();
        for entry in outcome.history.entries() {
            assert_eq!((entry.susceptible, entry.infected, entry.recovered), (63, 1, 0));
        }
        assert_eq!(outcome.stats.total_infections, 0);
    }

    #[test]
    fn test_no_recovery_means_monotone_spread() {
        let outcome = Simulation::new(config(150, 2, 0.1, 0.0, 30, 13)).unwrap().run();
        let infected = outcome.history.series(HealthStatus::Infected);
        assert!(infected.windows(2).all(|w| w[0] <= w[1]));
        assert!(outcome.history.entries().iter().all(|e| e.recovered == 0));
    }

    #[test]
    fn test_same_seed_reproduces_run() {
        let a = Simulation::new(config(250, 3, 0.25, 0.08, 30, 1234)).unwrap().run();
        let b = Simulation::new(config(250, 3, 0.25, 0.08, 30, 1234)).unwrap().run();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unseeded_run_reports_replayable_seed() {
        let mut unseeded = config(120, 2, 0.3, 0.1, 20, 0);
        unseeded.seed = None;
        let first = Simulation::new(unseeded.clone()).unwrap().run();

        let replay = Simulation::new(SimConfig {
            seed: Some(first.seed),
            ..unseeded
        })
        .unwrap()
        .run();
        assert_eq!(first.history, replay.history);
        assert_eq!(first.statuses, replay.statuses);
    }

    #[test]
    fn test_stats_match_history() {
        let outcome = Simulation::new(config(200, 3, 0.3, 0.1, 30, 77)).unwrap().run();
        let (peak_day, peak) = outcome.history.peak().unwrap();
        assert_eq!(outcome.stats.peak_infected, peak);
        assert_eq!(outcome.stats.peak_day, peak_day);

        let last = outcome.final_counts();
        assert_eq!(outcome.stats.total_recoveries as usize, last.recovered);
        assert_eq!(
            outcome.stats.total_infections as usize + 1,
            last.infected + last.recovered
        );
    }

    #[test]
    fn test_state_summary() {
        let sim = Simulation::new(config(10, 2, 0.5, 0.5, 5, 42)).unwrap();
        assert_eq!(sim.state_summary(), "Day 0: 9 susceptible, 1 infected, 0 recovered");
        assert!(sim.patient_zero().index() < 10);
    }
}
