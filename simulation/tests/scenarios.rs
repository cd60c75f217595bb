//! End-to-end checks of the simulation through the public API
//!
//! These runs cover the calibration scenarios and the population-level
//! properties every run must satisfy, whatever the seed.

use epinet_simulation::{
    ConfigError, HealthStatus, NodeId, Scenario, SimConfig, Simulation, SimulationOutcome,
};

fn run(config: SimConfig) -> SimulationOutcome {
    Simulation::new(config).expect("valid config").run()
}

#[test]
fn test_reachability_scenario_follows_hop_distance() {
    let config = SimConfig {
        population: 10,
        attachment_degree: 2,
        infection_rate: 1.0,
        recovery_rate: 0.0,
        steps: 5,
        seed: Some(42),
    };
    let outcome = run(config.clone());
    let distances = outcome.graph.hop_distances(outcome.patient_zero);

    // Day t starts with exactly the nodes within t hops infected
    for entry in outcome.history.entries() {
        let within = distances
            .iter()
            .filter(|d| d.is_some_and(|d| d as u64 <= entry.day))
            .count();
        assert_eq!(entry.infected, within, "day {}", entry.day);
        assert_eq!(entry.recovered, 0);
    }

    // After the fifth day: infected iff within 5 hops
    for node in NodeId::range(10) {
        let expected = match distances[node.index()] {
            Some(d) if d <= 5 => HealthStatus::Infected,
            _ => HealthStatus::Susceptible,
        };
        assert_eq!(outcome.statuses[node.index()], expected, "node {}", node);
    }

    // Deterministic for the seed
    let again = run(config);
    assert_eq!(again.statuses, outcome.statuses);
    assert_eq!(again.patient_zero, outcome.patient_zero);
}

#[test]
fn test_peak_and_decline_shape() {
    let population = 500;
    let mut took_off = 0;

    for seed in 0..8 {
        let outcome = run(Scenario::PeakDecline.config(Some(seed)));
        let history = &outcome.history;
        assert_eq!(history.len(), 50);

        assert!(
            history.waves(population / 20) <= 1,
            "seed {} produced more than one wave: {:?}",
            seed,
            history.series(HealthStatus::Infected)
        );

        let (_, peak) = history.peak().expect("history recorded");
        if peak > population / 2 {
            took_off += 1;
            let last = history.final_entry().expect("history recorded");
            assert!(last.infected < peak / 2, "seed {}: no decline after peak", seed);
            assert!(last.recovered > population / 2, "seed {}: recoveries lag", seed);
        }
    }

    assert!(took_off > 0, "no seed produced an outbreak");
}

#[test]
fn test_population_invariants_across_seeds() {
    for seed in 0..5 {
        let outcome = run(SimConfig {
            population: 120,
            attachment_degree: 2,
            infection_rate: 0.2,
            recovery_rate: 0.1,
            steps: 30,
            seed: Some(seed),
        });

        for entry in outcome.history.entries() {
            assert_eq!(entry.total(), 120);
        }
        assert_eq!(outcome.graph.node_count(), 120);
        for node in NodeId::range(120).skip(2) {
            assert!(outcome.graph.degree(node) >= 2);
        }
    }
}

#[test]
fn test_recovery_free_runs_never_shrink() {
    for seed in 0..5 {
        let outcome = run(SimConfig {
            population: 200,
            attachment_degree: 1,
            infection_rate: 0.15,
            recovery_rate: 0.0,
            steps: 25,
            seed: Some(seed),
        });
        let infected = outcome.history.series(HealthStatus::Infected);
        assert!(infected.windows(2).all(|w| w[0] <= w[1]), "seed {}", seed);
    }
}

#[test]
fn test_reproducible_outcomes() {
    let config = Scenario::Outbreak.config(Some(2024));
    assert_eq!(run(config.clone()), run(config));
}

#[test]
fn test_invalid_configs_rejected() {
    let base = SimConfig::default();

    let err = Simulation::new(SimConfig { population: 0, ..base.clone() }).unwrap_err();
    assert!(matches!(err, ConfigError::Population(0)));

    let err = Simulation::new(SimConfig { attachment_degree: 1000, ..base.clone() }).unwrap_err();
    assert_eq!(err.parameter(), Some("attachment_degree"));

    let err = Simulation::new(SimConfig { infection_rate: -0.01, ..base }).unwrap_err();
    assert_eq!(err.parameter(), Some("infection_rate"));
}

#[test]
fn test_config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.json");
    std::fs::write(
        &path,
        r#"{
            "population": 80,
            "attachment_degree": 2,
            "infection_rate": 0.25,
            "recovery_rate": 0.1,
            "steps": 12,
            "seed": 5
        }"#,
    )
    .unwrap();

    let config = SimConfig::load(&path).unwrap();
    assert_eq!(config.population, 80);
    assert_eq!(config.seed, Some(5));
    assert_eq!(run(config).history.len(), 12);

    std::fs::write(&path, r#"{"population": 80, "recovery_rate": 3.0}"#).unwrap();
    let err = SimConfig::load(&path).unwrap_err();
    assert_eq!(err.parameter(), Some("recovery_rate"));

    let err = SimConfig::load(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
