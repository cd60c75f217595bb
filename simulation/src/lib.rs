//! # Epinet
//!
//! SIR epidemic simulation over synthetic scale-free contact networks.
//!
//! ## Overview
//!
//! A run grows a Barabási–Albert network once, infects one randomly chosen
//! patient zero and then advances in discrete days:
//!
//! - **Preferential attachment**: new nodes link to `m` existing nodes with
//!   probability proportional to their degree, giving a heavy-tailed degree
//!   distribution
//! - **Snapshot transitions**: each day's infections and recoveries are
//!   decided from the statuses at the start of the day and applied together
//! - **Monotone progression**: Susceptible → Infected → Recovered, never back
//! - **Reproducible**: one seedable random source drives the whole run
//!
//! ## Architecture
//!
//! - **Types** (`types.rs`): NodeId, HealthStatus, StatusCounts
//! - **Topology** (`topology.rs`): Graph and the Barabási–Albert generator
//! - **Epidemic** (`epidemic.rs`): per-node status array and daily rule
//! - **Simulation** (`simulation.rs`): discrete-time engine
//! - **History** (`history.rs`): daily S/I/R time series
//! - **Report** (`report.rs`): charts and exports for finished runs
//! - **Scenarios** (`scenarios.rs`): pre-built runs
//!
//! ## Example
//!
//! ```rust,ignore
//! use epinet_simulation::*;
//!
//! let outcome = Simulation::new(SimConfig {
//!     population: 500,
//!     attachment_degree: 3,
//!     infection_rate: 0.3,
//!     recovery_rate: 0.05,
//!     steps: 50,
//!     seed: Some(7),
//! })?
//! .run();
//!
//! for entry in outcome.history.entries() {
//!     assert_eq!(entry.total(), 500);
//! }
//! println!("{}", report::render_chart(&outcome.history, 60, 12));
//! ```

pub mod types;
pub mod error;
pub mod config;
pub mod rng;
pub mod topology;
pub mod epidemic;
pub mod history;
pub mod simulation;
pub mod report;
pub mod scenarios;

// Re-export main types
pub use types::{
    NodeId,
    HealthStatus,
    StatusCounts,
};

pub use error::{ConfigError, ReportError};

pub use config::{SimConfig, SimConfigFile};

pub use rng::RandomSource;

pub use topology::{
    Graph,
    DegreeSummary,
    generate,
};

pub use epidemic::{EpidemicState, Transition, TransitionRates};

pub use history::{History, HistoryEntry, HistoryRecorder};

pub use simulation::{
    Simulation,
    SimStats,
    SimulationOutcome,
};

pub use scenarios::Scenario;
