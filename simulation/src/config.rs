//! Simulation parameters and their validation
//!
//! [`SimConfig`] is the validated, strongly typed form consumed by the
//! engine. [`SimConfigFile`] is the loose JSON form read from disk; it keeps
//! signed integers so that negative values surface as [`ConfigError`]s that
//! name the parameter instead of opaque parse failures.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Number of individuals (nodes)
    pub population: usize,
    /// Edges each newly attached node brings to the network (m)
    pub attachment_degree: usize,
    /// Per-contact, per-day transmission probability (beta)
    pub infection_rate: f64,
    /// Per-day recovery probability of an infected individual (gamma)
    pub recovery_rate: f64,
    /// Number of simulated days
    pub steps: u64,
    /// Seed for the random source; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            population: 1000,
            attachment_degree: 3,
            infection_rate: 0.3,
            recovery_rate: 0.05,
            steps: 50,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Check every parameter, failing on the first offending one
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population < 1 {
            return Err(ConfigError::Population(self.population as i64));
        }
        if self.attachment_degree < 1 || self.attachment_degree >= self.population {
            return Err(ConfigError::AttachmentDegree {
                degree: self.attachment_degree as i64,
                population: self.population as i64,
            });
        }
        if !(0.0..=1.0).contains(&self.infection_rate) {
            return Err(ConfigError::InfectionRate(self.infection_rate));
        }
        if !(0.0..=1.0).contains(&self.recovery_rate) {
            return Err(ConfigError::RecoveryRate(self.recovery_rate));
        }
        Ok(())
    }

    /// Same configuration with a fixed seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let file: SimConfigFile = serde_json::from_str(json)?;
        Self::try_from(file)
    }

    /// Load and validate a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// On-disk form of [`SimConfig`]
///
/// Missing fields take the defaults of [`SimConfig::default`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfigFile {
    pub population: i64,
    pub attachment_degree: i64,
    pub infection_rate: f64,
    pub recovery_rate: f64,
    pub steps: i64,
    pub seed: Option<i64>,
}

impl Default for SimConfigFile {
    fn default() -> Self {
        let defaults = SimConfig::default();
        Self {
            population: defaults.population as i64,
            attachment_degree: defaults.attachment_degree as i64,
            infection_rate: defaults.infection_rate,
            recovery_rate: defaults.recovery_rate,
            steps: defaults.steps as i64,
            seed: None,
        }
    }
}

impl TryFrom<SimConfigFile> for SimConfig {
    type Error = ConfigError;

    fn try_from(file: SimConfigFile) -> Result<Self, Self::Error> {
        if file.population < 1 {
            return Err(ConfigError::Population(file.population));
        }
        if file.attachment_degree < 1 {
            return Err(ConfigError::AttachmentDegree {
                degree: file.attachment_degree,
                population: file.population,
            });
        }
        if file.steps < 0 {
            return Err(ConfigError::Steps(file.steps));
        }
        let seed = match file.seed {
            Some(seed) if seed < 0 => return Err(ConfigError::Seed(seed)),
            Some(seed) => Some(seed as u64),
            None => None,
        };

        let config = SimConfig {
            population: file.population as usize,
            attachment_degree: file.attachment_degree as usize,
            infection_rate: file.infection_rate,
            recovery_rate: file.recovery_rate,
            steps: file.steps as u64,
            seed,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> SimConfig {
        SimConfig {
            population: 10,
            attachment_degree: 2,
            infection_rate: 0.5,
            recovery_rate: 0.1,
            steps: 5,
            seed: Some(1),
        }
    }

    #[test]
    fn test_default_matches_reference_outbreak() {
        let config = SimConfig::default();
        assert_eq!(config.population, 1000);
        assert_eq!(config.attachment_degree, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_each_parameter() {
        let cases = [
            (SimConfig { population: 0, ..valid() }, "population"),
            (SimConfig { attachment_degree: 0, ..valid() }, "attachment_degree"),
            (SimConfig { attachment_degree: 10, ..valid() }, "attachment_degree"),
            (SimConfig { infection_rate: 1.5, ..valid() }, "infection_rate"),
            (SimConfig { infection_rate: f64::NAN, ..valid() }, "infection_rate"),
            (SimConfig { recovery_rate: -0.1, ..valid() }, "recovery_rate"),
        ];

        for (config, parameter) in cases {
            let err = config.validate().unwrap_err();
            assert_eq!(err.parameter(), Some(parameter), "{:?}", config);
        }
    }

    #[test]
    fn test_boundary_rates_are_valid() {
        let config = SimConfig {
            infection_rate: 1.0,
            recovery_rate: 0.0,
            ..valid()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_negative_steps() {
        let err = SimConfig::from_json_str(r#"{"population": 20, "attachment_degree": 2, "steps": -1}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Steps(-1)));
    }

    #[test]
    fn test_json_negative_population() {
        let err = SimConfig::from_json_str(r#"{"population": -5}"#).unwrap_err();
        assert_eq!(err.parameter(), Some("population"));
    }

    #[test]
    fn test_json_fills_defaults() {
        let config = SimConfig::from_json_str(r#"{"population": 200, "seed": 7}"#).unwrap();
        assert_eq!(config.population, 200);
        assert_eq!(config.attachment_degree, 3);
        assert_eq!(config.steps, 50);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_json_malformed() {
        let err = SimConfig::from_json_str("{population: }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert_eq!(err.parameter(), None);
    }
}
