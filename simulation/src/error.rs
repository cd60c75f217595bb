//! Error types for the Epinet simulation

use thiserror::Error;

/// Invalid simulation parameters
///
/// Raised before any graph or history is built; each variant names the
/// offending parameter and carries the rejected value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("population must be at least 1, got {0}")]
    Population(i64),

    #[error("attachment_degree must satisfy 1 <= m < population ({population}), got {degree}")]
    AttachmentDegree { degree: i64, population: i64 },

    #[error("infection_rate must be within [0, 1], got {0}")]
    InfectionRate(f64),

    #[error("recovery_rate must be within [0, 1], got {0}")]
    RecoveryRate(f64),

    #[error("steps must be non-negative, got {0}")]
    Steps(i64),

    #[error("seed must be non-negative, got {0}")]
    Seed(i64),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    /// Name of the offending parameter, if the error is about one
    pub fn parameter(&self) -> Option<&'static str> {
        match self {
            ConfigError::Population(_) => Some("population"),
            ConfigError::AttachmentDegree { .. } => Some("attachment_degree"),
            ConfigError::InfectionRate(_) => Some("infection_rate"),
            ConfigError::RecoveryRate(_) => Some("recovery_rate"),
            ConfigError::Steps(_) => Some("steps"),
            ConfigError::Seed(_) => Some("seed"),
            ConfigError::Io(_) | ConfigError::Parse(_) => None,
        }
    }
}

/// Errors raised while exporting simulation results
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Report I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Report serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
