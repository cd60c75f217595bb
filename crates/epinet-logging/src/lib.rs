//! Logging setup for the Epinet simulator
//!
//! Wraps the `tracing` ecosystem so the binary and tests configure output the
//! same way:
//!
//! - **Console**: pretty human-readable output (default) or JSONL, on stderr
//! - **Files**: JSONL written through `tracing-appender`, with daily, hourly
//!   or no rotation
//! - **Filtering**: `RUST_LOG` wins over the configured default level
//!
//! # Quick Start
//!
//! ```ignore
//! use epinet_logging::{EpinetSubscriberBuilder, LogConfig};
//!
//! // Keep the guard alive until the program exits so file logs are flushed
//! let _guard = EpinetSubscriberBuilder::new()
//!     .with_config(LogConfig::development())
//!     .init();
//!
//! tracing::info!(population = 1000, "Building network");
//! ```

pub mod config;

pub use config::{ConsoleConfig, FileConfig, JsonlConfig, LogConfig, RotationStrategy};

use std::fs::{self, File};

use thiserror::Error;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Errors raised while installing the global subscriber
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to prepare log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to install subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Builder for configuring and initializing the Epinet logging subscriber
pub struct EpinetSubscriberBuilder {
    config: LogConfig,
}

impl EpinetSubscriberBuilder {
    /// Create a new subscriber builder with default configuration
    ///
    /// Default: pretty output to stderr at `info`
    pub fn new() -> Self {
        Self {
            config: LogConfig::default(),
        }
    }

    /// Use a specific configuration
    pub fn with_config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the default log level
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.config.default_level = level.into();
        self
    }

    /// Enable or disable console output
    pub fn with_console(mut self, enabled: bool) -> Self {
        self.config.console.enabled = enabled;
        self
    }

    /// Switch console output between pretty and JSONL
    pub fn with_pretty_console(mut self, pretty: bool) -> Self {
        self.config.console.pretty = pretty;
        self
    }

    /// Configure file output
    pub fn with_file_output(mut self, config: FileConfig) -> Self {
        self.config.file = Some(config);
        self
    }

    /// The configuration this builder will install
    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// Initialize the subscriber globally
    ///
    /// Returns a guard that must be kept alive for the duration of the
    /// program when file output is enabled. Failures are reported on stderr
    /// and leave the process without a subscriber.
    pub fn init(self) -> Option<WorkerGuard> {
        match self.try_init() {
            Ok(guard) => guard,
            Err(e) => {
                eprintln!("Warning: Failed to initialize logging: {}", e);
                None
            }
        }
    }

    /// Initialize the subscriber globally, reporting failures to the caller
    pub fn try_init(self) -> Result<Option<WorkerGuard>, LoggingError> {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.config.default_level));

        let mut layers: Vec<BoxedLayer> = Vec::new();
        let mut guard = None;

        if self.config.console.enabled {
            layers.push(self.console_layer());
        }

        if let Some(file_config) = &self.config.file {
            let (writer, file_guard) = create_file_writer(file_config)?;
            guard = Some(file_guard);
            layers.push(self.jsonl_layer(writer));
        }

        tracing_subscriber::registry()
            .with(layers)
            .with(env_filter)
            .try_init()?;

        Ok(guard)
    }

    fn console_layer(&self) -> BoxedLayer {
        if self.config.console.pretty {
            tracing_subscriber::fmt::layer()
                .with_ansi(self.config.console.ansi)
                .with_target(true)
                .with_writer(std::io::stderr)
                .boxed()
        } else {
            let jsonl = &self.config.jsonl;
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(jsonl.include_spans)
                .flatten_event(jsonl.flatten_events)
                .with_file(jsonl.include_location)
                .with_line_number(jsonl.include_location)
                .with_writer(std::io::stderr)
                .boxed()
        }
    }

    fn jsonl_layer(&self, writer: NonBlocking) -> BoxedLayer {
        let jsonl = &self.config.jsonl;
        tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(jsonl.include_spans)
            .flatten_event(jsonl.flatten_events)
            .with_file(jsonl.include_location)
            .with_line_number(jsonl.include_location)
            .with_writer(writer)
            .boxed()
    }
}

impl Default for EpinetSubscriberBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Open the writer for file output. `Never` truncates a single file, the
/// other strategies append through a rolling appender.
fn create_file_writer(
    file_config: &FileConfig,
) -> Result<(NonBlocking, WorkerGuard), LoggingError> {
    fs::create_dir_all(&file_config.directory)?;
    let pair = match file_config.rotation {
        RotationStrategy::Never => {
            let file_path = file_config
                .directory
                .join(format!("{}.log", file_config.prefix));
            tracing_appender::non_blocking(File::create(file_path)?)
        }
        RotationStrategy::Daily => tracing_appender::non_blocking(RollingFileAppender::new(
            Rotation::DAILY,
            &file_config.directory,
            &file_config.prefix,
        )),
        RotationStrategy::Hourly => tracing_appender::non_blocking(RollingFileAppender::new(
            Rotation::HOURLY,
            &file_config.directory,
            &file_config.prefix,
        )),
    };
    Ok(pair)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let builder = EpinetSubscriberBuilder::new()
            .with_level("trace")
            .with_console(false)
            .with_pretty_console(false);

        assert_eq!(builder.config().default_level, "trace");
        assert!(!builder.config().console.enabled);
        assert!(!builder.config().console.pretty);
    }

    #[test]
    fn test_single_file_writer_creates_log() {
        let dir = tempfile::tempdir().unwrap();
        let config = FileConfig {
            directory: dir.path().join("nested"),
            prefix: "run".to_string(),
            rotation: RotationStrategy::Never,
        };

        let (_writer, _guard) = create_file_writer(&config).unwrap();
        assert!(dir.path().join("nested").join("run.log").exists());
    }
}
