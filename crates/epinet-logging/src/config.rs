//! Logging settings for epinet runs
//!
//! Every section deserializes with defaults, so a partial JSON or TOML block
//! only needs the keys it changes.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where log events go and how they are formatted
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter used when `RUST_LOG` is unset, e.g. `info` or `epinet_simulation=trace`
    pub default_level: String,
    pub console: ConsoleConfig,
    /// Rolling log files; `None` keeps everything on stderr
    pub file: Option<FileConfig>,
    /// Shape of the JSON lines, shared by the console and file sinks
    pub jsonl: JsonlConfig,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_level: "info".to_string(),
            console: ConsoleConfig::default(),
            file: None,
            jsonl: JsonlConfig::default(),
        }
    }
}

impl LogConfig {
    /// Debug level on a colored stderr, for interactive runs
    pub fn development() -> Self {
        Self {
            default_level: "debug".to_string(),
            ..Self::default()
        }
    }

    /// Keep the current console settings and also write daily files to `directory`
    pub fn with_log_dir(mut self, directory: PathBuf) -> Self {
        self.file = Some(FileConfig {
            directory,
            ..FileConfig::default()
        });
        self
    }

    /// Switch stderr between human-readable text and JSON lines
    pub fn with_json_console(mut self, json: bool) -> Self {
        self.console.pretty = !json;
        self.console.ansi &= !json;
        self
    }
}

/// The stderr sink
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub enabled: bool,
    /// Human-readable lines; `false` prints the same JSON the files get
    pub pretty: bool,
    /// Color codes, only honored for pretty output
    pub ansi: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            pretty: true,
            ansi: true,
        }
    }
}

/// On-disk JSON lines, written through a non-blocking appender
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub directory: PathBuf,
    /// Stem of each file name; rolled files get a date suffix
    pub prefix: String,
    pub rotation: RotationStrategy,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./logs"),
            prefix: "epinet".to_string(),
            rotation: RotationStrategy::Daily,
        }
    }
}

/// When a new log file is started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RotationStrategy {
    #[default]
    Daily,
    Hourly,
    /// One `<prefix>.log`, truncated when the run starts
    Never,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonlConfig {
    /// Put event fields next to `level` and `target` instead of under `fields`
    pub flatten_events: bool,
    /// Attach the enclosing span stack to each line
    pub include_spans: bool,
    /// Attach source file and line
    pub include_location: bool,
}

impl Default for JsonlConfig {
    fn default() -> Self {
        Self {
            flatten_events: true,
            include_spans: true,
            include_location: false,
        }
    }
}
