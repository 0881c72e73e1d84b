//! YAML configuration for the service.

use std::path::{Path, PathBuf};
use std::time::Duration;

use filemod_stat_collector::CollectorConfig;
use filemod_worker::{DEFAULT_QUEUE_CAPACITY, WorkerConfig};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name looked up in each search directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Port the HTTP server listens on.
    #[serde(default = "default_server_port")]
    pub server_port: u16,

    /// Directory scanned on every tick.
    #[serde(rename = "monitored_directory")]
    pub monitored_dir: PathBuf,

    /// Seconds between scans.
    pub check_frequency: u64,

    /// Maximum number of pending commands.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Kill commands that run longer than this many seconds.
    #[serde(default)]
    pub command_timeout_secs: Option<u64>,

    /// Kill the running command when the workers stop.
    #[serde(default)]
    pub kill_on_stop: bool,

    /// Directory for the rotating log file.
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Follow symbolic links while scanning.
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Maximum scan depth (None = unlimited).
    #[serde(default)]
    pub max_depth: Option<usize>,
}

fn default_server_port() -> u16 {
    8080
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

impl Config {
    /// Load from `explicit` if given, otherwise from the first existing
    /// file in [`Config::search_paths`].
    pub fn load(explicit: Option<&Path>) -> Result<(Self, PathBuf), ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let searched = Self::search_paths();
                Self::find_in(&searched).ok_or(ConfigError::NotFound { searched })?
            }
        };

        let config = Self::from_path(&path)?;
        Ok((config, path))
    }

    /// Candidate config files, most specific first.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".").join(CONFIG_FILE_NAME),
            PathBuf::from("/etc/file-mod-tracker").join(CONFIG_FILE_NAME),
        ];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".file-mod-tracker").join(CONFIG_FILE_NAME));
        }
        paths
    }

    /// First path in `candidates` that is an existing file.
    pub fn find_in(candidates: &[PathBuf]) -> Option<PathBuf> {
        candidates.iter().find(|p| p.is_file()).cloned()
    }

    /// Read, parse and validate a config file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values the workers cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.check_frequency == 0 {
            return Err(ConfigError::Invalid(
                "check_frequency must be at least 1 second".to_string(),
            ));
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::Invalid(
                "queue_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Settings for the worker subsystem.
    pub fn worker_config(&self) -> WorkerConfig {
        let mut config = WorkerConfig::new(
            &self.monitored_dir,
            Duration::from_secs(self.check_frequency),
        )
        .with_queue_capacity(self.queue_capacity);

        if let Some(secs) = self.command_timeout_secs {
            config = config.with_command_timeout(Duration::from_secs(secs));
        }
        if self.kill_on_stop {
            config = config.kill_on_stop();
        }
        config
    }

    /// Settings for the directory walker.
    pub fn collector_config(&self) -> CollectorConfig {
        CollectorConfig {
            max_depth: self.max_depth,
            follow_symlinks: self.follow_symlinks,
        }
    }
}
