//! Rendezvous configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::coordinator::{CoordinatorConfig, DEFAULT_PACING_DELAY};
use crate::events::DEFAULT_CHANNEL_CAPACITY;

/// Default wall-clock run time before cancellation fires
pub const DEFAULT_RUN_FOR_MS: u64 = 3000;

/// Main rendezvous configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How long the binary runs before firing cancellation
    #[serde(rename = "run-for-ms")]
    pub run_for_ms: u64,

    /// Delay between a completion and the next readiness signal
    #[serde(rename = "pacing-delay-ms")]
    pub pacing_delay_ms: u64,

    /// Fixed seed for the supplier; seeded from the OS when absent
    pub seed: Option<u64>,

    /// Stop after this many completed rounds
    #[serde(rename = "max-rounds")]
    pub max_rounds: Option<u64>,

    /// Capacity of the protocol event bus
    #[serde(rename = "event-capacity")]
    pub event_capacity: usize,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            run_for_ms: DEFAULT_RUN_FOR_MS,
            pacing_delay_ms: DEFAULT_PACING_DELAY.as_millis() as u64,
            seed: None,
            max_rounds: None,
            event_capacity: DEFAULT_CHANNEL_CAPACITY,
            log_level: None,
        }
    }
}

/// Just the log level, read before logging exists
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LogLevelOnly {
    #[serde(rename = "log-level")]
    log_level: Option<String>,
}

impl Config {
    /// Validate configuration before use
    pub fn validate(&self) -> Result<()> {
        if self.run_for_ms == 0 {
            return Err(eyre::eyre!("run-for-ms must be greater than zero"));
        }
        if self.event_capacity == 0 {
            return Err(eyre::eyre!("event-capacity must be greater than zero"));
        }
        Ok(())
    }

    pub fn run_for(&self) -> Duration {
        Duration::from_millis(self.run_for_ms)
    }

    pub fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing_delay_ms)
    }

    /// The coordinator's share of the configuration
    pub fn coordinator(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            pacing_delay: self.pacing_delay(),
            max_rounds: self.max_rounds,
        }
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for candidate in Self::implicit_paths() {
            if !candidate.exists() {
                continue;
            }
            match Self::load_from_file(&candidate) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", candidate.display(), e);
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only `log-level` from whichever config file `load` would pick
    ///
    /// Errors are swallowed: logging is not set up yet, and the full load
    /// reports them properly afterwards.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let path = match config_path {
            Some(path) => path.clone(),
            None => Self::implicit_paths().into_iter().find(|p| p.exists())?,
        };
        let content = fs::read_to_string(path).ok()?;
        serde_yaml::from_str::<LogLevelOnly>(&content).ok()?.log_level
    }

    /// `./.rendezvous.yml`, then `<config_dir>/rendezvous/rendezvous.yml`
    fn implicit_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".rendezvous.yml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("rendezvous").join("rendezvous.yml"));
        }
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.run_for_ms, 3000);
        assert_eq!(config.pacing_delay_ms, 500);
        assert_eq!(config.seed, None);
        assert_eq!(config.max_rounds, None);
        assert_eq!(config.event_capacity, 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_pacing_is_a_sixth_of_run_time() {
        let config = Config::default();
        assert_eq!(config.run_for() / 6, config.pacing_delay());
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
run-for-ms: 1200
pacing-delay-ms: 200
seed: 42
max-rounds: 5
event-capacity: 64
log-level: debug
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.run_for(), Duration::from_millis(1200));
        assert_eq!(config.pacing_delay(), Duration::from_millis(200));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.max_rounds, Some(5));
        assert_eq!(config.event_capacity, 64);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
seed: 9
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.seed, Some(9));
        assert_eq!(config.run_for_ms, 3000);
        assert_eq!(config.pacing_delay_ms, 500);
    }

    #[test]
    fn test_coordinator_config() {
        let config = Config {
            pacing_delay_ms: 25,
            max_rounds: Some(3),
            ..Default::default()
        };

        let coordinator = config.coordinator();
        assert_eq!(coordinator.pacing_delay, Duration::from_millis(25));
        assert_eq!(coordinator.max_rounds, Some(3));
    }

    #[test]
    fn test_validate_rejects_zero_run_time() {
        let config = Config {
            run_for_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_event_capacity() {
        let config = Config {
            event_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "run-for-ms: 750\nmax-rounds: 2").unwrap();

        let config = Config::load(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(config.run_for_ms, 750);
        assert_eq!(config.max_rounds, Some(2));
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yml");
        assert!(Config::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_load_explicit_malformed_file_fails() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "run-for-ms: [not, a, number]").unwrap();

        assert!(Config::load(Some(&file.path().to_path_buf())).is_err());
    }

    #[test]
    fn test_load_log_level() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "log-level: WARN\nrun-for-ms: 10").unwrap();

        let level = Config::load_log_level(Some(&file.path().to_path_buf()));
        assert_eq!(level.as_deref(), Some("WARN"));
    }

    #[test]
    fn test_load_log_level_absent() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "run-for-ms: 10").unwrap();

        assert_eq!(Config::load_log_level(Some(&file.path().to_path_buf())), None);
    }
}
