//! Configuration options for the CFR solver.
//!
//! The algorithm itself has no knobs: vanilla CFR over the public tree is
//! fully determined by the game. The configuration controls what happens
//! around the sweeps during training: progress display, periodic
//! exploitability checkpoints and debug logging.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for the CFR solver.
///
/// # Example
/// ```
/// use range_cfr::cfr::CFRConfig;
///
/// let config = CFRConfig::default().with_exploitability_interval(100);
/// assert!(config.validate().is_ok());
/// assert!(!config.show_progress);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CFRConfig {
    /// Draw a progress bar on stderr while training.
    pub show_progress: bool,

    /// Measure the exploitability of the average strategy every this many
    /// iterations and record it in [`CFRStats::exploitability_history`].
    ///
    /// Each measurement costs one full tree traversal per player.
    pub exploitability_interval: Option<u64>,

    /// Emit a debug log line every this many iterations.
    pub log_interval: Option<u64>,
}

impl Default for CFRConfig {
    fn default() -> Self {
        Self {
            show_progress: false,
            exploitability_interval: None,
            log_interval: None,
        }
    }
}

impl CFRConfig {
    /// Create a new CFRConfig with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Builder method: show a progress bar.
    pub fn with_progress(mut self, enable: bool) -> Self {
        self.show_progress = enable;
        self
    }

    /// Builder method: set the exploitability checkpoint interval.
    pub fn with_exploitability_interval(mut self, interval: u64) -> Self {
        self.exploitability_interval = Some(interval);
        self
    }

    /// Builder method: set the debug log interval.
    pub fn with_log_interval(mut self, interval: u64) -> Self {
        self.log_interval = Some(interval);
        self
    }

    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exploitability_interval == Some(0) {
            return Err(ConfigError::ZeroInterval("exploitability"));
        }
        if self.log_interval == Some(0) {
            return Err(ConfigError::ZeroInterval("log"));
        }
        Ok(())
    }
}

/// Errors that can occur when loading or validating CFR configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An interval was set to zero.
    #[error("{0} interval must be positive")]
    ZeroInterval(&'static str),

    /// The JSON input could not be parsed.
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Statistics tracked during CFR training.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CFRStats {
    /// Total number of iterations completed.
    pub iterations: u64,

    /// Number of information sets in the tree.
    pub info_sets: usize,

    /// Total time spent training (in seconds).
    pub elapsed_seconds: f64,

    /// Iterations per second.
    pub iterations_per_second: f64,

    /// Most recent exploitability measurement, if any.
    pub exploitability: Option<f64>,

    /// History of exploitability measurements.
    pub exploitability_history: Vec<ExploitabilityPoint>,
}

/// A single exploitability measurement at a specific iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExploitabilityPoint {
    /// Iteration number when this measurement was taken.
    pub iteration: u64,
    /// Exploitability in chips per hand.
    pub exploitability: f64,
}

impl CFRStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update iterations per second based on elapsed time.
    pub fn update_rate(&mut self) {
        if self.elapsed_seconds > 0.0 {
            self.iterations_per_second = self.iterations as f64 / self.elapsed_seconds;
        }
    }

    /// Record an exploitability measurement.
    pub fn record_exploitability(&mut self, iteration: u64, exploitability: f64) {
        self.exploitability = Some(exploitability);
        self.exploitability_history.push(ExploitabilityPoint {
            iteration,
            exploitability,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CFRConfig::new();
        assert!(config.validate().is_ok());
        assert_eq!(config.exploitability_interval, None);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = CFRConfig::default().with_log_interval(0);
        assert!(matches!(config.validate(), Err(ConfigError::ZeroInterval("log"))));

        let config = CFRConfig::default().with_exploitability_interval(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroInterval("exploitability"))
        ));
    }

    #[test]
    fn test_from_json() {
        let config = CFRConfig::from_json_str(r#"{"exploitability_interval": 50}"#).unwrap();
        assert_eq!(config.exploitability_interval, Some(50));
        assert!(!config.show_progress);

        assert!(matches!(
            CFRConfig::from_json_str(r#"{"log_interval": 0}"#),
            Err(ConfigError::ZeroInterval("log"))
        ));
        assert!(matches!(
            CFRConfig::from_json_str("{not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let config = CFRConfig::default().with_progress(true).with_log_interval(10);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(CFRConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_stats_rate_and_history() {
        let mut stats = CFRStats::new();
        stats.iterations = 100;
        stats.elapsed_seconds = 2.0;
        stats.update_rate();
        assert!((stats.iterations_per_second - 50.0).abs() < 1e-12);

        stats.record_exploitability(50, 0.2);
        stats.record_exploitability(100, 0.1);
        assert_eq!(stats.exploitability, Some(0.1));
        assert_eq!(stats.exploitability_history.len(), 2);
        assert_eq!(stats.exploitability_history[0].iteration, 50);
    }
}
