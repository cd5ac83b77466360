//! Notification center configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::source::SimulatedSource;

fn default_interval_secs() -> u64 {
    30
}

fn default_probability() -> f64 {
    0.1
}

fn default_toast_ttl_secs() -> u64 {
    5
}

/// Configuration for the notification center and its demo sources.
///
/// Missing fields take their defaults, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CenterConfig {
    /// Seconds between simulated-source ticks
    #[serde(default = "default_interval_secs")]
    pub simulation_interval_secs: u64,
    /// Chance of emitting a notification on each tick
    #[serde(default = "default_probability")]
    pub simulation_probability: f64,
    /// Fixed seed for reproducible simulation
    #[serde(default)]
    pub simulation_seed: Option<u64>,
    /// Disable the simulated source entirely
    #[serde(default)]
    pub simulation_disabled: bool,
    /// How long an ambient toast stays visible
    #[serde(default = "default_toast_ttl_secs")]
    pub toast_ttl_secs: u64,
}

impl Default for CenterConfig {
    fn default() -> Self {
        Self {
            simulation_interval_secs: default_interval_secs(),
            simulation_probability: default_probability(),
            simulation_seed: None,
            simulation_disabled: false,
            toast_ttl_secs: default_toast_ttl_secs(),
        }
    }
}

impl CenterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_interval_secs(mut self, secs: u64) -> Self {
        self.simulation_interval_secs = secs;
        self
    }

    pub fn with_probability(mut self, probability: f64) -> Self {
        self.simulation_probability = probability;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.simulation_seed = Some(seed);
        self
    }

    pub fn without_simulation(mut self) -> Self {
        self.simulation_disabled = true;
        self
    }

    pub fn with_toast_ttl_secs(mut self, secs: u64) -> Self {
        self.toast_ttl_secs = secs;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.simulation_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "simulation_interval_secs must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.simulation_probability) {
            return Err(ConfigError::Invalid(format!(
                "simulation_probability must be within 0..=1, got {}",
                self.simulation_probability
            )));
        }
        Ok(())
    }

    pub fn simulation_interval(&self) -> Duration {
        Duration::from_secs(self.simulation_interval_secs)
    }

    pub fn toast_ttl(&self) -> Duration {
        Duration::from_secs(self.toast_ttl_secs)
    }

    /// Build the simulated source, or `None` when simulation is disabled.
    pub fn simulated_source(&self) -> Option<SimulatedSource> {
        if self.simulation_disabled {
            return None;
        }
        let source = SimulatedSource::new(self.simulation_interval(), self.simulation_probability);
        Some(match self.simulation_seed {
            Some(seed) => source.with_seed(seed),
            None => source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = CenterConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CenterConfig::default());
        assert_eq!(config.simulation_interval(), Duration::from_secs(30));
        assert_eq!(config.simulation_probability, 0.1);
    }

    #[test]
    fn test_partial_json() {
        let config =
            CenterConfig::from_json_str(r#"{"simulation_seed": 9, "toast_ttl_secs": 2}"#).unwrap();
        assert_eq!(config.simulation_seed, Some(9));
        assert_eq!(config.toast_ttl(), Duration::from_secs(2));
        assert_eq!(config.simulation_interval_secs, 30);
    }

    #[test]
    fn test_invalid_probability_rejected() {
        let err = CenterConfig::from_json_str(r#"{"simulation_probability": 1.5}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_zero_interval_rejected() {
        assert!(CenterConfig::new().with_interval_secs(0).validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = CenterConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_simulated_source_follows_config() {
        let config = CenterConfig::new().with_interval_secs(5).with_probability(0.5);
        let source = config.simulated_source().unwrap();
        assert_eq!(source.interval(), Duration::from_secs(5));
        assert_eq!(source.probability(), 0.5);

        assert!(config.without_simulation().simulated_source().is_none());
    }
}
