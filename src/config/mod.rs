//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::calculate::composite_sr::{LeaderboardOptions, RoleWeights};
use crate::calculate::DEFAULT_FIGHT_GAP_SECONDS;
use crate::models::{Role, StatColumn};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Leaderboard qualification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardConfig {
    /// Minimum maps played on the hero
    #[serde(default = "default_min_maps")]
    pub min_maps: u32,

    /// Minimum total time on the hero, in seconds
    #[serde(default = "default_min_time_seconds")]
    pub min_time_seconds: f64,

    /// Rows returned after ranking
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_min_maps() -> u32 {
    10
}

fn default_min_time_seconds() -> f64 {
    60.0
}

fn default_limit() -> usize {
    100
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            min_maps: default_min_maps(),
            min_time_seconds: default_min_time_seconds(),
            limit: default_limit(),
        }
    }
}

/// Analytics settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Largest gap between kills in the same fight, in seconds
    #[serde(default = "default_fight_gap")]
    pub fight_gap_seconds: f64,

    #[serde(default)]
    pub leaderboard: LeaderboardConfig,

    /// Composite SR weight overrides, per role and column
    #[serde(default)]
    pub weights: BTreeMap<Role, BTreeMap<StatColumn, f64>>,
}

fn default_fight_gap() -> f64 {
    DEFAULT_FIGHT_GAP_SECONDS
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            fight_gap_seconds: default_fight_gap(),
            leaderboard: LeaderboardConfig::default(),
            weights: BTreeMap::new(),
        }
    }
}

/// One-run values that replace file settings, typically from CLI flags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub fight_gap_seconds: Option<f64>,
    pub min_maps: Option<u32>,
    pub min_time_seconds: Option<f64>,
    pub limit: Option<usize>,
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            analytics: AnalyticsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let analytics = &self.analytics;

        if !(analytics.fight_gap_seconds > 0.0) {
            return Err(ConfigError::ValidationError(
                "Fight gap must be greater than 0".to_string(),
            ));
        }

        if !(analytics.leaderboard.min_time_seconds >= 0.0) {
            return Err(ConfigError::ValidationError(
                "Leaderboard minimum time cannot be negative".to_string(),
            ));
        }

        if analytics.leaderboard.limit == 0 {
            return Err(ConfigError::ValidationError(
                "Leaderboard limit must be greater than 0".to_string(),
            ));
        }

        for (role, overrides) in &analytics.weights {
            let table = RoleWeights::default_for(*role);
            for (column, weight) in overrides {
                if !table.contains(*column) {
                    return Err(ConfigError::ValidationError(format!(
                        "{} is not a {} column",
                        column, role
                    )));
                }
                if !weight.is_finite() {
                    return Err(ConfigError::ValidationError(format!(
                        "{} weight for {} must be a finite number",
                        role, column
                    )));
                }
            }
        }

        Ok(())
    }

    /// Apply one-run overrides, then validate the result.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) -> Result<(), ConfigError> {
        if let Some(level) = &overrides.log_level {
            self.log_level = level.clone();
        }
        if let Some(gap) = overrides.fight_gap_seconds {
            self.analytics.fight_gap_seconds = gap;
        }

        let leaderboard = &mut self.analytics.leaderboard;
        if let Some(min_maps) = overrides.min_maps {
            leaderboard.min_maps = min_maps;
        }
        if let Some(min_time) = overrides.min_time_seconds {
            leaderboard.min_time_seconds = min_time;
        }
        if let Some(limit) = overrides.limit {
            leaderboard.limit = limit;
        }

        self.validate()
    }

    /// Leaderboard options carrying this configuration's thresholds and
    /// weight overrides.
    pub fn leaderboard_options(&self) -> LeaderboardOptions {
        let leaderboard = &self.analytics.leaderboard;
        LeaderboardOptions {
            min_maps: leaderboard.min_maps,
            min_time_seconds: leaderboard.min_time_seconds,
            limit: leaderboard.limit,
            weight_overrides: self.analytics.weights.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, "info");
        assert_eq!(config.analytics.fight_gap_seconds, 15.0);
        assert_eq!(config.analytics.leaderboard.min_maps, 10);
        assert_eq!(config.analytics.leaderboard.min_time_seconds, 60.0);
        assert_eq!(config.analytics.leaderboard.limit, 100);
        assert!(config.analytics.weights.is_empty());
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_gap() {
        let mut config = AppConfig::default();
        config.analytics.fight_gap_seconds = 0.0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_limit() {
        let mut config = AppConfig::default();
        config.analytics.leaderboard.limit = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_foreign_weight_column() {
        let mut config = AppConfig::default();
        config
            .analytics
            .weights
            .entry(Role::Damage)
            .or_default()
            .insert(StatColumn::HealingDealt, 0.2);

        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: healing_dealt is not a damage column"
        );
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
            log_level = "debug"

            [analytics]
            fight_gap_seconds = 12.5

            [analytics.leaderboard]
            min_maps = 3

            [analytics.weights.support]
            healing_dealt = 0.5
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        config.validate().unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.analytics.fight_gap_seconds, 12.5);
        assert_eq!(config.analytics.leaderboard.min_maps, 3);
        assert_eq!(config.analytics.leaderboard.limit, 100);

        let options = config.leaderboard_options();
        let weights = options.weights_for(Role::Support);
        let healing = weights
            .weights
            .iter()
            .find(|w| w.column == StatColumn::HealingDealt)
            .unwrap();
        assert_eq!(healing.weight, 0.5);
    }

    #[test]
    fn test_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[analytics.leaderboard]\nlimit = 0").unwrap();

        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(&ConfigOverrides {
                fight_gap_seconds: Some(8.0),
                min_maps: Some(2),
                limit: Some(5),
                ..ConfigOverrides::default()
            })
            .unwrap();

        assert_eq!(config.analytics.fight_gap_seconds, 8.0);
        let options = config.leaderboard_options();
        assert_eq!(options.min_maps, 2);
        assert_eq!(options.min_time_seconds, 60.0);
        assert_eq!(options.limit, 5);
    }

    #[test]
    fn test_overrides_are_validated() {
        let rejected = [
            ConfigOverrides {
                fight_gap_seconds: Some(-1.0),
                ..ConfigOverrides::default()
            },
            ConfigOverrides {
                min_time_seconds: Some(-30.0),
                ..ConfigOverrides::default()
            },
            ConfigOverrides {
                limit: Some(0),
                ..ConfigOverrides::default()
            },
        ];

        for overrides in &rejected {
            let mut config = AppConfig::default();
            let err = config.apply_overrides(overrides).unwrap_err();
            assert!(matches!(err, ConfigError::ValidationError(_)), "{:?}", overrides);
        }
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        // Should be parseable
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.analytics.fight_gap_seconds, parsed.analytics.fight_gap_seconds);
    }
}
