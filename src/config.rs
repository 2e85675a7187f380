//! Robot settings: defaults, optional TOML file, environment overrides.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::sensor::AnomalyBounds;

/// Settings for one robot.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct RobotConfig {
    pub robot_id: String,
    pub baseline: f64,
    pub anomaly_low: f64,
    pub anomaly_high: f64,
    pub success_probability: f64,
    /// Fixed seed for reproducible runs; OS entropy when unset.
    pub seed: Option<u64>,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            robot_id: "R-001".into(),
            baseline: 22.0,
            anomaly_low: 18.0,
            anomaly_high: 28.0,
            success_probability: 0.85,
            seed: None,
        }
    }
}

impl RobotConfig {
    /// Defaults, then the file at `path` if given, then process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|var| std::env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file; missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Override fields from `ROBOT_*` variables resolved through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("ROBOT_ID") {
            self.robot_id = v;
        }
        if let Some(v) = lookup("ROBOT_SEED") {
            self.seed = Some(parse_env("ROBOT_SEED", v)?);
        }
        if let Some(v) = lookup("ROBOT_BASELINE") {
            self.baseline = parse_env("ROBOT_BASELINE", v)?;
        }
        if let Some(v) = lookup("ROBOT_SUCCESS_PROBABILITY") {
            self.success_probability = parse_env("ROBOT_SUCCESS_PROBABILITY", v)?;
        }
        if let Some(v) = lookup("ROBOT_ANOMALY_LOW") {
            self.anomaly_low = parse_env("ROBOT_ANOMALY_LOW", v)?;
        }
        if let Some(v) = lookup("ROBOT_ANOMALY_HIGH") {
            self.anomaly_high = parse_env("ROBOT_ANOMALY_HIGH", v)?;
        }
        Ok(())
    }

    /// Reject non-finite numbers, probabilities outside `[0, 1]` and inverted bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("baseline", self.baseline),
            ("anomaly_low", self.anomaly_low),
            ("anomaly_high", self.anomaly_high),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }
        if !(0.0..=1.0).contains(&self.success_probability) {
            return Err(ConfigError::Probability(self.success_probability));
        }
        if self.anomaly_low > self.anomaly_high {
            return Err(ConfigError::Bounds {
                low: self.anomaly_low,
                high: self.anomaly_high,
            });
        }
        Ok(())
    }

    /// Anomaly window built from `anomaly_low` and `anomaly_high`.
    pub fn bounds(&self) -> AnomalyBounds {
        AnomalyBounds::new(self.anomaly_low, self.anomaly_high)
    }
}

fn parse_env<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Env { var, value })
}
