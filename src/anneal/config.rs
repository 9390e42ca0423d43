//! Annealing configuration.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Configuration for the simulated annealing pass.
///
/// Cooling is geometric: `T_{k+1} = cooling * T_k`, applied once per outer
/// step. A run is one main pass followed by `reheat_passes` lighter passes
/// that restart from the best grid at `initial_temperature * reheat_factor`.
///
/// # Examples
///
/// ```
/// use u_weekplan::anneal::AnnealConfig;
///
/// let config = AnnealConfig::default()
///     .with_initial_temperature(3.0)
///     .with_cooling(0.97)
///     .with_outer_steps(200)
///     .with_inner_iterations(100)
///     .with_reheat_passes(1);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnealConfig {
    /// Starting temperature of the main pass.
    pub initial_temperature: f64,

    /// Geometric cooling multiplier in (0, 1).
    pub cooling: f64,

    /// Number of temperature levels per pass.
    pub outer_steps: usize,

    /// Moves attempted at each temperature level.
    pub inner_iterations: usize,

    /// A pass stops early once the temperature drops below this.
    pub min_temperature: f64,

    /// Extra passes after the main one.
    pub reheat_passes: usize,

    /// Reheat starting temperature as a fraction of `initial_temperature`.
    pub reheat_factor: f64,

    /// Chance that an accepted-for-evaluation add move also removes one
    /// block of the same label elsewhere.
    pub removal_probability: f64,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 2.0,
            cooling: 0.95,
            outer_steps: 120,
            inner_iterations: 150,
            min_temperature: 0.01,
            reheat_passes: 2,
            reheat_factor: 0.4,
            removal_probability: 0.35,
        }
    }
}

impl AnnealConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_cooling(mut self, cooling: f64) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_outer_steps(mut self, n: usize) -> Self {
        self.outer_steps = n;
        self
    }

    pub fn with_inner_iterations(mut self, n: usize) -> Self {
        self.inner_iterations = n;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_reheat_passes(mut self, n: usize) -> Self {
        self.reheat_passes = n;
        self
    }

    pub fn with_reheat_factor(mut self, factor: f64) -> Self {
        self.reheat_factor = factor;
        self
    }

    pub fn with_removal_probability(mut self, p: f64) -> Self {
        self.removal_probability = p;
        self
    }

    /// A configuration that performs no search at all.
    pub fn disabled() -> Self {
        Self::default().with_outer_steps(0).with_reheat_passes(0)
    }

    /// Total move budget across all passes, ignoring early stops.
    pub fn move_budget(&self) -> usize {
        (self.reheat_passes + 1) * self.outer_steps * self.inner_iterations
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.initial_temperature.is_finite() && self.initial_temperature > 0.0) {
            return Err(ConfigError::InitialTemperature(self.initial_temperature));
        }
        if !(self.min_temperature > 0.0 && self.min_temperature < self.initial_temperature) {
            return Err(ConfigError::MinTemperature(self.min_temperature));
        }
        if !(self.cooling > 0.0 && self.cooling < 1.0) {
            return Err(ConfigError::Cooling(self.cooling));
        }
        if !(self.reheat_factor > 0.0 && self.reheat_factor <= 1.0) {
            return Err(ConfigError::ReheatFactor(self.reheat_factor));
        }
        if !(0.0..=1.0).contains(&self.removal_probability) {
            return Err(ConfigError::RemovalProbability(self.removal_probability));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnnealConfig::default();
        assert!((config.initial_temperature - 2.0).abs() < 1e-12);
        assert!((config.removal_probability - 0.35).abs() < 1e-12);
        assert_eq!(config.reheat_passes, 2);
        assert_eq!(config.move_budget(), 3 * 120 * 150);
    }

    #[test]
    fn test_validate_ok() {
        assert!(AnnealConfig::default().validate().is_ok());
        assert!(AnnealConfig::disabled().validate().is_ok());
    }

    #[test]
    fn test_validate_bad_temperature() {
        let config = AnnealConfig::default().with_initial_temperature(-1.0);
        assert_eq!(config.validate(), Err(ConfigError::InitialTemperature(-1.0)));
        let config = AnnealConfig::default().with_initial_temperature(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_min_ge_initial() {
        let config = AnnealConfig::default()
            .with_initial_temperature(1.0)
            .with_min_temperature(2.0);
        assert_eq!(config.validate(), Err(ConfigError::MinTemperature(2.0)));
    }

    #[test]
    fn test_validate_bad_cooling() {
        assert!(AnnealConfig::default().with_cooling(1.0).validate().is_err());
        assert!(AnnealConfig::default().with_cooling(0.0).validate().is_err());
    }

    #[test]
    fn test_validate_bad_reheat_and_probability() {
        let config = AnnealConfig::default().with_reheat_factor(1.5);
        assert_eq!(config.validate(), Err(ConfigError::ReheatFactor(1.5)));
        let config = AnnealConfig::default().with_removal_probability(-0.1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RemovalProbability(_))
        ));
    }
}
