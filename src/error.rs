//! Error types for engine configuration.
//!
//! Scheduling itself is total and never fails; only an invalid
//! configuration is rejected, when the engine is built.

use thiserror::Error;

/// Result type for configuration checks.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Invalid engine or annealing configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Initial temperature must be positive and finite
    #[error("initial temperature must be positive, got {0}")]
    InitialTemperature(f64),

    /// Temperature floor must be positive and below the initial temperature
    #[error("minimum temperature must be in (0, initial), got {0}")]
    MinTemperature(f64),

    /// Cooling multiplier must lie strictly between 0 and 1
    #[error("cooling multiplier must be in (0, 1), got {0}")]
    Cooling(f64),

    /// Reheat factor must lie in (0, 1]
    #[error("reheat factor must be in (0, 1], got {0}")]
    ReheatFactor(f64),

    /// A probability outside [0, 1]
    #[error("coupled removal probability must be in [0, 1], got {0}")]
    RemovalProbability(f64),

    /// Default stretch must be a positive number of hours
    #[error("default max stretch must be positive hours, got {0}")]
    DefaultMaxStretch(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_value() {
        let err = ConfigError::Cooling(1.5);
        assert_eq!(err.to_string(), "cooling multiplier must be in (0, 1), got 1.5");
        let err = ConfigError::InitialTemperature(-2.0);
        assert!(err.to_string().contains("-2"));
    }
}
