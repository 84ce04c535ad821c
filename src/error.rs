//! Configuration errors
//!
//! The simulations themselves have no failure surface: timer expiry, settling
//! and win/loss are ordinary state transitions. Everything that can go wrong is
//! caught when a game is started with bad tuning or level parameters.

use thiserror::Error;

/// Rejected tuning or level parameters
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} = {value} is outside {range}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        range: &'static str,
    },

    #[error("{game} levels need a time limit of at least one second")]
    MissingTimeLimit { game: &'static str },

    #[error("unknown game id: {0}")]
    UnknownGame(String),

    #[error("level {number} does not exist for {game}")]
    UnknownLevel { game: &'static str, number: u32 },

    #[error("invalid json: {0}")]
    Parse(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Reject zero, negative and NaN values
pub fn ensure_positive(name: &'static str, value: f64) -> ConfigResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

/// Require a coefficient strictly inside (0, 1)
pub fn ensure_unit_open(name: &'static str, value: f64) -> ConfigResult<()> {
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            range: "(0, 1)",
        })
    }
}

/// Require a probability in [0, 1]
pub fn ensure_probability(name: &'static str, value: f64) -> ConfigResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            range: "[0, 1]",
        })
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
