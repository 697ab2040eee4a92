//! Errors raised while validating a [`FlockConfig`](crate::FlockConfig).

/// A configuration value that would break the simulation invariants.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// World bounds must be finite and strictly positive.
    #[error("invalid world bounds {width} x {height}")]
    InvalidBounds { width: f32, height: f32 },

    /// Speeds and speed limits.
    #[error("invalid {name}: {value}")]
    InvalidSpeed { name: &'static str, value: f32 },

    /// Neighbour and deflection radii.
    #[error("invalid {name}: {value} (radius must be finite and non-negative)")]
    InvalidRadius { name: &'static str, value: f32 },

    /// Rule weights and the repel strength.
    #[error("invalid {name}: {value} (weight must be finite and non-negative)")]
    InvalidWeight { name: &'static str, value: f32 },

    #[error("invalid initial spread: {0}")]
    InvalidSpread(f32),
}

/// Convenience result type for configuration checks.
pub type ConfigResult<T> = Result<T, ConfigError>;
