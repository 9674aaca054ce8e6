/*
 * Error Module
 *
 * Error types for the flocking engine. The numeric core never fails; errors only
 * come from rejecting a configuration or from reading one off disk.
 */

use std::path::PathBuf;

use thiserror::Error;

use crate::params::Axis;

/// Reasons a [`SimulationParams`](crate::params::SimulationParams) value is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamsError {
    #[error("num_boids ({actual}) exceeds the supported maximum ({max})")]
    TooManyBoids { max: usize, actual: usize },
    #[error("{field} must be finite and non-negative (got {value})")]
    NegativeOrNonFinite { field: &'static str, value: f32 },
    #[error("min_speed ({min}) must not exceed max_speed ({max})")]
    SpeedRangeInverted { min: f32, max: f32 },
    #[error("world bounds must be finite with min < max on the {axis} axis (min {min}, max {max})")]
    DegenerateBounds { axis: Axis, min: f32, max: f32 },
    #[error("world bounds are too wide on the {axis} axis: max - min overflows (min {min}, max {max})")]
    BoundsTooLarge { axis: Axis, min: f32, max: f32 },
    #[error("species_kinds must name at least one species")]
    NoSpecies,
    #[error("species {0} is listed more than once in species_kinds")]
    DuplicateSpecies(u8),
    #[error("spawn_fraction must lie in (0, 1] (got {0})")]
    InvalidSpawnFraction(f32),
}

/// Failures while loading parameters from a JSON document or file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(#[from] ParamsError),
}
