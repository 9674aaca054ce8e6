/*
 * Simulation Parameters Module
 *
 * This module defines the SimulationParams struct that contains all the
 * adjustable parameters for the flocking engine. These parameters can be
 * edited from an external settings panel between frames. It also provides
 * validation, JSON loading, and change detection so the flock knows when a
 * population rebuild is required.
 */

use std::fmt;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::boid::Species;
use crate::error::{ConfigError, ParamsError};
use crate::MAX_BOIDS;

/// Coordinate axis, used when reporting degenerate bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// Axis-aligned box every boid is confined to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl WorldBounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extent(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    // Hard clamp, component-wise
    pub fn clamp(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }

    fn validate(&self) -> Result<(), ParamsError> {
        let extent = self.extent();
        for axis in Axis::ALL {
            let min = self.min[axis.index()];
            let max = self.max[axis.index()];
            if !(min.is_finite() && max.is_finite() && min < max) {
                return Err(ParamsError::DegenerateBounds { axis, min, max });
            }
            // max - min must itself be representable
            if !extent[axis.index()].is_finite() {
                return Err(ParamsError::BoundsTooLarge { axis, min, max });
            }
        }
        Ok(())
    }
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self {
            min: Vec3::new(-0.83, -0.48, -0.48),
            max: Vec3::new(0.83, 0.48, 0.48),
        }
    }
}

// Parameters for the simulation that can be adjusted between frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// Number of boids `regenerate` creates.
    pub num_boids: usize,
    pub min_speed: f32,
    pub max_speed: f32,
    /// Linear radius; neighbors are found by comparing squared distances to its square.
    pub neighborhood_radius: f32,
    /// Distance from a wall at which boundary steering kicks in.
    pub avoidance_margin: f32,
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub avoidance_weight: f32,
    pub random_weight: f32,
    /// Fraction of the blended steering applied to velocity each frame.
    pub inertia: f32,
    pub world_bounds: WorldBounds,
    /// Species assigned round-robin on regeneration.
    pub species_kinds: Vec<Species>,
    /// Seed for the per-run random source.
    pub seed: u64,
    /// Spawn box as a fraction of the world half-extent.
    pub spawn_fraction: f32,
    pub enable_spatial_grid: bool,
    pub pause_simulation: bool,
}

/// A snapshot of parameter values used for change detection.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSnapshot {
    num_boids: usize,
    species_kinds: Vec<Species>,
    spawn_fraction: f32,
    world_bounds: WorldBounds,
    tuning: [f32; 10],
    enable_spatial_grid: bool,
    pause_simulation: bool,
}

/// Outcome of [`SimulationParams::detect_changes`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParamChanges {
    /// Population-shaping fields changed; the flock must be regenerated.
    pub regenerate: bool,
    /// Any other field changed; takes effect on the next step.
    pub tuning: bool,
}

impl ParamChanges {
    pub fn any(&self) -> bool {
        self.regenerate || self.tuning
    }
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            num_boids: 40,
            min_speed: 0.003,
            max_speed: 0.003,
            // The legacy tank compared squared distances against 0.03
            neighborhood_radius: 0.03_f32.sqrt(),
            avoidance_margin: 0.15,
            separation_weight: 1.0,
            alignment_weight: 0.8,
            cohesion_weight: 0.98,
            avoidance_weight: 0.2,
            random_weight: 0.01,
            inertia: 0.01,
            world_bounds: WorldBounds::default(),
            species_kinds: vec![Species::GREEN, Species::RED],
            seed: 42,
            spawn_fraction: 1.0,
            enable_spatial_grid: false,
            pause_simulation: false,
        }
    }
}

impl SimulationParams {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.num_boids > MAX_BOIDS {
            return Err(ParamsError::TooManyBoids {
                max: MAX_BOIDS,
                actual: self.num_boids,
            });
        }
        for (field, value) in self.named_scalars() {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ParamsError::NegativeOrNonFinite { field, value });
            }
        }
        if self.min_speed > self.max_speed {
            return Err(ParamsError::SpeedRangeInverted {
                min: self.min_speed,
                max: self.max_speed,
            });
        }
        self.world_bounds.validate()?;
        self.validate_species()?;
        if !(self.spawn_fraction > 0.0 && self.spawn_fraction <= 1.0) {
            return Err(ParamsError::InvalidSpawnFraction(self.spawn_fraction));
        }
        Ok(())
    }

    fn validate_species(&self) -> Result<(), ParamsError> {
        if self.species_kinds.is_empty() {
            return Err(ParamsError::NoSpecies);
        }
        for (i, species) in self.species_kinds.iter().enumerate() {
            if self.species_kinds[..i].contains(species) {
                return Err(ParamsError::DuplicateSpecies(species.0));
            }
        }
        Ok(())
    }

    fn named_scalars(&self) -> [(&'static str, f32); 10] {
        [
            ("min_speed", self.min_speed),
            ("max_speed", self.max_speed),
            ("neighborhood_radius", self.neighborhood_radius),
            ("avoidance_margin", self.avoidance_margin),
            ("separation_weight", self.separation_weight),
            ("alignment_weight", self.alignment_weight),
            ("cohesion_weight", self.cohesion_weight),
            ("avoidance_weight", self.avoidance_weight),
            ("random_weight", self.random_weight),
            ("inertia", self.inertia),
        ]
    }

    pub fn neighborhood_radius_squared(&self) -> f32 {
        self.neighborhood_radius * self.neighborhood_radius
    }

    /// Parse a JSON document; missing fields fall back to their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let params: SimulationParams = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // Take a snapshot of current parameter values for change detection
    pub fn take_snapshot(&self) -> ParamSnapshot {
        let mut tuning = [0.0; 10];
        for (slot, (_, value)) in tuning.iter_mut().zip(self.named_scalars()) {
            *slot = value;
        }
        ParamSnapshot {
            num_boids: self.num_boids,
            species_kinds: self.species_kinds.clone(),
            spawn_fraction: self.spawn_fraction,
            world_bounds: self.world_bounds,
            tuning,
            enable_spatial_grid: self.enable_spatial_grid,
            pause_simulation: self.pause_simulation,
        }
    }

    // Check which parameters have changed since `baseline` was taken.
    // Without a baseline nothing is reported as changed.
    pub fn detect_changes(&self, baseline: Option<&ParamSnapshot>) -> ParamChanges {
        let Some(prev) = baseline else {
            return ParamChanges::default();
        };
        let current = self.take_snapshot();

        let regenerate = current.num_boids != prev.num_boids
            || current.species_kinds != prev.species_kinds
            || current.spawn_fraction != prev.spawn_fraction
            || current.world_bounds != prev.world_bounds;
        let tuning = current.tuning != prev.tuning
            || current.enable_spatial_grid != prev.enable_spatial_grid
            || current.pause_simulation != prev.pause_simulation;

        ParamChanges { regenerate, tuning }
    }

    // Get parameter ranges for UI sliders
    pub fn population_range() -> std::ops::RangeInclusive<usize> {
        0..=1000
    }

    pub fn speed_range() -> std::ops::RangeInclusive<f32> {
        0.0..=0.05
    }

    pub fn weight_range() -> std::ops::RangeInclusive<f32> {
        0.0..=3.0
    }

    pub fn radius_range() -> std::ops::RangeInclusive<f32> {
        0.0..=1.0
    }

    pub fn inertia_range() -> std::ops::RangeInclusive<f32> {
        0.0..=1.0
    }
}
