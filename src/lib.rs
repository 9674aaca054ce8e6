/*
 * Boid Tank - Module Definitions
 *
 * This file defines the module structure for the flocking engine.
 * The engine is headless: it advances boids in a box once per frame and
 * hands read-only views to whatever renders them.
 */

// Re-export key components for easier access
pub use boid::{Boid, BoidView, Species};
pub use debug::DebugInfo;
pub use error::{ConfigError, ParamsError};
pub use flock::Flock;
pub use params::{Axis, ParamChanges, ParamSnapshot, SimulationParams, WorldBounds};
pub use shared::SharedParams;
pub use spatial_grid::SpatialGrid;

// Define modules
pub mod boid;
pub mod debug;
pub mod error;
pub mod flock;
pub mod params;
pub mod physics;
pub mod shared;
pub mod spatial_grid;

// Constants
/// Frame rate that velocities are expressed against.
pub const REFERENCE_FRAME_RATE: f32 = 60.0;
pub const MAX_BOIDS: usize = 100_000;
