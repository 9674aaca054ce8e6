/*
 * Flock Module
 *
 * This module defines the Flock, which owns every boid together with the
 * random source, the optional spatial grid and the debug statistics. It is
 * the only thing that mutates boids: once per frame through `step`/`frame`,
 * or wholesale through `regenerate`. Both take `&mut self`, so a rebuild can
 * never interleave with a sweep.
 *
 * Renderers get read-only access through `boids()` and `views()`.
 */

use std::collections::BTreeMap;
use std::time::Instant;

use log::{debug, info, trace, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::boid::{Boid, BoidView, Species};
use crate::debug::DebugInfo;
use crate::error::ParamsError;
use crate::params::{ParamChanges, SimulationParams};
use crate::physics;
use crate::shared::SharedParams;
use crate::spatial_grid::SpatialGrid;

pub struct Flock<R = ChaCha8Rng> {
    boids: Vec<Boid>,
    params: SharedParams,
    rng: R,
    spatial_grid: Option<SpatialGrid>,
    debug_info: DebugInfo,
}

impl Flock<ChaCha8Rng> {
    /// Build and populate a flock whose random source is seeded from `params.seed`.
    pub fn new(params: SimulationParams) -> Result<Self, ParamsError> {
        let rng = ChaCha8Rng::seed_from_u64(params.seed);
        Self::with_rng(params, rng)
    }
}

impl<R: Rng> Flock<R> {
    pub fn with_rng(params: SimulationParams, rng: R) -> Result<Self, ParamsError> {
        let shared = SharedParams::new(params)?;
        Ok(Self::with_shared(shared, rng))
    }

    /// Build a flock driven by an existing parameter handle, e.g. one a settings
    /// panel already holds.
    pub fn with_shared(params: SharedParams, rng: R) -> Self {
        let mut flock = Self::empty(params, rng);
        flock.regenerate();
        flock
    }

    /// Build a flock from explicitly placed boids instead of a random population.
    pub fn from_boids(params: SimulationParams, boids: Vec<Boid>, rng: R) -> Result<Self, ParamsError> {
        let shared = SharedParams::new(params)?;
        let mut flock = Self::empty(shared, rng);
        flock.boids = boids;
        let applied = flock.params.get();
        flock.params.mark_applied(&applied);
        Ok(flock)
    }

    fn empty(params: SharedParams, rng: R) -> Self {
        Self {
            boids: Vec::new(),
            params,
            rng,
            spatial_grid: None,
            debug_info: DebugInfo::default(),
        }
    }

    /// Discard every boid and spawn a new population from the current parameters.
    pub fn regenerate(&mut self) {
        let params = self.params.get();
        self.rebuild(&params);
    }

    /// Store new parameters and regenerate from them.
    pub fn regenerate_with(&mut self, params: SimulationParams) -> Result<(), ParamsError> {
        self.params.set(params)?;
        self.regenerate();
        Ok(())
    }

    fn rebuild(&mut self, params: &SimulationParams) {
        self.boids = physics::spawn_boids(params, &mut self.rng);
        self.params.mark_applied(params);
        self.debug_info.record_regeneration();
        info!(
            "regenerated flock: {} boids ({})",
            self.boids.len(),
            format_species_counts(&self.species_counts())
        );
    }

    /// Advance every boid by one frame of `delta_ms` milliseconds.
    pub fn step(&mut self, delta_ms: f32) {
        let params = self.params.get();
        self.sweep(&params, delta_ms);
    }

    /// Per-frame entry point for a driver: apply pending parameter changes
    /// (regenerating if the population shape changed), then step unless paused.
    pub fn frame(&mut self, delta_ms: f32) -> ParamChanges {
        let (params, changes) = self.params.poll();

        if changes.regenerate {
            self.rebuild(&params);
        } else if changes.tuning {
            debug!("parameter changes take effect this frame");
            self.params.mark_applied(&params);
        }

        if !params.pause_simulation {
            self.sweep(&params, delta_ms);
        }
        changes
    }

    fn sweep(&mut self, params: &SimulationParams, delta_ms: f32) {
        if !(delta_ms.is_finite() && delta_ms >= 0.0) {
            warn!("skipping frame with invalid delta time {delta_ms} ms");
            self.debug_info.record_skip();
            return;
        }

        let grid = if params.enable_spatial_grid {
            Some(prepare_grid(&mut self.spatial_grid, params))
        } else {
            None
        };

        let started = Instant::now();
        let summary = physics::update_boids(&mut self.boids, delta_ms, params, &mut self.rng, grid);
        self.debug_info.record_sweep(&summary, started.elapsed());

        debug!(
            "stepped {} boids by {delta_ms} ms in {:?} (neighbors: mean {:.2}, max {})",
            summary.updated,
            self.debug_info.last_step_duration,
            summary.mean_neighbors(),
            summary.max_neighbors
        );
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn views(&self) -> impl Iterator<Item = BoidView> + '_ {
        self.boids.iter().map(Boid::view)
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    pub fn species_counts(&self) -> BTreeMap<Species, usize> {
        let mut counts = BTreeMap::new();
        for boid in &self.boids {
            *counts.entry(boid.species).or_insert(0) += 1;
        }
        counts
    }

    /// Handle for editing parameters between frames.
    pub fn params(&self) -> &SharedParams {
        &self.params
    }

    pub fn debug_info(&self) -> &DebugInfo {
        &self.debug_info
    }
}

// Recreate the grid if the radius or world box changed since it was built
fn prepare_grid<'a>(slot: &'a mut Option<SpatialGrid>, params: &SimulationParams) -> &'a mut SpatialGrid {
    let radius = params.neighborhood_radius;
    let bounds = params.world_bounds;
    let grid = match slot.take() {
        Some(grid) if !grid.is_stale(radius, &bounds) => grid,
        _ => {
            let grid = SpatialGrid::new(radius, bounds);
            trace!("rebuilt spatial grid with {} cells", grid.grid.len());
            grid
        }
    };
    slot.insert(grid)
}

fn format_species_counts(counts: &BTreeMap<Species, usize>) -> String {
    if counts.is_empty() {
        return "no species".to_string();
    }
    counts
        .iter()
        .map(|(species, count)| format!("{species}: {count}"))
        .collect::<Vec<_>>()
        .join(", ")
}
