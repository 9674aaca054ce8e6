/*
 * Physics Module
 *
 * This module advances the flock. It contains the neighborhood query, the
 * per-boid update (blend the five rules, integrate, clamp) and population
 * spawning.
 *
 * Boids are updated one at a time, in index order, directly in the shared
 * slice. A boid therefore sees the already-advanced state of every boid
 * before it and the previous-frame state of every boid after it. Positions
 * are never snapshotted before the sweep.
 */

use glam::Vec3;
use rand::Rng;

use crate::boid::{clamp_length, random_in_box, Boid};
use crate::params::SimulationParams;
use crate::spatial_grid::SpatialGrid;
use crate::REFERENCE_FRAME_RATE;

/// Neighborhood statistics gathered during one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SweepSummary {
    pub updated: usize,
    pub total_neighbors: usize,
    pub max_neighbors: usize,
}

impl SweepSummary {
    pub fn mean_neighbors(&self) -> f32 {
        if self.updated == 0 {
            0.0
        } else {
            self.total_neighbors as f32 / self.updated as f32
        }
    }
}

// Brute-force neighborhood: every other boid within the squared radius, in index order
pub fn collect_neighbors(boids: &[Boid], index: usize, radius_squared: f32, out: &mut Vec<usize>) {
    out.clear();
    let position = boids[index].position;
    for (i, other) in boids.iter().enumerate() {
        if i == index {
            continue;
        }
        if position.distance_squared(other.position) <= radius_squared {
            out.push(i);
        }
    }
}

// Update a single boid in place against the current state of the flock
pub fn update_boid<R: Rng + ?Sized>(
    boids: &mut [Boid],
    index: usize,
    delta_ms: f32,
    params: &SimulationParams,
    rng: &mut R,
    grid: Option<&SpatialGrid>,
) {
    // Reuse the boid's own buffer for its new neighborhood
    let mut neighborhood = std::mem::take(&mut boids[index].neighborhood);
    let radius_squared = params.neighborhood_radius_squared();
    match grid {
        Some(grid) => grid.query(boids, index, radius_squared, &mut neighborhood),
        None => collect_neighbors(boids, index, radius_squared, &mut neighborhood),
    }

    let boid = &boids[index];
    let mut delta_v = boid.separation(boids, &neighborhood, params.separation_weight);
    delta_v += boid.alignment(boids, &neighborhood, params.alignment_weight);
    delta_v += boid.cohesion(boids, &neighborhood, params.cohesion_weight);
    delta_v += boid.avoidance(
        &params.world_bounds,
        params.avoidance_margin,
        params.avoidance_weight,
    );
    delta_v += Boid::randomness(rng, params.random_weight);
    delta_v *= params.inertia;

    let boid = &mut boids[index];
    boid.neighborhood = neighborhood;

    // Apply steering, then keep the speed inside its band
    boid.velocity += delta_v;
    boid.velocity = clamp_length(boid.velocity, params.min_speed, params.max_speed);

    // Frame-rate independent displacement
    let displacement = boid.velocity * (delta_ms * REFERENCE_FRAME_RATE / 1000.0);
    boid.position += displacement;
    boid.position = params.world_bounds.clamp(boid.position);
}

// Update every boid once, in stored order
pub fn update_boids<R: Rng + ?Sized>(
    boids: &mut [Boid],
    delta_ms: f32,
    params: &SimulationParams,
    rng: &mut R,
    mut grid: Option<&mut SpatialGrid>,
) -> SweepSummary {
    if let Some(grid) = grid.as_deref_mut() {
        grid.rebuild(boids);
    }

    let mut summary = SweepSummary::default();
    for i in 0..boids.len() {
        update_boid(boids, i, delta_ms, params, rng, grid.as_deref());
        if let Some(grid) = grid.as_deref_mut() {
            grid.relocate(i, boids[i].position);
        }

        let neighbors = boids[i].neighborhood.len();
        summary.updated += 1;
        summary.total_neighbors += neighbors;
        summary.max_neighbors = summary.max_neighbors.max(neighbors);
    }
    summary
}

// Create a fresh population: random positions inside the spawn box, random
// velocities in the unit cube, species assigned round-robin
pub fn spawn_boids<R: Rng + ?Sized>(params: &SimulationParams, rng: &mut R) -> Vec<Boid> {
    let bounds = &params.world_bounds;
    let center = bounds.center();
    let spawn_half_extent = bounds.half_extent() * params.spawn_fraction;
    let kinds = &params.species_kinds;

    let mut boids = Vec::with_capacity(params.num_boids);
    if kinds.is_empty() {
        return boids;
    }
    for i in 0..params.num_boids {
        let position = bounds.clamp(center + random_in_box(rng, spawn_half_extent));
        let velocity = random_in_box(rng, Vec3::ONE);
        boids.push(Boid::new(position, velocity, kinds[i % kinds.len()]));
    }
    boids
}
