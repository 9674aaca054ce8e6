/*
 * Boid Module
 *
 * This module defines the Boid struct and its steering rules.
 * Each boid blends five contributions every frame:
 * 1. Separation: Move away from every neighbor
 * 2. Alignment: Match the heading of same-species neighbors
 * 3. Cohesion: Move towards the center of same-species neighbors
 * 4. Avoidance: Turn back from walls that are closer than the margin
 * 5. Randomness: A small random nudge, redrawn every frame
 *
 * Every rule returns a vector rescaled to exactly its weight, or the zero
 * vector when there is nothing to steer by. This bounds each rule's influence
 * regardless of how many neighbors contribute.
 */

use std::fmt;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::params::WorldBounds;

/// Species tag used to group boids for alignment and cohesion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Species(pub u8);

impl Species {
    pub const GREEN: Species = Species(0);
    pub const RED: Species = Species(1);
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Species::GREEN => f.write_str("green"),
            Species::RED => f.write_str("red"),
            Species(other) => write!(f, "species-{other}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Boid {
    pub position: Vec3,
    pub velocity: Vec3,
    pub species: Species,
    // Indices into the flock, rebuilt on every update
    pub(crate) neighborhood: Vec<usize>,
}

impl Boid {
    pub fn new(position: Vec3, velocity: Vec3, species: Species) -> Self {
        Self {
            position,
            velocity,
            species,
            neighborhood: Vec::new(),
        }
    }

    /// Neighbors found during this boid's most recent update.
    pub fn neighborhood(&self) -> &[usize] {
        &self.neighborhood
    }

    pub fn view(&self) -> BoidView {
        BoidView {
            position: self.position,
            velocity: self.velocity,
            species: self.species,
        }
    }

    // Steer away from every neighbor, one unit vector per neighbor
    pub fn separation(&self, boids: &[Boid], neighbor_indices: &[usize], weight: f32) -> Vec3 {
        let mut steering = Vec3::ZERO;

        for &i in neighbor_indices {
            let other = &boids[i];
            let dist = other.position.distance(self.position);
            let mut away = self.position - other.position;
            // Coincident boids contribute nothing
            if dist != 0.0 {
                away /= dist;
            }
            steering += away;
        }

        scale_to_length(steering, weight)
    }

    // Steer towards the summed heading of same-species neighbors
    pub fn alignment(&self, boids: &[Boid], neighbor_indices: &[usize], weight: f32) -> Vec3 {
        let mut steering = Vec3::ZERO;

        for &i in neighbor_indices {
            let other = &boids[i];
            if other.species == self.species {
                steering += other.velocity;
            }
        }

        scale_to_length(steering, weight)
    }

    // Steer towards the centroid of same-species neighbors
    pub fn cohesion(&self, boids: &[Boid], neighbor_indices: &[usize], weight: f32) -> Vec3 {
        let mut center = Vec3::ZERO;
        let mut count = 0;

        for &i in neighbor_indices {
            let other = &boids[i];
            if other.species != self.species {
                continue;
            }
            center += other.position;
            count += 1;
        }

        if count == 0 {
            return Vec3::ZERO;
        }

        center /= count as f32;
        scale_to_length(center - self.position, weight)
    }

    // Push back towards the middle on every axis where a wall is within the margin
    pub fn avoidance(&self, bounds: &WorldBounds, margin: f32, weight: f32) -> Vec3 {
        let offset = self.position - bounds.center();
        let half_extent = bounds.half_extent();
        let mut steering = Vec3::ZERO;

        for axis in 0..3 {
            if offset[axis].abs() + margin > half_extent[axis] {
                steering[axis] = -sign(offset[axis]);
            }
        }

        scale_to_length(steering, weight)
    }

    // Random direction, never cached between frames
    pub fn randomness<R: Rng + ?Sized>(rng: &mut R, weight: f32) -> Vec3 {
        let nudge = random_in_box(rng, Vec3::ONE);
        scale_to_length(nudge, weight)
    }
}

/// Read-only copy of the state a renderer needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoidView {
    pub position: Vec3,
    pub velocity: Vec3,
    pub species: Species,
}

impl BoidView {
    /// Facing direction. Boids look along their direction of travel, so a
    /// stationary boid has no heading.
    pub fn heading(&self) -> Option<Vec3> {
        self.velocity.try_normalize()
    }
}

/// Rescale `v` to exactly `length`, leaving the zero vector untouched.
pub fn scale_to_length(v: Vec3, length: f32) -> Vec3 {
    let current = v.length();
    if current == 0.0 {
        return v;
    }
    (v / current) * length
}

/// Clamp the magnitude of `v` into `[min, max]`. A zero vector has no
/// direction to rescale along and is returned as is.
pub fn clamp_length(v: Vec3, min: f32, max: f32) -> Vec3 {
    let current = v.length();
    if current == 0.0 {
        return v;
    }
    (v / current) * current.clamp(min, max)
}

/// Uniform sample from the box `[-half_extent, half_extent]`.
pub fn random_in_box<R: Rng + ?Sized>(rng: &mut R, half_extent: Vec3) -> Vec3 {
    Vec3::new(
        rng.gen::<f32>() * 2.0 * half_extent.x - half_extent.x,
        rng.gen::<f32>() * 2.0 * half_extent.y - half_extent.y,
        rng.gen::<f32>() * 2.0 * half_extent.z - half_extent.z,
    )
}

// Sign with sign(0) == 0, unlike f32::signum
fn sign(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}
