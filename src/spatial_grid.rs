/*
 * Spatial Grid Module
 *
 * This module defines the SpatialGrid struct for faster neighbor lookups.
 * It divides the world box into a uniform 3D grid of cells at least one
 * neighborhood radius wide, so every neighbor of a boid sits in the 3x3x3
 * block of cells around it.
 *
 * The flock updates boids one at a time and in place, so the grid is kept
 * exact during a sweep: after a boid moves it is relocated to its new cell
 * before the next boid queries. Query results are filtered with the same
 * squared-distance test as the brute-force query and sorted by index, which
 * keeps the floating-point summation order identical to it.
 */

use glam::{UVec3, Vec3};

use crate::boid::Boid;
use crate::params::WorldBounds;

// Upper bound on cells per axis
const MAX_CELLS_PER_AXIS: u32 = 64;
const CELL_SLACK: f32 = 1.0001;

pub struct SpatialGrid {
    pub cell_size: Vec3,
    pub dims: UVec3,
    pub grid: Vec<Vec<usize>>,
    origin: Vec3,
    // Cell each boid was last filed under
    cell_of: Vec<usize>,
    // Geometry the grid was built for
    radius: f32,
    bounds: WorldBounds,
}

impl SpatialGrid {
    pub fn new(radius: f32, bounds: WorldBounds) -> Self {
        let extent = bounds.extent();
        let cells_along = |length: f32| -> u32 {
            if radius <= 0.0 {
                return MAX_CELLS_PER_AXIS;
            }
            // Slightly wider than the radius so rounding never skips a cell
            ((length / (radius * CELL_SLACK)).floor() as u32).clamp(1, MAX_CELLS_PER_AXIS)
        };
        let dims = UVec3::new(cells_along(extent.x), cells_along(extent.y), cells_along(extent.z));
        let cell_size = extent / dims.as_vec3();

        let cell_count = (dims.x * dims.y * dims.z) as usize;
        let mut grid = Vec::with_capacity(cell_count);
        for _ in 0..cell_count {
            grid.push(Vec::new());
        }

        Self {
            cell_size,
            dims,
            grid,
            origin: bounds.min,
            cell_of: Vec::new(),
            radius,
            bounds,
        }
    }

    /// True when the grid was built for a different radius or world box.
    pub fn is_stale(&self, radius: f32, bounds: &WorldBounds) -> bool {
        self.radius != radius || self.bounds != *bounds
    }

    // Convert a world position to integer cell coordinates, clamped into the grid
    #[inline]
    fn cell_coords(&self, pos: Vec3) -> UVec3 {
        let max = (self.dims - UVec3::ONE).as_vec3();
        let scaled = ((pos - self.origin) / self.cell_size).floor().clamp(Vec3::ZERO, max);
        scaled.as_uvec3()
    }

    #[inline]
    fn flat_index(&self, coords: UVec3) -> usize {
        ((coords.z * self.dims.y + coords.y) * self.dims.x + coords.x) as usize
    }

    #[inline]
    pub fn pos_to_cell_index(&self, pos: Vec3) -> usize {
        self.flat_index(self.cell_coords(pos))
    }

    // Clear the grid
    pub fn clear(&mut self) {
        for cell in &mut self.grid {
            cell.clear();
        }
        self.cell_of.clear();
    }

    // File every boid under its current cell
    pub fn rebuild(&mut self, boids: &[Boid]) {
        self.clear();
        self.cell_of.reserve(boids.len());
        for (i, boid) in boids.iter().enumerate() {
            let cell = self.pos_to_cell_index(boid.position);
            self.grid[cell].push(i);
            self.cell_of.push(cell);
        }
    }

    // Move a boid to the cell matching its new position
    pub fn relocate(&mut self, boid_index: usize, position: Vec3) {
        let new_cell = self.pos_to_cell_index(position);
        let old_cell = self.cell_of[boid_index];
        if new_cell == old_cell {
            return;
        }
        let members = &mut self.grid[old_cell];
        if let Some(slot) = members.iter().position(|&i| i == boid_index) {
            members.swap_remove(slot);
        }
        self.grid[new_cell].push(boid_index);
        self.cell_of[boid_index] = new_cell;
    }

    // Collect every other boid within `radius_squared` of `boids[index]`, in index order
    pub fn query(&self, boids: &[Boid], index: usize, radius_squared: f32, out: &mut Vec<usize>) {
        out.clear();
        let position = boids[index].position;
        let center = self.cell_coords(position).as_ivec3();
        let dims = self.dims.as_ivec3();

        for dz in -1..=1 {
            let z = center.z + dz;
            if z < 0 || z >= dims.z {
                continue;
            }
            for dy in -1..=1 {
                let y = center.y + dy;
                if y < 0 || y >= dims.y {
                    continue;
                }
                for dx in -1..=1 {
                    let x = center.x + dx;
                    if x < 0 || x >= dims.x {
                        continue;
                    }
                    let cell = self.flat_index(UVec3::new(x as u32, y as u32, z as u32));
                    for &other in &self.grid[cell] {
                        if other != index
                            && position.distance_squared(boids[other].position) <= radius_squared
                        {
                            out.push(other);
                        }
                    }
                }
            }
        }

        out.sort_unstable();
    }
}
