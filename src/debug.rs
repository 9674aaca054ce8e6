/*
 * Debug Information Module
 *
 * This module defines the DebugInfo struct that collects per-frame statistics
 * about the flock. The values are reported through logging and can be shown
 * by whatever drives the simulation.
 *
 * Includes metrics for:
 * - Frames stepped and frames skipped
 * - Time spent in the last sweep
 * - Neighborhood sizes seen in the last sweep
 * - Number of population rebuilds
 */

use std::time::Duration;

use crate::physics::SweepSummary;

// Debug information to display
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebugInfo {
    pub frames: u64,
    pub skipped_frames: u64,
    pub regenerations: u64,
    pub last_step_duration: Duration,
    pub last_mean_neighbors: f32,
    pub last_max_neighbors: usize,
}

impl DebugInfo {
    pub(crate) fn record_sweep(&mut self, summary: &SweepSummary, elapsed: Duration) {
        self.frames += 1;
        self.last_step_duration = elapsed;
        self.last_mean_neighbors = summary.mean_neighbors();
        self.last_max_neighbors = summary.max_neighbors;
    }

    pub(crate) fn record_skip(&mut self) {
        self.skipped_frames += 1;
    }

    pub(crate) fn record_regeneration(&mut self) {
        self.regenerations += 1;
    }
}
