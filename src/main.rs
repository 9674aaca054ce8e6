/*
 * Boid Tank
 *
 * Headless driver for the flocking engine. It plays the part of the
 * renderer's frame loop: it builds a flock, ticks it with a fixed frame time
 * and logs what the flock looks like afterwards.
 *
 * Usage: boid-tank [params.json]
 * Logging is controlled through RUST_LOG (default: info).
 */

use anyhow::{Context, Result};
use env_logger::Env;
use log::info;

use boid_tank::{Flock, SimulationParams};

// Number of frames to run and the time each one represents
const FRAMES: usize = 600;
const FRAME_TIME_MS: f32 = 16.0;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let params = match std::env::args().nth(1) {
        Some(path) => SimulationParams::load(&path)
            .with_context(|| format!("loading parameters from {path}"))?,
        None => SimulationParams::default(),
    };

    let mut flock = Flock::new(params).context("building flock")?;
    for _ in 0..FRAMES {
        flock.frame(FRAME_TIME_MS);
    }

    let count = flock.len().max(1) as f32;
    let mean_speed = flock.views().map(|v| v.velocity.length()).sum::<f32>() / count;
    let stats = flock.debug_info();
    info!(
        "ran {} frames ({} skipped): {} boids, mean speed {:.5}, last sweep {:?}, mean neighbors {:.2}",
        stats.frames,
        stats.skipped_frames,
        flock.len(),
        mean_speed,
        stats.last_step_duration,
        stats.last_mean_neighbors
    );
    for (species, n) in flock.species_counts() {
        info!("  {species}: {n}");
    }

    Ok(())
}
