use boid_tank::{Boid, Flock, ParamsError, SimulationParams, Species, WorldBounds};
use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const TOLERANCE: f32 = 1e-6;

fn assert_invariants<R: rand::Rng>(flock: &Flock<R>, params: &SimulationParams) {
    for (i, view) in flock.views().enumerate() {
        let speed = view.velocity.length();
        assert!(
            speed >= params.min_speed - TOLERANCE && speed <= params.max_speed + TOLERANCE,
            "boid {i} speed {speed} outside [{}, {}]",
            params.min_speed,
            params.max_speed
        );
        assert!(
            params.world_bounds.contains(view.position),
            "boid {i} escaped to {:?}",
            view.position
        );
    }
    for (i, boid) in flock.boids().iter().enumerate() {
        assert!(!boid.neighborhood().contains(&i), "boid {i} is its own neighbor");
    }
}

#[test]
fn speed_and_bounds_hold_over_many_frames() {
    let params = SimulationParams {
        num_boids: 150,
        ..SimulationParams::default()
    };
    let mut flock = Flock::new(params.clone()).unwrap();
    for frame in 0..300 {
        // Uneven frame times, including a long stall
        let delta = if frame % 50 == 49 { 250.0 } else { 16.0 + (frame % 3) as f32 };
        flock.step(delta);
        assert_invariants(&flock, &params);
    }
}

#[test]
fn speed_band_holds_with_spatial_grid() {
    let params = SimulationParams {
        num_boids: 200,
        min_speed: 0.001,
        max_speed: 0.01,
        enable_spatial_grid: true,
        ..SimulationParams::default()
    };
    let mut flock = Flock::new(params.clone()).unwrap();
    for _ in 0..120 {
        flock.step(16.0);
        assert_invariants(&flock, &params);
    }
}

#[test]
fn identical_seeds_give_identical_trajectories() {
    let params = SimulationParams {
        num_boids: 60,
        seed: 1234,
        ..SimulationParams::default()
    };
    let mut a = Flock::new(params.clone()).unwrap();
    let mut b = Flock::new(params).unwrap();
    let deltas = [16.0, 17.0, 15.5, 33.0, 16.0];
    for _ in 0..40 {
        for &delta in &deltas {
            a.step(delta);
            b.step(delta);
        }
    }
    assert!(a.views().eq(b.views()));
}

#[test]
fn different_seeds_diverge() {
    let a = Flock::new(SimulationParams { seed: 1, ..SimulationParams::default() }).unwrap();
    let b = Flock::new(SimulationParams { seed: 2, ..SimulationParams::default() }).unwrap();
    assert!(!a.views().eq(b.views()));
}

#[test]
fn grid_and_brute_force_flocks_agree() {
    let brute_params = SimulationParams {
        num_boids: 100,
        seed: 77,
        ..SimulationParams::default()
    };
    let grid_params = SimulationParams {
        enable_spatial_grid: true,
        ..brute_params.clone()
    };
    let mut brute = Flock::new(brute_params).unwrap();
    let mut gridded = Flock::new(grid_params).unwrap();
    for _ in 0..60 {
        brute.step(16.0);
        gridded.step(16.0);
    }
    assert!(brute.views().eq(gridded.views()));
}

#[test]
fn isolated_boid_feels_only_avoidance_and_randomness() {
    let params = SimulationParams {
        min_speed: 0.0,
        max_speed: 10.0,
        random_weight: 0.5,
        ..SimulationParams::default()
    };
    let start = Vec3::new(0.3, 0.0, 0.0);
    let boids = vec![Boid::new(Vec3::ZERO, start, Species::GREEN)];
    let mut flock = Flock::from_boids(params.clone(), boids, ChaCha8Rng::seed_from_u64(8)).unwrap();
    flock.step(0.0);

    let boid = &flock.boids()[0];
    assert!(boid.neighborhood().is_empty());
    // Centered, so avoidance is zero and the change is the scaled random nudge alone
    let change = boid.velocity - start;
    assert!((change.length() - params.inertia * params.random_weight).abs() < TOLERANCE);
}

#[test]
fn boid_near_wall_turns_inward() {
    let params = SimulationParams::default();
    let bounds = params.world_bounds;
    let boid = Boid::new(Vec3::new(bounds.max.x - 0.01, 0.0, bounds.min.z + 0.01), Vec3::ZERO, Species::RED);
    let force = boid.avoidance(&bounds, params.avoidance_margin, params.avoidance_weight);
    assert!(force.x < 0.0);
    assert_eq!(force.y, 0.0);
    assert!(force.z > 0.0);
}

#[test]
fn two_opposed_boids_turn_towards_alignment() {
    let params = SimulationParams {
        min_speed: 0.0,
        max_speed: 2.0,
        neighborhood_radius: 0.05,
        random_weight: 0.0,
        inertia: 0.01,
        ..SimulationParams::default()
    };
    let boids = vec![
        Boid::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Species::GREEN),
        Boid::new(Vec3::new(0.01, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0), Species::GREEN),
    ];

    // Separation pushes the pair apart along x before anything moves
    let separation = boids[0].separation(&boids, &[1], params.separation_weight);
    assert_eq!(separation, Vec3::new(-1.0, 0.0, 0.0));

    let mut flock = Flock::from_boids(params, boids, ChaCha8Rng::seed_from_u64(0)).unwrap();
    flock.step(0.1);

    // First boid: (-1 separation - 0.8 alignment + 0.98 cohesion) * 0.01
    let first = flock.boids()[0].velocity;
    assert!((first - Vec3::new(0.9918, 0.0, 0.0)).length() < TOLERANCE);
    // Second boid sees the first already moved to x = 0.9918 * 0.006
    let second = flock.boids()[1].velocity;
    assert!((second - Vec3::new(-0.9918, 0.0, 0.0)).length() < TOLERANCE);
    assert!((flock.boids()[0].position.x - 0.9918 * 0.006).abs() < TOLERANCE);
    assert_eq!(flock.boids()[0].neighborhood(), &[1]);
    assert_eq!(flock.boids()[1].neighborhood(), &[0]);
}

#[test]
fn empty_flock_steps_without_fault() {
    let params = SimulationParams {
        num_boids: 0,
        ..SimulationParams::default()
    };
    let mut flock = Flock::new(params).unwrap();
    assert!(flock.is_empty());
    flock.step(16.0);
    flock.frame(16.0);
    assert!(flock.is_empty());
    assert_eq!(flock.debug_info().last_max_neighbors, 0);
}

#[test]
fn regenerate_splits_species_evenly() {
    let mut flock = Flock::new(SimulationParams::default()).unwrap();
    let params = SimulationParams {
        num_boids: 9,
        species_kinds: vec![Species::GREEN, Species::RED, Species(2)],
        ..SimulationParams::default()
    };
    flock.regenerate_with(params).unwrap();
    assert_eq!(flock.len(), 9);
    assert!(flock.species_counts().values().all(|&n| n == 3));
    let order: Vec<u8> = flock.views().map(|v| v.species.0).collect();
    assert_eq!(order, vec![0, 1, 2, 0, 1, 2, 0, 1, 2]);
}

#[test]
fn rejected_regeneration_keeps_population() {
    let mut flock = Flock::new(SimulationParams::default()).unwrap();
    let before: Vec<_> = flock.views().collect();
    let bad = SimulationParams {
        world_bounds: WorldBounds::new(Vec3::ONE, Vec3::ZERO),
        ..SimulationParams::default()
    };
    assert!(matches!(
        flock.regenerate_with(bad),
        Err(ParamsError::DegenerateBounds { .. })
    ));
    assert!(before.into_iter().eq(flock.views()));
}

#[test]
fn tuning_applies_without_regeneration() {
    let mut flock = Flock::new(SimulationParams::default()).unwrap();
    flock.params().update(|p| p.max_speed = 0.006).unwrap();
    flock.frame(16.0);
    assert_eq!(flock.len(), 40);
    for view in flock.views() {
        let speed = view.velocity.length();
        assert!(speed >= 0.003 - TOLERANCE && speed <= 0.006 + TOLERANCE);
    }
}

#[test]
fn headings_follow_velocity() {
    let flock = Flock::new(SimulationParams::default()).unwrap();
    for view in flock.views() {
        let heading = view.heading().expect("spawned boids are moving");
        assert!((heading.length() - 1.0).abs() < 1e-5);
        assert!(heading.dot(view.velocity) > 0.0);
    }
}

#[test]
fn overflowing_bounds_are_rejected() {
    let params = SimulationParams {
        world_bounds: WorldBounds::new(Vec3::splat(-2e38), Vec3::splat(2e38)),
        ..SimulationParams::default()
    };
    assert!(matches!(
        Flock::new(params),
        Err(ParamsError::BoundsTooLarge { .. })
    ));
}

#[test]
fn panel_edits_are_applied_on_next_frame() {
    let mut flock = Flock::new(SimulationParams::default()).unwrap();
    let panel = flock.params().clone();
    panel
        .set(SimulationParams {
            num_boids: 6,
            ..panel.get()
        })
        .unwrap();
    assert!(panel.pending_changes().regenerate);
    flock.frame(16.0);
    assert_eq!(flock.len(), 6);
    assert!(!panel.pending_changes().any());
}
