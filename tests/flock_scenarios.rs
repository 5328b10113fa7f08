// Scenario tests for the flocking rules, driven through the public API

use flock3d::boid::separation_push;
use flock3d::{Boid, FlockConfig, FlockSimulation, NeighborSearch, UpdateMode};
use nannou::prelude::*;

const SPEED: f32 = 0.01;

fn config() -> FlockConfig {
    FlockConfig {
        perception_radius: 0.3,
        boid_speed: SPEED,
        wall_margin: 0.2,
        variant_count: 2,
        ..FlockConfig::default()
    }
}

fn boid(position: Point3, velocity: Vec3, variant: usize) -> Boid {
    Boid::new(position, velocity, variant, 1.0)
}

fn assert_speed(sim: &FlockSimulation) {
    for (i, b) in sim.boids().iter().enumerate() {
        let speed = b.velocity.length();
        assert!(
            (speed - sim.config().boid_speed).abs() < 1.0e-6,
            "boid {i} has speed {speed}"
        );
    }
}

#[test]
fn close_pair_aligns_and_coheres() {
    let mut sim = FlockSimulation::from_boids(
        config(),
        vec![
            boid(pt3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0) * SPEED, 0),
            boid(pt3(0.1, 0.0, 0.0), vec3(1.0, 0.0, 0.0) * SPEED, 0),
        ],
    )
    .unwrap();

    for i in 0..2 {
        let steering = sim.steering(i).unwrap();
        assert!(steering.alignment.length() > 0.0);
        assert!(steering.cohesion.length() > 0.0);
        assert!(steering.separation.length() > 0.0);
    }

    sim.step(1.0);
    assert_speed(&sim);
    assert_eq!(sim.stats().same_variant_links, 2);
    assert_eq!(sim.stats().other_variant_links, 0);
}

#[test]
fn boid_near_ceiling_turns_down() {
    let mut sim = FlockSimulation::from_boids(
        config(),
        vec![boid(pt3(0.0, 0.99, 0.0), vec3(1.0, 0.0, 0.0) * SPEED, 0)],
    )
    .unwrap();

    sim.step(1.0);
    let b = &sim.boids()[0];
    assert!(b.velocity.y < 0.0);
    assert_speed(&sim);
}

#[test]
fn boid_near_floor_turns_up() {
    let mut sim = FlockSimulation::from_boids(
        config(),
        vec![boid(pt3(0.0, -0.95, 0.0), vec3(0.0, -1.0, 0.0) * SPEED, 0)],
    )
    .unwrap();

    sim.step(1.0);
    assert!(sim.boids()[0].velocity.y > 0.0);
}

#[test]
fn lone_boid_keeps_its_heading_away_from_walls() {
    let velocity = vec3(0.0, 0.0, 1.0) * SPEED;
    let mut sim =
        FlockSimulation::from_boids(config(), vec![boid(pt3(0.0, 0.0, 0.0), velocity, 0)]).unwrap();

    let steering = sim.steering(0).unwrap();
    assert_eq!(steering.alignment, Vec3::ZERO);
    assert_eq!(steering.cohesion, Vec3::ZERO);
    assert_eq!(steering.separation, Vec3::ZERO);
    assert_eq!(steering.avoidance, Vec3::ZERO);

    for _ in 0..50 {
        sim.step(1.0);
    }
    let b = &sim.boids()[0];
    assert!((b.velocity - velocity).length() < 1.0e-6);
    assert!((b.position.z - 0.5).abs() < 1.0e-4);
}

#[test]
fn lone_boid_wraps_through_x_and_z() {
    let mut sim = FlockSimulation::from_boids(
        config(),
        vec![boid(pt3(0.995, 0.0, -0.995), vec3(1.0, 0.0, -1.0).normalize() * SPEED, 0)],
    )
    .unwrap();

    sim.step(1.0);
    let b = &sim.boids()[0];
    assert_eq!(b.position.x, -1.0);
    assert_eq!(b.position.z, 1.0);
}

#[test]
fn same_variant_pair_has_mirrored_cohesion() {
    let velocity = vec3(0.0, 0.0, 1.0) * SPEED;
    let sim = FlockSimulation::from_boids(
        config(),
        vec![
            boid(pt3(-0.05, 0.1, 0.2), velocity, 1),
            boid(pt3(0.05, 0.1, 0.2), velocity, 1),
        ],
    )
    .unwrap();

    let a = sim.steering(0).unwrap().cohesion;
    let b = sim.steering(1).unwrap().cohesion;
    assert!((a + b).length() < 1.0e-6);
    assert!((a - vec3(1.0, 0.0, 0.0)).length() < 1.0e-6);
}

#[test]
fn other_variants_only_separate() {
    let sim = FlockSimulation::from_boids(
        config(),
        vec![
            boid(pt3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0) * SPEED, 0),
            boid(pt3(0.1, 0.0, 0.0), vec3(0.0, 1.0, 0.0) * SPEED, 1),
        ],
    )
    .unwrap();

    let steering = sim.steering(0).unwrap();
    assert_eq!(steering.alignment, Vec3::ZERO);
    assert_eq!(steering.cohesion, Vec3::ZERO);
    assert!((steering.separation - vec3(-1.0, 0.0, 0.0)).length() < 1.0e-6);
}

#[test]
fn boids_outside_perception_radius_are_ignored() {
    let sim = FlockSimulation::from_boids(
        config(),
        vec![
            boid(pt3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0) * SPEED, 0),
            boid(pt3(0.31, 0.0, 0.0), vec3(1.0, 0.0, 0.0) * SPEED, 0),
        ],
    )
    .unwrap();

    let steering = sim.steering(0).unwrap();
    assert_eq!(steering.alignment, Vec3::ZERO);
    assert_eq!(steering.separation, Vec3::ZERO);
}

#[test]
fn closer_neighbors_push_harder() {
    let origin = pt3(0.0, 0.0, 0.0);
    let near = separation_push(pt3(0.05, 0.0, 0.0), origin);
    let far = separation_push(pt3(0.0, 0.25, 0.0), origin);
    assert!(near.length() > far.length());

    // Squeezed between a near and a far neighbor, the boid is pushed off the near one
    let sim = FlockSimulation::from_boids(
        config(),
        vec![
            boid(origin, vec3(0.0, 0.0, 1.0) * SPEED, 0),
            boid(pt3(0.05, 0.0, 0.0), vec3(0.0, 0.0, 1.0) * SPEED, 0),
            boid(pt3(-0.25, 0.0, 0.0), vec3(0.0, 0.0, 1.0) * SPEED, 0),
        ],
    )
    .unwrap();
    assert!(sim.steering(0).unwrap().separation.x < 0.0);
}

#[test]
fn rule_evaluation_is_repeatable() {
    let sim = FlockSimulation::new(FlockConfig {
        num_boids: 120,
        seed: Some(5),
        ..config()
    })
    .unwrap();

    for i in 0..sim.len() {
        assert_eq!(sim.steering(i), sim.steering(i));
    }
}

#[test]
fn seeded_flocks_evolve_identically() {
    let make = || {
        FlockSimulation::new(FlockConfig {
            num_boids: 150,
            seed: Some(2024),
            ..FlockConfig::default()
        })
        .unwrap()
    };

    let mut a = make();
    let mut b = make();
    for _ in 0..25 {
        a.step(1.0);
        b.step(1.0);
    }

    for (x, y) in a.boids().iter().zip(b.boids()) {
        assert_eq!(x.position, y.position);
        assert_eq!(x.velocity, y.velocity);
    }
}

#[test]
fn spatial_grid_matches_brute_force() {
    for mode in [UpdateMode::Sequential, UpdateMode::Snapshot] {
        let make = |search| {
            FlockSimulation::new(FlockConfig {
                num_boids: 300,
                seed: Some(77),
                neighbor_search: search,
                update_mode: mode,
                ..FlockConfig::default()
            })
            .unwrap()
        };

        let mut brute = make(NeighborSearch::BruteForce);
        let mut grid = make(NeighborSearch::SpatialGrid);
        for _ in 0..30 {
            brute.step(1.0);
            grid.step(1.0);
            assert_eq!(brute.stats(), grid.stats());
        }

        for (b, g) in brute.boids().iter().zip(grid.boids()) {
            assert_eq!(b.position, g.position);
            assert_eq!(b.velocity, g.velocity);
        }
    }
}

#[test]
fn both_update_modes_hold_speed_invariant() {
    for mode in [UpdateMode::Sequential, UpdateMode::Snapshot] {
        let mut sim = FlockSimulation::new(FlockConfig {
            num_boids: 200,
            seed: Some(9),
            update_mode: mode,
            ..FlockConfig::default()
        })
        .unwrap();

        for _ in 0..40 {
            sim.step(1.0);
            assert_speed(&sim);
        }
    }
}

#[test]
fn tiny_radius_grid_flock_builds_and_matches_brute_force() {
    let make = |search| {
        FlockSimulation::new(FlockConfig {
            num_boids: 10,
            seed: Some(13),
            perception_radius: 1.0e-6,
            neighbor_search: search,
            ..FlockConfig::default()
        })
        .unwrap()
    };

    let mut brute = make(NeighborSearch::BruteForce);
    let mut grid = make(NeighborSearch::SpatialGrid);
    for _ in 0..5 {
        brute.step(1.0);
        grid.step(1.0);
    }
    assert_eq!(brute.stats(), grid.stats());
    for (b, g) in brute.boids().iter().zip(grid.boids()) {
        assert_eq!(b.position, g.position);
    }
}

#[test]
fn coarse_capped_grid_matches_brute_force() {
    // 0.02 would ask for 100 cells per axis; the capped grid must find the same neighbors
    let make = |search| {
        FlockSimulation::new(FlockConfig {
            num_boids: 400,
            seed: Some(31),
            perception_radius: 0.02,
            neighbor_search: search,
            ..FlockConfig::default()
        })
        .unwrap()
    };

    let mut brute = make(NeighborSearch::BruteForce);
    let mut grid = make(NeighborSearch::SpatialGrid);
    for _ in 0..10 {
        brute.step(1.0);
        grid.step(1.0);
        assert_eq!(brute.stats(), grid.stats());
    }
}
