/*
 * Boid Module
 *
 * This module defines the Boid struct and its steering rules.
 * Each boid reacts to neighbors within its perception radius:
 * 1. Alignment: Steer towards the average heading of same-variant neighbors
 * 2. Cohesion: Steer towards the centroid of same-variant neighbors
 * 3. Separation: Steer away from every nearby boid, closer ones pushing harder
 * On top of that a wall term keeps boids off the floor and ceiling of the
 * bounding cube, while the x and z faces wrap around.
 *
 * The rule methods only read the flock; they never touch an RNG or mutate
 * anything, so the same snapshot always produces the same steering.
 */

use nannou::prelude::*;
use rand::Rng;

use crate::math::{normalize_to_magnitude, safe_normalize, wrap_axis, EPSILON};
use crate::params::FlockConfig;

/// Per-step scratch lists of neighbor indices into the flock.
#[derive(Clone, Debug, Default)]
pub struct Neighborhood {
    pub same_variant: Vec<usize>,
    pub other_variant: Vec<usize>,
}

impl Neighborhood {
    pub fn is_empty(&self) -> bool {
        self.same_variant.is_empty() && self.other_variant.is_empty()
    }

    pub fn len(&self) -> usize {
        self.same_variant.len() + self.other_variant.len()
    }

    pub fn clear(&mut self) {
        self.same_variant.clear();
        self.other_variant.clear();
    }

    // Every neighbor regardless of variant
    pub fn all(&self) -> impl Iterator<Item = usize> + '_ {
        self.same_variant
            .iter()
            .chain(self.other_variant.iter())
            .copied()
    }
}

#[derive(Clone, Debug)]
pub struct Boid {
    pub position: Point3,
    pub velocity: Vec3,
    pub variant: usize,
    pub size: f32,
    pub(crate) neighbors: Neighborhood,
}

impl Boid {
    pub fn new(position: Point3, velocity: Vec3, variant: usize, size: f32) -> Self {
        Self {
            position,
            velocity,
            variant,
            size,
            neighbors: Neighborhood::default(),
        }
    }

    // Spawn a boid uniformly inside the bounding cube, heading in a random direction
    pub fn random<R: Rng>(rng: &mut R, config: &FlockConfig) -> Self {
        let h = config.half_extent;
        let position = pt3(
            rng.gen_range(-h..=h),
            rng.gen_range(-h..=h),
            rng.gen_range(-h..=h),
        );

        // Rejection-sample a direction so short vectors never get normalized
        let direction = loop {
            let candidate = vec3(
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-1.0..=1.0),
            );
            let length_squared = candidate.length_squared();
            if length_squared > 0.01 && length_squared <= 1.0 {
                break candidate;
            }
        };

        let (min_size, max_size) = config.size_range;
        Self::new(
            position,
            normalize_to_magnitude(direction, config.boid_speed),
            rng.gen_range(0..config.variant_count),
            rng.gen_range(min_size..=max_size),
        )
    }

    /// Unit direction of travel, used by renderers to orient the mesh.
    pub fn heading(&self) -> Vec3 {
        safe_normalize(self.velocity)
    }

    /// Neighbor lists recorded during the current step. Empty between steps.
    pub fn neighbors(&self) -> &Neighborhood {
        &self.neighbors
    }

    // Average heading of same-variant neighbors
    pub fn alignment(&self, boids: &[Boid], same_variant: &[usize]) -> Vec3 {
        if same_variant.is_empty() {
            return Vec3::ZERO;
        }

        let mut sum = Vec3::ZERO;
        for &i in same_variant {
            sum += boids[i].velocity;
        }

        safe_normalize(sum / same_variant.len() as f32)
    }

    // Direction towards the centroid of same-variant neighbors
    pub fn cohesion(&self, boids: &[Boid], same_variant: &[usize]) -> Vec3 {
        if same_variant.is_empty() {
            return Vec3::ZERO;
        }

        let mut centroid = Vec3::ZERO;
        for &i in same_variant {
            centroid += boids[i].position;
        }
        centroid /= same_variant.len() as f32;

        safe_normalize(centroid - self.position)
    }

    // Direction away from all neighbors, each weighted by inverse distance
    pub fn separation(&self, boids: &[Boid], neighbors: &Neighborhood) -> Vec3 {
        let mut steering = Vec3::ZERO;
        for i in neighbors.all() {
            steering += separation_push(boids[i].position, self.position);
        }

        safe_normalize(steering)
    }

    // Vertical push away from the floor or ceiling, zero in the open
    pub fn wall_avoidance(&self, half_extent: f32, wall_margin: f32) -> Vec3 {
        let y = self.position.y;

        if y > half_extent - wall_margin {
            vec3(0.0, 1.0 / (-half_extent - y), 0.0)
        } else if y < -half_extent + wall_margin {
            vec3(0.0, 1.0 / (half_extent - y), 0.0)
        } else {
            Vec3::ZERO
        }
    }

    // Advance along the current velocity and wrap the x and z axes
    pub fn integrate(&mut self, dt: f32, half_extent: f32) {
        self.position += self.velocity * dt;
        self.position.x = wrap_axis(self.position.x, half_extent);
        self.position.z = wrap_axis(self.position.z, half_extent);
    }

    // Blend a steering force into the velocity and restore cruising speed.
    // Returns false when the blended velocity was degenerate and left untouched.
    pub fn steer(&mut self, force: Vec3, speed: f32) -> bool {
        let candidate = self.velocity + force;
        if !(candidate.length() > EPSILON) || !candidate.is_finite() {
            return false;
        }

        self.velocity = normalize_to_magnitude(candidate, speed);
        true
    }
}

/// Separation contribution of a single neighbor at `from` on a boid at `to`:
/// a unit vector pointing away from the neighbor, scaled by `1 / distance`.
pub fn separation_push(from: Point3, to: Point3) -> Vec3 {
    let offset = to - from;
    let distance = offset.length();
    if !(distance > EPSILON) {
        return Vec3::ZERO;
    }

    offset / (distance * distance)
}
