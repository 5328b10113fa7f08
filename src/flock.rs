/*
 * Flock Module
 *
 * FlockSimulation owns the boids and advances them one tick per step():
 * neighbor discovery, the three steering rules, integration with x/z
 * wraparound, wall avoidance on y, and finally blending the steering into the
 * velocity used by the next step.
 *
 * Neighbors are referenced by index into the flock. The flock size is fixed
 * for the lifetime of a simulation, so indices stay valid across steps.
 */

use nannou::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use tracing::{debug, info, trace, warn};

use crate::boid::{Boid, Neighborhood};
use crate::error::ConfigError;
use crate::math::{normalize_to_magnitude, EPSILON};
use crate::params::{FlockConfig, NeighborSearch, UpdateMode};
use crate::spatial_grid::SpatialGrid;

/// Individual steering terms acting on one boid.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Steering {
    pub alignment: Vec3,
    pub cohesion: Vec3,
    pub separation: Vec3,
    pub avoidance: Vec3,
}

impl Steering {
    /// Weighted sum added to the velocity. Avoidance is unweighted.
    pub fn combined(&self, config: &FlockConfig) -> Vec3 {
        self.alignment * config.alignment_weight
            + self.cohesion * config.cohesion_weight
            + self.separation * config.separation_weight
            + self.avoidance
    }
}

/// Counters describing the most recent step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepStats {
    pub steps: u64,
    pub same_variant_links: usize,
    pub other_variant_links: usize,
    pub degenerate_steers: usize,
}

pub struct FlockSimulation {
    config: FlockConfig,
    boids: Vec<Boid>,
    grid: Option<SpatialGrid>,
    rng: ChaCha12Rng,
    stats: StepStats,
    candidates: Vec<usize>,
}

impl FlockSimulation {
    // Build a flock of `config.num_boids` randomly placed boids
    pub fn new(config: FlockConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut simulation = Self {
            rng: make_rng(config.seed),
            grid: make_grid(&config),
            boids: Vec::with_capacity(config.num_boids),
            stats: StepStats::default(),
            candidates: Vec::new(),
            config,
        };
        simulation.spawn_boids();

        info!(
            boids = simulation.boids.len(),
            seed = ?simulation.config.seed,
            search = ?simulation.config.neighbor_search,
            mode = ?simulation.config.update_mode,
            "flock initialised"
        );
        Ok(simulation)
    }

    // Build a flock from explicitly placed boids; `config.num_boids` is taken from the slice
    pub fn from_boids(mut config: FlockConfig, boids: Vec<Boid>) -> Result<Self, ConfigError> {
        config.num_boids = boids.len();
        config.validate()?;

        if let Some(i) = boids
            .iter()
            .position(|b| !b.position.is_finite() || !b.velocity.is_finite())
        {
            return Err(ConfigError::invalid(
                "boids",
                format!("boid {} has a non-finite position or velocity", i),
            ));
        }

        if let Some(i) = boids.iter().position(|b| !(b.velocity.length() > EPSILON)) {
            return Err(ConfigError::invalid(
                "boids",
                format!("boid {} has a zero-length velocity", i),
            ));
        }

        let mut simulation = Self {
            rng: make_rng(config.seed),
            grid: make_grid(&config),
            boids,
            stats: StepStats::default(),
            candidates: Vec::new(),
            config,
        };
        // Supplied headings are kept, speeds are brought to boid_speed
        let speed = simulation.config.boid_speed;
        for boid in &mut simulation.boids {
            boid.velocity = normalize_to_magnitude(boid.velocity, speed);
            boid.neighbors.clear();
        }
        simulation.rebuild_grid();

        debug!(boids = simulation.boids.len(), "flock built from explicit boids");
        Ok(simulation)
    }

    // Throw the current flock away and spawn a fresh one from the config.
    // A seeded config respawns the same initial flock.
    pub fn reset(&mut self) {
        self.rng = make_rng(self.config.seed);
        self.stats = StepStats::default();
        self.spawn_boids();
        info!(boids = self.boids.len(), "flock reset");
    }

    fn spawn_boids(&mut self) {
        self.boids.clear();
        for _ in 0..self.config.num_boids {
            let boid = Boid::random(&mut self.rng, &self.config);
            self.boids.push(boid);
        }
        self.rebuild_grid();
    }

    fn rebuild_grid(&mut self) {
        if let Some(grid) = &mut self.grid {
            grid.rebuild(self.boids.iter().map(|b| b.position));
        }
    }

    pub fn config(&self) -> &FlockConfig {
        &self.config
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    pub fn stats(&self) -> StepStats {
        self.stats
    }

    /// Advance every boid by one tick. `dt` scales the position update.
    pub fn step(&mut self, dt: f32) {
        if !dt.is_finite() || dt < 0.0 {
            warn!(dt, "ignoring step with invalid time delta");
            return;
        }

        self.stats.steps += 1;
        self.stats.same_variant_links = 0;
        self.stats.other_variant_links = 0;
        self.stats.degenerate_steers = 0;

        match self.config.update_mode {
            UpdateMode::Sequential => {
                for i in 0..self.boids.len() {
                    self.discover(i);
                    let steering = self.rule_steering(i, &self.boids[i].neighbors);
                    self.advance(i, steering, dt);
                    self.boids[i].neighbors.clear();
                }
            }
            UpdateMode::Snapshot => {
                for i in 0..self.boids.len() {
                    self.discover(i);
                }
                let steering: Vec<Steering> = (0..self.boids.len())
                    .map(|i| self.rule_steering(i, &self.boids[i].neighbors))
                    .collect();
                for (i, steering) in steering.into_iter().enumerate() {
                    self.advance(i, steering, dt);
                }
                for boid in &mut self.boids {
                    boid.neighbors.clear();
                }
            }
        }

        trace!(
            step = self.stats.steps,
            same = self.stats.same_variant_links,
            other = self.stats.other_variant_links,
            degenerate = self.stats.degenerate_steers,
            "flock step"
        );
    }

    /// Steering acting on boid `index` given the current state, without
    /// advancing anything. Wall avoidance is taken at the current position.
    pub fn steering(&self, index: usize) -> Option<Steering> {
        let boid = self.boids.get(index)?;

        let mut neighbors = Neighborhood::default();
        let mut candidates = Vec::new();
        self.collect_neighbors(index, &mut neighbors, &mut candidates);

        let mut steering = self.rule_steering(index, &neighbors);
        steering.avoidance = boid.wall_avoidance(self.config.half_extent, self.config.wall_margin);
        Some(steering)
    }

    // Fill boid i's scratch lists from the current flock state
    fn discover(&mut self, i: usize) {
        let mut neighbors = std::mem::take(&mut self.boids[i].neighbors);
        let mut candidates = std::mem::take(&mut self.candidates);

        self.collect_neighbors(i, &mut neighbors, &mut candidates);
        self.stats.same_variant_links += neighbors.same_variant.len();
        self.stats.other_variant_links += neighbors.other_variant.len();

        self.candidates = candidates;
        self.boids[i].neighbors = neighbors;
    }

    fn collect_neighbors(&self, i: usize, out: &mut Neighborhood, candidates: &mut Vec<usize>) {
        out.clear();
        let radius = self.config.perception_radius;

        match &self.grid {
            Some(grid) => {
                candidates.clear();
                grid.nearby_indices(self.boids[i].position, candidates);
                // Brute-force order, so both searches sum neighbors identically
                candidates.sort_unstable();
                for &j in candidates.iter() {
                    classify_neighbor(&self.boids, i, j, radius, out);
                }
            }
            None => {
                for j in 0..self.boids.len() {
                    classify_neighbor(&self.boids, i, j, radius, out);
                }
            }
        }
    }

    fn rule_steering(&self, i: usize, neighbors: &Neighborhood) -> Steering {
        let boid = &self.boids[i];
        Steering {
            alignment: boid.alignment(&self.boids, &neighbors.same_variant),
            cohesion: boid.cohesion(&self.boids, &neighbors.same_variant),
            separation: boid.separation(&self.boids, neighbors),
            avoidance: Vec3::ZERO,
        }
    }

    // Integrate, wrap, then fold rules and wall avoidance into the next velocity
    fn advance(&mut self, i: usize, mut steering: Steering, dt: f32) {
        let half_extent = self.config.half_extent;
        let boid = &mut self.boids[i];
        let before = boid.position;

        boid.integrate(dt, half_extent);
        steering.avoidance = boid.wall_avoidance(half_extent, self.config.wall_margin);

        if !boid.steer(steering.combined(&self.config), self.config.boid_speed) {
            self.stats.degenerate_steers += 1;
            debug!(boid = i, "degenerate steering, velocity kept");
        }

        let after = boid.position;
        if let Some(grid) = &mut self.grid {
            grid.relocate(i, before, after);
        }
    }
}

// Record j as a neighbor of i if it sits strictly inside the perception radius
#[inline]
fn classify_neighbor(boids: &[Boid], i: usize, j: usize, radius: f32, out: &mut Neighborhood) {
    if i == j {
        return;
    }

    let d = boids[i].position.distance(boids[j].position);
    if d > 0.0 && d < radius {
        if boids[j].variant == boids[i].variant {
            out.same_variant.push(j);
        } else {
            out.other_variant.push(j);
        }
    }
}

fn make_rng(seed: Option<u64>) -> ChaCha12Rng {
    match seed {
        Some(seed) => ChaCha12Rng::seed_from_u64(seed),
        None => ChaCha12Rng::from_entropy(),
    }
}

fn make_grid(config: &FlockConfig) -> Option<SpatialGrid> {
    match config.neighbor_search {
        NeighborSearch::BruteForce => None,
        NeighborSearch::SpatialGrid => {
            Some(SpatialGrid::new(config.perception_radius, config.half_extent))
        }
    }
}
