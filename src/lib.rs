/*
 * 3D Boid Flocking Simulation - Module Definitions
 *
 * The simulation core (boid, flock, params, spatial_grid, math, error) has no
 * dependency on a window: hosts call FlockSimulation::step and read the boids
 * back for drawing. The remaining modules make up the nannou viewer binary.
 */

// Re-export key components for easier access
pub use boid::{Boid, Neighborhood};
pub use error::ConfigError;
pub use flock::{FlockSimulation, Steering, StepStats};
pub use params::{FlockConfig, NeighborSearch, UpdateMode};
pub use spatial_grid::SpatialGrid;

// Simulation core
pub mod boid;
pub mod error;
pub mod flock;
pub mod math;
pub mod params;
pub mod spatial_grid;

// Viewer
pub mod app;
pub mod camera;
pub mod debug;
pub mod input;
pub mod renderer;
pub mod ui;

// Length of a drawn boid in world units, before per-boid size scaling
pub const BOID_LENGTH: f32 = 0.03;
