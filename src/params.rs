/*
 * Flock Parameters Module
 *
 * This module defines FlockConfig, the set of parameters a flock is built
 * with. A configuration is fixed for the lifetime of a FlockSimulation; the
 * viewer edits a pending copy and rebuilds the flock to apply it.
 *
 * Configs can be loaded from JSON files. Missing fields fall back to the
 * defaults below, and every config is validated before a flock is built.
 */

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;

// Upper bound on flock size accepted by validate()
pub const MAX_BOIDS: usize = 100_000;

/// How neighbor candidates are found during a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborSearch {
    /// All-pairs scan.
    BruteForce,
    /// Uniform 3D grid with cells at least one perception radius wide.
    SpatialGrid,
}

/// Order in which boid state is written back during a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMode {
    /// Boids are updated in place in index order, so boid `i` sees the
    /// already-advanced state of boids `0..i`.
    Sequential,
    /// Every boid steers from the same snapshot; writes are committed after
    /// all rules have been evaluated.
    Snapshot,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockConfig {
    pub num_boids: usize,
    pub perception_radius: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub separation_weight: f32,
    pub boid_speed: f32,
    pub wall_margin: f32,
    pub half_extent: f32,
    pub variant_count: usize,
    pub size_range: (f32, f32),
    pub seed: Option<u64>,
    pub neighbor_search: NeighborSearch,
    pub update_mode: UpdateMode,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            num_boids: 400,
            perception_radius: 0.15,
            alignment_weight: 0.002,
            cohesion_weight: 0.001,
            separation_weight: 0.003,
            boid_speed: 0.01,
            wall_margin: 0.2,
            half_extent: 1.0,
            variant_count: 3,
            size_range: (0.8, 1.2),
            seed: None,
            neighbor_search: NeighborSearch::BruteForce,
            update_mode: UpdateMode::Sequential,
        }
    }
}

impl FlockConfig {
    // Parse a config from JSON text and validate it
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: FlockConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    // Load a config file from disk and validate it
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        info!(path = %path.display(), boids = config.num_boids, "loaded flock config");
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // Check every parameter against its allowed range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_boids > MAX_BOIDS {
            return Err(ConfigError::invalid(
                "num_boids",
                format!("{} exceeds the limit of {}", self.num_boids, MAX_BOIDS),
            ));
        }
        require_positive("perception_radius", self.perception_radius)?;
        require_positive("boid_speed", self.boid_speed)?;
        require_positive("half_extent", self.half_extent)?;
        require_non_negative("alignment_weight", self.alignment_weight)?;
        require_non_negative("cohesion_weight", self.cohesion_weight)?;
        require_non_negative("separation_weight", self.separation_weight)?;
        require_non_negative("wall_margin", self.wall_margin)?;
        if self.wall_margin >= self.half_extent {
            return Err(ConfigError::invalid(
                "wall_margin",
                format!(
                    "{} must be smaller than half_extent {}",
                    self.wall_margin, self.half_extent
                ),
            ));
        }
        if self.variant_count == 0 {
            return Err(ConfigError::invalid("variant_count", "must be at least 1"));
        }
        let (min_size, max_size) = self.size_range;
        require_positive("size_range", min_size)?;
        require_positive("size_range", max_size)?;
        if min_size > max_size {
            return Err(ConfigError::invalid(
                "size_range",
                format!("lower bound {} is above upper bound {}", min_size, max_size),
            ));
        }
        Ok(())
    }

    // Parameter ranges for UI sliders
    pub fn num_boids_range() -> std::ops::RangeInclusive<usize> {
        0..=5000
    }

    pub fn weight_range() -> std::ops::RangeInclusive<f32> {
        0.0..=0.02
    }

    pub fn radius_range() -> std::ops::RangeInclusive<f32> {
        0.01..=0.5
    }

    pub fn speed_range() -> std::ops::RangeInclusive<f32> {
        0.001..=0.05
    }

    pub fn variant_count_range() -> std::ops::RangeInclusive<usize> {
        1..=6
    }
}

fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::invalid(
            field,
            format!("{} must be finite and positive", value),
        ));
    }
    Ok(())
}

fn require_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::invalid(
            field,
            format!("{} must be finite and non-negative", value),
        ));
    }
    Ok(())
}
