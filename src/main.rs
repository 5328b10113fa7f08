/*
 * 3D Boid Flocking Viewer
 *
 * Builds a flock from defaults, a JSON config file, or command-line overrides,
 * then opens a nannou window that steps and draws it.
 *
 *   flock3d --config flock.json --seed 7 --grid
 *   RUST_LOG=flock3d=trace flock3d --boids 800
 */

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use flock3d::{app, FlockConfig, FlockSimulation, NeighborSearch, UpdateMode};

#[derive(Parser, Debug)]
#[command(author, version, about = "3D boid flocking viewer")]
struct Args {
    /// JSON flock configuration; missing fields use the defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of boids (overrides the config file)
    #[arg(long)]
    boids: Option<usize>,
    /// Seed for a reproducible initial flock
    #[arg(long)]
    seed: Option<u64>,
    /// Use the spatial grid for neighbor search
    #[arg(long)]
    grid: bool,
    /// Steer every boid from the same snapshot instead of updating in place
    #[arg(long)]
    snapshot: bool,
    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,
}

impl Args {
    fn flock_config(&self) -> Result<FlockConfig> {
        let mut config = match &self.config {
            Some(path) => FlockConfig::from_json_file(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => FlockConfig::default(),
        };

        if let Some(boids) = self.boids {
            config.num_boids = boids;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.grid {
            config.neighbor_search = NeighborSearch::SpatialGrid;
        }
        if self.snapshot {
            config.update_mode = UpdateMode::Snapshot;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = args.flock_config()?;
    if args.print_config {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    let simulation = FlockSimulation::new(config)?;
    info!(boids = simulation.len(), "starting viewer");
    app::run(simulation);
    Ok(())
}
