/*
 * Application Module
 *
 * This module defines the viewer model and its update loop. The flock is
 * advanced on a fixed timestep, one step(1.0) per physics tick, independent
 * of the render frame rate. The viewer never changes the running flock's
 * config; applying edited parameters builds a new FlockSimulation.
 */

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use nannou::prelude::*;
use nannou_egui::Egui;
use tracing::{error, info, warn};

use crate::camera::Camera;
use crate::debug::DebugInfo;
use crate::flock::FlockSimulation;
use crate::input;
use crate::params::FlockConfig;
use crate::renderer;
use crate::ui::{self, ViewerControls};

// Physics ticks per second
const PHYSICS_HZ: f32 = 60.0;
// Ticks allowed per frame before the backlog is dropped
const MAX_STEPS_PER_FRAME: usize = 5;

// Flock handed over from main() to nannou's model function
static STARTUP_FLOCK: Mutex<Option<FlockSimulation>> = Mutex::new(None);

pub struct Model {
    pub simulation: FlockSimulation,
    pub pending_config: FlockConfig,
    pub controls: ViewerControls,
    pub egui: Egui,
    pub debug_info: DebugInfo,
    pub camera: Camera,
    pub mouse_position: Vec2,
    // Fixed timestep physics variables
    pub physics_accumulator: Duration,
    pub physics_step_size: Duration,
    pub last_update_time: Instant,
}

// Open the viewer on an already-built flock. Blocks until the window closes.
pub fn run(simulation: FlockSimulation) {
    hand_over_flock(simulation);
    nannou::app(model).update(update).run();
}

fn startup_slot() -> MutexGuard<'static, Option<FlockSimulation>> {
    STARTUP_FLOCK.lock().unwrap_or_else(|poisoned| {
        error!("startup flock lock was poisoned, recovering");
        poisoned.into_inner()
    })
}

fn hand_over_flock(simulation: FlockSimulation) {
    *startup_slot() = Some(simulation);
}

fn take_startup_flock() -> Option<FlockSimulation> {
    startup_slot().take()
}

fn model(app: &App) -> Model {
    let window_id = app
        .new_window()
        .title("3D Boid Flocking")
        .size(1280, 860)
        .view(renderer::view)
        .mouse_moved(input::mouse_moved)
        .mouse_pressed(input::mouse_pressed)
        .mouse_released(input::mouse_released)
        .mouse_wheel(input::mouse_wheel)
        .key_pressed(input::key_pressed)
        .raw_event(input::raw_window_event)
        .build()
        .expect("failed to build window");

    let window = app.window(window_id).expect("window was just created");
    let egui = Egui::from_window(&window);

    let simulation = take_startup_flock().expect("app::run stores the flock before starting nannou");

    Model {
        pending_config: simulation.config().clone(),
        simulation,
        controls: ViewerControls::default(),
        egui,
        debug_info: DebugInfo::default(),
        camera: Camera::new(),
        mouse_position: Vec2::ZERO,
        physics_accumulator: Duration::ZERO,
        physics_step_size: Duration::from_secs_f32(1.0 / PHYSICS_HZ),
        last_update_time: Instant::now(),
    }
}

fn update(app: &App, model: &mut Model, update: Update) {
    model.debug_info.fps = app.fps();
    model.debug_info.frame_time = update.since_last;

    let actions = ui::update_ui(
        &mut model.egui,
        &mut model.controls,
        &mut model.pending_config,
        model.simulation.config(),
        &model.debug_info,
    );

    if actions.apply_config {
        apply_pending_config(model);
    } else if actions.reset_flock {
        model.simulation.reset();
    }
    if actions.reset_camera {
        model.camera.reset();
    }

    let now = Instant::now();
    let frame_time = now.duration_since(model.last_update_time);
    model.last_update_time = now;

    let mut steps_this_frame = 0;
    if model.controls.paused {
        model.physics_accumulator = Duration::ZERO;
        if actions.step_once {
            model.simulation.step(1.0);
            steps_this_frame = 1;
        }
    } else {
        model.physics_accumulator += frame_time;
        while model.physics_accumulator >= model.physics_step_size
            && steps_this_frame < MAX_STEPS_PER_FRAME
        {
            model.simulation.step(1.0);
            model.physics_accumulator -= model.physics_step_size;
            steps_this_frame += 1;
        }
        // Drop the backlog rather than spiral after a long stall
        if steps_this_frame == MAX_STEPS_PER_FRAME {
            model.physics_accumulator = Duration::ZERO;
        }
    }

    model.debug_info.physics_updates_per_frame = steps_this_frame;
    model.debug_info.step_stats = model.simulation.stats();
}

fn apply_pending_config(model: &mut Model) {
    match FlockSimulation::new(model.pending_config.clone()) {
        Ok(simulation) => {
            info!(boids = simulation.len(), "applied new flock parameters");
            model.simulation = simulation;
            model.controls.last_error = None;
        }
        Err(err) => {
            warn!(%err, "rejected flock parameters");
            model.controls.last_error = Some(err.to_string());
        }
    }
}
