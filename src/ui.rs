/*
 * UI Module
 *
 * This module contains the nannou_egui control panel and the on-screen debug
 * overlay. Flock parameters are edited on a pending copy of the config; the
 * running flock only picks them up when "Apply & Restart" rebuilds it.
 */

use nannou_egui::{egui, Egui};

use crate::debug::DebugInfo;
use crate::params::{FlockConfig, NeighborSearch, UpdateMode};

/// Viewer-only toggles that never reach the simulation.
#[derive(Debug, Default)]
pub struct ViewerControls {
    pub paused: bool,
    pub show_debug: bool,
    pub last_error: Option<String>,
}

/// Requests raised by the panel this frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UiActions {
    pub reset_flock: bool,
    pub step_once: bool,
    pub apply_config: bool,
    pub reset_camera: bool,
}

pub fn update_ui(
    egui: &mut Egui,
    controls: &mut ViewerControls,
    pending: &mut FlockConfig,
    active: &FlockConfig,
    debug_info: &DebugInfo,
) -> UiActions {
    let mut actions = UiActions::default();
    let ctx = egui.begin_frame();

    egui::Window::new("Flock Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.horizontal(|ui| {
                let label = if controls.paused { "Resume" } else { "Pause" };
                if ui.button(label).clicked() {
                    controls.paused = !controls.paused;
                }
                if ui.button("Step").clicked() {
                    actions.step_once = true;
                }
                if ui.button("Reset Flock").clicked() {
                    actions.reset_flock = true;
                }
            });

            ui.collapsing("Flock Parameters", |ui| {
                ui.add(egui::Slider::new(&mut pending.num_boids, FlockConfig::num_boids_range()).text("Number of Boids"));
                ui.add(egui::Slider::new(&mut pending.variant_count, FlockConfig::variant_count_range()).text("Variants"));
                ui.add(egui::Slider::new(&mut pending.boid_speed, FlockConfig::speed_range()).text("Boid Speed"));
                ui.add(egui::Slider::new(&mut pending.perception_radius, FlockConfig::radius_range()).text("Perception Radius"));
                ui.add(egui::Slider::new(&mut pending.wall_margin, FlockConfig::radius_range()).text("Wall Margin"));
            });

            ui.collapsing("Steering Weights", |ui| {
                ui.add(egui::Slider::new(&mut pending.alignment_weight, FlockConfig::weight_range()).text("Alignment"));
                ui.add(egui::Slider::new(&mut pending.cohesion_weight, FlockConfig::weight_range()).text("Cohesion"));
                ui.add(egui::Slider::new(&mut pending.separation_weight, FlockConfig::weight_range()).text("Separation"));
            });

            ui.collapsing("Performance", |ui| {
                ui.label("Neighbor search");
                ui.radio_value(&mut pending.neighbor_search, NeighborSearch::BruteForce, "Brute force");
                ui.radio_value(&mut pending.neighbor_search, NeighborSearch::SpatialGrid, "Spatial grid");
                ui.label("Update order");
                ui.radio_value(&mut pending.update_mode, UpdateMode::Sequential, "Sequential");
                ui.radio_value(&mut pending.update_mode, UpdateMode::Snapshot, "Snapshot");
            });

            if *pending != *active {
                ui.separator();
                ui.label("Parameters changed");
                ui.horizontal(|ui| {
                    if ui.button("Apply & Restart").clicked() {
                        actions.apply_config = true;
                    }
                    if ui.button("Discard").clicked() {
                        *pending = active.clone();
                    }
                });
            }
            if let Some(err) = &controls.last_error {
                ui.colored_label(egui::Color32::RED, err.as_str());
            }

            ui.separator();
            ui.label(format!("Seed: {}", active.seed.map_or_else(|| "random".to_string(), |s| s.to_string())));
            for line in debug_info.lines(active.num_boids) {
                ui.label(line);
            }

            ui.separator();
            if ui.button("Reset Camera").clicked() {
                actions.reset_camera = true;
            }
            ui.checkbox(&mut controls.show_debug, "Show Debug Overlay");
        });

    actions
}

// Draw debug information in the top-left corner of the window
pub fn draw_debug_info(
    draw: &nannou::Draw,
    debug_info: &DebugInfo,
    window_rect: nannou::geom::Rect,
    boids_len: usize,
) {
    let margin = 20.0;
    let line_height = 20.0;
    let lines = debug_info.lines(boids_len);

    let panel_width = 240.0;
    let panel_height = line_height * lines.len() as f32 + margin;
    draw.rect()
        .x_y(window_rect.left() + panel_width / 2.0, window_rect.top() - panel_height / 2.0)
        .w_h(panel_width, panel_height)
        .color(nannou::color::rgba(0.0, 0.0, 0.0, 0.7));

    let text_x = window_rect.left() + margin;
    let text_y = window_rect.top() - margin;
    for (i, text) in lines.iter().enumerate() {
        draw.text(text)
            .x_y(text_x + 90.0, text_y - i as f32 * line_height)
            .color(nannou::color::WHITE)
            .font_size(14);
    }
}
