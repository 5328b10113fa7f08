/*
 * Renderer Module
 *
 * This module draws the flock through the orbit camera: the wireframe of the
 * bounding cube, one triangle per boid pointing along its projected heading,
 * and the optional debug overlay. Boids are drawn back to front so nearer
 * ones cover farther ones.
 */

use nannou::prelude::*;
use tracing::error;

use crate::app::Model;
use crate::boid::Boid;
use crate::camera::{Camera, Projected};
use crate::ui;
use crate::BOID_LENGTH;

// One color per variant, cycled when there are more variants
const VARIANT_COLORS: [(f32, f32, f32); 6] = [
    (0.86, 0.86, 0.86),
    (0.95, 0.55, 0.25),
    (0.35, 0.70, 0.95),
    (0.55, 0.90, 0.45),
    (0.90, 0.40, 0.75),
    (0.95, 0.85, 0.35),
];

pub fn variant_color(variant: usize) -> (f32, f32, f32) {
    VARIANT_COLORS[variant % VARIANT_COLORS.len()]
}

pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(BLACK);

    let window_rect = app.window_rect();
    let config = model.simulation.config();

    draw_bounds(&draw, &model.camera, window_rect, config.half_extent);

    // Project every boid once, then paint far to near
    let mut projected: Vec<(usize, Projected)> = model
        .simulation
        .boids()
        .iter()
        .enumerate()
        .filter_map(|(i, boid)| Some((i, model.camera.project(boid.position, window_rect)?)))
        .collect();
    projected.sort_by(|a, b| b.1.depth.total_cmp(&a.1.depth));

    let reference_scale = model
        .camera
        .project(Vec3::ZERO, window_rect)
        .map_or(1.0, |p| p.scale);

    for (i, at) in &projected {
        let boid = &model.simulation.boids()[*i];
        draw_boid(&draw, &model.camera, window_rect, boid, *at, reference_scale);
    }

    if model.controls.show_debug {
        if let Some(first) = model.simulation.boids().first() {
            if let Some(at) = model.camera.project(first.position, window_rect) {
                draw.ellipse()
                    .xy(at.screen)
                    .radius(config.perception_radius * at.scale)
                    .no_fill()
                    .stroke(GREEN)
                    .stroke_weight(1.0);

                let ahead = first.position + first.heading() * BOID_LENGTH * 4.0;
                if let Some(tip) = model.camera.project(ahead, window_rect) {
                    draw.arrow()
                        .start(at.screen)
                        .end(tip.screen)
                        .color(YELLOW)
                        .stroke_weight(2.0);
                }
            }
        }

        ui::draw_debug_info(&draw, &model.debug_info, window_rect, model.simulation.len());
    }

    if let Err(err) = draw.to_frame(app, &frame) {
        error!(?err, "failed to draw flock");
    }
    if let Err(err) = model.egui.draw_to_frame(&frame) {
        error!(?err, "failed to draw ui");
    }
}

// Triangle pointing along the projected heading, scaled by size and depth
fn draw_boid(
    draw: &Draw,
    camera: &Camera,
    window_rect: Rect,
    boid: &Boid,
    at: Projected,
    reference_scale: f32,
) {
    let ahead = boid.position + boid.heading() * BOID_LENGTH;
    let angle = camera
        .project(ahead, window_rect)
        .map(|tip| {
            let d = tip.screen - at.screen;
            d.y.atan2(d.x)
        })
        .unwrap_or(0.0);

    let length = (BOID_LENGTH * boid.size * at.scale).max(1.5);
    let points = [
        pt2(length, 0.0),
        pt2(-length, length / 2.0),
        pt2(-length, -length / 2.0),
    ];

    // Fade boids at the back of the cube
    let shade = (at.scale / reference_scale).clamp(0.45, 1.0);
    let (r, g, b) = variant_color(boid.variant);

    draw.polygon()
        .color(rgba(r * shade, g * shade, b * shade, 1.0))
        .points(points)
        .xy(at.screen)
        .rotate(angle);
}

// Wireframe of the bounding cube
fn draw_bounds(draw: &Draw, camera: &Camera, window_rect: Rect, half_extent: f32) {
    let h = half_extent;
    let corners = [
        vec3(-h, -h, -h),
        vec3(h, -h, -h),
        vec3(h, h, -h),
        vec3(-h, h, -h),
        vec3(-h, -h, h),
        vec3(h, -h, h),
        vec3(h, h, h),
        vec3(-h, h, h),
    ];
    const EDGES: [(usize, usize); 12] = [
        (0, 1), (1, 2), (2, 3), (3, 0),
        (4, 5), (5, 6), (6, 7), (7, 4),
        (0, 4), (1, 5), (2, 6), (3, 7),
    ];

    for (a, b) in EDGES {
        let (Some(start), Some(end)) = (
            camera.project(corners[a], window_rect),
            camera.project(corners[b], window_rect),
        ) else {
            continue;
        };

        draw.line()
            .start(start.screen)
            .end(end.screen)
            .weight(1.0)
            .color(rgba(0.3, 0.3, 0.3, 1.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_colors_cycle() {
        assert_eq!(variant_color(0), variant_color(VARIANT_COLORS.len()));
        assert_ne!(variant_color(0), variant_color(1));
    }
}
