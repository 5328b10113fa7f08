/*
 * Camera Module
 *
 * This module defines an orbiting perspective camera looking at the center of
 * the bounding cube. Dragging orbits (yaw/pitch), the mouse wheel zooms.
 * It projects world-space points into nannou's screen space.
 */

use nannou::prelude::*;

// Distance from the eye to the cube center in world units
const EYE_DISTANCE: f32 = 4.0;
// Points closer to the eye than this are not drawn
const NEAR_PLANE: f32 = 0.1;
// Radians of orbit per pixel of drag
const ORBIT_SPEED: f32 = 0.01;
const MAX_PITCH: f32 = 1.5;

/// A world point after projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub screen: Point2,
    // Pixels per world unit at this depth
    pub scale: f32,
    // Distance from the eye along the view axis
    pub depth: f32,
}

pub struct Camera {
    pub yaw: f32,
    pub pitch: f32,
    pub zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub is_dragging: bool,
    pub last_cursor_pos: Vec2,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.35,
            zoom: 1.0,
            min_zoom: 0.25,
            max_zoom: 6.0,
            is_dragging: false,
            last_cursor_pos: Vec2::ZERO,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    // Rotate a world point into view space (yaw about y, then pitch about x)
    fn to_view(&self, point: Vec3) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let x = point.x * cos_yaw + point.z * sin_yaw;
        let z = -point.x * sin_yaw + point.z * cos_yaw;

        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let y = point.y * cos_pitch - z * sin_pitch;
        let z = point.y * sin_pitch + z * cos_pitch;

        vec3(x, y, z)
    }

    // Project a world point onto the window, None if it is behind the near plane
    pub fn project(&self, point: Vec3, window_rect: Rect) -> Option<Projected> {
        let view = self.to_view(point);
        let depth = EYE_DISTANCE - view.z;
        if depth <= NEAR_PLANE {
            return None;
        }

        let focal = window_rect.w().min(window_rect.h()) * 0.5 * EYE_DISTANCE * 0.6;
        let scale = focal * self.zoom / depth;
        Some(Projected {
            screen: window_rect.xy() + vec2(view.x, view.y) * scale,
            scale,
            depth,
        })
    }

    // Handle mouse wheel events for zooming
    pub fn zoom(&mut self, scroll_delta: Vec2) {
        let zoom_factor = 1.0 + scroll_delta.y * 0.1;
        self.zoom = (self.zoom * zoom_factor).clamp(self.min_zoom, self.max_zoom);
    }

    pub fn start_drag(&mut self, position: Vec2) {
        self.last_cursor_pos = position;
        self.is_dragging = true;
    }

    // Orbit by the cursor movement since the last drag event
    pub fn drag(&mut self, position: Vec2) {
        if self.is_dragging {
            let delta = position - self.last_cursor_pos;
            if delta.length_squared() > 0.0 {
                self.yaw += delta.x * ORBIT_SPEED;
                self.pitch = (self.pitch - delta.y * ORBIT_SPEED).clamp(-MAX_PITCH, MAX_PITCH);
                self.last_cursor_pos = position;
            }
        }
    }

    pub fn end_drag(&mut self) {
        self.is_dragging = false;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> Rect {
        Rect::from_w_h(800.0, 600.0)
    }

    #[test]
    fn origin_projects_to_window_center() {
        let camera = Camera::new();
        let projected = camera.project(Vec3::ZERO, window()).unwrap();
        assert!(projected.screen.length() < 1.0e-4);
        assert!((projected.depth - EYE_DISTANCE).abs() < 1.0e-5);
    }

    #[test]
    fn nearer_points_are_drawn_larger() {
        let mut camera = Camera::new();
        camera.yaw = 0.0;
        camera.pitch = 0.0;
        let near = camera.project(vec3(0.0, 0.0, 1.0), window()).unwrap();
        let far = camera.project(vec3(0.0, 0.0, -1.0), window()).unwrap();
        assert!(near.scale > far.scale);
        assert!(near.depth < far.depth);
    }

    #[test]
    fn points_behind_the_eye_are_culled() {
        let mut camera = Camera::new();
        camera.yaw = 0.0;
        camera.pitch = 0.0;
        assert!(camera.project(vec3(0.0, 0.0, 10.0), window()).is_none());
    }

    #[test]
    fn drag_orbits_and_clamps_pitch() {
        let mut camera = Camera::new();
        camera.start_drag(Vec2::ZERO);
        camera.drag(vec2(100.0, -1000.0));
        camera.end_drag();

        assert!((camera.yaw - (0.6 + 1.0)).abs() < 1.0e-5);
        assert_eq!(camera.pitch, MAX_PITCH);

        let yaw = camera.yaw;
        camera.drag(vec2(500.0, 0.0));
        assert_eq!(camera.yaw, yaw);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = Camera::new();
        for _ in 0..100 {
            camera.zoom(vec2(0.0, 5.0));
        }
        assert_eq!(camera.zoom, camera.max_zoom);
    }
}
