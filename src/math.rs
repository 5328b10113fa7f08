/*
 * Math Module
 *
 * Small vector helpers shared by the steering rules. Every normalization here
 * tolerates the zero vector: anything shorter than EPSILON comes back as
 * Vec3::ZERO instead of NaN.
 */

use nannou::prelude::*;

// Magnitudes at or below this are treated as zero-length
pub const EPSILON: f32 = 1.0e-6;

/// Unit vector in the direction of `v`, or zero if `v` is degenerate.
#[inline]
pub fn safe_normalize(v: Vec3) -> Vec3 {
    normalize_to_magnitude(v, 1.0)
}

/// Rescale `v` to `magnitude`, or return zero if `v` is degenerate.
#[inline]
pub fn normalize_to_magnitude(v: Vec3, magnitude: f32) -> Vec3 {
    let length = v.length();
    if !(length > EPSILON) || !length.is_finite() {
        return Vec3::ZERO;
    }
    v * (magnitude / length)
}

// Teleport a coordinate to the opposite face once it leaves [-half_extent, half_extent]
#[inline]
pub fn wrap_axis(value: f32, half_extent: f32) -> f32 {
    if value > half_extent {
        -half_extent
    } else if value < -half_extent {
        half_extent
    } else {
        value
    }
}
