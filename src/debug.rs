/*
 * Debug Information Module
 *
 * Frame timing and flock counters shown by the viewer.
 */

use std::time::Duration;

use crate::flock::StepStats;

pub struct DebugInfo {
    pub fps: f32,
    pub frame_time: Duration,
    pub physics_updates_per_frame: usize,
    pub step_stats: StepStats,
}

impl Default for DebugInfo {
    fn default() -> Self {
        Self {
            fps: 0.0,
            frame_time: Duration::ZERO,
            physics_updates_per_frame: 0,
            step_stats: StepStats::default(),
        }
    }
}

impl DebugInfo {
    // Lines for the on-screen overlay
    pub fn lines(&self, boids: usize) -> Vec<String> {
        vec![
            format!("FPS: {:.1}", self.fps),
            format!("Frame time: {:.2} ms", self.frame_time.as_secs_f64() * 1000.0),
            format!("Boids: {}", boids),
            format!("Steps: {}", self.step_stats.steps),
            format!(
                "Links: {} same / {} other",
                self.step_stats.same_variant_links, self.step_stats.other_variant_links
            ),
            format!("Degenerate steers: {}", self.step_stats.degenerate_steers),
            format!("Physics updates/frame: {}", self.physics_updates_per_frame),
        ]
    }
}
