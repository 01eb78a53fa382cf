//! Frame counting and pause state.
//!
//! The trail effects are frame-driven: every step advances by exactly one
//! frame regardless of how long the frame took, so there is no delta time
//! here. The clock only counts frames, measures the presentation rate for
//! logging and carries the pause flag.
//!
//! # Example
//!
//! ```ignore
//! use cursor_trails::time::FrameClock;
//!
//! let mut clock = FrameClock::new();
//!
//! // Once per redraw:
//! if let Some(fps) = clock.tick() {
//!     log::debug!("{:.1} fps", fps);
//! }
//! if !clock.is_paused() {
//!     // advance the effect
//! }
//! ```

use std::time::{Duration, Instant};

/// Frame counter with a periodically refreshed FPS estimate.
#[derive(Debug)]
pub struct FrameClock {
    /// Frames presented, including paused ones.
    frame_count: u64,
    /// Frames in which the effect actually stepped.
    step_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
    paused: bool,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_interval(Duration::from_millis(500))
    }

    /// Clock that refreshes its FPS estimate every `interval`.
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            frame_count: 0,
            step_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: Instant::now(),
            fps_update_interval: interval,
            paused: false,
        }
    }

    /// Record one frame. Returns the new FPS estimate when it was refreshed.
    pub fn tick(&mut self) -> Option<f32> {
        self.frame_count += 1;
        if !self.paused {
            self.step_count += 1;
        }

        let now = Instant::now();
        let since = now.duration_since(self.fps_update_time);
        if since < self.fps_update_interval {
            return None;
        }
        let frames = self.frame_count - self.fps_frame_count;
        self.fps = frames as f32 / since.as_secs_f32();
        self.fps_frame_count = self.frame_count;
        self.fps_update_time = now;
        Some(self.fps)
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn steps(&self) -> u64 {
        self.step_count
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
