//! Time management utilities

use std::time::Instant;

/// Frame timer accumulating delta time and a windowed FPS estimate
///
/// Time can be fed from the wall clock ([`Timer::update`]) or advanced by a
/// fixed step ([`Timer::advance`]) for headless loops and tests.
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
    fps_window: f32,
    fps_window_frames: u32,
    last_fps: f32,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Length of the FPS averaging window in seconds
    pub const FPS_WINDOW: f32 = 1.0;

    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
            fps_window: 0.0,
            fps_window_frames: 0,
            last_fps: 0.0,
        }
    }

    /// Update the timer from the wall clock (call once per frame)
    pub fn update(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.advance(elapsed);
    }

    /// Advance the timer by an explicit frame delta
    ///
    /// Returns `Some(fps)` whenever a full FPS window has elapsed.
    pub fn advance(&mut self, delta_time: f32) -> Option<f32> {
        self.delta_time = delta_time;
        self.total_time += delta_time;
        self.frame_count += 1;

        self.fps_window += delta_time;
        self.fps_window_frames += 1;

        if self.fps_window >= Self::FPS_WINDOW {
            #[allow(clippy::cast_precision_loss)]
            let fps = self.fps_window_frames as f32 / self.fps_window;
            self.last_fps = fps;
            self.fps_window = 0.0;
            self.fps_window_frames = 0;
            Some(fps)
        } else {
            None
        }
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// FPS measured over the last completed window
    pub fn last_fps(&self) -> f32 {
        self.last_fps
    }
}
