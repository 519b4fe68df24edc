//! Frame timing.
//!
//! Delta time is expressed in reference ticks: one unit is one frame at
//! 60 Hz, so durations authored as frame counts stay roughly correct on
//! faster or slower displays.

/// Milliseconds to 60 Hz ticks.
const TICKS_PER_MS: f64 = 60.0 / 1000.0;

/// Length of the window the fps figure is averaged over.
const FPS_WINDOW_MS: f64 = 1000.0;

/// Turns presentation timestamps into tick deltas and a rolling fps figure.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    start: f64,
    prev: f64,
    frames: u32,
    wait: u32,
    fps: Option<f64>,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::starting_at(0.0)
    }

    /// Counter whose first frame is measured from `timestamp_ms`.
    pub fn starting_at(timestamp_ms: f64) -> Self {
        Self {
            start: timestamp_ms,
            prev: timestamp_ms,
            frames: 0,
            wait: 0,
            fps: None,
        }
    }

    /// Swallows the next `frames` timestamps so the frame rate can settle,
    /// e.g. after the window was hidden.
    pub fn suspend(&mut self, frames: u32) {
        self.wait = frames;
    }

    pub fn is_suspended(&self) -> bool {
        self.wait > 0
    }

    /// Records a frame at `timestamp_ms` and returns the delta since the
    /// previous frame in ticks, or `None` while suspended.
    pub fn update(&mut self, timestamp_ms: f64) -> Option<f32> {
        if self.wait > 0 {
            self.wait -= 1;
            if self.wait == 0 {
                self.start += timestamp_ms - self.prev;
                self.prev = timestamp_ms;
            }
            return None;
        }

        self.frames += 1;
        let duration = timestamp_ms - self.start;
        if duration > FPS_WINDOW_MS {
            self.fps = Some(f64::from(self.frames) * 1000.0 / duration);
            self.start = timestamp_ms;
            self.frames = 0;
        }

        let delta = (timestamp_ms - self.prev) * TICKS_PER_MS;
        self.prev = timestamp_ms;
        Some(delta as f32)
    }

    /// Most recent fps measurement, once a full window has elapsed.
    pub fn fps(&self) -> Option<f64> {
        self.fps
    }

    /// The fps figure formatted for display, e.g. `"59.9fps"`.
    pub fn label(&self) -> String {
        format!("{:.1}fps", self.fps.unwrap_or(0.0))
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
