//! Frame-driven tick throttling
//!
//! The host calls in once per rendered frame with a monotonically increasing
//! timestamp in milliseconds. A tick is due when the elapsed time since the
//! last tick exceeds the snake's interval, or when input asked for an
//! immediate update.

/// Decides on which frames the simulation ticks
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    /// Timestamp of the last accepted tick (or of the first frame)
    last_tick_at: Option<f64>,
    /// Input requested a tick on the next frame
    update_now: bool,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tick on the next frame regardless of elapsed time
    pub fn request_update(&mut self) {
        self.update_now = true;
    }

    pub fn update_requested(&self) -> bool {
        self.update_now
    }

    /// Milliseconds since the last tick
    pub fn elapsed(&self, timestamp: f64) -> f64 {
        self.last_tick_at.map_or(0.0, |last| timestamp - last)
    }

    /// Whether this frame runs a tick. When it does, the elapsed-time
    /// baseline and the update request are reset.
    pub fn should_tick(&mut self, timestamp: f64, interval_ms: f64) -> bool {
        let last = *self.last_tick_at.get_or_insert(timestamp);
        if self.update_now || timestamp - last > interval_ms {
            self.last_tick_at = Some(timestamp);
            self.update_now = false;
            return true;
        }
        false
    }
}
