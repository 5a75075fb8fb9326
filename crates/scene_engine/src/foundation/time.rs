//! Frame timing

use std::time::Instant;

/// Longest frame step handed to the simulation, in seconds
///
/// A stalled frame (debugger break, window drag) would otherwise arrive as a
/// single huge `dt` and tunnel the player through the ground.
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// Frame timer driving the main loop
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer starting now
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Advance the timer by one frame and return the clamped delta
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.delta_time = elapsed.min(MAX_FRAME_DELTA);
        self.total_time += self.delta_time;
        self.frame_count += 1;
        self.delta_time
    }

    /// Time since the previous frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Total simulated time since the timer was created
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Number of frames ticked so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Average frames per second since creation
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_counts_frames_and_clamps() {
        let mut timer = Timer::new();
        let dt = timer.tick();

        assert!(dt <= MAX_FRAME_DELTA);
        assert_eq!(timer.frame_count(), 1);
        assert!(timer.total_time() >= 0.0);
    }
}
