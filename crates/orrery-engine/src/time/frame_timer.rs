use std::time::{Duration, Instant};

/// Frame timing snapshot delivered with every tick.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Milliseconds since the timer epoch. Never decreases within a process.
    pub timestamp: f64,

    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f32,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

impl FrameTime {
    /// Builds a snapshot for an externally supplied timestamp.
    ///
    /// Used by hosts that own their own time source (and by tests).
    pub fn at(timestamp: f64, frame_index: u64) -> Self {
        Self {
            timestamp,
            dt: 0.0,
            frame_index,
        }
    }
}

/// Wall-clock source producing `FrameTime` snapshots.
///
/// One timer per window, so multi-window hosts do not share delta-time state.
///
/// Delta time is clamped to avoid pathological values when the application is paused
/// by the debugger, minimized, or stalls. The timestamp is not clamped.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    epoch: Instant,
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameTimer {
    /// Creates a timer with default clamps (0.1 ms to 250 ms).
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a timer with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        let now = Instant::now();
        Self {
            epoch: now,
            last: now,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Rebaselines delta time, e.g. after the window was occluded.
    ///
    /// The epoch is left alone so timestamps stay monotonic.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the timer and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;

        let ft = FrameTime {
            timestamp: now.saturating_duration_since(self.epoch).as_secs_f64() * 1000.0,
            dt: dt.as_secs_f32(),
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_index_increments() {
        let mut timer = FrameTimer::new();
        assert_eq!(timer.tick().frame_index, 0);
        assert_eq!(timer.tick().frame_index, 1);
        assert_eq!(timer.tick().frame_index, 2);
    }

    #[test]
    fn timestamps_never_decrease() {
        let mut timer = FrameTimer::new();
        let mut last = timer.tick().timestamp;
        for _ in 0..100 {
            let ts = timer.tick().timestamp;
            assert!(ts >= last);
            last = ts;
        }
    }

    #[test]
    fn dt_is_clamped_to_max_after_a_stall() {
        let mut timer = FrameTimer::with_clamps(
            Duration::from_millis(1),
            Duration::from_millis(50),
        );
        let later = timer.last + Duration::from_secs(3);
        let ft = timer.tick_at(later);
        assert!((ft.dt - 0.05).abs() < 1e-6);
        // Timestamp reflects the real elapsed time.
        assert!((ft.timestamp - 3000.0).abs() < 1e-6);
    }

    #[test]
    fn dt_is_clamped_to_min_for_tight_loops() {
        let mut timer = FrameTimer::with_clamps(
            Duration::from_millis(1),
            Duration::from_millis(50),
        );
        let same = timer.last;
        let ft = timer.tick_at(same);
        assert!((ft.dt - 0.001).abs() < 1e-6);
    }
}
