//! Frame delta timing.

use web_time::{Duration, Instant};

/// Frame clock producing the per-frame delta that drives [`crate::Reeller::tick`].
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Last frame timestamp
    last_frame: Option<Instant>,
    /// Deltas are capped so a backgrounded tab does not jump the track
    max_delta: Duration,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f64,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f64,
}

impl FrameClock {
    /// Create a clock whose deltas never exceed `max_delta`.
    #[must_use]
    pub fn new(max_delta: Duration) -> Self {
        Self {
            last_frame: None,
            max_delta,
            smoothed_fps: 60.0,
            smoothing: 0.05,
        }
    }

    /// Seconds since the previous call (zero on the first frame).
    pub fn delta(&mut self) -> f64 {
        self.delta_at(Instant::now())
    }

    /// Same as [`delta`](Self::delta) with an explicit timestamp.
    pub fn delta_at(&mut self, now: Instant) -> f64 {
        let Some(last) = self.last_frame.replace(now) else {
            return 0.0;
        };
        let elapsed = now.saturating_duration_since(last).min(self.max_delta);

        let frame_time = elapsed.as_secs_f64();
        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
        frame_time
    }

    /// Forget the previous timestamp so the next delta starts from zero.
    pub fn reset(&mut self) {
        self.last_frame = None;
    }

    /// Current FPS (smoothed).
    #[must_use]
    pub fn fps(&self) -> f64 {
        self.smoothed_fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_has_zero_delta() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.delta_at(Instant::now()), 0.0);
    }

    #[test]
    fn deltas_are_capped() {
        let mut clock = FrameClock::new(Duration::from_millis(50));
        let start = Instant::now();
        let _ = clock.delta_at(start);
        let dt = clock.delta_at(start + Duration::from_millis(16));
        assert!((dt - 0.016).abs() < 1e-9);
        let dt = clock.delta_at(start + Duration::from_secs(5));
        assert!((dt - 0.05).abs() < 1e-9);
    }

    #[test]
    fn reset_restarts_from_zero() {
        let mut clock = FrameClock::default();
        let start = Instant::now();
        let _ = clock.delta_at(start);
        clock.reset();
        assert_eq!(clock.delta_at(start + Duration::from_millis(30)), 0.0);
    }
}
