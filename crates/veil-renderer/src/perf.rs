//! Frame pacing statistics for the periodic FPS log line.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

const WINDOW: usize = 120;
const REPORT_INTERVAL: Duration = Duration::from_secs(5);

/// Rolling window of frame intervals plus the clock that animates the scene.
pub struct FrameClock {
    started: Instant,
    last_frame: Instant,
    last_report: Instant,
    intervals: VecDeque<Duration>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(now: Instant) -> Self {
        Self {
            started: now,
            last_frame: now,
            last_report: now,
            intervals: VecDeque::with_capacity(WINDOW),
        }
    }

    /// Record a frame at `now`; returns seconds since start.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let interval = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        if self.intervals.len() == WINDOW {
            self.intervals.pop_front();
        }
        self.intervals.push_back(interval);
        now.saturating_duration_since(self.started).as_secs_f32()
    }

    pub fn fps(&self) -> f64 {
        let total: f64 = self.intervals.iter().map(Duration::as_secs_f64).sum();
        if total <= 0.0 {
            return 0.0;
        }
        self.intervals.len() as f64 / total
    }

    /// Mean frame time in milliseconds.
    pub fn frame_time_ms(&self) -> f64 {
        if self.intervals.is_empty() {
            return 0.0;
        }
        let total: f64 = self.intervals.iter().map(Duration::as_secs_f64).sum();
        total / self.intervals.len() as f64 * 1000.0
    }

    pub fn sample_count(&self) -> usize {
        self.intervals.len()
    }

    /// True once per report interval.
    pub fn should_report(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_report) < REPORT_INTERVAL {
            return false;
        }
        self.last_report = now;
        true
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_clock_reports_zero() {
        let clock = FrameClock::new();
        assert_eq!(clock.fps(), 0.0);
        assert_eq!(clock.frame_time_ms(), 0.0);
    }

    #[test]
    fn steady_sixty_hz() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        let step = Duration::from_micros(16_667);
        let mut elapsed = 0.0;
        for frame in 1..=60 {
            elapsed = clock.tick(start + step * frame);
        }
        assert!((clock.fps() - 60.0).abs() < 0.1);
        assert!((clock.frame_time_ms() - 16.667).abs() < 0.01);
        assert!((elapsed - 1.0).abs() < 0.001);
    }

    #[test]
    fn window_is_bounded() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        for frame in 1..=300 {
            clock.tick(start + Duration::from_millis(frame));
        }
        assert_eq!(clock.sample_count(), WINDOW);
    }

    #[test]
    fn reports_once_per_interval() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        assert!(!clock.should_report(start + Duration::from_secs(1)));
        assert!(clock.should_report(start + Duration::from_secs(5)));
        assert!(!clock.should_report(start + Duration::from_secs(6)));
        assert!(clock.should_report(start + Duration::from_secs(10)));
    }
}
