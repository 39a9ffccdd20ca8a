//! Frame clock for hosts that drive the engine from wall-clock time.
//!
//! The engine itself only consumes a `now` value in seconds; where that
//! timeline comes from is the host's business. [`FrameClock`] covers the
//! common case: tick it once per rendered frame and feed the returned
//! seconds into [`crate::FrameInput::now`]. A fixed step makes runs
//! deterministic for tests and replays; a time scale slows or speeds the
//! whole field without touching any other tuning.

use std::time::Instant;

/// Produces the per-frame `now` timestamps the engine consumes.
#[derive(Debug)]
pub struct FrameClock {
    started: Instant,
    last_tick: Instant,
    now_secs: f32,
    delta_secs: f32,
    frame: u64,
    fixed_step: Option<f32>,
    time_scale: f32,
}

impl FrameClock {
    /// Create a clock starting at `now == 0.0`.
    pub fn new() -> Self {
        let started = Instant::now();
        Self {
            started,
            last_tick: started,
            now_secs: 0.0,
            delta_secs: 0.0,
            frame: 0,
            fixed_step: None,
            time_scale: 1.0,
        }
    }

    /// Create a clock that advances by a fixed step per tick.
    ///
    /// Wall-clock time is ignored entirely; `n` ticks always land on
    /// `n * step` seconds. This is the deterministic mode used by tests
    /// and headless runs.
    pub fn fixed(step: f32) -> Self {
        assert!(step > 0.0, "Fixed step must be positive");
        let mut clock = Self::new();
        clock.fixed_step = Some(step);
        clock
    }

    /// Advance one frame and return the new `now` in seconds.
    pub fn tick(&mut self) -> f32 {
        let advance = match self.fixed_step {
            Some(step) => step,
            None => {
                let real = Instant::now();
                let elapsed = real.duration_since(self.last_tick).as_secs_f32();
                self.last_tick = real;
                elapsed
            }
        };
        self.delta_secs = advance * self.time_scale;
        self.now_secs += self.delta_secs;
        self.frame += 1;
        self.now_secs
    }

    /// Current time in seconds (as of the last tick).
    #[inline]
    pub fn now(&self) -> f32 {
        self.now_secs
    }

    /// Seconds advanced by the last tick.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Ticks since creation.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Wall-clock seconds since the clock was created, unaffected by
    /// fixed step or time scale.
    #[inline]
    pub fn wall_elapsed(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }

    /// Set the time-scale multiplier (clamped to non-negative).
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Current time-scale multiplier.
    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
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
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_fixed_step_is_deterministic() {
        let mut clock = FrameClock::fixed(0.1);
        assert!((clock.tick() - 0.1).abs() < 1e-6);
        assert!((clock.tick() - 0.2).abs() < 1e-6);
        assert!((clock.tick() - 0.3).abs() < 1e-6);
        assert_eq!(clock.frame(), 3);
        assert!((clock.delta() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_wall_clock_advances() {
        let mut clock = FrameClock::new();
        thread::sleep(Duration::from_millis(5));
        let now = clock.tick();
        assert!(now > 0.0);
        assert!((clock.now() - now).abs() < 1e-6);
    }

    #[test]
    fn test_time_scale() {
        let mut clock = FrameClock::fixed(1.0);
        clock.set_time_scale(0.5);
        assert!((clock.tick() - 0.5).abs() < 1e-6);

        clock.set_time_scale(-1.0);
        assert_eq!(clock.time_scale(), 0.0);
        let before = clock.now();
        clock.tick();
        assert_eq!(clock.now(), before);
    }

    #[test]
    #[should_panic(expected = "step must be positive")]
    fn test_fixed_step_must_be_positive() {
        FrameClock::fixed(0.0);
    }
}
