//! Frame time and cooperative timers
//!
//! Timers here are "time remaining" counters decremented by the delta the
//! host supplies each tick. Nothing is scheduled; whoever owns a timer polls it.

use serde::{Deserialize, Serialize};

/// Time information for one tick, supplied by the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameTime {
    /// Seconds since the clock started, including this tick
    pub now: f32,
    /// Seconds elapsed since the previous tick
    pub delta: f32,
}

impl FrameTime {
    /// Create a frame time
    pub fn new(now: f32, delta: f32) -> Self {
        Self { now, delta }
    }

    /// Frame time at an absolute timestamp with no delta
    pub fn at(now: f32) -> Self {
        Self { now, delta: 0.0 }
    }
}

/// Monotonic host clock
#[derive(Debug, Clone, Default)]
pub struct Clock {
    elapsed: f32,
    delta: f32,
    frame: u64,
}

impl Clock {
    /// Create a clock at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `delta` seconds and return the new frame time.
    /// Negative deltas are clamped to zero.
    pub fn advance(&mut self, delta: f32) -> FrameTime {
        let delta = delta.max(0.0);
        self.elapsed += delta;
        self.delta = delta;
        self.frame += 1;
        self.current()
    }

    /// Current frame time
    pub fn current(&self) -> FrameTime {
        FrameTime::new(self.elapsed, self.delta)
    }

    /// Seconds since start
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Number of ticks advanced
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

/// A countdown decremented by frame deltas
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    /// Duration used by [`Countdown::start`]
    pub duration: f32,
    #[serde(skip)]
    remaining: f32,
    #[serde(skip)]
    running: bool,
}

impl Countdown {
    /// Create an idle countdown with the given duration
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            remaining: 0.0,
            running: false,
        }
    }

    /// (Re)start from the configured duration
    pub fn start(&mut self) {
        self.start_with(self.duration);
    }

    /// (Re)start from an explicit duration
    pub fn start_with(&mut self, duration: f32) {
        self.remaining = duration.max(0.0);
        self.running = true;
    }

    /// Stop without finishing
    pub fn cancel(&mut self) {
        self.running = false;
        self.remaining = 0.0;
    }

    /// Decrement by `delta`. Returns true exactly on the tick the countdown
    /// reaches zero.
    pub fn tick(&mut self, delta: f32) -> bool {
        if !self.running {
            return false;
        }
        self.remaining -= delta;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.running = false;
            return true;
        }
        false
    }

    /// Whether the countdown is in progress
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Seconds left (zero when idle)
    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_advance() {
        let mut clock = Clock::new();
        clock.advance(0.5);
        let time = clock.advance(0.25);

        assert_eq!(time.now, 0.75);
        assert_eq!(time.delta, 0.25);
        assert_eq!(clock.frame(), 2);

        let time = clock.advance(-1.0);
        assert_eq!(time.now, 0.75);
        assert_eq!(time.delta, 0.0);
    }

    #[test]
    fn test_countdown_fires_once() {
        let mut countdown = Countdown::new(1.0);
        assert!(!countdown.tick(1.0)); // Not started

        countdown.start();
        assert!(countdown.is_running());
        assert!(!countdown.tick(0.4));
        assert!(!countdown.tick(0.4));
        assert!(countdown.tick(0.4));
        assert!(!countdown.is_running());
        assert!(!countdown.tick(0.4));
    }

    #[test]
    fn test_countdown_cancel() {
        let mut countdown = Countdown::new(2.0);
        countdown.start();
        countdown.cancel();
        assert!(!countdown.tick(5.0));
        assert_eq!(countdown.remaining(), 0.0);
    }

    #[test]
    fn test_zero_duration_finishes_next_tick() {
        let mut countdown = Countdown::new(0.0);
        countdown.start();
        assert!(countdown.tick(0.0));
    }
}
