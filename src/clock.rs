//! Fixed-timestep pacing for external simulation subsystems.
//!
//! Particle and fluid updates run at their own fixed rates regardless of the
//! render framerate. A `StepClock` converts elapsed wall time into a whole
//! number of pending simulation steps; the caller runs that many updates per
//! frame.

use std::time::{Duration, Instant};

/// Accumulates wall time into fixed simulation steps
pub struct StepClock {
    step: Duration,
    last: Option<Instant>,
}

impl StepClock {
    /// Create a clock ticking at `steps_per_second`
    pub fn new(steps_per_second: f64) -> Self {
        assert!(steps_per_second > 0.0, "step rate must be positive");
        Self {
            step: Duration::from_secs_f64(1.0 / steps_per_second),
            last: None,
        }
    }

    /// Number of whole steps elapsed since the previous call. The first call
    /// anchors the clock and returns 0.
    pub fn tick(&mut self) -> u32 {
        self.advance_to(Instant::now())
    }

    fn advance_to(&mut self, now: Instant) -> u32 {
        let mut last = match self.last {
            Some(t) => t,
            None => {
                self.last = Some(now);
                return 0;
            },
        };
        let mut count = 0;
        while last + self.step <= now {
            last += self.step;
            count += 1;
        }
        self.last = Some(last);
        count
    }
}
