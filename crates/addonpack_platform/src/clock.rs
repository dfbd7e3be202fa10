//! Monotonic time source behind the frame pacer and input timestamps.

use std::time::{Duration, Instant};

/// Time source abstraction so pacing logic can run against a fake clock in
/// tests.
pub trait Clock {
    /// Microseconds since an arbitrary fixed origin. Never decreases.
    fn now_us(&self) -> u64;

    /// Coarse sleep. `sleep_ms(0)` yields the CPU without a fixed duration.
    fn sleep_ms(&self, ms: u64);
}

/// Wall clock backed by [`Instant`], with the origin fixed at construction.
#[derive(Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_us(&self) -> u64 {
        self.origin.elapsed().as_micros() as u64
    }

    fn sleep_ms(&self, ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_never_decreases() {
        let clock = MonotonicClock::new();
        let mut previous = clock.now_us();
        for _ in 0..1000 {
            let now = clock.now_us();
            assert!(now >= previous);
            previous = now;
        }
    }
}
