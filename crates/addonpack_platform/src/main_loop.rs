//! Frame pacing and the top-level run loop.

use tracing::debug;

use crate::clock::Clock;
use crate::device::Device;
use crate::paint::FramePaint;

pub const MAX_FRAMES_PER_SECOND: u64 = 120;

/// Holds frames to a fixed rate by sleeping out the remainder of each
/// frame budget.
///
/// The sleep is done coarsely in whole milliseconds, then the last
/// sub-millisecond stretch is spun with zero-length sleeps so the tick
/// lands on the boundary without busy-burning a full core.
#[derive(Debug)]
pub struct FramePacer {
    ticks_per_frame: u64,
    base_us: u64,
    current_ticks: u64,
}

impl FramePacer {
    pub fn new(clock: &dyn Clock) -> Self {
        Self::with_rate(clock, MAX_FRAMES_PER_SECOND)
    }

    pub fn with_rate(clock: &dyn Clock, frames_per_second: u64) -> Self {
        Self {
            ticks_per_frame: 1_000_000 / frames_per_second.max(1),
            base_us: clock.now_us(),
            current_ticks: 0,
        }
    }

    /// Waits out the rest of the current frame budget, then advances the
    /// frame mark. Returns the elapsed time since the previous mark in
    /// seconds; a frame that overran its budget returns its true, longer
    /// duration.
    pub fn tick(&mut self, clock: &dyn Clock) -> f32 {
        let deadline = self.current_ticks + self.ticks_per_frame;
        let ticks = clock.now_us() - self.base_us;

        if ticks > self.current_ticks && ticks < deadline {
            let sleep_ms = (deadline - ticks) / 1000;
            if sleep_ms > 0 {
                clock.sleep_ms(sleep_ms);
            }
            while clock.now_us() - self.base_us < deadline {
                clock.sleep_ms(0);
            }
        }

        let previous = self.current_ticks;
        self.current_ticks = clock.now_us() - self.base_us;
        (self.current_ticks - previous) as f32 / 1_000_000.0
    }
}

/// What the per-frame callback wants the loop to do next.
pub enum FrameControl {
    /// Present this frame and keep going.
    Render(FramePaint),
    /// Stop the loop.
    Exit,
}

/// Drives a device: drain events, pace, update, present, until the device
/// closes or the callback exits.
pub struct MainLoop<C: Clock> {
    clock: C,
    pacer: FramePacer,
}

impl<C: Clock> MainLoop<C> {
    pub fn new(clock: C) -> Self {
        let pacer = FramePacer::new(&clock);
        Self { clock, pacer }
    }

    pub fn run<F>(&mut self, device: &mut dyn Device, mut frame: F)
    where
        F: FnMut(&mut dyn Device, f32) -> FrameControl,
    {
        loop {
            if !device.process_events() {
                debug!("device closed, leaving main loop");
                break;
            }

            let dt = self.pacer.tick(&self.clock);

            match frame(device, dt) {
                FrameControl::Render(paint) => device.present(&paint),
                FrameControl::Exit => {
                    device.request_close();
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Deterministic clock: sleeps advance time, and the zero-length yield
    /// used for spinning advances it by a fixed slice.
    struct FakeClock {
        now_us: Cell<u64>,
    }

    impl FakeClock {
        fn new() -> Self {
            Self { now_us: Cell::new(0) }
        }

        fn advance_us(&self, us: u64) {
            self.now_us.set(self.now_us.get() + us);
        }
    }

    impl Clock for FakeClock {
        fn now_us(&self) -> u64 {
            self.now_us.get()
        }

        fn sleep_ms(&self, ms: u64) {
            let us = if ms == 0 { 100 } else { ms * 1000 };
            self.advance_us(us);
        }
    }

    #[test]
    fn average_interval_settles_on_the_frame_budget() {
        let clock = FakeClock::new();
        let mut pacer = FramePacer::new(&clock);
        let frames = 240;
        let mut total = 0.0f32;
        for _ in 0..frames {
            // Simulate a cheap update well under budget.
            clock.advance_us(2_000);
            total += pacer.tick(&clock);
        }
        let average_us = total / frames as f32 * 1_000_000.0;
        let budget_us = 1_000_000.0 / MAX_FRAMES_PER_SECOND as f32;
        assert!(
            (average_us - budget_us).abs() < 200.0,
            "average interval {average_us}us, budget {budget_us}us"
        );
    }

    #[test]
    fn overlong_frame_reports_its_true_duration() {
        let clock = FakeClock::new();
        let mut pacer = FramePacer::new(&clock);
        clock.advance_us(50_000);
        let dt = pacer.tick(&clock);
        assert!((dt - 0.05).abs() < 0.001);
    }

    #[test]
    fn cheap_frames_are_stretched_not_shrunk() {
        let clock = FakeClock::new();
        let mut pacer = FramePacer::with_rate(&clock, 100);
        clock.advance_us(1_000);
        let dt = pacer.tick(&clock);
        assert!(dt >= 0.01, "frame interval {dt}s shorter than the budget");
    }
}
