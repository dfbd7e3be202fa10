//! Click and double-click synthesis from raw press/release pairs.

use crate::event::{MouseAction, MouseButton, MouseEvent};

/// Two events on the same button within this window count as one gesture.
const DOUBLE_CLICK_WINDOW_US: u64 = 500_000;
/// Pointer travel allowed between the events of a gesture, in pixels.
const MAX_CLICK_TRAVEL: i32 = 3;

/// Tracks recent button activity and recognizes click / double-click
/// gestures. Time is injected by the caller so the detector stays testable.
///
/// Only press and release actions participate. Anything else passes through
/// untouched: it produces no gesture and leaves the bookkeeping alone, so a
/// pointer drag between press and release does not break the streak.
#[derive(Debug, Default)]
pub struct ClickDetector {
    count: u8,
    last_button: Option<MouseButton>,
    last_x: i32,
    last_y: i32,
    last_time_us: u64,
}

impl ClickDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one press or release and returns the gesture it completes,
    /// if any. `now_us` must come from the same monotonic clock across calls.
    pub fn classify(&mut self, event: &MouseEvent, now_us: u64) -> Option<MouseAction> {
        let (button, pressed) = match event.action {
            MouseAction::Pressed(b) => (b, true),
            MouseAction::Released(b) => (b, false),
            _ => return None,
        };

        let mut gesture = None;

        if now_us.wrapping_sub(self.last_time_us) < DOUBLE_CLICK_WINDOW_US
            && (self.last_x - event.x).abs() <= MAX_CLICK_TRAVEL
            && (self.last_y - event.y).abs() <= MAX_CLICK_TRAVEL
            && self.last_button == Some(button)
            && self.count < 2
        {
            if !pressed && self.count == 0 {
                self.count += 1;
                gesture = Some(MouseAction::Click(button));
            } else if pressed && self.count == 1 {
                self.count += 1;
                gesture = Some(MouseAction::DoubleClick(button));
            }
        } else {
            self.count = 0;
        }

        self.last_button = Some(button);
        self.last_time_us = now_us;
        self.last_x = event.x;
        self.last_y = event.y;

        gesture
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ButtonStates;

    fn mouse(action: MouseAction, x: i32, y: i32) -> MouseEvent {
        MouseEvent {
            action,
            x,
            y,
            wheel: 0.0,
            shift: false,
            control: false,
            buttons: ButtonStates::default(),
        }
    }

    fn press(b: MouseButton, x: i32, y: i32) -> MouseEvent {
        mouse(MouseAction::Pressed(b), x, y)
    }

    fn release(b: MouseButton, x: i32, y: i32) -> MouseEvent {
        mouse(MouseAction::Released(b), x, y)
    }

    #[test]
    fn press_release_press_release_gives_click_double_click() {
        let mut d = ClickDetector::new();
        let b = MouseButton::Left;
        assert_eq!(d.classify(&press(b, 10, 10), 1_000), None);
        assert_eq!(
            d.classify(&release(b, 10, 10), 50_000),
            Some(MouseAction::Click(b))
        );
        assert_eq!(
            d.classify(&press(b, 11, 10), 100_000),
            Some(MouseAction::DoubleClick(b))
        );
        // Streak saturates: the closing release is not a third gesture.
        assert_eq!(d.classify(&release(b, 11, 10), 150_000), None);
    }

    #[test]
    fn slow_release_is_not_a_click() {
        let mut d = ClickDetector::new();
        let b = MouseButton::Left;
        assert_eq!(d.classify(&press(b, 10, 10), 0), None);
        assert_eq!(d.classify(&release(b, 10, 10), 600_000), None);
    }

    #[test]
    fn travel_beyond_tolerance_breaks_the_gesture() {
        let mut d = ClickDetector::new();
        let b = MouseButton::Left;
        assert_eq!(d.classify(&press(b, 10, 10), 0), None);
        assert_eq!(d.classify(&release(b, 14, 10), 10_000), None);
    }

    #[test]
    fn button_change_breaks_the_gesture() {
        let mut d = ClickDetector::new();
        assert_eq!(d.classify(&press(MouseButton::Left, 5, 5), 0), None);
        assert_eq!(d.classify(&release(MouseButton::Right, 5, 5), 1_000), None);
    }

    #[test]
    fn motion_between_press_and_release_leaves_bookkeeping_alone() {
        let mut d = ClickDetector::new();
        let b = MouseButton::Left;
        assert_eq!(d.classify(&press(b, 10, 10), 0), None);
        // A far-away move is ignored entirely.
        assert_eq!(d.classify(&mouse(MouseAction::Moved, 500, 500), 5_000), None);
        assert_eq!(
            d.classify(&release(b, 10, 10), 10_000),
            Some(MouseAction::Click(b))
        );
    }

    #[test]
    fn new_gesture_starts_after_reset() {
        let mut d = ClickDetector::new();
        let b = MouseButton::Middle;
        assert_eq!(d.classify(&press(b, 0, 0), 0), None);
        assert_eq!(d.classify(&release(b, 0, 0), 1_000), Some(MouseAction::Click(b)));
        assert_eq!(
            d.classify(&press(b, 0, 0), 2_000),
            Some(MouseAction::DoubleClick(b))
        );
        assert_eq!(d.classify(&release(b, 0, 0), 3_000), None);
        // After saturation the next press resets the streak and a fresh
        // click/double-click cycle can begin.
        assert_eq!(d.classify(&press(b, 0, 0), 4_000), None);
        assert_eq!(d.classify(&release(b, 0, 0), 5_000), Some(MouseAction::Click(b)));
    }
}
