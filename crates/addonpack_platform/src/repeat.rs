//! Auto-repeat collapsing for keyboards that report repeats as
//! release/press pairs.
//!
//! Hardware auto-repeat shows up as a release immediately followed by a
//! press of the same key. The filter holds every release back until the
//! next event arrives: if that event is a matching press close enough in
//! time, both are dropped; otherwise the release is delivered first, in
//! order. A pump cycle must call [`KeyRepeatFilter::flush`] when its native
//! queue runs dry so a genuine final release is not held across frames.

use crate::event::KeyEvent;

/// A release/press pair on the same code closer than this is auto-repeat.
const REPEAT_COLLAPSE_WINDOW_US: u64 = 2_000;

/// A translated key event still carrying the native code and timestamp the
/// collapse decision needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingKey {
    pub code: u32,
    pub time_us: u64,
    pub event: KeyEvent,
}

#[derive(Debug, Default)]
pub struct KeyRepeatFilter {
    held_release: Option<PendingKey>,
}

impl KeyRepeatFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one translated key event. Returns the events now ready for
    /// dispatch, oldest first; an auto-repeat pair returns nothing.
    pub fn push(&mut self, key: PendingKey) -> Vec<KeyEvent> {
        if key.event.pressed {
            if let Some(release) = self.held_release.take() {
                if release.code == key.code
                    && key.time_us.saturating_sub(release.time_us) < REPEAT_COLLAPSE_WINDOW_US
                {
                    return Vec::new();
                }
                return vec![release.event, key.event];
            }
            vec![key.event]
        } else {
            let mut ready = Vec::new();
            if let Some(previous) = self.held_release.take() {
                ready.push(previous.event);
            }
            self.held_release = Some(key);
            ready
        }
    }

    /// Delivers a held release once the native queue is empty.
    pub fn flush(&mut self) -> Option<KeyEvent> {
        self.held_release.take().map(|k| k.event)
    }
}
