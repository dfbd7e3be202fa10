//! Activity lifecycle bookkeeping for embedded targets.

use crate::event::AppCommand;

/// Condenses the OS activity callbacks into one question: may the app run
/// its frame loop right now?
///
/// A fresh gate answers no on all counts: not started, not focused, paused.
/// The process that hosts the activity can outlive the app entry point, so
/// the entry point must [`reset`](LifecycleGate::reset) the gate before
/// pumping events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleGate {
    started: bool,
    focused: bool,
    paused: bool,
}

impl Default for LifecycleGate {
    fn default() -> Self {
        Self {
            started: false,
            focused: false,
            paused: true,
        }
    }
}

impl LifecycleGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the gate to its initial not-started, not-focused, paused
    /// state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Folds one lifecycle command into the gate. Commands without a
    /// lifecycle meaning are ignored.
    pub fn apply(&mut self, command: AppCommand) {
        match command {
            AppCommand::InitWindow => self.started = true,
            AppCommand::TermWindow => self.started = false,
            AppCommand::GainedFocus => self.focused = true,
            AppCommand::LostFocus => self.focused = false,
            AppCommand::Resume => self.paused = false,
            AppCommand::Pause => self.paused = true,
            _ => {}
        }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// True only when started, focused and not paused.
    pub fn runnable(&self) -> bool {
        self.started && self.focused && !self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_gate_is_not_runnable() {
        let gate = LifecycleGate::new();
        assert!(!gate.is_started());
        assert!(!gate.is_focused());
        assert!(gate.is_paused());
        assert!(!gate.runnable());
    }

    #[test]
    fn runnable_needs_all_three_conditions() {
        let mut gate = LifecycleGate::new();
        gate.apply(AppCommand::InitWindow);
        gate.apply(AppCommand::Resume);
        assert!(!gate.runnable());
        gate.apply(AppCommand::GainedFocus);
        assert!(gate.runnable());

        gate.apply(AppCommand::Pause);
        assert!(!gate.runnable());
        gate.apply(AppCommand::Resume);
        assert!(gate.runnable());

        gate.apply(AppCommand::TermWindow);
        assert!(!gate.runnable());
    }

    #[test]
    fn non_lifecycle_commands_are_ignored() {
        let mut gate = LifecycleGate::new();
        gate.apply(AppCommand::InitWindow);
        gate.apply(AppCommand::GainedFocus);
        gate.apply(AppCommand::Resume);
        gate.apply(AppCommand::LowMemory);
        gate.apply(AppCommand::SaveState);
        gate.apply(AppCommand::ConfigChanged);
        assert!(gate.runnable());
    }

    #[test]
    fn reset_returns_to_initial_state() {
        let mut gate = LifecycleGate::new();
        gate.apply(AppCommand::InitWindow);
        gate.apply(AppCommand::GainedFocus);
        gate.apply(AppCommand::Resume);
        gate.reset();
        assert_eq!(gate, LifecycleGate::new());
    }
}
