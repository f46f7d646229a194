//! Contract for the display/input collaborator.
//!
//! The controller pushes every observable change through a `DisplaySink`;
//! the sink never calls back into the controller.

use crate::event_log::LogEntry;
use crate::link::ConnectionMode;
use crate::state::PowerState;

pub trait DisplaySink {
    /// Called once, when the controller is built.
    fn on_mode_determined(&mut self, mode: ConnectionMode);
    /// Called after every transition, and once with the initial state.
    fn on_state_changed(&mut self, state: PowerState);
    fn on_log_appended(&mut self, entry: &LogEntry);
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDisplay;

impl DisplaySink for NullDisplay {
    fn on_mode_determined(&mut self, _mode: ConnectionMode) {}
    fn on_state_changed(&mut self, _state: PowerState) {}
    fn on_log_appended(&mut self, _entry: &LogEntry) {}
}

impl<D: DisplaySink + ?Sized> DisplaySink for Box<D> {
    fn on_mode_determined(&mut self, mode: ConnectionMode) {
        (**self).on_mode_determined(mode);
    }
    fn on_state_changed(&mut self, state: PowerState) {
        (**self).on_state_changed(state);
    }
    fn on_log_appended(&mut self, entry: &LogEntry) {
        (**self).on_log_appended(entry);
    }
}
