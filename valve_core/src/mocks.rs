//! Test and helper mocks for valve_core

use std::cell::RefCell;
use std::rc::Rc;

use crate::display::DisplaySink;
use crate::event_log::LogEntry;
use crate::link::ConnectionMode;
use crate::state::PowerState;

/// One notification observed by a [`RecordingDisplay`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEvent {
    Mode(ConnectionMode),
    State(PowerState),
    Log(String),
}

/// Display sink that records notifications into a shared buffer.
#[derive(Debug, Default, Clone)]
pub struct RecordingDisplay {
    events: Rc<RefCell<Vec<DisplayEvent>>>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DisplayEvent> {
        self.events.borrow().clone()
    }

    /// States reported so far, oldest first.
    pub fn states(&self) -> Vec<PowerState> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                DisplayEvent::State(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    /// Rendered log lines reported so far.
    pub fn log_lines(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                DisplayEvent::Log(l) => Some(l.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl DisplaySink for RecordingDisplay {
    fn on_mode_determined(&mut self, mode: ConnectionMode) {
        self.events.borrow_mut().push(DisplayEvent::Mode(mode));
    }
    fn on_state_changed(&mut self, state: PowerState) {
        self.events.borrow_mut().push(DisplayEvent::State(state));
    }
    fn on_log_appended(&mut self, entry: &LogEntry) {
        self.events
            .borrow_mut()
            .push(DisplayEvent::Log(entry.to_string()));
    }
}
