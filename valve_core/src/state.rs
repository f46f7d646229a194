//! Power state, operator intents and the affordances derived from them.

use std::fmt;

use crate::controller::StopToken;

/// Logical position of the valve as last commanded.
///
/// This is what the controller asked for, not what the device reports; the
/// link has no read path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PowerState {
    Open,
    #[default]
    Closed,
}

impl PowerState {
    /// Wire signal for this state: true drives the actuator on.
    #[inline]
    pub fn signal(self) -> bool {
        matches!(self, PowerState::Open)
    }

    pub fn is_open(self) -> bool {
        self.signal()
    }

    pub fn affordances(self) -> Affordances {
        Affordances {
            start_enabled: !self.is_open(),
            stop_enabled: self.is_open(),
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PowerState::Open => "OPEN",
            PowerState::Closed => "CLOSED",
        })
    }
}

/// Which operator controls should be offered: Start only when CLOSED, Stop
/// only when OPEN. E-stop is always available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affordances {
    pub start_enabled: bool,
    pub stop_enabled: bool,
}

/// Operator intent delivered by the display/input side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Start,
    Stop,
    EmergencyStop,
}

/// Result of dispatching an [`Intent`].
#[derive(Debug)]
pub enum Dispatch {
    /// The intent ran to completion; carries the resulting state.
    Done(PowerState),
    /// A normal stop is waiting for the operator's yes/no.
    AwaitingConfirmation(StopToken),
}
