//! Power controller: the OPEN/CLOSED state machine.
//!
//! Every transition does three things inside one call, in this order:
//! set the state, send the matching signal, append one log entry. The
//! display is notified of the new state and of each appended entry.
//!
//! A failed write does NOT roll the state back. The valve may therefore be
//! shown OPEN while the device never saw the byte; the `Comm Error` entry is
//! the only trace of that.

use tracing::{debug, info};
use valve_traits::{SystemClock, WallClock};

use crate::display::{DisplaySink, NullDisplay};
use crate::error::{BuildError, ControlError};
use crate::event_log::{EventLog, LogEntry};
use crate::link::{ConnectionMode, DeviceLink, SendResult};
use crate::state::{Affordances, Dispatch, Intent, PowerState};

pub const MSG_START: &str = "START - Solenoid Valve OPEN";
pub const MSG_STOP: &str = "STOPPED - Normal Shutdown";
pub const MSG_ESTOP: &str = "EMERGENCY STOP TRIGGERED";
pub const MSG_STARTED_HARDWARE: &str = "Started in HARDWARE MODE (Device Connected).";
pub const MSG_STARTED_SIMULATION: &str = "Started in SIMULATION MODE (No Hardware).";

/// Single-use handle for one pending stop confirmation.
///
/// Not `Clone` or `Copy`: confirming consumes it.
#[derive(Debug, PartialEq, Eq)]
pub struct StopToken(u64);

/// What a completed transition did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: PowerState,
    pub send: SendResult,
}

pub struct PowerController {
    state: PowerState,
    link: DeviceLink,
    log: EventLog,
    display: Box<dyn DisplaySink>,
    clock: Box<dyn WallClock>,
    next_token: u64,
    pending_stop: Option<u64>,
}

impl core::fmt::Debug for PowerController {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PowerController")
            .field("state", &self.state)
            .field("link", &self.link)
            .field("log_len", &self.log.len())
            .field("pending_stop", &self.pending_stop)
            .finish()
    }
}

impl PowerController {
    pub fn builder() -> PowerControllerBuilder {
        PowerControllerBuilder::default()
    }

    /// Take ownership of `link` and announce the mode, the initial CLOSED
    /// state and the startup entry to `display`.
    pub fn new(
        link: DeviceLink,
        display: impl DisplaySink + 'static,
        clock: impl WallClock + 'static,
    ) -> Self {
        Self::from_parts(link, Box::new(display), Box::new(clock))
    }

    fn from_parts(
        link: DeviceLink,
        display: Box<dyn DisplaySink>,
        clock: Box<dyn WallClock>,
    ) -> Self {
        let mut this = Self {
            state: PowerState::Closed,
            link,
            log: EventLog::new(),
            display,
            clock,
            next_token: 0,
            pending_stop: None,
        };
        let mode = this.link.mode();
        this.display.on_mode_determined(mode);
        this.display.on_state_changed(this.state);
        this.append(match mode {
            ConnectionMode::Hardware => MSG_STARTED_HARDWARE,
            ConnectionMode::Simulation => MSG_STARTED_SIMULATION,
        });
        info!(%mode, "power controller ready");
        this
    }

    pub fn state(&self) -> PowerState {
        self.state
    }

    pub fn mode(&self) -> ConnectionMode {
        self.link.mode()
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn affordances(&self) -> Affordances {
        self.state.affordances()
    }

    pub fn has_pending_stop(&self) -> bool {
        self.pending_stop.is_some()
    }

    /// Open the valve. Accepted from either state; from OPEN it re-sends the
    /// ON signal and logs again.
    pub fn start(&mut self) -> Transition {
        self.transition(PowerState::Open, MSG_START)
    }

    /// First phase of a normal stop. Any earlier token becomes stale.
    pub fn request_stop(&mut self) -> StopToken {
        self.next_token = self.next_token.wrapping_add(1);
        self.pending_stop = Some(self.next_token);
        debug!(token = self.next_token, "stop confirmation requested");
        StopToken(self.next_token)
    }

    /// Second phase of a normal stop.
    ///
    /// Declining is not an error: nothing changes and `Ok(None)` is returned.
    /// A token replaced by a newer request, or cancelled by an E-stop, yields
    /// [`ControlError::StaleToken`] and also changes nothing.
    pub fn confirm_stop(
        &mut self,
        token: StopToken,
        confirmed: bool,
    ) -> Result<Option<Transition>, ControlError> {
        if self.pending_stop != Some(token.0) {
            debug!(token = token.0, "stale stop confirmation ignored");
            return Err(ControlError::StaleToken);
        }
        self.pending_stop = None;
        if !confirmed {
            debug!("stop declined by operator");
            return Ok(None);
        }
        Ok(Some(self.force_stop(MSG_STOP)))
    }

    /// Both stop phases in one call; `confirm` is asked exactly once.
    pub fn stop(&mut self, confirm: impl FnOnce() -> bool) -> Option<Transition> {
        let token = self.request_stop();
        let yes = confirm();
        // The token was issued above under &mut self, so it cannot be stale.
        self.confirm_stop(token, yes).ok().flatten()
    }

    /// Close immediately, without confirmation. Cancels any pending stop.
    pub fn emergency_stop(&mut self) -> Transition {
        if let Some(token) = self.pending_stop.take() {
            debug!(token, "pending stop confirmation cancelled by E-stop");
        }
        self.force_stop(MSG_ESTOP)
    }

    pub fn dispatch(&mut self, intent: Intent) -> Dispatch {
        match intent {
            Intent::Start => Dispatch::Done(self.start().state),
            Intent::Stop => Dispatch::AwaitingConfirmation(self.request_stop()),
            Intent::EmergencyStop => Dispatch::Done(self.emergency_stop().state),
        }
    }

    /// Release the device link. The controller keeps answering intents
    /// afterwards, with sends degraded to no-ops.
    pub fn shutdown(&mut self) -> Result<(), crate::error::LinkError> {
        self.pending_stop = None;
        self.link.close()
    }

    fn force_stop(&mut self, message: &str) -> Transition {
        self.transition(PowerState::Closed, message)
    }

    fn transition(&mut self, target: PowerState, message: &str) -> Transition {
        self.state = target;
        let send = self.link.send(target.signal());
        if let Some(err) = &send.error {
            self.append(&format!("Comm Error: {err}"));
        }
        self.display.on_state_changed(target);
        self.append(message);
        info!(
            state = %target,
            mode = %self.link.mode(),
            delivered = send.delivered,
            "{message}"
        );
        Transition {
            state: target,
            send,
        }
    }

    fn append(&mut self, message: &str) {
        let entry: &LogEntry = self.log.push(self.clock.now(), message);
        self.display.on_log_appended(entry);
    }
}

/// Builder for `PowerController`. Only the link is required; the display
/// defaults to [`NullDisplay`] and the clock to [`SystemClock`].
#[derive(Default)]
pub struct PowerControllerBuilder {
    link: Option<DeviceLink>,
    display: Option<Box<dyn DisplaySink>>,
    clock: Option<Box<dyn WallClock>>,
}

impl PowerControllerBuilder {
    pub fn with_link(mut self, link: DeviceLink) -> Self {
        self.link = Some(link);
        self
    }

    pub fn with_display(mut self, display: impl DisplaySink + 'static) -> Self {
        self.display = Some(Box::new(display));
        self
    }

    pub fn with_clock(mut self, clock: impl WallClock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    pub fn build(self) -> Result<PowerController, BuildError> {
        let link = self.link.ok_or(BuildError::MissingLink)?;
        let display = self.display.unwrap_or_else(|| Box::new(NullDisplay));
        let clock = self.clock.unwrap_or_else(|| Box::new(SystemClock::new()));
        Ok(PowerController::from_parts(link, display, clock))
    }
}
