//! Device link: the single owner of the actuator handle.
//!
//! The link makes exactly one connection attempt. Any failure leaves it in
//! [`ConnectionMode::Simulation`] for the rest of its life; there is no
//! reconnect. Sends are fire-and-forget: nothing is ever read back from the
//! device, so a delivered byte says nothing about the valve's real position.

use std::fmt;

use tracing::{debug, info, warn};
use valve_traits::Actuator;

use crate::config::LinkCfg;
use crate::error::LinkError;
use crate::hw_error::{map_connect_error, map_write_error};

/// Whether a physical device is attached. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    Hardware,
    Simulation,
}

impl fmt::Display for ConnectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConnectionMode::Hardware => "HARDWARE",
            ConnectionMode::Simulation => "SIMULATION",
        })
    }
}

/// Outcome of the startup connection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectResult {
    pub mode: ConnectionMode,
    /// Why the link fell back to simulation, if it did.
    pub error: Option<LinkError>,
}

/// Outcome of a single `send`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendResult {
    /// A byte left the host. Always false in simulation.
    pub delivered: bool,
    pub error: Option<LinkError>,
}

impl SendResult {
    fn delivered() -> Self {
        Self {
            delivered: true,
            error: None,
        }
    }

    fn skipped() -> Self {
        Self {
            delivered: false,
            error: None,
        }
    }

    fn failed(error: LinkError) -> Self {
        Self {
            delivered: false,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

pub struct DeviceLink {
    mode: ConnectionMode,
    handle: Option<Box<dyn Actuator>>,
}

impl fmt::Debug for DeviceLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceLink")
            .field("mode", &self.mode)
            .field("open", &self.is_open())
            .finish()
    }
}

impl DeviceLink {
    /// Make the one connection attempt using `open`, falling back to
    /// simulation on any error. Never fails.
    pub fn connect_with<A, E, F>(cfg: &LinkCfg, open: F) -> (Self, ConnectResult)
    where
        A: Actuator + 'static,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
        F: FnOnce(&LinkCfg) -> Result<A, E>,
    {
        match open(cfg) {
            Ok(actuator) if actuator.is_open() => {
                info!(port = %cfg.port, baud = cfg.baud, "connected to device");
                (
                    Self::hardware(actuator),
                    ConnectResult {
                        mode: ConnectionMode::Hardware,
                        error: None,
                    },
                )
            }
            Ok(_) => {
                warn!(port = %cfg.port, "device opened but reports closed; running in simulation");
                Self::fallback(LinkError::NotOpen)
            }
            Err(e) => {
                let boxed: Box<dyn std::error::Error + Send + Sync> = e.into();
                let err = map_connect_error(boxed.as_ref());
                warn!(port = %cfg.port, error = %err, "connection failed; running in simulation");
                Self::fallback(err)
            }
        }
    }

    fn fallback(error: LinkError) -> (Self, ConnectResult) {
        (
            Self::simulation(),
            ConnectResult {
                mode: ConnectionMode::Simulation,
                error: Some(error),
            },
        )
    }

    /// Link in hardware mode around an already-open actuator.
    pub fn hardware(actuator: impl Actuator + 'static) -> Self {
        Self {
            mode: ConnectionMode::Hardware,
            handle: Some(Box::new(actuator)),
        }
    }

    /// Link with no device; every send is a no-op.
    pub fn simulation() -> Self {
        Self {
            mode: ConnectionMode::Simulation,
            handle: None,
        }
    }

    pub fn mode(&self) -> ConnectionMode {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| h.is_open())
    }

    /// Write `'1'` (true) or `'0'` (false) if a device is attached and open.
    ///
    /// Write failures are returned, not raised; the caller decides how to
    /// report them. No retry is attempted.
    pub fn send(&mut self, signal: bool) -> SendResult {
        let Some(handle) = self.handle.as_mut().filter(|h| h.is_open()) else {
            debug!(signal, mode = %self.mode, "send skipped (no open device)");
            return SendResult::skipped();
        };
        match handle.write_signal(signal) {
            Ok(()) => {
                debug!(signal, "signal sent");
                SendResult::delivered()
            }
            Err(e) => {
                let err = map_write_error(e.as_ref());
                warn!(signal, error = %err, "signal write failed");
                SendResult::failed(err)
            }
        }
    }

    /// Release the device handle. Idempotent; the mode is left unchanged.
    pub fn close(&mut self) -> Result<(), LinkError> {
        let Some(mut handle) = self.handle.take() else {
            return Ok(());
        };
        let res = handle.close().map_err(|e| map_write_error(e.as_ref()));
        info!(mode = %self.mode, "device link released");
        res
    }
}

impl Drop for DeviceLink {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(error = %e, "error while releasing device link");
        }
    }
}
