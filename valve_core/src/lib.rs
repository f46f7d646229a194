#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core valve control logic (hardware-agnostic).
//!
//! All device interaction goes through `valve_traits::Actuator`; all operator
//! feedback goes through [`DisplaySink`].
//!
//! ## Architecture
//!
//! - **Link**: one connection attempt, Hardware or Simulation for life (`link`)
//! - **Controller**: OPEN/CLOSED state machine with confirmed stop and
//!   unconfirmed E-stop (`controller`)
//! - **Event log**: append-only `[HH:MM:SS] message` entries (`event_log`)
//! - **Display**: collaborator contract (`display`)
//!
//! Processing is single-writer: one intent runs to completion before the
//! next. Callers that gather intents from several threads must funnel them
//! through one queue owned by the thread holding the controller.

pub mod config;
pub mod controller;
pub mod conversions;
pub mod display;
pub mod error;
pub mod event_log;
pub mod hw_error;
pub mod link;
pub mod mocks;
pub mod state;

pub use config::LinkCfg;
pub use controller::{PowerController, PowerControllerBuilder, StopToken, Transition};
pub use display::{DisplaySink, NullDisplay};
pub use error::{BuildError, ControlError, LinkError};
pub use event_log::{EventLog, LogEntry};
pub use link::{ConnectResult, ConnectionMode, DeviceLink, SendResult};
pub use state::{Affordances, Dispatch, Intent, PowerState};
