use thiserror::Error;

/// Failures at the device boundary. None of these are fatal: connect failures
/// downgrade the link to simulation and write failures become log entries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("serial support unavailable: {0}")]
    Unsupported(String),
    #[error("timed out talking to device")]
    Timeout,
    #[error("write failed: {0}")]
    Write(String),
    #[error("device handle is not open")]
    NotOpen,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ControlError {
    /// The token was already used, or a newer stop request or an E-stop replaced it.
    #[error("stop confirmation is no longer pending")]
    StaleToken,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("missing device link")]
    MissingLink,
}
