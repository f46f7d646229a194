//! CLI argument definitions and shared statics.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

pub const DEFAULT_CONFIG: &str = "etc/valve_config.toml";

#[derive(Parser, Debug)]
#[command(name = "valve", version, about = "Solenoid valve controller")]
pub struct Cli {
    /// Path to config TOML. A missing file at the default path means built-in defaults.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Log as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); RUST_LOG takes precedence
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

/// Serial overrides shared by commands that open the device.
#[derive(Args, Debug, Clone, Default)]
pub struct SerialArgs {
    /// Serial device path or identifier (overrides serial.port)
    #[arg(long, value_name = "PORT")]
    pub port: Option<String>,
    /// Baud rate (overrides serial.baud)
    #[arg(long, value_name = "BAUD")]
    pub baud: Option<u32>,
    /// Open/write timeout in seconds (overrides serial.timeout_s)
    #[arg(long = "timeout-s", value_name = "SECONDS")]
    pub timeout_s: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive operator console (start / stop / estop)
    Run {
        #[command(flatten)]
        serial: SerialArgs,
        /// Skip the connection attempt and run in simulation mode
        #[arg(long, action = ArgAction::SetTrue)]
        simulate: bool,
    },
    /// Try the serial connection once and report the resulting mode
    SelfCheck {
        #[command(flatten)]
        serial: SerialArgs,
    },
    /// List serial ports visible to the OS
    Ports,
}
