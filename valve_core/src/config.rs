//! Runtime configuration for the device link.
//!
//! Separate from the TOML schema in `valve_config`; see `conversions`.

use std::time::Duration;

/// Where and how to open the actuator's serial port.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkCfg {
    /// Device path or identifier (`/dev/ttyACM0`, `COM11`).
    pub port: String,
    pub baud: u32,
    /// Bound on opening the port and on each write.
    pub timeout: Duration,
}

impl Default for LinkCfg {
    fn default() -> Self {
        Self {
            port: valve_config::Serial::os_default_port().to_string(),
            baud: 9600,
            timeout: Duration::from_secs(1),
        }
    }
}
