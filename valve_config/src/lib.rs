#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the valve controller.
//!
//! - `Config` and its sections are deserialized from TOML; every key is
//!   optional and falls back to the defaults below.
//! - `validate()` rejects values the serial layer or logger cannot use.
use serde::Deserialize;
use std::path::Path;

/// Serial link to the actuator's microcontroller.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Serial {
    /// Device path (`/dev/ttyACM0`) or identifier (`COM11`).
    pub port: String,
    pub baud: u32,
    /// Seconds allowed for opening the port and for each write.
    #[serde(alias = "timeout")]
    pub timeout_s: f64,
}

impl Serial {
    #[inline]
    pub fn os_default_port() -> &'static str {
        #[cfg(windows)]
        {
            return "COM11";
        }
        #[cfg(target_os = "macos")]
        {
            return "/dev/tty.usbmodem1101";
        }
        #[allow(unreachable_code)]
        "/dev/ttyACM0"
    }
}

impl Default for Serial {
    fn default() -> Self {
        Self {
            port: Self::os_default_port().to_string(),
            baud: 9600,
            timeout_s: 1.0,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Config {
    pub serial: Serial,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read and parse a config file, then validate it.
pub fn load_file(path: &Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {}: {}", path.display(), e))?;
    let cfg =
        load_toml(&text).map_err(|e| eyre::eyre!("parse config {}: {}", path.display(), e))?;
    cfg.validate()?;
    Ok(cfg)
}

const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
/// Whether `level` names one of the supported log levels (case-insensitive).
pub fn is_known_level(level: &str) -> bool {
    LEVELS.contains(&level.to_ascii_lowercase().as_str())
}

const ROTATIONS: [&str; 3] = ["never", "daily", "hourly"];

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Serial
        if self.serial.port.trim().is_empty() {
            eyre::bail!("serial.port must not be empty");
        }
        if self.serial.baud == 0 {
            eyre::bail!("serial.baud must be > 0");
        }
        if !self.serial.timeout_s.is_finite() || self.serial.timeout_s <= 0.0 {
            eyre::bail!("serial.timeout_s must be a positive number of seconds");
        }
        if self.serial.timeout_s > 60.0 {
            eyre::bail!("serial.timeout_s is unreasonably large (>60s)");
        }

        // Logging
        if let Some(level) = &self.logging.level
            && !is_known_level(level)
        {
            eyre::bail!("logging.level must be one of error|warn|info|debug|trace, got {level:?}");
        }
        if let Some(rotation) = &self.logging.rotation
            && !ROTATIONS.contains(&rotation.to_ascii_lowercase().as_str())
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got {rotation:?}");
        }
        if let Some(file) = &self.logging.file
            && file.trim().is_empty()
        {
            eyre::bail!("logging.file must not be empty when set");
        }

        Ok(())
    }
}
