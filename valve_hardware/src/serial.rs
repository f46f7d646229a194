use std::io::Write;
use std::time::Duration;

use tracing::{debug, trace};

use crate::error::{HwError, Result};
use crate::wire;

/// Actuator driven over a serial port (USB CDC, FTDI, on-board UART).
pub struct SerialActuator {
    port: Option<Box<dyn serialport::SerialPort>>,
    name: String,
}

impl SerialActuator {
    /// Open `path` once at `baud`. `timeout` bounds each write.
    pub fn open(path: &str, baud: u32, timeout: Duration) -> Result<Self> {
        let port = serialport::new(path, baud)
            .timeout(timeout)
            .open()
            .map_err(|e| HwError::Open {
                port: path.to_string(),
                reason: e.to_string(),
            })?;
        debug!(
            port = path,
            baud,
            timeout_ms = timeout.as_millis() as u64,
            "serial port opened"
        );
        Ok(Self {
            port: Some(port),
            name: path.to_string(),
        })
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        let port = self.port.as_mut().ok_or(HwError::NotOpen)?;
        port
            .write_all(&[byte])
            .map_err(|e| HwError::Write(e.to_string()))?;
        port.flush().map_err(|e| HwError::Write(e.to_string()))?;
        trace!(port = %self.name, byte, "serial byte written");
        Ok(())
    }
}

impl valve_traits::Actuator for SerialActuator {
    fn write_signal(
        &mut self,
        on: bool,
    ) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.write_byte(wire::encode(on))?;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn close(&mut self) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if let Some(mut port) = self.port.take() {
            // Dropping the handle closes the descriptor.
            port.flush().map_err(HwError::Io)?;
            debug!(port = %self.name, "serial port closed");
        }
        Ok(())
    }
}

impl Drop for SerialActuator {
    fn drop(&mut self) {
        if let Some(mut port) = self.port.take() {
            let _ = port.flush();
        }
    }
}
