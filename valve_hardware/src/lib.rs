pub mod error;
#[cfg(feature = "hardware")]
pub mod serial;
pub mod wire;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use valve_traits::Actuator;

use crate::error::HwError;

#[cfg(feature = "hardware")]
pub use serial::SerialActuator;

/// Stand-in used when the crate is built without serial support. Opening
/// always fails, which sends the link into simulation mode.
#[cfg(not(feature = "hardware"))]
pub struct SerialActuator {
    _priv: (),
}

#[cfg(not(feature = "hardware"))]
impl SerialActuator {
    pub fn open(
        _path: &str,
        _baud: u32,
        _timeout: std::time::Duration,
    ) -> error::Result<Self> {
        Err(HwError::Unsupported(
            "serial support not compiled in (enable the `hardware` feature)",
        ))
    }
}

#[cfg(not(feature = "hardware"))]
impl Actuator for SerialActuator {
    fn write_signal(
        &mut self,
        _on: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Err(Box::new(HwError::NotOpen))
    }
}

/// A serial port visible to the operating system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    pub name: String,
    pub kind: String,
}

/// Enumerate serial ports. Without serial support the list is empty.
pub fn list_ports() -> error::Result<Vec<PortInfo>> {
    #[cfg(feature = "hardware")]
    {
        let ports = serialport::available_ports().map_err(|e| HwError::Open {
            port: "<enumerate>".to_string(),
            reason: e.to_string(),
        })?;
        Ok(ports
            .into_iter()
            .map(|p| {
                let kind = match p.port_type {
                    serialport::SerialPortType::UsbPort(info) => {
                        let mut parts = vec![format!("USB {:04x}:{:04x}", info.vid, info.pid)];
                        if let Some(m) = info.manufacturer {
                            parts.push(m);
                        }
                        if let Some(prod) = info.product {
                            parts.push(prod);
                        }
                        parts.join(" ")
                    }
                    serialport::SerialPortType::BluetoothPort => "Bluetooth".to_string(),
                    serialport::SerialPortType::PciPort => "PCI".to_string(),
                    serialport::SerialPortType::Unknown => "unknown".to_string(),
                };
                PortInfo {
                    name: p.port_name,
                    kind,
                }
            })
            .collect())
    }
    #[cfg(not(feature = "hardware"))]
    {
        Ok(Vec::new())
    }
}

/// Simulated actuator that records every byte it would have put on the wire.
///
/// Clone the [`SignalTap`] before handing the actuator off to inspect writes
/// afterwards.
pub struct SimulatedActuator {
    tap: SignalTap,
}

/// Shared view of a [`SimulatedActuator`]'s wire activity and fault switches.
#[derive(Clone, Default)]
pub struct SignalTap {
    bytes: Rc<RefCell<Vec<u8>>>,
    fail_writes: Rc<Cell<bool>>,
    open: Rc<Cell<bool>>,
}

impl SignalTap {
    /// Raw bytes written so far, oldest first.
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.borrow().clone()
    }

    /// Decoded signals written so far.
    pub fn signals(&self) -> Vec<bool> {
        self.bytes
            .borrow()
            .iter()
            .filter_map(|b| wire::decode(*b))
            .collect()
    }

    pub fn write_count(&self) -> usize {
        self.bytes.borrow().len()
    }

    /// Make subsequent writes fail as if the cable were pulled.
    pub fn unplug(&self) {
        self.fail_writes.set(true);
    }

    pub fn replug(&self) {
        self.fail_writes.set(false);
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }
}

impl SimulatedActuator {
    pub fn new() -> Self {
        let tap = SignalTap::default();
        tap.open.set(true);
        Self { tap }
    }

    pub fn tap(&self) -> SignalTap {
        self.tap.clone()
    }
}

impl Default for SimulatedActuator {
    fn default() -> Self {
        Self::new()
    }
}

impl Actuator for SimulatedActuator {
    fn write_signal(
        &mut self,
        on: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if !self.tap.open.get() {
            return Err(Box::new(HwError::NotOpen));
        }
        if self.tap.fail_writes.get() {
            return Err(Box::new(HwError::Write(
                "device disconnected (simulated)".to_string(),
            )));
        }
        let byte = wire::encode(on);
        tracing::debug!(byte, "actuator write (simulated)");
        self.tap.bytes.borrow_mut().push(byte);
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.tap.open.get()
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.tap.open.set(false);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_actuator_records_wire_bytes() {
        let mut act = SimulatedActuator::new();
        let tap = act.tap();
        act.write_signal(true).unwrap();
        act.write_signal(false).unwrap();
        assert_eq!(tap.bytes(), vec![b'1', b'0']);
        assert_eq!(tap.signals(), vec![true, false]);
    }

    #[test]
    fn unplugged_actuator_fails_writes_without_recording() {
        let mut act = SimulatedActuator::new();
        let tap = act.tap();
        tap.unplug();
        let err = act.write_signal(true).expect_err("write should fail");
        assert!(err.to_string().contains("disconnected"));
        assert_eq!(tap.write_count(), 0);
    }

    #[test]
    fn closed_actuator_reports_not_open() {
        let mut act = SimulatedActuator::new();
        let tap = act.tap();
        act.close().unwrap();
        assert!(!act.is_open());
        assert!(!tap.is_open());
        assert!(act.write_signal(true).is_err());
    }

    #[cfg(not(feature = "hardware"))]
    #[test]
    fn serial_open_without_hardware_feature_is_unsupported() {
        let err = SerialActuator::open("/dev/ttyACM0", 9600, std::time::Duration::from_secs(1))
            .err()
            .expect("open must fail");
        assert!(matches!(err, HwError::Unsupported(_)));
    }
}
