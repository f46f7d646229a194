pub mod clock;

pub use clock::{ManualClock, SystemClock, WallClock};

/// A binary output line driven by the controller (valve, relay, solenoid).
///
/// Implementations are fire-and-forget: `write_signal` returning `Ok` means the
/// command left the host, not that the device acted on it.
pub trait Actuator {
    fn write_signal(
        &mut self,
        on: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Whether the underlying handle is still usable.
    fn is_open(&self) -> bool {
        true
    }

    /// Release the underlying handle. Further writes are undefined by the trait;
    /// callers must stop using the actuator after `close`.
    fn close(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }
}

impl<A: Actuator + ?Sized> Actuator for Box<A> {
    fn write_signal(
        &mut self,
        on: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).write_signal(on)
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).close()
    }
}
