//! Maps `Box<dyn Error>` from trait boundaries to typed `LinkError`.
//!
//! `valve_traits::Actuator` returns `Box<dyn Error + Send + Sync>`; this module
//! converts those to `LinkError`, with an optional feature-gated path for
//! `valve_hardware::HwError` downcasting.

use crate::error::LinkError;

/// Map an error raised while opening the device.
pub fn map_connect_error(e: &(dyn std::error::Error + 'static)) -> LinkError {
    #[cfg(feature = "hardware-errors")]
    {
        use valve_hardware::error::HwError;
        if let Some(hw) = e.downcast_ref::<HwError>() {
            return match hw {
                HwError::Unsupported(what) => LinkError::Unsupported((*what).to_string()),
                HwError::Open { port, reason } => LinkError::Connect(format!("{port}: {reason}")),
                other => LinkError::Connect(other.to_string()),
            };
        }
    }

    if looks_like_timeout(e) {
        LinkError::Timeout
    } else {
        LinkError::Connect(e.to_string())
    }
}

/// Map an error raised while writing a signal byte.
pub fn map_write_error(e: &(dyn std::error::Error + 'static)) -> LinkError {
    #[cfg(feature = "hardware-errors")]
    {
        use valve_hardware::error::HwError;
        if let Some(hw) = e.downcast_ref::<HwError>() {
            return match hw {
                HwError::NotOpen => LinkError::NotOpen,
                HwError::Write(msg) => LinkError::Write(msg.clone()),
                other => LinkError::Write(other.to_string()),
            };
        }
    }

    if looks_like_timeout(e) {
        LinkError::Timeout
    } else {
        LinkError::Write(e.to_string())
    }
}

fn looks_like_timeout(e: &(dyn std::error::Error + 'static)) -> bool {
    let s = e.to_string().to_lowercase();
    s.contains("timeout") || s.contains("timed out")
}
