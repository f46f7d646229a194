use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveTime, TimeDelta};

/// Wall-clock source for operator-facing timestamps.
///
/// - now(): local time of day, used for `[HH:MM:SS]` log stamps
/// - hms(): helper rendering `now()` in that format
pub trait WallClock {
    fn now(&self) -> NaiveTime;

    fn hms(&self) -> String {
        self.now().format("%H:%M:%S").to_string()
    }
}

/// Default clock backed by the host's local time zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl WallClock for SystemClock {
    #[inline]
    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// Deterministic clock whose time is set by hand.
///
/// Clones share the same time, so a test can keep a handle while the
/// controller owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    at: Arc<Mutex<NaiveTime>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(NaiveTime::MIN)
    }
}

impl ManualClock {
    pub fn new(at: NaiveTime) -> Self {
        Self {
            at: Arc::new(Mutex::new(at)),
        }
    }

    /// Start at the given hour/minute/second; out-of-range values fall back to midnight.
    pub fn at_hms(h: u32, m: u32, s: u32) -> Self {
        Self::new(NaiveTime::from_hms_opt(h, m, s).unwrap_or(NaiveTime::MIN))
    }

    /// Move the clock forward, wrapping past midnight.
    pub fn advance(&self, d: TimeDelta) {
        if let Ok(mut at) = self.at.lock() {
            let (next, _wrapped) = at.overflowing_add_signed(d);
            *at = next;
        }
    }

    pub fn set(&self, t: NaiveTime) {
        if let Ok(mut at) = self.at.lock() {
            *at = t;
        }
    }
}

impl WallClock for ManualClock {
    fn now(&self) -> NaiveTime {
        self.at.lock().map(|g| *g).unwrap_or(NaiveTime::MIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_formats_hms() {
        let clock = ManualClock::at_hms(9, 5, 7);
        assert_eq!(clock.hms(), "09:05:07");
    }

    #[test]
    fn manual_clock_wraps_past_midnight() {
        let clock = ManualClock::at_hms(23, 59, 59);
        clock.advance(TimeDelta::seconds(2));
        assert_eq!(clock.hms(), "00:00:01");
    }

    #[test]
    fn clones_share_time() {
        let clock = ManualClock::default();
        let other = clock.clone();
        other.advance(TimeDelta::minutes(90));
        assert_eq!(clock.hms(), "01:30:00");
    }

    #[test]
    fn system_clock_renders_eight_chars() {
        assert_eq!(SystemClock::new().hms().len(), 8);
    }
}
