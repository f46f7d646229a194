//! `From` implementations bridging `valve_config` types to `valve_core` types.

use std::time::Duration;

use crate::config::LinkCfg;

impl From<&valve_config::Serial> for LinkCfg {
    fn from(c: &valve_config::Serial) -> Self {
        // validate() rejects non-positive timeouts; fall back rather than panic
        // if an unvalidated value slips through.
        let timeout = Duration::try_from_secs_f64(c.timeout_s)
            .ok()
            .filter(|d| !d.is_zero())
            .unwrap_or(Duration::from_secs(1));
        Self {
            port: c.port.clone(),
            baud: c.baud,
            timeout,
        }
    }
}

impl From<&valve_config::Config> for LinkCfg {
    fn from(c: &valve_config::Config) -> Self {
        (&c.serial).into()
    }
}
