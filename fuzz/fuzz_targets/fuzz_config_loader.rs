#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse or validation errors are fine; panics are not.
    if let Ok(cfg) = valve_config::load_toml(data) {
        if cfg.validate().is_ok() {
            assert!(cfg.serial.baud > 0);
            assert!(cfg.serial.timeout_s.is_finite() && cfg.serial.timeout_s > 0.0);
        }
    }
});
