use std::time::Duration;

use rstest::rstest;
use valve_hardware::SerialActuator;
use valve_hardware::error::HwError;

// Opening a path that cannot be a serial device must fail with a typed error,
// never panic. This holds with and without the `hardware` feature.
#[rstest]
#[case("/nonexistent/valve-port")]
#[case("")]
fn open_of_missing_port_is_an_error(#[case] path: &str) {
    match SerialActuator::open(path, 9600, Duration::from_millis(50)) {
        Ok(_) => panic!("opening {path:?} should fail"),
        Err(HwError::Open { .. }) | Err(HwError::Unsupported(_)) => {}
        Err(other) => panic!("unexpected error kind: {other}"),
    }
}

#[test]
fn list_ports_does_not_panic() {
    // The result depends on the host; only the call contract is checked.
    let _ = valve_hardware::list_ports();
}
