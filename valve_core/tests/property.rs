use proptest::prelude::*;
use valve_core::controller::{MSG_ESTOP, MSG_START, MSG_STOP};
use valve_core::{DeviceLink, PowerController, PowerState};
use valve_hardware::SimulatedActuator;
use valve_traits::ManualClock;

/// One operator action, including the answer to a stop prompt.
#[derive(Debug, Clone, Copy)]
enum Op {
    Start,
    Stop { confirm: bool },
    EmergencyStop,
    /// Stop requested, then E-stop pressed while the prompt is open,
    /// then the stale prompt answered.
    StopInterruptedByEstop { confirm: bool },
    Unplug,
    Replug,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Start),
        3 => any::<bool>().prop_map(|confirm| Op::Stop { confirm }),
        2 => Just(Op::EmergencyStop),
        1 => any::<bool>().prop_map(|confirm| Op::StopInterruptedByEstop { confirm }),
        1 => Just(Op::Unplug),
        1 => Just(Op::Replug),
    ]
}

proptest! {
    #[test]
    fn state_tracks_last_state_changing_intent(ops in prop::collection::vec(op_strategy(), 0..64)) {
        let act = SimulatedActuator::new();
        let tap = act.tap();
        let mut ctl = PowerController::new(
            DeviceLink::hardware(act),
            valve_core::NullDisplay,
            ManualClock::default(),
        );

        // Expected state from the most recent Start / confirmed Stop / E-stop.
        let mut expected = PowerState::Closed;
        let mut transitions = 0usize;
        let mut failed_writes = 0usize;
        let mut last_sent: Option<bool> = None;
        let mut unplugged = false;

        for op in ops {
            let before_writes = tap.write_count();
            let before_log = ctl.log().len();
            match op {
                Op::Start => {
                    let t = ctl.start();
                    expected = PowerState::Open;
                    transitions += 1;
                    prop_assert_eq!(t.state, PowerState::Open);
                    prop_assert_eq!(t.send.error.is_some(), unplugged);
                }
                Op::Stop { confirm } => {
                    let t = ctl.stop(|| confirm);
                    if confirm {
                        expected = PowerState::Closed;
                        transitions += 1;
                        prop_assert!(t.is_some());
                    } else {
                        prop_assert!(t.is_none());
                        prop_assert_eq!(tap.write_count(), before_writes);
                        prop_assert_eq!(ctl.log().len(), before_log);
                    }
                }
                Op::EmergencyStop => {
                    ctl.emergency_stop();
                    expected = PowerState::Closed;
                    transitions += 1;
                }
                Op::StopInterruptedByEstop { confirm } => {
                    let token = ctl.request_stop();
                    ctl.emergency_stop();
                    expected = PowerState::Closed;
                    transitions += 1;
                    prop_assert!(ctl.confirm_stop(token, confirm).is_err());
                }
                Op::Unplug => {
                    tap.unplug();
                    unplugged = true;
                }
                Op::Replug => {
                    tap.replug();
                    unplugged = false;
                }
            }
            let changed = ctl.log().len() - before_log;
            if changed > 0 {
                if unplugged {
                    failed_writes += 1;
                } else {
                    last_sent = Some(expected.signal());
                }
            }
            prop_assert_eq!(ctl.state(), expected);
            prop_assert!(!ctl.has_pending_stop());
        }

        // One transition entry per transition, plus the startup entry and any
        // Comm Error entries from failed writes.
        let transition_entries = ctl
            .log()
            .iter()
            .filter(|e| [MSG_START, MSG_STOP, MSG_ESTOP].contains(&e.message.as_str()))
            .count();
        prop_assert_eq!(transition_entries, transitions);
        let comm_errors = ctl
            .log()
            .iter()
            .filter(|e| e.message.starts_with("Comm Error"))
            .count();
        prop_assert_eq!(comm_errors, failed_writes);
        prop_assert_eq!(ctl.log().len(), 1 + transitions + comm_errors);

        // One byte per delivered transition; the last byte on the wire is the
        // signal of the last transition that was delivered.
        let signals = tap.signals();
        prop_assert_eq!(signals.len(), transitions - failed_writes);
        prop_assert_eq!(signals.last().copied(), last_sent);
    }
}
