//! Line-oriented operator console: the terminal stand-in for the valve panel.
//!
//! Input lines and Ctrl-C arrive on one channel; only the thread running
//! [`run`] touches the controller.

use std::io::{self, BufRead, Write};

use crossbeam_channel::{Receiver, Sender};
use valve_core::{ConnectionMode, DisplaySink, LogEntry, PowerController, PowerState, StopToken};

pub const STOP_PROMPT: &str = "Stop power supply? [y/N] ";

/// Everything that can reach the console loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Line(String),
    Eof,
    Interrupt,
}

/// Why the console loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Quit,
    EndOfInput,
    Interrupted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    EmergencyStop,
    Status,
    Log,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse(line: &str) -> Command {
    let word = line.trim().to_ascii_lowercase();
    match word.as_str() {
        "" => Command::Empty,
        "start" | "s" | "open" => Command::Start,
        "stop" | "q" | "close" => Command::Stop,
        "estop" | "e-stop" | "e" | "!" | "esc" => Command::EmergencyStop,
        "status" => Command::Status,
        "log" => Command::Log,
        "help" | "?" | "h" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(line.trim().to_string()),
    }
}

fn is_yes(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

pub fn render_mode(mode: ConnectionMode) -> &'static str {
    match mode {
        ConnectionMode::Hardware => "MODE: HARDWARE CONTROL",
        ConnectionMode::Simulation => "MODE: SIMULATION",
    }
}

pub fn render_state(state: PowerState) -> String {
    let a = state.affordances();
    let onoff = |b: bool| if b { "enabled" } else { "disabled" };
    format!(
        "VALVE: {state}  (start {}, stop {}, estop enabled)",
        onoff(a.start_enabled),
        onoff(a.stop_enabled)
    )
}

/// Display sink that prints to stdout.
#[derive(Debug, Default)]
pub struct ConsoleDisplay;

impl DisplaySink for ConsoleDisplay {
    fn on_mode_determined(&mut self, mode: ConnectionMode) {
        println!("{}", render_mode(mode));
    }
    fn on_state_changed(&mut self, state: PowerState) {
        println!("{}", render_state(state));
    }
    fn on_log_appended(&mut self, entry: &LogEntry) {
        println!("{entry}");
    }
}

/// Forward stdin lines into `tx` until EOF, then send [`InputEvent::Eof`].
pub fn spawn_stdin_reader(tx: Sender<InputEvent>) -> io::Result<std::thread::JoinHandle<()>> {
    std::thread::Builder::new()
        .name("stdin".into())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(InputEvent::Line(line)).is_err() {
                    return;
                }
            }
            let _ = tx.send(InputEvent::Eof);
        })
}

fn help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "commands:")?;
    writeln!(out, "  start | s     open the valve")?;
    writeln!(out, "  stop  | q     close the valve (asks for confirmation)")?;
    writeln!(out, "  estop | e | ! emergency stop, no confirmation")?;
    writeln!(out, "  status        show mode and valve state")?;
    writeln!(out, "  log           print the event log")?;
    writeln!(out, "  quit          leave the console")
}

/// Drive `ctl` from `rx` until quit, end of input or interrupt.
///
/// A pending stop confirmation is answered by the next line: `y`/`yes`
/// confirms, an E-stop command executes the E-stop immediately, anything
/// else declines.
pub fn run(
    ctl: &mut PowerController,
    rx: &Receiver<InputEvent>,
    out: &mut impl Write,
) -> io::Result<Exit> {
    let mut pending: Option<StopToken> = None;
    loop {
        write!(out, "{}", if pending.is_some() { STOP_PROMPT } else { "> " })?;
        out.flush()?;

        let line = match rx.recv() {
            Ok(InputEvent::Line(line)) => line,
            Ok(InputEvent::Interrupt) => {
                writeln!(out)?;
                return Ok(Exit::Interrupted);
            }
            Ok(InputEvent::Eof) | Err(_) => {
                writeln!(out)?;
                return Ok(Exit::EndOfInput);
            }
        };

        if let Some(token) = pending.take() {
            if parse(&line) == Command::EmergencyStop {
                // E-stop is never gated behind the open prompt.
                ctl.emergency_stop();
                continue;
            }
            match ctl.confirm_stop(token, is_yes(&line)) {
                Ok(Some(_)) => {}
                Ok(None) => writeln!(out, "stop cancelled")?,
                Err(e) => tracing::warn!(error = %e, "stop confirmation dropped"),
            }
            continue;
        }

        match parse(&line) {
            Command::Start => {
                ctl.start();
            }
            Command::Stop => pending = Some(ctl.request_stop()),
            Command::EmergencyStop => {
                ctl.emergency_stop();
            }
            Command::Status => {
                writeln!(out, "{}", render_mode(ctl.mode()))?;
                writeln!(out, "{}", render_state(ctl.state()))?;
            }
            Command::Log => {
                for entry in ctl.log().iter() {
                    writeln!(out, "{entry}")?;
                }
            }
            Command::Help => help(out)?,
            Command::Quit => return Ok(Exit::Quit),
            Command::Empty => {}
            Command::Unknown(word) => writeln!(out, "unknown command {word:?} (try `help`)")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use valve_core::DeviceLink;
    use valve_core::mocks::RecordingDisplay;
    use valve_hardware::SimulatedActuator;
    use valve_traits::ManualClock;

    fn feed(lines: &[&str], tail: InputEvent) -> Receiver<InputEvent> {
        let (tx, rx) = crossbeam_channel::unbounded();
        for l in lines {
            tx.send(InputEvent::Line((*l).to_string())).unwrap();
        }
        tx.send(tail).unwrap();
        rx
    }

    fn controller() -> (PowerController, valve_hardware::SignalTap) {
        let act = SimulatedActuator::new();
        let tap = act.tap();
        let ctl = PowerController::new(
            DeviceLink::hardware(act),
            RecordingDisplay::new(),
            ManualClock::default(),
        );
        (ctl, tap)
    }

    #[test]
    fn parse_accepts_aliases() {
        assert_eq!(parse(" START "), Command::Start);
        assert_eq!(parse("q"), Command::Stop);
        assert_eq!(parse("!"), Command::EmergencyStop);
        assert_eq!(parse(""), Command::Empty);
        assert_eq!(parse("bogus"), Command::Unknown("bogus".into()));
    }

    #[test]
    fn render_state_shows_affordances() {
        assert_eq!(
            render_state(PowerState::Closed),
            "VALVE: CLOSED  (start enabled, stop disabled, estop enabled)"
        );
        assert!(render_state(PowerState::Open).contains("start disabled, stop enabled"));
    }

    #[test]
    fn confirmed_stop_closes_the_valve() {
        let (mut ctl, tap) = controller();
        let rx = feed(&["start", "stop", "y"], InputEvent::Eof);
        let mut out = Vec::new();
        let exit = run(&mut ctl, &rx, &mut out).unwrap();
        assert_eq!(exit, Exit::EndOfInput);
        assert_eq!(ctl.state(), PowerState::Closed);
        assert_eq!(tap.signals(), vec![true, false]);
        assert!(String::from_utf8(out).unwrap().contains(STOP_PROMPT));
    }

    #[test]
    fn anything_but_yes_declines() {
        let (mut ctl, tap) = controller();
        let rx = feed(&["start", "stop", "nope"], InputEvent::Eof);
        let mut out = Vec::new();
        run(&mut ctl, &rx, &mut out).unwrap();
        assert_eq!(ctl.state(), PowerState::Open);
        assert_eq!(tap.signals(), vec![true]);
        assert!(String::from_utf8(out).unwrap().contains("stop cancelled"));
    }

    #[test]
    fn estop_at_the_prompt_bypasses_confirmation() {
        let (mut ctl, tap) = controller();
        let rx = feed(&["start", "stop", "estop", "y"], InputEvent::Eof);
        let mut out = Vec::new();
        run(&mut ctl, &rx, &mut out).unwrap();
        assert_eq!(ctl.state(), PowerState::Closed);
        // The trailing "y" is an unknown command, not a late confirmation.
        assert_eq!(tap.signals(), vec![true, false]);
        assert!(!ctl.has_pending_stop());
        assert!(ctl.log().last().unwrap().message.contains("EMERGENCY"));
    }

    #[test]
    fn interrupt_ends_the_loop() {
        let (mut ctl, _tap) = controller();
        let rx = feed(&["start"], InputEvent::Interrupt);
        let mut out = Vec::new();
        assert_eq!(run(&mut ctl, &rx, &mut out).unwrap(), Exit::Interrupted);
        assert_eq!(ctl.state(), PowerState::Open);
    }

    #[test]
    fn quit_stops_before_remaining_lines() {
        let (mut ctl, tap) = controller();
        let rx = feed(&["quit", "start"], InputEvent::Eof);
        let mut out = Vec::new();
        assert_eq!(run(&mut ctl, &rx, &mut out).unwrap(), Exit::Quit);
        assert_eq!(tap.write_count(), 0);
    }
}
