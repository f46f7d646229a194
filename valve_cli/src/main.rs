mod cli;
mod console;
mod error_fmt;
mod logging;

use std::io;
use std::path::Path;

use clap::Parser;
use eyre::{Result, WrapErr};
use tracing::{info, warn};
use valve_core::{ConnectResult, ConnectionMode, DeviceLink, LinkCfg, PowerController};
use valve_hardware::SerialActuator;

use crate::cli::{Cli, Commands, DEFAULT_CONFIG, JSON_MODE, SerialArgs};
use crate::console::{ConsoleDisplay, Exit, InputEvent};
use crate::error_fmt::{format_error_json, humanize};

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    if let Err(e) = real_main(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            println!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        tracing::debug!(error = ?e, "exiting with error");
        std::process::exit(1);
    }
}

fn real_main(cli: Cli) -> Result<()> {
    color_eyre::install()?;

    let cfg = load_config(&cli.config)?;
    let level = cli
        .log_level
        .clone()
        .or_else(|| cfg.logging.level.clone())
        .unwrap_or_else(|| "info".to_string());
    if !valve_config::is_known_level(&level) {
        eyre::bail!("invalid log level {level:?}: expected error|warn|info|debug|trace");
    }
    let _log_guard = logging::init(cli.json, &level, &cfg.logging)?;

    match cli.cmd {
        Commands::Run { serial, simulate } => cmd_run(&cfg, &serial, simulate),
        Commands::SelfCheck { serial } => cmd_self_check(&cfg, &serial, cli.json),
        Commands::Ports => cmd_ports(cli.json),
    }
}

/// Load and validate the config. Only the default path may be absent.
fn load_config(path: &Path) -> Result<valve_config::Config> {
    if !path.exists() && path == Path::new(DEFAULT_CONFIG) {
        return Ok(valve_config::Config::default());
    }
    valve_config::load_file(path)
}

/// Apply command-line overrides on top of `[serial]` and re-validate.
fn link_cfg(cfg: &valve_config::Config, args: &SerialArgs) -> Result<LinkCfg> {
    let mut merged = cfg.clone();
    if let Some(port) = &args.port {
        merged.serial.port = port.clone();
    }
    if let Some(baud) = args.baud {
        merged.serial.baud = baud;
    }
    if let Some(t) = args.timeout_s {
        merged.serial.timeout_s = t;
    }
    merged.validate()?;
    Ok(LinkCfg::from(&merged))
}

fn connect(lc: &LinkCfg) -> (DeviceLink, ConnectResult) {
    DeviceLink::connect_with(lc, |c| SerialActuator::open(&c.port, c.baud, c.timeout))
}

fn cmd_run(cfg: &valve_config::Config, args: &SerialArgs, simulate: bool) -> Result<()> {
    let lc = link_cfg(cfg, args)?;
    let (link, res) = if simulate {
        info!("simulation requested; skipping connection attempt");
        (
            DeviceLink::simulation(),
            ConnectResult {
                mode: ConnectionMode::Simulation,
                error: None,
            },
        )
    } else {
        connect(&lc)
    };
    info!(port = %lc.port, mode = %res.mode, "device link ready");

    let mut ctl = PowerController::builder()
        .with_link(link)
        .with_display(ConsoleDisplay)
        .build()?;

    let (tx, rx) = crossbeam_channel::unbounded();
    let int_tx = tx.clone();
    ctrlc::set_handler(move || {
        let _ = int_tx.send(InputEvent::Interrupt);
    })
    .wrap_err("install Ctrl-C handler")?;
    console::spawn_stdin_reader(tx).wrap_err("spawn stdin reader")?;

    println!("type `help` for commands");
    let mut out = io::stdout();
    let exit = console::run(&mut ctl, &rx, &mut out).wrap_err("console I/O")?;
    match exit {
        Exit::Interrupted => info!("interrupted"),
        Exit::EndOfInput => info!("end of input"),
        Exit::Quit => info!("operator quit"),
    }

    if ctl.state().is_open() {
        warn!("exiting with valve commanded OPEN; the device keeps its last signal");
    }
    if let Err(e) = ctl.shutdown() {
        warn!(error = %e, "releasing device link failed");
    }
    Ok(())
}

fn cmd_self_check(cfg: &valve_config::Config, args: &SerialArgs, json: bool) -> Result<()> {
    let lc = link_cfg(cfg, args)?;
    let (link, res) = connect(&lc);
    let error = res.error.as_ref().map(ToString::to_string);
    if json {
        println!(
            "{}",
            serde_json::json!({
                "port": lc.port,
                "baud": lc.baud,
                "timeout_s": lc.timeout.as_secs_f64(),
                "mode": res.mode.to_string(),
                "error": error,
            })
        );
    } else {
        println!("port: {} @ {} baud", lc.port, lc.baud);
        println!("{}", console::render_mode(res.mode));
        if let Some(e) = error {
            println!("reason: {e}");
        }
    }
    drop(link);
    Ok(())
}

fn cmd_ports(json: bool) -> Result<()> {
    let ports = valve_hardware::list_ports().wrap_err("enumerate serial ports")?;
    if json {
        let list: Vec<_> = ports
            .iter()
            .map(|p| serde_json::json!({ "name": p.name, "kind": p.kind }))
            .collect();
        println!("{}", serde_json::Value::Array(list));
    } else if ports.is_empty() {
        println!("no serial ports found");
    } else {
        for p in &ports {
            println!("{}\t{}", p.name, p.kind);
        }
    }
    Ok(())
}
