use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::process::{Command, ExitStatus};
use timetree::{cli::Cli, config::TimerConfig, timer::Timer};
use tracing_subscriber::EnvFilter;

/// Top-level region enclosing one execution of the command
const RUN_REGION: &str = "run";

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Build the effective configuration from the config file and CLI overrides
fn load_config(args: &Cli) -> Result<TimerConfig> {
    let mut config = match &args.config {
        Some(path) => TimerConfig::from_toml(path)?,
        None => TimerConfig::default(),
    };
    if let Some(unit) = args.unit {
        config.default_unit = unit;
    }
    Ok(config)
}

/// Run the command `repeat` times, timing launch and wait as children of `run`
fn time_command(timer: &mut Timer, command: &[String], repeat: u32) -> Result<ExitStatus> {
    let (program, program_args) = command
        .split_first()
        .context("No command given. Usage: timetree -- COMMAND [ARGS...]")?;

    let mut last_status = None;
    for iteration in 0..repeat {
        tracing::debug!(iteration, program = program.as_str(), "running command");

        timer.start_recording(RUN_REGION)?;
        timer.start_child("spawn", RUN_REGION)?;
        let mut child = Command::new(program)
            .args(program_args)
            .spawn()
            .with_context(|| format!("Failed to launch '{}'", program))?;
        timer.stop_recording("spawn")?;

        timer.start_child("wait", RUN_REGION)?;
        let status = child
            .wait()
            .with_context(|| format!("Failed to wait for '{}'", program))?;
        timer.stop_recording("wait")?;
        timer.stop_recording(RUN_REGION)?;

        last_status = Some(status);
        if !status.success() {
            break;
        }
    }

    last_status.context("Command was never run")
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = load_config(&args)?;
    let mut timer = Timer::new(&config);

    let status = time_command(&mut timer, &args.command, args.repeat)?;

    if args.flat {
        timer.print_report(RUN_REGION, false)?;
    } else {
        timer.print_report_all();
    }

    if !status.success() {
        std::io::stdout().flush()?;
        eprintln!("timetree: command exited with {}", status);
        std::process::exit(status.code().unwrap_or(1));
    }

    Ok(())
}
