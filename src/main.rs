use std::env;
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use crossbeam_channel::{unbounded, Receiver};
use log::{error, info};

use cosmac_emulator::console::{self, ConsoleCommand, Flow, HELP_TEXT};
use cosmac_emulator::metrics::Collector;
use cosmac_emulator::{Cpu, EmulatorSettings, Processor, Program};

const USAGE_TEXT: &str = "\
Usage: cosmac <program.hex> [options]

Execute a hex listing on an emulated RCA COSMAC 1802 processor.

Options:
  --tick-us <N>     Microseconds between machine cycles (default: 1000)
  --max-ticks <N>   Stop after N machine cycles
  --quiet           Don't render the status line
  --paused          Wait for a 'run' command before starting
  -h, --help        Show this help message
";

#[derive(Debug, PartialEq, Eq)]
struct RunArgs {
    program: PathBuf,
    settings: EmulatorSettings,
}

#[derive(Debug, PartialEq, Eq)]
enum ParseResult {
    Run(RunArgs),
    Help,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Run(args)) => args,
        Ok(ParseResult::Help) => {
            print!("{USAGE_TEXT}");
            return Ok(());
        }
        Err(message) => {
            eprintln!("error: {message}\n\n{USAGE_TEXT}");
            std::process::exit(2);
        }
    };

    let program = Program::from_file(&args.program)
        .with_context(|| format!("Failed to load program {}", args.program.display()))?;

    let mut cpu = Cpu::new();
    program
        .load_into(&mut cpu)
        .with_context(|| format!("Failed to load program {}", args.program.display()))?;

    println!("Executing {}", args.program.display());
    print!("{HELP_TEXT}");

    let (sender, receiver) = unbounded();
    console::spawn_stdin_reader(sender).context("Failed to start the console")?;

    emulate(&mut cpu, &args.settings, &receiver)
}

#[allow(clippy::while_let_on_iterator)]
fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let mut program: Option<PathBuf> = None;
    let mut settings = EmulatorSettings::default();

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Ok(ParseResult::Help);
        }

        if arg == "--quiet" {
            settings.status_line = false;
            continue;
        }

        if arg == "--paused" {
            settings.start_paused = true;
            continue;
        }

        if arg == "--tick-us" {
            let micros = parse_number(args.next(), "--tick-us")?;
            settings.tick_interval = Duration::from_micros(micros);
            continue;
        }

        if arg == "--max-ticks" {
            settings.tick_limit = Some(parse_number(args.next(), "--max-ticks")?);
            continue;
        }

        if arg.to_string_lossy().starts_with('-') {
            return Err(format!("unknown option: {}", arg.to_string_lossy()));
        }

        if program.is_some() {
            return Err("multiple program paths provided".to_string());
        }
        program = Some(PathBuf::from(arg));
    }

    let program = program.ok_or_else(|| "missing program path".to_string())?;
    Ok(ParseResult::Run(RunArgs { program, settings }))
}

fn parse_number(value: Option<OsString>, option: &str) -> Result<u64, String> {
    let value = value.ok_or_else(|| format!("missing value for {option}"))?;
    value
        .to_string_lossy()
        .parse()
        .map_err(|_| format!("invalid value for {option}: {}", value.to_string_lossy()))
}

/// Blocking emulation loop. Returns when the operator quits or the tick
/// limit is reached
fn emulate(
    cpu: &mut Cpu,
    settings: &EmulatorSettings,
    commands: &Receiver<ConsoleCommand>,
) -> Result<()> {
    let mut collector = Collector::new();

    if !settings.start_paused {
        cpu.run().context("Failed to start the processor")?;
    }

    loop {
        // a halted processor has nothing to do until the operator acts
        if cpu.is_halted() {
            match commands.recv() {
                Ok(command) => {
                    if handle_command(cpu, command) == Flow::Quit {
                        break;
                    }
                }
                Err(_) => break,
            }
            continue;
        }

        // a closed console leaves the processor running
        if let Ok(command) = commands.try_recv() {
            if handle_command(cpu, command) == Flow::Quit {
                break;
            }
        }

        if let Err(err) = cpu.tick() {
            error!("{err}");
            eprintln!("\n{err}. Type 'reset' to restart or 'quit' to exit");
        }
        collector.observe_tick();

        if settings.status_line {
            print_status(cpu);
        }

        if settings.metrics_interval > 0 && collector.observed_ticks() >= settings.metrics_interval {
            let metrics = collector.collect();
            info!(
                "{} ticks in {:?} ({} ticks/s)",
                metrics.ticks, metrics.recorded_time, metrics.ticks_per_second
            );
        }

        if let Some(limit) = settings.tick_limit {
            if cpu.ticks() >= limit {
                info!("Tick limit of {limit} reached");
                break;
            }
        }

        if !settings.tick_interval.is_zero() {
            thread::sleep(settings.tick_interval);
        }
    }

    println!("\nExiting...");
    Ok(())
}

fn handle_command(cpu: &mut Cpu, command: ConsoleCommand) -> Flow {
    if command == ConsoleCommand::Help {
        print!("\n{HELP_TEXT}");
    }

    match command.apply(cpu) {
        Ok(flow) => flow,
        Err(err) => {
            eprintln!("\n{err}");
            Flow::Continue
        }
    }
}

fn print_status(cpu: &Cpu) {
    let mut stdout = io::stdout().lock();
    let _ = write!(stdout, "{}\r", console::status_line(cpu));
    let _ = stdout.flush();
}
