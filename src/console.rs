//! Interactive console
//!
//! Operator commands are read from a text stream (stdin) on their own
//! thread and handed to the emulation loop through a channel, so the
//! processor keeps ticking while waiting for input.
use std::io::{self, BufRead};
use std::str::FromStr;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use log::{debug, warn};

use crate::errors::{ConsoleError, CpuError};
use crate::interfaces::Processor;
use crate::processor::cpu::Cpu;

pub const HELP_TEXT: &str = "\
Commands:
  run          Leave reset or resume a paused processor
  pause        Pause the processor
  reset        Reset the processor and run it again
  ef <1-4>     Toggle an external flag
  bus <value>  Write the data bus (0x00 to 0xFF, hex with 0x prefix or decimal)
  help         Show this help message
  quit         Exit the emulator
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Run,
    Pause,
    Reset,
    ToggleExternalFlag(u8),
    WriteBus(u32),
    Help,
    Quit,
}

/// What the emulation loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

impl FromStr for ConsoleCommand {
    type Err = ConsoleError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut tokens = input.split_whitespace();
        let command = tokens.next().unwrap_or_default().to_lowercase();

        let command = match command.as_str() {
            "run" | "r" => Self::Run,
            "pause" | "p" => Self::Pause,
            "reset" => Self::Reset,
            "ef" => {
                let value = tokens.next().ok_or(ConsoleError::MissingArgument("ef"))?;
                let flag = value.parse().map_err(|_| ConsoleError::InvalidArgument {
                    command: "ef",
                    value: value.to_string(),
                })?;
                Self::ToggleExternalFlag(flag)
            }
            "bus" => {
                let value = tokens.next().ok_or(ConsoleError::MissingArgument("bus"))?;
                let data = parse_number(value).ok_or_else(|| ConsoleError::InvalidArgument {
                    command: "bus",
                    value: value.to_string(),
                })?;
                Self::WriteBus(data)
            }
            "help" | "h" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            _ => return Err(ConsoleError::UnknownCommand(input.trim().to_string())),
        };

        Ok(command)
    }
}

impl ConsoleCommand {
    /// Carry out the command on `cpu`. Help is left to the caller
    pub fn apply(self, cpu: &mut Cpu) -> Result<Flow, CpuError> {
        match self {
            Self::Run => cpu.run()?,
            Self::Pause => cpu.pause()?,
            Self::Reset => {
                cpu.reset()?;
                cpu.run()?;
            }
            Self::ToggleExternalFlag(flag) => cpu.toggle_external_flag(flag)?,
            Self::WriteBus(data) => cpu.set_bus(data)?,
            Self::Help => {}
            Self::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }
}

/// Hexadecimal with `0x` prefix or decimal
fn parse_number(value: &str) -> Option<u32> {
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

/// Forward every command read from `reader` to `sender`. Blank lines are
/// skipped, invalid ones reported. End of input is a quit request.
pub fn read_commands<R: BufRead>(reader: R, sender: &Sender<ConsoleCommand>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(error) => {
                warn!("Console input error: {error}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<ConsoleCommand>() {
            Ok(command) => {
                debug!("Console command: {command:?}");
                if sender.send(command).is_err() {
                    // emulation loop is gone
                    return;
                }
            }
            Err(error) => eprintln!("{error}"),
        }
    }

    let _ = sender.send(ConsoleCommand::Quit);
}

pub fn spawn_stdin_reader(sender: Sender<ConsoleCommand>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("console".to_string())
        .spawn(move || read_commands(io::stdin().lock(), &sender))
}

/// One line summary of the externally visible processor pins
pub fn status_line(cpu: &Cpu) -> String {
    format!(
        "DATA: 0x{:0>2X}\tQ: {}\tEF1-4: {}\t{}",
        cpu.bus(),
        cpu.q() as u8,
        cpu.external_flags().to_digits(),
        if cpu.is_running() { "Running" } else { "Paused" }
    )
}
