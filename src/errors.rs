//! Emulator errors
//!
//! All errors the processor core, the program loader and the interactive
//! console can produce

use std::path::PathBuf;

use thiserror::Error;

/// Processor error type
///
/// Every failure of a control operation or of an external stimulus is
/// reported through this type. None of them is retried by the core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CpuError {
    #[error("Invalid instruction 0x{opcode:0>2X} fetched from ${address:0>4X}")]
    InvalidInstruction { opcode: u8, address: u16 },

    #[error(
        "Processor halted by invalid instruction 0x{opcode:0>2X} fetched from ${address:0>4X}, reset required"
    )]
    Halted { opcode: u8, address: u16 },

    #[error("External flag EF{0} doesn't exist, valid flags are EF1 to EF4")]
    InvalidExternalFlag(u8),

    #[error("External flag EF{flag} can't be set to {value}, only 0 or 1 are valid")]
    InvalidFlagValue { flag: u8, value: u8 },

    #[error("Data bus value 0x{0:X} doesn't fit in a byte")]
    InvalidBusValue(u32),

    #[error("Loading {length} bytes from ${address:0>4X} runs past the end of memory")]
    AddressOverflow { address: u16, length: usize },
}

/// Program loader errors
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("Can't read program '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Syntax error on line {line}: {details}")]
    Syntax { line: usize, details: String },

    #[error("Invalid hexadecimal '{token}' on line {line}")]
    InvalidHex { line: usize, token: String },

    #[error(
        "Line {line} writes {length} bytes from ${address:0>4X}, past the end of memory"
    )]
    AddressOverflow {
        line: usize,
        address: u16,
        length: usize,
    },
}

/// Console input that doesn't form a command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleError {
    #[error("Unknown command '{0}', type 'help' for the command list")]
    UnknownCommand(String),

    #[error("Command '{0}' requires a value")]
    MissingArgument(&'static str),

    #[error("Invalid value '{value}' for command '{command}'")]
    InvalidArgument {
        command: &'static str,
        value: String,
    },
}
