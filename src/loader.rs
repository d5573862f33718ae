//! Hex listing program loader
//!
//! A listing is a text file where every line places a run of bytes in
//! memory:
//!
//! ```text
//! ; blink Q forever
//! 0000 7B7A3000
//! ```
//!
//! The first token is the start address, the second one the bytes to write
//! as pairs of hexadecimal digits. Anything after the second token is
//! ignored. Lines starting with `;` and blank lines are skipped.
use std::fmt;
use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::errors::{CpuError, LoaderError};
use crate::hardware::MEMORY_END;
use crate::processor::cpu::Cpu;

/// Bytes placed at consecutive addresses starting on `address`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub address: u16,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    segments: Vec<Segment>,
}

impl Program {
    pub fn parse(listing: &str) -> Result<Self, LoaderError> {
        let mut segments = Vec::new();

        for (index, line) in listing.lines().enumerate() {
            let line_number = index + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with(';') {
                continue;
            }

            let segment = parse_line(line_number, line)?;
            debug!(
                "Line {line_number}: {} bytes at ${:0>4X}",
                segment.bytes.len(),
                segment.address
            );
            segments.push(segment);
        }

        Ok(Self { segments })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        let listing = fs::read_to_string(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let program = Self::parse(&listing)?;
        info!("Program '{}' parsed: {program}", path.display());
        Ok(program)
    }

    /// Write every segment into the processor memory, in listing order
    pub fn load_into(&self, cpu: &mut Cpu) -> Result<(), CpuError> {
        for segment in self.segments.iter() {
            cpu.load(segment.address, &segment.bytes)?;
        }
        info!("Program loaded: {self}");
        Ok(())
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.iter().map(|segment| segment.bytes.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bytes in {} segments",
            self.len(),
            self.segments.len()
        )
    }
}

fn parse_line(line_number: usize, line: &str) -> Result<Segment, LoaderError> {
    let mut tokens = line.split_whitespace();
    let (Some(address), Some(data)) = (tokens.next(), tokens.next()) else {
        return Err(LoaderError::Syntax {
            line: line_number,
            details: "expected a memory address followed by data bytes".to_string(),
        });
    };

    let invalid_hex = |token: &str| LoaderError::InvalidHex {
        line: line_number,
        token: token.to_string(),
    };

    // from_str_radix alone would let a sign through
    let is_hex = |token: &str| token.chars().all(|c| c.is_ascii_hexdigit());
    if !is_hex(address) {
        return Err(invalid_hex(address));
    }
    let address = u16::from_str_radix(address, 16).map_err(|_| invalid_hex(address))?;

    if !is_hex(data) || data.len() % 2 != 0 {
        return Err(invalid_hex(data));
    }
    let bytes = (0..data.len())
        .step_by(2)
        .map(|i| {
            data.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| invalid_hex(data))
        })
        .collect::<Result<Vec<u8>, LoaderError>>()?;

    let last = address as usize + bytes.len() - 1;
    if last > MEMORY_END as usize {
        return Err(LoaderError::AddressOverflow {
            line: line_number,
            address,
            length: bytes.len(),
        });
    }

    Ok(Segment { address, bytes })
}
