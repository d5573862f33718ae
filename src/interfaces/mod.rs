use crate::errors::CpuError;

pub trait Memory {
    /// Read a byte from the specified `address`
    fn read(&self, address: u16) -> u8;

    /// Write a byte of `data` to the specified `address`
    fn write(&mut self, address: u16, data: u8);

    /// Memory size in bytes
    fn size(&self) -> usize;
}

/// Clock-driven processor control surface.
///
/// Every operation runs to completion before returning.
pub trait Processor {
    /// Advance the processor exactly one machine cycle
    fn tick(&mut self) -> Result<(), CpuError>;

    /// Hold the processor in reset
    fn reset(&mut self) -> Result<(), CpuError>;

    /// Leave reset (initializing the processor) or resume from pause
    fn run(&mut self) -> Result<(), CpuError>;

    /// Freeze the processor, remembering where to resume
    fn pause(&mut self) -> Result<(), CpuError>;
}
