//! RCA COSMAC 1802 emulator
//!
//! The processor is driven one machine cycle at a time: create a `Cpu`,
//! load a program into its memory (by hand or through a hex listing
//! `Program`), `run` it out of reset and `tick` it as often as needed.
//! External flags and the data bus can be driven between ticks.

pub mod console;
pub mod errors;
pub mod loader;
pub mod metrics;
pub mod settings;

mod hardware;
mod interfaces;
mod processor;
mod utils;

pub use errors::{ConsoleError, CpuError, LoaderError};
pub use interfaces::{Memory, Processor};
pub use loader::{Program, Segment};
pub use processor::cpu::Cpu;
pub use processor::external_flags::ExternalFlags;
pub use processor::memory::Ram;
pub use processor::state::State;
pub use settings::EmulatorSettings;
