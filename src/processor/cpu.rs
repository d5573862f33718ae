#[cfg(test)]
mod tests;

use log::{debug, error, info, trace, warn};

use crate::errors::CpuError;
use crate::hardware::{LONG_INSTRUCTION_CYCLES, MEMORY_SIZE};
use crate::interfaces::{Memory, Processor};
use crate::processor::external_flags::ExternalFlags;
use crate::processor::instruction::{
    AddressingMode, Instruction, InstructionKind, MiscInstructionKind,
};
use crate::processor::instruction_set::InstructionSet;
use crate::processor::internal_cpu::InternalCpu;
use crate::processor::memory::Ram;
use crate::processor::state::{Control, State};
use crate::utils;

use AddressingMode::*;
use InstructionKind::*;
use MiscInstructionKind::*;

/// RCA COSMAC 1802 processor emulator.
///
/// The processor is driven one machine cycle at a time through the
/// `Processor` trait. It owns its register file and its 64 kB memory.
pub struct Cpu {
    cpu: InternalCpu,
    memory: Box<dyn Memory>,
    state: State,
    instruction_set: InstructionSet,

    // address of the last opcode fetch, reported on decode failures
    fetch_address: u16,
    // latched decode failure (opcode, address). Cleared only by reset
    fault: Option<(u8, u16)>,
    ticks: u64,
}

impl Cpu {
    /// Power on a processor backed by 64 kB of zeroed RAM. It starts held
    /// in reset.
    pub fn new() -> Self {
        Self::with_memory(Box::new(Ram::new()))
    }

    pub fn with_memory(memory: Box<dyn Memory>) -> Self {
        Self {
            cpu: InternalCpu::default(),
            memory,
            state: State::Reset,
            instruction_set: InstructionSet::new(),
            fetch_address: 0,
            fault: None,
            ticks: 0,
        }
    }

    fn control(&mut self, control: Control) -> Result<(), CpuError> {
        if let Some((opcode, address)) = self.fault {
            if control != Control::Reset {
                return Err(CpuError::Halted { opcode, address });
            }
        }

        let state = std::mem::replace(&mut self.state, State::Reset);
        let transition = state.on_control(control);
        info!("{control:?} request, entering {}", transition.next);
        self.state = transition.next;

        if transition.tick {
            self.tick()?;
        }
        Ok(())
    }

    fn fetch(&mut self) {
        let address = self.cpu.program_counter();
        let opcode = self.memory.read(address);
        let (i, n) = utils::nibbles(opcode);

        debug!("Fetch ${address:0>4X} -> {opcode:0>2X}");
        self.cpu.i = i;
        self.cpu.n = n;
        self.fetch_address = address;
        self.cpu.increment_register(self.cpu.p);
    }

    fn execute(&mut self) -> Result<State, CpuError> {
        let opcode = utils::join_nibbles(self.cpu.i, self.cpu.n);
        let Some(instruction) = self.instruction_set.decode(self.cpu.i, self.cpu.n) else {
            let address = self.fetch_address;
            error!("Invalid instruction 0x{opcode:0>2X} fetched from ${address:0>4X}");
            self.fault = Some((opcode, address));
            return Err(CpuError::InvalidInstruction { opcode, address });
        };

        debug!("Execute {} (0x{opcode:0>2X})", instruction.name);
        Ok(self.exec(instruction))
    }

    /// Apply `instruction` and return the state for the next machine cycle
    fn exec(&mut self, instruction: Instruction) -> State {
        let n = self.cpu.n;

        // N0-N2 are driven by the I/O group only
        if self.cpu.i == 0x6 && n != 0 {
            self.cpu.select_io_lines(n);
        }

        match instruction.instruction {
            Implied(fun) => fun(&mut self.cpu),
            Register(fun) => fun(&mut self.cpu, n),
            InternalExecOnMemoryData(fun) => {
                let address = self.operand_address(instruction.addressing_mode);
                let data = self.memory.read(address);
                fun(&mut self.cpu, data);
            }
            StoreOp(fun) => {
                let address = self.operand_address(instruction.addressing_mode);
                let data = fun(&mut self.cpu);
                self.memory.write(address, data);
            }
            Misc(kind) => match kind {
                Idle(fun) => {
                    fun(&mut self.cpu, self.memory.as_ref());
                    return State::Execute;
                }
                ShortBranch(condition) => {
                    if condition(&self.cpu) {
                        let target = self.memory.read(self.cpu.program_counter());
                        self.cpu.set_register_low(self.cpu.p, target);
                    } else {
                        self.cpu.increment_register(self.cpu.p);
                    }
                }
                LongBranch(condition) => {
                    if condition(&self.cpu) {
                        let address = self.cpu.program_counter();
                        let high = self.memory.read(address);
                        let low = self.memory.read(address.wrapping_add(1));
                        self.cpu.r[self.cpu.p as usize] = u16::from_be_bytes([high, low]);
                    } else {
                        self.skip_two_bytes();
                    }
                }
                LongSkip(condition) => {
                    if condition(&self.cpu) {
                        self.skip_two_bytes();
                    }
                }
                MemoryAccess(fun) => fun(&mut self.cpu, self.memory.as_mut()),
            },
        }

        if instruction.cycles == LONG_INSTRUCTION_CYCLES {
            State::ForceExecute
        } else {
            State::Fetch
        }
    }

    /// Address of the memory operand. Advancing and decrementing modes
    /// update their register after the address is taken.
    fn operand_address(&mut self, addressing_mode: AddressingMode) -> u16 {
        let cpu = &mut self.cpu;
        match addressing_mode {
            RegisterIndirect => cpu.r[cpu.n as usize],
            RegisterIndirectAdvance => {
                let address = cpu.r[cpu.n as usize];
                cpu.increment_register(cpu.n);
                address
            }
            DataPointer => cpu.data_pointer(),
            DataPointerAdvance => {
                let address = cpu.data_pointer();
                cpu.increment_register(cpu.x);
                address
            }
            DataPointerDecrement => {
                let address = cpu.data_pointer();
                cpu.decrement_register(cpu.x);
                address
            }
            Immediate => {
                let address = cpu.program_counter();
                cpu.increment_register(cpu.p);
                address
            }
            Inherent => {
                panic!("Invalid memory operand addressing mode: {addressing_mode:?}");
            }
        }
    }

    fn skip_two_bytes(&mut self) {
        self.cpu.increment_register(self.cpu.p);
        self.cpu.increment_register(self.cpu.p);
    }
}

impl Processor for Cpu {
    fn tick(&mut self) -> Result<(), CpuError> {
        // N0-N2 only last for the cycle that drove them, halted or not
        self.cpu.clear_io_lines();

        if let Some((opcode, address)) = self.fault {
            return Err(CpuError::Halted { opcode, address });
        }

        trace!("Tick {} in {}", self.ticks, self.state);
        self.ticks += 1;

        match self.state {
            State::Reset => self.cpu.reset(),
            State::Init => {
                self.cpu.initialize();
                self.state = State::Fetch;
            }
            State::Fetch => {
                self.fetch();
                self.state = State::Execute;
            }
            State::Execute => {
                self.state = self.execute()?;
            }
            State::ForceExecute => {
                self.state = State::Fetch;
            }
            State::Pause(_) => {}
        }
        Ok(())
    }

    fn reset(&mut self) -> Result<(), CpuError> {
        if self.fault.take().is_some() {
            info!("Clearing latched instruction fault");
        }
        self.control(Control::Reset)
    }

    fn run(&mut self) -> Result<(), CpuError> {
        self.control(Control::Run)
    }

    fn pause(&mut self) -> Result<(), CpuError> {
        self.control(Control::Pause)
    }
}

// External stimulus
impl Cpu {
    /// Write `contents` to memory starting on `address`. Nothing is written
    /// when `contents` doesn't fit below the end of memory.
    pub fn load(&mut self, address: u16, contents: &[u8]) -> Result<(), CpuError> {
        let length = contents.len();
        if address as usize + length > MEMORY_SIZE {
            warn!("Rejected load of {length} bytes at ${address:0>4X}");
            return Err(CpuError::AddressOverflow { address, length });
        }

        debug!("Load {length} bytes at ${address:0>4X}");
        for (i, byte) in contents.iter().enumerate() {
            self.memory.write(address + i as u16, *byte);
        }
        Ok(())
    }

    /// Drive external flag EF`flag` (1 to 4) to `value` (0 or 1)
    pub fn set_external_flag(&mut self, flag: u8, value: u8) -> Result<(), CpuError> {
        let line = ExternalFlags::line(flag)?;
        match value {
            0 => self.cpu.ef.remove(line),
            1 => self.cpu.ef.insert(line),
            _ => {
                warn!("Rejected value {value} for EF{flag}");
                return Err(CpuError::InvalidFlagValue { flag, value });
            }
        }
        Ok(())
    }

    pub fn toggle_external_flag(&mut self, flag: u8) -> Result<(), CpuError> {
        let line = ExternalFlags::line(flag)?;
        self.cpu.ef.toggle(line);
        Ok(())
    }

    /// Place `value` on the data bus. It must fit in a byte.
    pub fn set_bus(&mut self, value: u32) -> Result<(), CpuError> {
        let Ok(value) = u8::try_from(value) else {
            warn!("Rejected data bus value 0x{value:X}");
            return Err(CpuError::InvalidBusValue(value));
        };
        self.cpu.bus = value;
        Ok(())
    }
}

// Observation
impl Cpu {
    pub fn d(&self) -> u8 {
        self.cpu.d
    }

    pub fn df(&self) -> bool {
        self.cpu.df
    }

    pub fn b(&self) -> u8 {
        self.cpu.b
    }

    /// Scratchpad register R(`register`), `register` is taken modulo 16
    pub fn r(&self, register: u8) -> u16 {
        self.cpu.r[(register & 0x0F) as usize]
    }

    pub fn p(&self) -> u8 {
        self.cpu.p
    }

    pub fn x(&self) -> u8 {
        self.cpu.x
    }

    pub fn i(&self) -> u8 {
        self.cpu.i
    }

    pub fn n(&self) -> u8 {
        self.cpu.n
    }

    pub fn t(&self) -> u8 {
        self.cpu.t
    }

    pub fn ie(&self) -> bool {
        self.cpu.ie
    }

    pub fn q(&self) -> bool {
        self.cpu.q
    }

    pub fn bus(&self) -> u8 {
        self.cpu.bus
    }

    /// Sampled value of the N0, N1 and N2 lines
    pub fn io_lines(&self) -> (bool, bool, bool) {
        (self.cpu.n0, self.cpu.n1, self.cpu.n2)
    }

    pub fn external_flag(&self, flag: u8) -> Result<bool, CpuError> {
        let line = ExternalFlags::line(flag)?;
        Ok(self.cpu.ef.contains(line))
    }

    pub fn external_flags(&self) -> ExternalFlags {
        self.cpu.ef
    }

    pub fn program_counter(&self) -> u16 {
        self.cpu.program_counter()
    }

    pub fn data_pointer(&self) -> u16 {
        self.cpu.data_pointer()
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state != State::Reset && !self.state.is_paused()
    }

    pub fn is_halted(&self) -> bool {
        self.fault.is_some()
    }

    /// Machine cycles clocked since power on
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn memory(&self) -> &dyn Memory {
        self.memory.as_ref()
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}
