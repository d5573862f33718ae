use crate::interfaces::Memory;
use crate::processor::internal_cpu::InternalCpu;

pub type Opcode = u8;

/// Decode table entry for one opcode
#[derive(Clone, Copy)]
pub struct Instruction {
    pub name: &'static str,
    pub instruction: InstructionKind,
    pub addressing_mode: AddressingMode,
    // machine cycles from fetch to the next fetch
    pub cycles: u8,
}

#[derive(Clone, Copy)]
pub enum InstructionKind {
    /// Operates only on internal registers
    Implied(fn(&mut InternalCpu)),
    /// Operates on the register selected by N
    Register(fn(&mut InternalCpu, u8)),
    /// Consumes the byte read through the addressing mode
    InternalExecOnMemoryData(fn(&mut InternalCpu, u8)),
    /// Produces the byte written through the addressing mode
    StoreOp(fn(&mut InternalCpu) -> u8),
    Misc(MiscInstructionKind),
}

#[derive(Clone, Copy)]
pub enum MiscInstructionKind {
    /// Keeps the processor in the execute state until control changes
    Idle(fn(&mut InternalCpu, &dyn Memory)),
    /// Replaces the low byte of R(P) with the immediate byte when the
    /// condition holds, otherwise skips it
    ShortBranch(fn(&InternalCpu) -> bool),
    /// Loads R(P) with the two immediate bytes when the condition holds,
    /// otherwise skips them
    LongBranch(fn(&InternalCpu) -> bool),
    /// Skips the two bytes after the opcode when the condition holds
    LongSkip(fn(&InternalCpu) -> bool),
    /// Free access to the whole memory
    MemoryAccess(fn(&mut InternalCpu, &mut dyn Memory)),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressingMode {
    Inherent,                // No memory operand
    RegisterIndirect,        // M(R(N))
    RegisterIndirectAdvance, // M(R(N)), then R(N)+1
    DataPointer,             // M(R(X))
    DataPointerAdvance,      // M(R(X)), then R(X)+1
    DataPointerDecrement,    // M(R(X)), then R(X)-1
    Immediate,               // M(R(P)), then R(P)+1
}
