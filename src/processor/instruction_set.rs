use crate::hardware::{LONG_INSTRUCTION_CYCLES, SHORT_INSTRUCTION_CYCLES, STACK_POINTER};
use crate::interfaces::Memory;
use crate::processor::external_flags::ExternalFlags;
use crate::processor::instruction::{
    AddressingMode, Instruction, InstructionKind, MiscInstructionKind, Opcode,
};
use crate::processor::internal_cpu::InternalCpu;
use crate::utils;

use AddressingMode::*;
use InstructionKind::*;
use MiscInstructionKind::*;

const SHORT: u8 = SHORT_INSTRUCTION_CYCLES;
const LONG: u8 = LONG_INSTRUCTION_CYCLES;

macro_rules! instruction {
    ($name:expr, $kind:expr, $addr_mode:expr, $cycles:expr) => {
        Instruction {
            name: $name,
            instruction: $kind,
            addressing_mode: $addr_mode,
            cycles: $cycles,
        }
    };
}

/// Decode table indexed by the whole opcode (I << 4 | N). Empty entries
/// are undefined opcodes.
pub struct InstructionSet {
    instruction_set: [Option<Instruction>; 256],
}

impl InstructionSet {
    #[rustfmt::skip]
    pub fn new() -> Self {
        let mut set = Self { instruction_set: [None; 256] };

        // Memory reference
        set.insert_family(0x0, instruction!("LDN", InternalExecOnMemoryData(ld), RegisterIndirect, SHORT));
        set.insert_family(0x4, instruction!("LDA", InternalExecOnMemoryData(ld), RegisterIndirectAdvance, SHORT));
        set.insert_family(0x5, instruction!("STR", StoreOp(store_d), RegisterIndirect, SHORT));
        set.insert(0x72, instruction!("LDXA", InternalExecOnMemoryData(ld), DataPointerAdvance, SHORT));
        set.insert(0x73, instruction!("STXD", StoreOp(store_d), DataPointerDecrement, SHORT));
        set.insert(0xF0, instruction!("LDX", InternalExecOnMemoryData(ld), DataPointer, SHORT));
        set.insert(0xF8, instruction!("LDI", InternalExecOnMemoryData(ld), Immediate, SHORT));

        // Register operations
        set.insert_family(0x1, instruction!("INC", Register(inc), Inherent, SHORT));
        set.insert_family(0x2, instruction!("DEC", Register(dec), Inherent, SHORT));
        set.insert(0x60, instruction!("IRX", Implied(irx), Inherent, SHORT));
        set.insert_family(0x8, instruction!("GLO", Register(glo), Inherent, SHORT));
        set.insert_family(0x9, instruction!("GHI", Register(ghi), Inherent, SHORT));
        set.insert_family(0xA, instruction!("PLO", Register(plo), Inherent, SHORT));
        set.insert_family(0xB, instruction!("PHI", Register(phi), Inherent, SHORT));

        // Logic operations
        set.insert(0xF1, instruction!("OR", InternalExecOnMemoryData(or), DataPointer, SHORT));
        set.insert(0xF9, instruction!("ORI", InternalExecOnMemoryData(or), Immediate, SHORT));
        set.insert(0xF3, instruction!("XOR", InternalExecOnMemoryData(xor), DataPointer, SHORT));
        set.insert(0xFB, instruction!("XRI", InternalExecOnMemoryData(xor), Immediate, SHORT));
        set.insert(0xF2, instruction!("AND", InternalExecOnMemoryData(and), DataPointer, SHORT));
        set.insert(0xFA, instruction!("ANI", InternalExecOnMemoryData(and), Immediate, SHORT));
        set.insert(0xF6, instruction!("SHR", Implied(shr), Inherent, SHORT));
        set.insert(0x76, instruction!("SHRC", Implied(shrc), Inherent, SHORT));
        set.insert(0xFE, instruction!("SHL", Implied(shl), Inherent, SHORT));
        set.insert(0x7E, instruction!("SHLC", Implied(shlc), Inherent, SHORT));

        // Arithmetic operations
        set.insert(0xF4, instruction!("ADD", InternalExecOnMemoryData(add), DataPointer, SHORT));
        set.insert(0xFC, instruction!("ADI", InternalExecOnMemoryData(add), Immediate, SHORT));
        set.insert(0x74, instruction!("ADC", InternalExecOnMemoryData(adc), DataPointer, SHORT));
        set.insert(0x7C, instruction!("ADCI", InternalExecOnMemoryData(adc), Immediate, SHORT));
        set.insert(0xF5, instruction!("SD", InternalExecOnMemoryData(sd), DataPointer, SHORT));
        set.insert(0xFD, instruction!("SDI", InternalExecOnMemoryData(sd), Immediate, SHORT));
        set.insert(0x75, instruction!("SDB", InternalExecOnMemoryData(sdb), DataPointer, SHORT));
        set.insert(0x7D, instruction!("SDBI", InternalExecOnMemoryData(sdb), Immediate, SHORT));
        set.insert(0xF7, instruction!("SM", InternalExecOnMemoryData(sm), DataPointer, SHORT));
        set.insert(0xFF, instruction!("SMI", InternalExecOnMemoryData(sm), Immediate, SHORT));
        set.insert(0x77, instruction!("SMB", InternalExecOnMemoryData(smb), DataPointer, SHORT));
        set.insert(0x7F, instruction!("SMBI", InternalExecOnMemoryData(smb), Immediate, SHORT));

        // Short branch
        set.insert(0x30, instruction!("BR", Misc(ShortBranch(always)), Immediate, SHORT));
        set.insert(0x31, instruction!("BQ", Misc(ShortBranch(q_set)), Immediate, SHORT));
        set.insert(0x32, instruction!("BZ", Misc(ShortBranch(d_zero)), Immediate, SHORT));
        set.insert(0x33, instruction!("BDF", Misc(ShortBranch(df_set)), Immediate, SHORT));
        set.insert(0x34, instruction!("B1", Misc(ShortBranch(ef1_set)), Immediate, SHORT));
        set.insert(0x35, instruction!("B2", Misc(ShortBranch(ef2_set)), Immediate, SHORT));
        set.insert(0x36, instruction!("B3", Misc(ShortBranch(ef3_set)), Immediate, SHORT));
        set.insert(0x37, instruction!("B4", Misc(ShortBranch(ef4_set)), Immediate, SHORT));
        set.insert(0x38, instruction!("SKP", Misc(ShortBranch(never)), Immediate, SHORT));
        set.insert(0x39, instruction!("BNQ", Misc(ShortBranch(q_reset)), Immediate, SHORT));
        set.insert(0x3A, instruction!("BNZ", Misc(ShortBranch(d_not_zero)), Immediate, SHORT));
        set.insert(0x3B, instruction!("BNF", Misc(ShortBranch(df_reset)), Immediate, SHORT));
        set.insert(0x3C, instruction!("BN1", Misc(ShortBranch(ef1_reset)), Immediate, SHORT));
        set.insert(0x3D, instruction!("BN2", Misc(ShortBranch(ef2_reset)), Immediate, SHORT));
        set.insert(0x3E, instruction!("BN3", Misc(ShortBranch(ef3_reset)), Immediate, SHORT));
        set.insert(0x3F, instruction!("BN4", Misc(ShortBranch(ef4_reset)), Immediate, SHORT));

        // Long branch and long skip
        set.insert(0xC0, instruction!("LBR", Misc(LongBranch(always)), Immediate, LONG));
        set.insert(0xC1, instruction!("LBQ", Misc(LongBranch(q_set)), Immediate, LONG));
        set.insert(0xC2, instruction!("LBZ", Misc(LongBranch(d_zero)), Immediate, LONG));
        set.insert(0xC3, instruction!("LBDF", Misc(LongBranch(df_set)), Immediate, LONG));
        set.insert(0xC5, instruction!("LSNQ", Misc(LongSkip(q_reset)), Inherent, LONG));
        set.insert(0xC6, instruction!("LSNZ", Misc(LongSkip(d_not_zero)), Inherent, LONG));
        set.insert(0xC7, instruction!("LSNF", Misc(LongSkip(df_reset)), Inherent, LONG));
        set.insert(0xC8, instruction!("LSKP", Misc(LongSkip(always)), Inherent, LONG));
        set.insert(0xC9, instruction!("LBNQ", Misc(LongBranch(q_reset)), Immediate, LONG));
        set.insert(0xCA, instruction!("LBNZ", Misc(LongBranch(d_not_zero)), Immediate, LONG));
        set.insert(0xCB, instruction!("LBNF", Misc(LongBranch(df_reset)), Immediate, LONG));
        set.insert(0xCC, instruction!("LSIE", Misc(LongSkip(ie_set)), Inherent, LONG));
        set.insert(0xCD, instruction!("LSQ", Misc(LongSkip(q_set)), Inherent, LONG));
        set.insert(0xCE, instruction!("LSZ", Misc(LongSkip(d_zero)), Inherent, LONG));
        set.insert(0xCF, instruction!("LSDF", Misc(LongSkip(df_set)), Inherent, LONG));

        // Control instructions
        set.insert(0x00, instruction!("IDL", Misc(Idle(idl)), Inherent, SHORT));
        set.insert(0xC4, instruction!("NOP", Implied(nop), Inherent, LONG));
        set.insert_family(0xD, instruction!("SEP", Register(sep), Inherent, SHORT));
        set.insert_family(0xE, instruction!("SEX", Register(sex), Inherent, SHORT));
        set.insert(0x7B, instruction!("SEQ", Implied(seq), Inherent, SHORT));
        set.insert(0x7A, instruction!("REQ", Implied(req), Inherent, SHORT));
        set.insert(0x78, instruction!("SAV", StoreOp(sav), DataPointer, SHORT));
        set.insert(0x79, instruction!("MARK", Misc(MemoryAccess(mark)), Inherent, SHORT));
        set.insert(0x70, instruction!("RET", InternalExecOnMemoryData(ret), DataPointerAdvance, SHORT));
        set.insert(0x71, instruction!("DIS", InternalExecOnMemoryData(dis), DataPointerAdvance, SHORT));

        // Input - output byte transfer. 0x68 is not an 1802 instruction
        for n in 0x1..=0x7 {
            set.insert(utils::join_nibbles(0x6, n), instruction!("OUT", InternalExecOnMemoryData(out), DataPointerAdvance, SHORT));
            set.insert(utils::join_nibbles(0x6, n + 8), instruction!("INP", StoreOp(inp), DataPointer, SHORT));
        }

        set
    }

    fn insert(&mut self, opcode: Opcode, instruction: Instruction) {
        self.instruction_set[opcode as usize] = Some(instruction);
    }

    /// Insert `instruction` for every N under the high nibble `i`
    fn insert_family(&mut self, i: u8, instruction: Instruction) {
        for n in 0x0..=0xF {
            self.insert(utils::join_nibbles(i, n), instruction);
        }
    }

    /// Look up the instruction for the latched nibble pair
    pub fn decode(&self, i: u8, n: u8) -> Option<Instruction> {
        self.instruction_set[utils::join_nibbles(i, n) as usize]
    }
}

impl Default for InstructionSet {
    fn default() -> Self {
        Self::new()
    }
}

// Memory reference

/// LDN, LDA, LDX, LDXA, LDI - Load D
///
/// Operation:
/// M -> D
pub fn ld(cpu: &mut InternalCpu, operand: u8) {
    cpu.d = operand;
}

/// STR, STXD - Store D
///
/// Operation:
/// D -> M
pub fn store_d(cpu: &mut InternalCpu) -> u8 {
    cpu.d
}

// Register operations

/// INC - Increment Register N
///
/// Operation:
/// R(N) + 1 -> R(N)
pub fn inc(cpu: &mut InternalCpu, n: u8) {
    cpu.increment_register(n);
}

/// DEC - Decrement Register N
///
/// Operation:
/// R(N) - 1 -> R(N)
pub fn dec(cpu: &mut InternalCpu, n: u8) {
    cpu.decrement_register(n);
}

/// IRX - Increment Register X
///
/// Operation:
/// R(X) + 1 -> R(X)
pub fn irx(cpu: &mut InternalCpu) {
    cpu.increment_register(cpu.x);
}

/// GLO - Get Low Register N
///
/// Operation:
/// R(N).0 -> D
pub fn glo(cpu: &mut InternalCpu, n: u8) {
    cpu.d = utils::low_byte(cpu.r[n as usize]);
}

/// GHI - Get High Register N
///
/// Operation:
/// R(N).1 -> D
pub fn ghi(cpu: &mut InternalCpu, n: u8) {
    cpu.d = utils::high_byte(cpu.r[n as usize]);
}

/// PLO - Put Low Register N
///
/// Operation:
/// D -> R(N).0
pub fn plo(cpu: &mut InternalCpu, n: u8) {
    cpu.set_register_low(n, cpu.d);
}

/// PHI - Put High Register N
///
/// Operation:
/// D -> R(N).1
pub fn phi(cpu: &mut InternalCpu, n: u8) {
    cpu.set_register_high(n, cpu.d);
}

// Logic operations

/// OR, ORI - Logical OR
///
/// Operation:
/// M OR D -> D
pub fn or(cpu: &mut InternalCpu, operand: u8) {
    cpu.b = operand;
    cpu.d |= operand;
}

/// XOR, XRI - Exclusive OR
///
/// Operation:
/// M XOR D -> D
pub fn xor(cpu: &mut InternalCpu, operand: u8) {
    cpu.b = operand;
    cpu.d ^= operand;
}

/// AND, ANI - Logical AND
///
/// Operation:
/// M AND D -> D
pub fn and(cpu: &mut InternalCpu, operand: u8) {
    cpu.b = operand;
    cpu.d &= operand;
}

/// SHR - Shift D Right
///
/// Operation:
/// LSB(D) -> DF; 0 -> MSB(D)
pub fn shr(cpu: &mut InternalCpu) {
    cpu.df = utils::bv(cpu.d, 0) == 1;
    cpu.d >>= 1;
}

/// SHRC - Shift D Right with Carry
///
/// Operation:
/// LSB(D) -> DF; DF -> MSB(D)
pub fn shrc(cpu: &mut InternalCpu) {
    let carry_in = (cpu.df as u8) << 7;
    cpu.df = utils::bv(cpu.d, 0) == 1;
    cpu.d = (cpu.d >> 1) | carry_in;
}

/// SHL - Shift D Left
///
/// Operation:
/// MSB(D) -> DF; 0 -> LSB(D)
pub fn shl(cpu: &mut InternalCpu) {
    cpu.df = utils::bv(cpu.d, 7) == 1;
    cpu.d <<= 1;
}

/// SHLC - Shift D Left with Carry
///
/// Operation:
/// MSB(D) -> DF; DF -> LSB(D)
pub fn shlc(cpu: &mut InternalCpu) {
    let carry_in = cpu.df as u8;
    cpu.df = utils::bv(cpu.d, 7) == 1;
    cpu.d = (cpu.d << 1) | carry_in;
}

// Arithmetic operations
//
// Subtractions add the one's complement of the subtrahend plus a carry in,
// so DF = 1 means "no borrow"

fn alu_add(cpu: &mut InternalCpu, a: u8, b: u8, carry: bool) {
    let res = a as u16 + b as u16 + carry as u16;
    cpu.df = res > 0xFF;
    cpu.d = (res & 0xFF) as u8;
}

/// ADD, ADI - Add
///
/// Operation:
/// M + D -> DF, D
pub fn add(cpu: &mut InternalCpu, operand: u8) {
    cpu.b = operand;
    let d = cpu.d;
    alu_add(cpu, operand, d, false);
}

/// ADC, ADCI - Add with Carry
///
/// Operation:
/// M + D + DF -> DF, D
pub fn adc(cpu: &mut InternalCpu, operand: u8) {
    cpu.b = operand;
    let (d, df) = (cpu.d, cpu.df);
    alu_add(cpu, operand, d, df);
}

/// SD, SDI - Subtract D
///
/// Operation:
/// M - D -> DF, D
pub fn sd(cpu: &mut InternalCpu, operand: u8) {
    cpu.b = operand;
    let d = cpu.d;
    alu_add(cpu, operand, !d, true);
}

/// SDB, SDBI - Subtract D with Borrow
///
/// Operation:
/// M - D - (NOT DF) -> DF, D
pub fn sdb(cpu: &mut InternalCpu, operand: u8) {
    cpu.b = operand;
    let (d, df) = (cpu.d, cpu.df);
    alu_add(cpu, operand, !d, df);
}

/// SM, SMI - Subtract Memory
///
/// Operation:
/// D - M -> DF, D
pub fn sm(cpu: &mut InternalCpu, operand: u8) {
    cpu.b = operand;
    let d = cpu.d;
    alu_add(cpu, d, !operand, true);
}

/// SMB, SMBI - Subtract Memory with Borrow
///
/// Operation:
/// D - M - (NOT DF) -> DF, D
pub fn smb(cpu: &mut InternalCpu, operand: u8) {
    cpu.b = operand;
    let (d, df) = (cpu.d, cpu.df);
    alu_add(cpu, d, !operand, df);
}

// Branch conditions

pub fn always(_cpu: &InternalCpu) -> bool {
    true
}

pub fn never(_cpu: &InternalCpu) -> bool {
    false
}

pub fn q_set(cpu: &InternalCpu) -> bool {
    cpu.q
}

pub fn q_reset(cpu: &InternalCpu) -> bool {
    !cpu.q
}

pub fn d_zero(cpu: &InternalCpu) -> bool {
    cpu.d == 0
}

pub fn d_not_zero(cpu: &InternalCpu) -> bool {
    cpu.d != 0
}

pub fn df_set(cpu: &InternalCpu) -> bool {
    cpu.df
}

pub fn df_reset(cpu: &InternalCpu) -> bool {
    !cpu.df
}

pub fn ie_set(cpu: &InternalCpu) -> bool {
    cpu.ie
}

pub fn ef1_set(cpu: &InternalCpu) -> bool {
    cpu.ef.contains(ExternalFlags::EF1)
}

pub fn ef2_set(cpu: &InternalCpu) -> bool {
    cpu.ef.contains(ExternalFlags::EF2)
}

pub fn ef3_set(cpu: &InternalCpu) -> bool {
    cpu.ef.contains(ExternalFlags::EF3)
}

pub fn ef4_set(cpu: &InternalCpu) -> bool {
    cpu.ef.contains(ExternalFlags::EF4)
}

pub fn ef1_reset(cpu: &InternalCpu) -> bool {
    !ef1_set(cpu)
}

pub fn ef2_reset(cpu: &InternalCpu) -> bool {
    !ef2_set(cpu)
}

pub fn ef3_reset(cpu: &InternalCpu) -> bool {
    !ef3_set(cpu)
}

pub fn ef4_reset(cpu: &InternalCpu) -> bool {
    !ef4_set(cpu)
}

// Control instructions

/// IDL - Idle
///
/// Operation:
/// M(R(0)) -> BUS, wait for DMA or interrupt
pub fn idl(cpu: &mut InternalCpu, memory: &dyn Memory) {
    cpu.bus = memory.read(cpu.r[0]);
}

/// NOP - No Operation
pub fn nop(_cpu: &mut InternalCpu) {}

/// SEP - Set P
///
/// Operation:
/// N -> P
pub fn sep(cpu: &mut InternalCpu, n: u8) {
    cpu.p = n & 0x0F;
}

/// SEX - Set X
///
/// Operation:
/// N -> X
pub fn sex(cpu: &mut InternalCpu, n: u8) {
    cpu.x = n & 0x0F;
}

/// SEQ - Set Q
pub fn seq(cpu: &mut InternalCpu) {
    cpu.q = true;
}

/// REQ - Reset Q
pub fn req(cpu: &mut InternalCpu) {
    cpu.q = false;
}

/// SAV - Save
///
/// Operation:
/// T -> M(R(X))
pub fn sav(cpu: &mut InternalCpu) -> u8 {
    cpu.t
}

/// MARK - Push X, P to Stack
///
/// Operation:
/// (X, P) -> T; (X, P) -> M(R(2)); P -> X; R(2) - 1 -> R(2)
pub fn mark(cpu: &mut InternalCpu, memory: &mut dyn Memory) {
    cpu.t = utils::join_nibbles(cpu.x, cpu.p);
    memory.write(cpu.r[STACK_POINTER as usize], cpu.t);
    cpu.x = cpu.p;
    cpu.decrement_register(STACK_POINTER);
}

fn restore_x_p(cpu: &mut InternalCpu, operand: u8) {
    let (x, p) = utils::nibbles(operand);
    cpu.x = x;
    cpu.p = p;
}

/// RET - Return
///
/// Operation:
/// M(R(X)) -> (X, P); R(X) + 1 -> R(X); 1 -> IE
pub fn ret(cpu: &mut InternalCpu, operand: u8) {
    restore_x_p(cpu, operand);
    cpu.ie = true;
}

/// DIS - Disable
///
/// Operation:
/// M(R(X)) -> (X, P); R(X) + 1 -> R(X); 0 -> IE
pub fn dis(cpu: &mut InternalCpu, operand: u8) {
    restore_x_p(cpu, operand);
    cpu.ie = false;
}

// Input - output byte transfer

/// OUT - Output
///
/// Operation:
/// M(R(X)) -> BUS; R(X) + 1 -> R(X)
pub fn out(cpu: &mut InternalCpu, operand: u8) {
    cpu.bus = operand;
}

/// INP - Input
///
/// Operation:
/// BUS -> M(R(X)); BUS -> D
pub fn inp(cpu: &mut InternalCpu) -> u8 {
    cpu.d = cpu.bus;
    cpu.bus
}
