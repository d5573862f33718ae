use crate::hardware::{REGISTER_COUNT, RESET_PROGRAM_COUNTER};
use crate::processor::external_flags::ExternalFlags;
use crate::utils;

/// COSMAC 1802 register file.
///
/// Pure data, every instruction handler receives it by exclusive reference
/// and mutates it in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InternalCpu {
    pub d: u8,                      // Data Register (Accumulator)
    pub df: bool,                   // Data Flag (ALU Carry)
    pub b: u8,                      // Auxiliary Holding Register
    pub r: [u16; REGISTER_COUNT],   // Scratchpad Registers
    pub p: u8,                      // Designates Program Counter register
    pub x: u8,                      // Designates Data Pointer register
    pub n: u8,                      // Low-Order Instruction Digit
    pub i: u8,                      // High-Order Instruction Digit
    pub t: u8,                      // X, P saved by MARK (X is high nibble)
    pub ie: bool,                   // Interrupt Enable
    pub q: bool,                    // Output Flip-Flop
    pub bus: u8,                    // Data Bus
    pub ef: ExternalFlags,          // External Flags EF1-4

    // I/O lines N0-N2. Driven by the I/O group for a single machine cycle
    pub n0: bool,
    pub n1: bool,
    pub n2: bool,
}

impl Default for InternalCpu {
    fn default() -> Self {
        Self {
            d: 0,
            df: false,
            b: 0,
            r: [0; REGISTER_COUNT],
            p: 0,
            x: 0,
            n: 0,
            i: 0,
            t: 0,
            ie: true,
            q: false,
            bus: 0,
            ef: ExternalFlags::empty(),
            n0: false,
            n1: false,
            n2: false,
        }
    }
}

impl InternalCpu {
    /// Value of the program counter, R(P)
    pub fn program_counter(&self) -> u16 {
        self.r[self.p as usize]
    }

    /// Value of the data pointer, R(X)
    pub fn data_pointer(&self) -> u16 {
        self.r[self.x as usize]
    }

    pub fn increment_register(&mut self, register: u8) {
        let register = &mut self.r[(register & 0x0F) as usize];
        *register = register.wrapping_add(1);
    }

    pub fn decrement_register(&mut self, register: u8) {
        let register = &mut self.r[(register & 0x0F) as usize];
        *register = register.wrapping_sub(1);
    }

    /// Place `data` in the low byte of R(`register`), keeping the high byte
    pub fn set_register_low(&mut self, register: u8, data: u8) {
        let register = &mut self.r[(register & 0x0F) as usize];
        *register = (*register & 0xFF00) | data as u16;
    }

    /// Place `data` in the high byte of R(`register`), keeping the low byte
    pub fn set_register_high(&mut self, register: u8, data: u8) {
        let register = &mut self.r[(register & 0x0F) as usize];
        *register = (*register & 0x00FF) | ((data as u16) << 8);
    }

    /// Drive the N0-N2 lines from the low three bits of `n`
    pub fn select_io_lines(&mut self, n: u8) {
        self.n0 = utils::bv(n, 0) == 1;
        self.n1 = utils::bv(n, 1) == 1;
        self.n2 = utils::bv(n, 2) == 1;
    }

    pub fn clear_io_lines(&mut self) {
        self.n0 = false;
        self.n1 = false;
        self.n2 = false;
    }

    /// Control fields held in reset. Memory and the scratchpad survive.
    pub fn reset(&mut self) {
        self.i = 0;
        self.n = 0;
        self.q = false;
        self.ie = true;
        self.bus = 0;
    }

    /// One-shot initialization when leaving reset
    pub fn initialize(&mut self) {
        self.x = RESET_PROGRAM_COUNTER;
        self.p = RESET_PROGRAM_COUNTER;
        self.r[RESET_PROGRAM_COUNTER as usize] = 0;
    }
}
