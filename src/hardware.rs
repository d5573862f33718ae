//! COSMAC 1802 hardware constants

// Memory
// ------
//
// Flat 16-bit address space, every address is backed by RAM
pub const MEMORY_START: u16 = 0x0000;
pub const MEMORY_END: u16 = 0xFFFF;
pub const MEMORY_SIZE: usize = MEMORY_END as usize - MEMORY_START as usize + 1;

// Register file
// -------------

// 16 scratchpad registers of 16 bits each. P and X are 4-bit pointers into it
pub const REGISTER_COUNT: usize = 16;

// R(0) is the program counter after reset and the DMA/idle pointer
pub const RESET_PROGRAM_COUNTER: u8 = 0;

// MARK pushes T through R(2), the conventional stack pointer
pub const STACK_POINTER: u8 = 2;

// External flags EF1 to EF4
pub const EXTERNAL_FLAG_FIRST: u8 = 1;
pub const EXTERNAL_FLAG_LAST: u8 = 4;

// Instruction timing
// ------------------
//
// Machine cycles (ticks) from one fetch to the next
pub const SHORT_INSTRUCTION_CYCLES: u8 = 2;
pub const LONG_INSTRUCTION_CYCLES: u8 = 3;
