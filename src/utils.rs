/// Return the bit value for `value` at bit position `bit`
pub fn bv(value: u8, bit: u8) -> u8 {
    (value >> bit) & 1
}

/// Return the value from `value` between bit positions `major_bit` and
/// `minor_bit`
pub fn bvs(value: u8, major_bit: u8, minor_bit: u8) -> u8 {
    (value >> minor_bit) & ((1 << (major_bit - minor_bit + 1)) - 1)
}

/// Split an opcode into its high (I) and low (N) nibbles
pub fn nibbles(opcode: u8) -> (u8, u8) {
    (bvs(opcode, 7, 4), bvs(opcode, 3, 0))
}

/// Join high and low nibbles back into a byte
pub fn join_nibbles(high: u8, low: u8) -> u8 {
    ((high & 0x0F) << 4) | (low & 0x0F)
}

/// Low byte of a 16-bit word
pub fn low_byte(word: u16) -> u8 {
    (word & 0x00FF) as u8
}

/// High byte of a 16-bit word
pub fn high_byte(word: u16) -> u8 {
    (word >> 8) as u8
}
