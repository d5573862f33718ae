use bitflags::bitflags;

use crate::errors::CpuError;
use crate::hardware::{EXTERNAL_FLAG_FIRST, EXTERNAL_FLAG_LAST};

bitflags! {
    /// External input lines EF1 to EF4. Only the environment drives them,
    /// branch instructions sample them.
    #[derive(Default)]
    pub struct ExternalFlags: u8 {
        const EF1 = 0b0000_0001;
        const EF2 = 0b0000_0010;
        const EF3 = 0b0000_0100;
        const EF4 = 0b0000_1000;
    }
}

impl ExternalFlags {
    /// Flag for the 1-based line number `flag` (1 to 4)
    pub fn line(flag: u8) -> Result<Self, CpuError> {
        if !(EXTERNAL_FLAG_FIRST..=EXTERNAL_FLAG_LAST).contains(&flag) {
            return Err(CpuError::InvalidExternalFlag(flag));
        }
        Ok(Self::from_bits_truncate(1 << (flag - EXTERNAL_FLAG_FIRST)))
    }

    /// Render as "0101" with EF1 leftmost
    pub fn to_digits(self) -> String {
        [Self::EF1, Self::EF2, Self::EF3, Self::EF4]
            .iter()
            .map(|line| if self.contains(*line) { '1' } else { '0' })
            .collect()
    }
}
