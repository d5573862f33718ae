pub mod cpu;
pub mod external_flags;
pub mod memory;
pub mod state;


mod instruction;
mod instruction_set;
mod internal_cpu;
