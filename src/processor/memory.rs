use crate::hardware::MEMORY_SIZE;
use crate::interfaces::Memory;

/// 64 kB RAM covering the whole address space
pub struct Ram {
    memory: Vec<u8>,
}

impl Ram {
    pub fn new() -> Self {
        Self {
            memory: vec![0; MEMORY_SIZE],
        }
    }
}

impl Default for Ram {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory for Ram {
    fn read(&self, address: u16) -> u8 {
        self.memory[address as usize]
    }

    fn write(&mut self, address: u16, data: u8) {
        self.memory[address as usize] = data;
    }

    fn size(&self) -> usize {
        self.memory.len()
    }
}
