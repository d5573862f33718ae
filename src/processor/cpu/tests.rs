#![allow(non_snake_case)]

use mockall::mock;
use mockall::predicate::eq;

use super::*;

mock! {
    TestMemory {}

    impl Memory for TestMemory {
        fn read(&self, address: u16) -> u8;
        fn write(&mut self, address: u16, data: u8);
        fn size(&self) -> usize;
    }
}

// Processor out of reset, ready to fetch from $0000
fn test_cpu() -> Cpu {
    let mut cpu = Cpu::new();
    cpu.run().unwrap();
    assert_eq!(cpu.state, State::Fetch);
    cpu
}

// Fetch whatever R(P) points to, replace the latched opcode and execute it
fn force_two_cycle_instruction(cpu: &mut Cpu, opcode: u8, repeat: usize) {
    for _ in 0..repeat {
        cpu.tick().unwrap(); // fetch
        let (i, n) = utils::nibbles(opcode);
        cpu.cpu.i = i;
        cpu.cpu.n = n;
        cpu.tick().unwrap(); // execute
    }
}

fn force_three_cycle_instruction(cpu: &mut Cpu, opcode: u8, repeat: usize) {
    for _ in 0..repeat {
        force_two_cycle_instruction(cpu, opcode, 1);
        assert_eq!(cpu.state, State::ForceExecute);
        cpu.tick().unwrap(); // force execute
    }
}

//////////////////////////////////////////////////////////////////////
// STATE MACHINE
//////////////////////////////////////////////////////////////////////

#[test]
fn test_power_on_state() {
    let cpu = Cpu::new();
    assert_eq!(cpu.state(), &State::Reset);
    assert!(cpu.ie());
    assert!(!cpu.is_running());
    assert_eq!(cpu.ticks(), 0);
}

#[test]
fn test_reset_clears_control_fields() {
    let mut cpu = test_cpu();
    cpu.cpu.q = true;
    cpu.cpu.ie = false;
    cpu.cpu.bus = 0x42;
    cpu.cpu.r[4] = 0x1234;
    cpu.load(0x2000, &[0x99]).unwrap();

    cpu.reset().unwrap();
    assert_eq!(cpu.state(), &State::Reset);
    assert!(!cpu.q());
    assert!(cpu.ie());
    assert_eq!(cpu.bus(), 0);
    assert_eq!((cpu.i(), cpu.n()), (0, 0));
    assert_eq!(cpu.r(4), 0x1234);
    assert_eq!(cpu.memory().read(0x2000), 0x99);

    // reset while in reset stays there
    cpu.reset().unwrap();
    cpu.tick().unwrap();
    assert_eq!(cpu.state(), &State::Reset);
}

#[test]
fn test_run_initializes_registers() {
    let mut cpu = Cpu::new();
    cpu.cpu.x = 4;
    cpu.cpu.p = 3;
    cpu.cpu.r[0] = 0x1234;
    cpu.cpu.r[3] = 0x5678;

    cpu.run().unwrap();
    assert_eq!(cpu.state(), &State::Fetch);
    assert_eq!((cpu.x(), cpu.p()), (0, 0));
    assert_eq!(cpu.r(0), 0);
    assert_eq!(cpu.r(3), 0x5678);
}

#[test]
fn test_fetch_latches_opcode() {
    let mut cpu = test_cpu();
    cpu.load(0x0000, &[0xF4]).unwrap();

    cpu.tick().unwrap();
    assert_eq!(cpu.state(), &State::Execute);
    assert_eq!((cpu.i(), cpu.n()), (0xF, 0x4));
    assert_eq!(cpu.program_counter(), 1);
}

#[test]
fn test_pause_and_resume() {
    let mut cpu = test_cpu();
    cpu.load(0x0000, &[0x11, 0x11]).unwrap(); // INC R(1), INC R(1)

    cpu.tick().unwrap(); // fetch
    cpu.pause().unwrap();
    assert_eq!(cpu.state(), &State::Pause(Box::new(State::Execute)));
    assert!(!cpu.is_running());

    for _ in 0..10 {
        cpu.tick().unwrap();
    }
    cpu.pause().unwrap();
    assert_eq!(cpu.r(1), 0);
    assert_eq!(cpu.program_counter(), 1);

    // run resumes into execute and ticks it
    cpu.run().unwrap();
    assert_eq!(cpu.r(1), 1);
    assert_eq!(cpu.state(), &State::Fetch);
}

#[test]
fn test_pause_from_reset_resumes_into_reset() {
    let mut cpu = Cpu::new();
    cpu.pause().unwrap();
    assert_eq!(cpu.state(), &State::Pause(Box::new(State::Reset)));

    cpu.run().unwrap();
    assert_eq!(cpu.state(), &State::Reset);

    cpu.run().unwrap();
    assert_eq!(cpu.state(), &State::Fetch);
}

#[test]
fn test_reset_from_pause() {
    let mut cpu = test_cpu();
    cpu.pause().unwrap();

    cpu.reset().unwrap();
    assert_eq!(cpu.state(), &State::Reset);
}

#[test]
fn test_run_while_running_advances_one_cycle() {
    let mut cpu = test_cpu();
    cpu.load(0x0000, &[0x15]).unwrap(); // INC R(5)

    cpu.run().unwrap();
    assert_eq!(cpu.state(), &State::Execute);
    cpu.run().unwrap();
    assert_eq!(cpu.state(), &State::Fetch);
    assert_eq!(cpu.r(5), 1);
}

//////////////////////////////////////////////////////////////////////
// PROGRAM COUNTER AND TIMING
//////////////////////////////////////////////////////////////////////

#[test]
fn test_increment_program_counter() {
    let mut cpu = test_cpu();

    force_three_cycle_instruction(&mut cpu, 0xC4, 5); // NOP
    assert_eq!(cpu.r(0), 5);
    assert_eq!(cpu.state(), &State::Fetch);
    assert_eq!(cpu.ticks(), 1 + 5 * 3);

    force_two_cycle_instruction(&mut cpu, 0x7A, 5); // REQ
    assert_eq!(cpu.r(0), 10);
    assert_eq!(cpu.ticks(), 1 + 5 * 3 + 5 * 2);
}

#[test]
fn test_program_counter_rolls_over() {
    let mut cpu = test_cpu();
    cpu.cpu.r[0] = 0xFFFF;

    force_two_cycle_instruction(&mut cpu, 0x7A, 1);
    assert_eq!(cpu.r(0), 0x0000);
}

#[test]
fn test_control_instruction_IDL() {
    let mut cpu = test_cpu();
    cpu.load(0x0000, &[0x00]).unwrap();
    cpu.load(0x0001, &[0x77]).unwrap();

    cpu.tick().unwrap(); // fetch IDL
    for _ in 0..20 {
        cpu.tick().unwrap();
        assert_eq!(cpu.state(), &State::Execute);
    }
    assert_eq!(cpu.r(0), 1);
    // R(0) was already advanced past the opcode
    assert_eq!(cpu.bus(), 0x77);
}

#[test]
fn test_control_instruction_IDL_forced() {
    let mut cpu = test_cpu();

    force_two_cycle_instruction(&mut cpu, 0x00, 5);
    assert_eq!(cpu.r(0), 1);
}

#[test]
fn test_control_instruction_NOP_keeps_registers() {
    let mut cpu = test_cpu();
    cpu.cpu.d = 0x42;
    cpu.cpu.r[7] = 0x7777;
    let mut before = cpu.cpu.clone();

    force_three_cycle_instruction(&mut cpu, 0xC4, 1);
    before.r[0] = 1;
    before.i = 0xC;
    before.n = 0x4;
    assert_eq!(cpu.cpu, before);
}

//////////////////////////////////////////////////////////////////////
// DECODE FAILURE
//////////////////////////////////////////////////////////////////////

#[test]
fn test_invalid_instruction_halts() {
    let mut cpu = test_cpu();
    cpu.load(0x0000, &[0x7B, 0x68, 0x7A]).unwrap(); // SEQ, invalid, REQ

    cpu.tick().unwrap();
    cpu.tick().unwrap();
    assert!(cpu.q());

    cpu.tick().unwrap(); // fetch 0x68
    let registers = cpu.cpu.clone();
    assert_eq!(
        cpu.tick(),
        Err(CpuError::InvalidInstruction {
            opcode: 0x68,
            address: 0x0001
        })
    );
    assert!(cpu.is_halted());
    assert_eq!(cpu.cpu, registers);

    // no further progress
    for _ in 0..3 {
        assert_eq!(
            cpu.tick(),
            Err(CpuError::Halted {
                opcode: 0x68,
                address: 0x0001
            })
        );
    }
    assert!(cpu.run().is_err());
    assert!(cpu.pause().is_err());
    assert_eq!(cpu.cpu, registers);
    assert!(cpu.q());

    // reset clears the fault
    cpu.reset().unwrap();
    assert!(!cpu.is_halted());
    assert!(!cpu.q());
    cpu.run().unwrap();
    assert_eq!(cpu.state(), &State::Fetch);
}

//////////////////////////////////////////////////////////////////////
// INSTRUCTIONS
//////////////////////////////////////////////////////////////////////

#[test]
fn test_arithmetic_instruction_ADD() {
    let mut cpu = test_cpu();
    cpu.cpu.d = 0x3A;
    cpu.cpu.r[2] = 0x1234;
    cpu.cpu.x = 2;
    cpu.load(0x1234, &[0x4B]).unwrap();

    force_two_cycle_instruction(&mut cpu, 0xF4, 1);
    assert_eq!(cpu.d(), 0x85);
    assert!(!cpu.df());
    assert_eq!(cpu.state(), &State::Fetch);
}

#[test]
fn test_arithmetic_instruction_ADD_with_carry() {
    let mut cpu = test_cpu();
    cpu.cpu.d = 0x3A;
    cpu.cpu.r[2] = 0x1234;
    cpu.cpu.x = 2;
    cpu.load(0x1234, &[0xF0]).unwrap();

    force_two_cycle_instruction(&mut cpu, 0xF4, 1);
    assert_eq!(cpu.d(), 0x2A);
    assert!(cpu.df());
    assert_eq!(cpu.state(), &State::Fetch);
}

#[test]
fn test_arithmetic_instruction_ADI() {
    let mut cpu = test_cpu();
    cpu.cpu.d = 0x3A;
    cpu.cpu.r[0] = 0x1234;
    cpu.load(0x1235, &[0x4B]).unwrap();

    force_two_cycle_instruction(&mut cpu, 0xFC, 1);
    assert_eq!(cpu.d(), 0x85);
    assert!(!cpu.df());
    assert_eq!(cpu.memory().read(0x1234), 0);
    assert_eq!(cpu.r(0), 0x1236);
    assert_eq!(cpu.state(), &State::Fetch);
}

#[test]
fn test_arithmetic_instruction_ADCI() {
    let mut cpu = test_cpu();
    cpu.cpu.d = 0xC2;
    cpu.cpu.df = true;
    cpu.cpu.r[0] = 0x1234;
    cpu.load(0x1235, &[0x3D]).unwrap();

    force_two_cycle_instruction(&mut cpu, 0x7C, 1);
    assert_eq!(cpu.d(), 0x00);
    assert!(cpu.df());
    assert_eq!(cpu.r(0), 0x1236);
}

#[test]
fn test_arithmetic_instruction_SMI() {
    let mut cpu = test_cpu();
    cpu.cpu.d = 0x10;
    cpu.load(0x0001, &[0x11]).unwrap();

    force_two_cycle_instruction(&mut cpu, 0xFF, 1);
    assert_eq!(cpu.d(), 0xFF);
    assert!(!cpu.df());
    assert_eq!(cpu.b(), 0x11);
}

#[test]
fn test_logic_instruction_ORI() {
    let mut cpu = test_cpu();
    cpu.cpu.r[0] = 0x1234;

    let expected = [((0, 0, 0x1235), 0), ((0, 1, 0x1237), 1), ((1, 0, 0x1239), 1), ((1, 1, 0x123B), 1)];
    for ((a, b, operand_address), result) in expected {
        cpu.load(operand_address, &[a]).unwrap();
        cpu.cpu.d = b;
        force_two_cycle_instruction(&mut cpu, 0xF9, 1);
        assert_eq!(cpu.d(), result);
        assert_eq!(cpu.r(0), operand_address + 1);
    }
}

#[test]
fn test_logic_instruction_XOR() {
    let mut cpu = test_cpu();
    cpu.cpu.x = 8;
    cpu.cpu.r[8] = 0x1111;
    cpu.load(0x1111, &[0b1100]).unwrap();
    cpu.cpu.d = 0b1010;

    force_two_cycle_instruction(&mut cpu, 0xF3, 1);
    assert_eq!(cpu.d(), 0b0110);
    assert_eq!(cpu.r(8), 0x1111);
}

#[test]
fn test_register_instruction_GLO_GHI() {
    let mut cpu = test_cpu();
    cpu.cpu.r[3] = 0x1234;

    force_two_cycle_instruction(&mut cpu, 0x83, 1);
    assert_eq!(cpu.d(), 0x34);
    force_two_cycle_instruction(&mut cpu, 0x93, 1);
    assert_eq!(cpu.d(), 0x12);
}

#[test]
fn test_register_instruction_PLO() {
    let mut cpu = test_cpu();
    cpu.cpu.r[3] = 0xFFFF;
    cpu.cpu.d = 0x42;

    force_two_cycle_instruction(&mut cpu, 0xA3, 1);
    assert_eq!(cpu.r(3), 0xFF42);
}

#[test]
fn test_register_instruction_INC_overflow() {
    let mut cpu = test_cpu();

    force_two_cycle_instruction(&mut cpu, 0x12, 0xFFFF + 10);
    assert_eq!(cpu.r(2), 9);
}

#[test]
fn test_register_instruction_DEC() {
    let mut cpu = test_cpu();

    force_two_cycle_instruction(&mut cpu, 0x21, 5);
    assert_eq!(cpu.r(1), 0xFFFB);
}

#[test]
fn test_register_instruction_INC_DEC_every_register() {
    const STEPS: u16 = 5;

    for n in 0..16u8 {
        let mut cpu = test_cpu();
        // fetch from a register other than the one under test
        let p = if n == 0xF { 0xE } else { 0xF };
        cpu.cpu.p = p;
        cpu.cpu.r[p as usize] = 0x8000;

        cpu.cpu.r[n as usize] = 0xFFFD;
        force_two_cycle_instruction(&mut cpu, 0x10 | n, STEPS as usize);
        assert_eq!(cpu.r(n), 0xFFFDu16.wrapping_add(STEPS), "INC R({n:X})");

        cpu.cpu.r[n as usize] = 0x0002;
        force_two_cycle_instruction(&mut cpu, 0x20 | n, STEPS as usize);
        assert_eq!(cpu.r(n), 0x0002u16.wrapping_sub(STEPS), "DEC R({n:X})");

        assert_eq!(cpu.r(p), 0x8000 + 2 * STEPS);
    }
}

#[test]
fn test_register_instruction_IRX_overflow() {
    let mut cpu = test_cpu();
    cpu.cpu.x = 5;

    force_two_cycle_instruction(&mut cpu, 0x60, 0xFFFF + 5);
    assert_eq!(cpu.r(5), 4);
}

#[test]
fn test_memory_instruction_LDN() {
    let mut cpu = test_cpu();
    cpu.load(0x1234, &[42]).unwrap();
    cpu.cpu.r[9] = 0x1234;

    force_two_cycle_instruction(&mut cpu, 0x09, 1);
    assert_eq!(cpu.d(), 42);
    assert_eq!(cpu.r(9), 0x1234);
}

#[test]
fn test_memory_instruction_LDA() {
    let mut cpu = test_cpu();
    cpu.load(0x1234, &[42]).unwrap();
    cpu.cpu.r[9] = 0x1234;

    force_two_cycle_instruction(&mut cpu, 0x49, 1);
    assert_eq!(cpu.d(), 42);
    assert_eq!(cpu.r(9), 0x1235);
}

#[test]
fn test_memory_instruction_LDA_overflow() {
    let mut cpu = test_cpu();
    cpu.cpu.r[5] = 0xFFFF;

    force_two_cycle_instruction(&mut cpu, 0x45, 1);
    assert_eq!(cpu.r(5), 0x0000);
}

#[test]
fn test_memory_instruction_STR_writes_once() {
    let mut memory = MockTestMemory::new();
    memory.expect_read().with(eq(0x0000)).return_const(0x53u8); // STR R(3)
    memory
        .expect_write()
        .with(eq(0x4000), eq(0x42))
        .times(1)
        .return_const(());

    let mut cpu = Cpu::with_memory(Box::new(memory));
    cpu.run().unwrap();
    cpu.cpu.r[3] = 0x4000;
    cpu.cpu.d = 0x42;

    cpu.tick().unwrap();
    cpu.tick().unwrap();
    assert_eq!(cpu.r(3), 0x4000);
}

#[test]
fn test_memory_instruction_STXD() {
    let mut memory = MockTestMemory::new();
    memory.expect_read().with(eq(0x0000)).return_const(0x73u8); // STXD
    memory
        .expect_write()
        .with(eq(0x00FF), eq(0x99))
        .times(1)
        .return_const(());

    let mut cpu = Cpu::with_memory(Box::new(memory));
    cpu.run().unwrap();
    cpu.cpu.x = 2;
    cpu.cpu.r[2] = 0x00FF;
    cpu.cpu.d = 0x99;

    cpu.tick().unwrap();
    cpu.tick().unwrap();
    assert_eq!(cpu.r(2), 0x00FE);
}

#[test]
fn test_memory_instruction_LDXA() {
    let mut memory = MockTestMemory::new();
    memory.expect_read().with(eq(0x0000)).return_const(0x72u8); // LDXA
    memory.expect_read().with(eq(0x2000)).times(1).return_const(0x5Au8);
    memory.expect_write().never();

    let mut cpu = Cpu::with_memory(Box::new(memory));
    cpu.run().unwrap();
    cpu.cpu.x = 6;
    cpu.cpu.r[6] = 0x2000;

    cpu.tick().unwrap();
    cpu.tick().unwrap();
    assert_eq!(cpu.d(), 0x5A);
    assert_eq!(cpu.r(6), 0x2001);
}

#[test]
fn test_short_branch_instruction_BR() {
    let mut cpu = test_cpu();
    cpu.cpu.r[0] = 0x1234;
    cpu.load(0x1235, &[0x42]).unwrap();

    force_two_cycle_instruction(&mut cpu, 0x30, 1);
    assert_eq!(cpu.r(0), 0x1242);
    assert_eq!(cpu.state(), &State::Fetch);
}

#[test]
fn test_short_branch_instruction_BZ_not_taken() {
    let mut cpu = test_cpu();
    cpu.cpu.d = 1;
    cpu.cpu.r[0] = 0x1234;
    cpu.load(0x1235, &[0x42]).unwrap();

    force_two_cycle_instruction(&mut cpu, 0x32, 1);
    assert_eq!(cpu.r(0), 0x1236);
}

#[test]
fn test_short_branch_instruction_B1_external_flag() {
    let mut cpu = test_cpu();
    cpu.load(0x0001, &[0x80]).unwrap();
    cpu.set_external_flag(1, 1).unwrap();

    force_two_cycle_instruction(&mut cpu, 0x34, 1);
    assert_eq!(cpu.r(0), 0x0080);
}

#[test]
fn test_long_branch_instruction_LBR() {
    let mut cpu = test_cpu();
    cpu.load(0x0001, &[0x12, 0x34]).unwrap();

    force_three_cycle_instruction(&mut cpu, 0xC0, 1);
    assert_eq!(cpu.r(0), 0x1234);
    assert_eq!(cpu.state(), &State::Fetch);
}

#[test]
fn test_long_branch_instruction_LBNZ_not_taken() {
    let mut cpu = test_cpu();
    cpu.load(0x0001, &[0x12, 0x34]).unwrap();

    force_three_cycle_instruction(&mut cpu, 0xCA, 1);
    assert_eq!(cpu.r(0), 0x0003);
}

#[test]
fn test_long_skip_instruction_LSIE() {
    let mut cpu = test_cpu();

    force_three_cycle_instruction(&mut cpu, 0xCC, 1);
    assert_eq!(cpu.r(0), 0x0003);

    cpu.cpu.ie = false;
    force_three_cycle_instruction(&mut cpu, 0xCC, 1);
    assert_eq!(cpu.r(0), 0x0004);
}

#[test]
fn test_control_instruction_SEP() {
    let mut cpu = test_cpu();
    cpu.cpu.r[3] = 0x0100;
    cpu.load(0x0100, &[0x7B]).unwrap(); // SEQ

    force_two_cycle_instruction(&mut cpu, 0xD3, 1);
    assert_eq!(cpu.p(), 3);
    assert_eq!(cpu.program_counter(), 0x0100);

    cpu.tick().unwrap();
    cpu.tick().unwrap();
    assert!(cpu.q());
    assert_eq!(cpu.r(3), 0x0101);
    assert_eq!(cpu.r(0), 0x0001);
}

#[test]
fn test_control_instruction_RET() {
    let mut cpu = test_cpu();
    cpu.cpu.x = 2;
    cpu.cpu.r[2] = 0x0200;
    cpu.cpu.ie = false;
    cpu.load(0x0200, &[0x35]).unwrap();

    force_two_cycle_instruction(&mut cpu, 0x70, 1);
    assert_eq!((cpu.x(), cpu.p()), (3, 5));
    assert_eq!(cpu.r(2), 0x0201);
    assert!(cpu.ie());
}

#[test]
fn test_control_instruction_SAV() {
    let mut cpu = test_cpu();
    cpu.cpu.t = 0x21;
    cpu.cpu.x = 4;
    cpu.cpu.r[4] = 0x0300;

    force_two_cycle_instruction(&mut cpu, 0x78, 1);
    assert_eq!(cpu.memory().read(0x0300), 0x21);
    assert_eq!(cpu.r(4), 0x0300);
}

#[test]
fn test_io_instruction_OUT() {
    let mut cpu = test_cpu();
    cpu.cpu.x = 4;
    cpu.cpu.r[4] = 0x1234;
    cpu.load(0x1234, &[42]).unwrap();

    force_two_cycle_instruction(&mut cpu, 0x62, 1);
    assert_eq!(cpu.bus(), 42);
    assert_eq!(cpu.io_lines(), (false, true, false));
    assert_eq!(cpu.r(4), 0x1235);
    assert_eq!(cpu.memory().read(0x1234), 42);
    assert_eq!(cpu.state(), &State::Fetch);

    force_three_cycle_instruction(&mut cpu, 0xC4, 1);
    assert_eq!(cpu.io_lines(), (false, false, false));
}

#[test]
fn test_io_instruction_INP() {
    let mut cpu = test_cpu();
    cpu.cpu.x = 4;
    cpu.cpu.r[4] = 0x1234;
    cpu.set_bus(42).unwrap();

    force_two_cycle_instruction(&mut cpu, 0x6A, 1);
    assert_eq!(cpu.memory().read(0x1234), 42);
    assert_eq!(cpu.d(), 42);
    assert_eq!(cpu.io_lines(), (false, true, false));
    assert_eq!(cpu.r(4), 0x1234);

    // lines only last for the execute cycle
    cpu.tick().unwrap();
    assert_eq!(cpu.io_lines(), (false, false, false));
}

#[test]
fn test_io_lines_clear_while_halted() {
    let mut cpu = test_cpu();
    cpu.load(0x0000, &[0x68]).unwrap();

    cpu.tick().unwrap(); // fetch 0x68
    assert!(cpu.tick().is_err());
    assert!(cpu.is_halted());

    cpu.cpu.select_io_lines(3);
    assert_eq!(cpu.io_lines(), (true, true, false));
    assert!(matches!(cpu.tick(), Err(CpuError::Halted { .. })));
    assert_eq!(cpu.io_lines(), (false, false, false));
}

//////////////////////////////////////////////////////////////////////
// EXTERNAL STIMULUS
//////////////////////////////////////////////////////////////////////

#[test]
fn test_load_past_end_of_memory_is_rejected() {
    let mut cpu = test_cpu();
    cpu.load(0x0000, &[0x7B]).unwrap();

    assert_eq!(
        cpu.load(0xFFFF, &[0x11, 0x22]),
        Err(CpuError::AddressOverflow {
            address: 0xFFFF,
            length: 2
        })
    );
    // nothing written, the reset vector is intact
    assert_eq!(cpu.memory().read(0x0000), 0x7B);
    assert_eq!(cpu.memory().read(0xFFFF), 0x00);

    cpu.load(0xFFFF, &[0x11]).unwrap();
    assert_eq!(cpu.memory().read(0xFFFF), 0x11);
    cpu.load(0xFFFF, &[]).unwrap();

    cpu.tick().unwrap();
    cpu.tick().unwrap();
    assert!(cpu.q());
}

#[test]
fn test_set_external_flag() {
    let mut cpu = Cpu::new();

    assert_eq!(cpu.external_flag(3), Ok(false));
    cpu.set_external_flag(3, 1).unwrap();
    assert_eq!(cpu.external_flag(3), Ok(true));
    cpu.toggle_external_flag(3).unwrap();
    assert_eq!(cpu.external_flag(3), Ok(false));
}

#[test]
fn test_invalid_external_flag() {
    let mut cpu = Cpu::new();

    assert_eq!(
        cpu.set_external_flag(5, 1),
        Err(CpuError::InvalidExternalFlag(5))
    );
    assert_eq!(
        cpu.set_external_flag(0, 1),
        Err(CpuError::InvalidExternalFlag(0))
    );
    assert_eq!(
        cpu.set_external_flag(2, 2),
        Err(CpuError::InvalidFlagValue { flag: 2, value: 2 })
    );
    assert_eq!(cpu.external_flag(9), Err(CpuError::InvalidExternalFlag(9)));
    assert!(cpu.external_flags().is_empty());
}

#[test]
fn test_set_bus() {
    let mut cpu = Cpu::new();

    cpu.set_bus(0xFF).unwrap();
    assert_eq!(cpu.bus(), 0xFF);
    assert_eq!(cpu.set_bus(0x100), Err(CpuError::InvalidBusValue(0x100)));
    assert_eq!(cpu.bus(), 0xFF);
}
