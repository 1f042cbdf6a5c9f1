use crate::cpu_vm16::test_helpers::*;

/// These tests assert the various operations the CPU can do. The macros
/// from test_helpers keep them terse: each one assembles a program, runs
/// it to the HALT, and checks a register plus the full status byte.
/// For instance this command will run a single test:
///
/// `cargo test cpu_vm16::test::alu::add_carry_wraps`
///
///             TestName    Register Status  Program
///             |           |        |       |
///             v           v        v       v
/// register_a!(add_basic,  5,       H,      "LOAD #2\nADD #3\nHALT");

mod loads {
    use super::*;

    register_a!(load_value, 42, H, "LOAD #42\nHALT");
    register_a!(load_zero, 0, H | Z, "LOAD #0\nHALT");
    register_a!(load_negative_bit, 0x8000, H | N, "LOAD #0x8000\nHALT");
    // Write a value out, wipe A, then read it back through a DIRECT
    // operand.
    register_a!(load_direct, 0x5678, H, "
        LOAD #0x5678
        STORE 0x0400
        LOAD #0
        LOAD 0x0400
        HALT
    ");
    // The same through a register pointer.
    register_a!(load_indirect, 0x1234, H, "
        LOAD #0x0300
        MOV A B
        LOAD #0x1234
        STORE [B]
        LOAD #0
        LOAD [B]
        HALT
    ");
}

mod alu {
    use super::*;

    register_a!(add_basic, 5, H, "LOAD #2\nADD #3\nHALT");
    register_a!(add_carry_wraps, 0, H | C | Z, "LOAD #0xFFFF\nADD #1\nHALT");
    // The second ADD must clear the carry left by the first.
    register_a!(add_clears_stale_carry, 1, H, "LOAD #0xFFFF\nADD #1\nADD #1\nHALT");
    register_a!(sub_basic, 0x22, H, "LOAD #0x33\nSUB #0x11\nHALT");
    register_a!(sub_to_zero, 0, H | Z, "LOAD #5\nSUB #5\nHALT");
    register_a!(sub_borrow_sets_carry, 0xFFFF, H | C | N, "LOAD #0\nSUB #1\nHALT");
    register_a!(mul_basic, 900, H, "LOAD #300\nMUL #3\nHALT");
    register_a!(mul_keeps_low_16_bits, 0, H | Z, "LOAD #0x8000\nMUL #2\nHALT");
    register_a!(div_basic, 14, H, "LOAD #100\nDIV #7\nHALT");
    // Dividing by zero leaves both A and the flags exactly as they were.
    register_a!(div_by_zero_is_a_no_op, 0x8000, H | N, "LOAD #0x8000\nDIV #0\nHALT");
    register_a!(and_basic, 0x08, H, "LOAD #0x0C\nAND #0x0A\nHALT");
    register_a!(or_basic, 0x0F, H, "LOAD #0x0C\nOR #0x03\nHALT");
    register_a!(xor_basic, 0xF0, H, "LOAD #0xFF\nXOR #0x0F\nHALT");
    register_a!(not_inverts, 0xFFFF, H | N, "LOAD #0\nNOT\nHALT");
}

mod shifts {
    use super::*;

    register_a!(shl_basic, 16, H, "LOAD #1\nSHL #4\nHALT");
    register_a!(shl_by_sixteen_clears, 0, H | Z, "LOAD #0xFFFF\nSHL #16\nHALT");
    register_a!(shr_basic, 0x10, H, "LOAD #0x80\nSHR #3\nHALT");
    register_a!(shr_by_large_count_clears, 0, H | Z, "LOAD #0xFFFF\nSHR #40\nHALT");
}

mod compare {
    use super::*;

    register_a!(cmp_less_sets_carry_and_negative, 1, H | C | N, "LOAD #1\nCMP #2\nHALT");
    register_a!(cmp_equal_sets_zero, 2, H | Z, "LOAD #2\nCMP #2\nHALT");
    register_a!(cmp_greater_clears_flags, 3, H, "LOAD #3\nCMP #2\nHALT");
    register_a!(test_does_not_store, 0x0F, H | Z, "LOAD #0x0F\nTEST #0xF0\nHALT");
    register_a!(test_nonzero, 0x0F, H, "LOAD #0x0F\nTEST #0x08\nHALT");
}

mod registers {
    use super::*;

    register_c!(inc_selected_register, 6, H, "LOAD #5\nMOV A C\nINC C\nHALT");
    register_a!(inc_defaults_to_accumulator, 1, H, "INC\nHALT");
    register_a!(inc_wraps, 0, H | Z, "LOAD #0xFFFF\nINC\nHALT");
    register_b!(dec_selected_register, 0, H | Z, "LOAD #1\nMOV A B\nDEC B\nHALT");
    register_a!(dec_wraps_negative, 0xFFFF, H | N, "DEC\nHALT");
    register_d!(mov_copies_and_updates_flags, 0, H | Z, "LOAD #0\nMOV A D\nHALT");
    register_d!(mov_between_general_registers, 7, H, "
        LOAD #7
        MOV A B
        MOV B C
        MOV C D
        HALT
    ");

    // If the assembler and the engine disagreed about the width of a
    // REGISTER-mode MOV, the HALT would never line up and the cycle count
    // would run away.
    #[test]
    fn mov_keeps_the_instruction_stream_aligned() {
        let cpu = run_program("LOAD #3\nMOV A B\nHALT");
        assert_eq!(cpu.b, 3);
        assert_eq!(cpu.cycles, 3);
    }
}

mod memory {
    use super::*;

    #[test]
    fn store_direct_writes_memory() {
        let mut cpu = run_program("LOAD #0xABCD\nSTORE 0x0200\nHALT");
        assert_eq!(cpu.bus.read_u16(0x0200), 0xABCD);
        // Little-endian layout in the backing array.
        assert_eq!(cpu.bus.peek(0x0200), 0xCD);
        assert_eq!(cpu.bus.peek(0x0201), 0xAB);
    }

    #[test]
    fn store_indirect_writes_through_a_register() {
        let mut cpu = run_program("
            LOAD #0x0300
            MOV A B
            LOAD #0x1234
            STORE [B]
            HALT
        ");
        assert_eq!(cpu.bus.read_u16(0x0300), 0x1234);
    }

    // STORE only acts on modes that carry an address.
    #[test]
    fn store_register_mode_writes_nothing() {
        let cpu = run_program("LOAD #1\nSTORE A\nHALT");
        assert_eq!(cpu.a, 1);
        assert_status(&cpu, H);
    }
}

mod stack {
    use super::*;
    use crate::bus::Bus;
    use crate::constants::STACK_START;
    use crate::cpu_vm16::CpuVm16;

    #[test]
    fn push_pop_round_trip_restores_the_stack() {
        let cpu = run_program("LOAD #0xBEEF\nPUSH A\nLOAD #0\nPOP\nHALT");
        assert_eq!(cpu.a, 0xBEEF);
        assert_eq!(cpu.sp, STACK_START);
    }

    #[test]
    fn push_pull_round_trips() {
        let mut cpu = CpuVm16::new(Bus::new());
        for value in [0x0000, 0x0001, 0x7FFF, 0x8000, 0xBEEF, 0xFFFF] {
            cpu.push_stack_u16(value);
            assert_eq!(cpu.sp, STACK_START - 2);
            assert_eq!(cpu.pull_stack_u16(), value);
            assert_eq!(cpu.sp, STACK_START);
        }
    }

    #[test]
    fn the_byte_at_sp_is_the_free_slot() {
        let mut cpu = CpuVm16::new(Bus::new());
        cpu.push_stack_u16(0x1234);
        // The value reads back little-endian, low byte on top.
        assert_eq!(cpu.bus.peek(cpu.sp.wrapping_add(1)), 0x34);
        assert_eq!(cpu.bus.peek(cpu.sp.wrapping_add(2)), 0x12);
    }

    // POP's unused two-byte immediate is skipped by the fetch, so the two
    // zero bytes run as NOPs before the HALT is reached.
    #[test]
    fn pop_immediate_operand_bytes_execute_as_nops() {
        let cpu = run_program("LOAD #1\nPUSH A\nPOP\nHALT");
        assert_eq!(cpu.a, 1);
        // LOAD, PUSH, POP, NOP, NOP, HALT.
        assert_eq!(cpu.cycles, 6);
    }
}

mod subroutines {
    use super::*;
    use crate::bus::Bus;
    use crate::constants::STACK_START;
    use crate::cpu_vm16::CpuVm16;

    #[test]
    fn call_and_ret_balance() {
        let cpu = run_program("CALL #sub\nHALT\nsub: LOAD #7\nRET");
        assert_eq!(cpu.a, 7);
        assert_eq!(cpu.sp, STACK_START);
        assert_status(&cpu, H);
    }

    #[test]
    fn nested_calls_balance() {
        let cpu = run_program("
            CALL #first
            HALT
            first: CALL #second
            RET
            second: LOAD #9
            RET
        ");
        assert_eq!(cpu.a, 9);
        assert_eq!(cpu.sp, STACK_START);
    }

    #[test]
    fn call_pushes_the_next_instruction_address() {
        let mut cpu = CpuVm16::new(Bus::new());
        cpu.load_program(&assemble("CALL #sub\nHALT\nsub: HALT"), 0)
            .unwrap();
        cpu.running = true;
        cpu.step();
        assert_eq!(cpu.pc, 6);
        assert_eq!(cpu.sp, STACK_START - 2);
        assert_eq!(cpu.pull_stack_u16(), 3);
    }
}

mod io {
    use super::*;
    use crate::bus::Bus;
    use crate::cpu_vm16::{CpuVm16, StatusFlag};

    #[test]
    fn in_reads_the_console_port() {
        let (cpu, _output) = run_program_with_console("IN #0\nHALT", b"Q");
        assert_eq!(cpu.a, b'Q' as u16);
    }

    #[test]
    fn in_from_an_unmapped_port_reads_zero() {
        let (cpu, _output) = run_program_with_console("IN #2\nHALT", b"Q");
        assert_eq!(cpu.a, 0);
        assert!(cpu.is_status_flag_set(StatusFlag::Zero));
    }

    #[test]
    fn out_writes_the_low_byte_of_a() {
        let (_cpu, output) = run_program_with_console("LOAD #0x0148\nOUT\nHALT", &[]);
        assert_eq!(*output.borrow(), vec![0x48]);
    }

    // The port argument of OUT is decoded but ignored.
    #[test]
    fn out_ignores_its_port_argument() {
        let (_cpu, output) = run_program_with_console("LOAD #65\nOUT #3\nHALT", &[]);
        assert_eq!(*output.borrow(), vec![65]);
    }

    #[test]
    fn hello_string_loop_prints_exactly() {
        let (console, output) = buffer_console(&[]);
        let mut cpu = CpuVm16::new(Bus::with_console(console));
        for (index, byte) in b"Hi!\0".iter().enumerate() {
            cpu.bus.set_u8(0x0100 + index as u16, *byte);
        }
        cpu.load_program(
            &assemble("
                LOAD #0x0100
                MOV A B
                loop: LOAD [B]
                JZ #end
                OUT
                LOAD B
                ADD #1
                MOV A B
                JMP #loop
                end: HALT
            "),
            0,
        )
        .unwrap();
        cpu.run();
        assert_eq!(*output.borrow(), b"Hi!".to_vec());
    }

    #[test]
    fn timer_port_reads_elapsed_milliseconds() {
        let cpu = run_program("LOAD 0xFF03\nHALT");
        assert!(cpu.a < 1000, "timer read {}", cpu.a);
    }
}

mod faults {
    use super::*;
    use crate::bus::Bus;
    use crate::cpu_vm16::{CpuVm16, StatusFlag};

    // Opcode 63 is outside the instruction set. The machine stops without
    // halting: `running` is cleared, the Halt flag is not set.
    #[test]
    fn unknown_opcode_stops_the_cpu() {
        let mut cpu = CpuVm16::new(Bus::new());
        cpu.load_program(&[0xFF], 0).unwrap();
        cpu.run();
        assert!(!cpu.running);
        assert!(!cpu.is_status_flag_set(StatusFlag::Halt));
        assert_eq!(cpu.cycles, 1);
    }
}

mod programs {
    use super::*;
    use crate::bus::Bus;
    use crate::constants::STACK_START;
    use crate::cpu_vm16::CpuVm16;

    #[test]
    fn load_and_halt() {
        let cpu = run_program("LOAD #42\nHALT");
        assert_eq!(cpu.a, 42);
        assert_eq!(cpu.cycles, 2);
        assert!(!cpu.running);
        assert_status(&cpu, H);
    }

    #[test]
    fn countdown_terminates_with_zero_in_b() {
        let cpu = run_program("
            LOAD #5
            MOV A B
            loop: LOAD B
            CMP #0
            JZ #end
            LOAD B
            SUB #1
            MOV A B
            JMP #loop
            end: HALT
        ");
        assert_eq!(cpu.b, 0);
        assert!(cpu.cycles > 0);
        assert_status(&cpu, H | Z);
    }

    #[test]
    fn reset_restores_power_on_state_but_keeps_memory() {
        let mut cpu = run_program("LOAD #42\nHALT");
        cpu.reset();
        assert_eq!(cpu.pc, 0);
        assert_eq!(cpu.sp, STACK_START);
        assert_eq!(cpu.a, 0);
        assert_eq!(cpu.flags, 0);
        assert_eq!(cpu.cycles, 0);
        assert!(!cpu.running);
        // The program bytes are still in memory.
        assert_eq!(cpu.bus.peek(0x0000), 0x04);
    }

    // The predicate runner is the driver's debugging cycle ceiling.
    #[test]
    fn run_until_bounds_an_endless_loop() {
        let mut cpu = CpuVm16::new(Bus::new());
        cpu.load_program(&assemble("loop: JMP #loop"), 0).unwrap();
        cpu.run_until(|cpu| cpu.cycles >= 100);
        assert_eq!(cpu.cycles, 100);
        assert!(cpu.running);
    }
}

mod flag_locality {
    use super::*;

    // NOP, PUSH, STORE, JMP, OUT, HALT and RET leave Zero, Negative and
    // Carry exactly as they found them.
    #[test]
    fn flag_neutral_instructions_preserve_flags() {
        let (cpu, _output) = run_program_with_console(
            "
                LOAD #1
                CMP #2      ; sets carry and negative
                NOP
                PUSH A
                STORE 0x0500
                JMP #next
                next: OUT
                HALT
            ",
            &[],
        );
        assert_eq!(cpu.a, 1);
        assert_status(&cpu, H | C | N);
    }
}
