//! The built-in demo programs. They are kept as raw byte sequences with
//! explicit addresses so the encodings stay exactly as the machine runs
//! them, including the unused immediates on operandless instructions.

use crate::cpu_vm16::CpuVm16;
use crate::opcodes::{encode_instruction, Mode, OpCode};

/// Fibonacci F(5) = 5. B holds the previous number, D the current one,
/// and C counts the four iterations from F(1) up to F(5). The result is
/// left in D.
#[rustfmt::skip]
pub fn load_fibonacci(cpu: &mut CpuVm16) -> Result<(), String> {
    let program = [
        // Initialize
        encode_instruction(OpCode::LOAD, Mode::Immediate), 0x00, 0x00, //  0: A = 0
        encode_instruction(OpCode::MOV, Mode::Register), 0x00, 0x01,   //  3: MOV A B (B = 0)

        encode_instruction(OpCode::LOAD, Mode::Immediate), 0x01, 0x00, //  6: A = 1
        encode_instruction(OpCode::MOV, Mode::Register), 0x00, 0x03,   //  9: MOV A D (D = 1)

        encode_instruction(OpCode::LOAD, Mode::Immediate), 0x04, 0x00, // 12: A = 4
        encode_instruction(OpCode::MOV, Mode::Register), 0x00, 0x02,   // 15: MOV A C (C = 4)

        // Loop: next = current + previous
        encode_instruction(OpCode::LOAD, Mode::Register), 0x03,        // 18: A = D
        encode_instruction(OpCode::ADD, Mode::Register), 0x01,         // 20: A = D + B
        encode_instruction(OpCode::PUSH, Mode::Register), 0x00,        // 22: PUSH A (save next)

        encode_instruction(OpCode::LOAD, Mode::Register), 0x03,        // 24: A = D
        encode_instruction(OpCode::MOV, Mode::Register), 0x00, 0x01,   // 26: MOV A B (B = old D)

        encode_instruction(OpCode::POP, Mode::Immediate), 0x00, 0x00,  // 29: POP (A = next)
        encode_instruction(OpCode::MOV, Mode::Register), 0x00, 0x03,   // 32: MOV A D (D = next)

        // Decrement the counter and loop
        encode_instruction(OpCode::LOAD, Mode::Register), 0x02,        // 35: A = C
        encode_instruction(OpCode::SUB, Mode::Immediate), 0x01, 0x00,  // 37: A = C - 1
        encode_instruction(OpCode::MOV, Mode::Register), 0x00, 0x02,   // 40: MOV A C
        encode_instruction(OpCode::CMP, Mode::Immediate), 0x00, 0x00,  // 43: CMP A, 0
        encode_instruction(OpCode::JNZ, Mode::Immediate), 0x12, 0x00,  // 46: JNZ loop (18)

        encode_instruction(OpCode::HALT, Mode::Immediate), 0x00, 0x00, // 49: HALT
    ];

    cpu.load_program(&program, 0)
}

/// Print "Hello, World!" by walking a null-terminated string at 0x0100
/// through an indirect pointer in B.
#[rustfmt::skip]
pub fn load_hello(cpu: &mut CpuVm16) -> Result<(), String> {
    let message = b"Hello, World!\n";
    let message_address: u16 = 0x0100;

    for (index, byte) in message.iter().enumerate() {
        cpu.bus.set_u8(message_address + index as u16, *byte);
    }
    // Null terminator ends the output loop.
    cpu.bus.set_u8(message_address + message.len() as u16, 0);

    let program = [
        encode_instruction(OpCode::LOAD, Mode::Immediate), 0x00, 0x01, //  0: A = 0x0100
        encode_instruction(OpCode::MOV, Mode::Register), 0x00, 0x01,   //  3: MOV A B (pointer)

        // Loop start (address 6)
        encode_instruction(OpCode::LOAD, Mode::Indirect), 0x01,        //  6: A = [B]
        encode_instruction(OpCode::CMP, Mode::Immediate), 0x00, 0x00,  //  8: compare with 0
        encode_instruction(OpCode::JZ, Mode::Immediate), 0x1B, 0x00,   // 11: if zero, halt (27)

        encode_instruction(OpCode::OUT, Mode::Register), 0x00,         // 14: output A

        encode_instruction(OpCode::LOAD, Mode::Register), 0x01,        // 16: A = B
        encode_instruction(OpCode::ADD, Mode::Immediate), 0x01, 0x00,  // 18: A = A + 1
        encode_instruction(OpCode::MOV, Mode::Register), 0x00, 0x01,   // 21: MOV A B

        encode_instruction(OpCode::JMP, Mode::Immediate), 0x06, 0x00,  // 24: loop (6)

        encode_instruction(OpCode::HALT, Mode::Register), 0x00,        // 27: HALT
    ];

    cpu.load_program(&program, 0)
}

/// Count down from 5 to 0. Small enough that a per-step trace of the
/// fetch-decode-execute cycle stays readable.
#[rustfmt::skip]
pub fn load_timer(cpu: &mut CpuVm16) -> Result<(), String> {
    let program = [
        encode_instruction(OpCode::LOAD, Mode::Immediate), 0x05, 0x00, //  0: A = 5
        encode_instruction(OpCode::MOV, Mode::Register), 0x00, 0x01,   //  3: MOV A B (B = 5)

        // Loop start (address 6)
        encode_instruction(OpCode::LOAD, Mode::Register), 0x01,        //  6: A = B
        encode_instruction(OpCode::CMP, Mode::Immediate), 0x00, 0x00,  //  8: compare with 0
        encode_instruction(OpCode::JZ, Mode::Immediate), 0x19, 0x00,   // 11: if zero, halt (25)

        encode_instruction(OpCode::LOAD, Mode::Register), 0x01,        // 14: A = B
        encode_instruction(OpCode::SUB, Mode::Immediate), 0x01, 0x00,  // 16: A = A - 1
        encode_instruction(OpCode::MOV, Mode::Register), 0x00, 0x01,   // 19: MOV A B

        encode_instruction(OpCode::JMP, Mode::Immediate), 0x06, 0x00,  // 22: loop (6)

        encode_instruction(OpCode::HALT, Mode::Immediate), 0x00, 0x00, // 25: HALT
    ];

    cpu.load_program(&program, 0)
}
