#![macro_use]

use crate::asm::Assembler;
use crate::bus::{BufferConsole, Bus, Console};
use crate::cpu_vm16::*;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

pub const Z: u8 = StatusFlag::Zero as u8;
pub const C: u8 = StatusFlag::Carry as u8;
pub const N: u8 = StatusFlag::Negative as u8;
pub const V: u8 = StatusFlag::Overflow as u8;
pub const H: u8 = StatusFlag::Halt as u8;

pub fn assemble(text: &str) -> Vec<u8> {
    match Assembler::new(text).assemble() {
        Ok(bytes) => bytes,
        Err(error) => error.panic_nicely(),
    }
}

/// Build a console whose input is scripted and whose output can be
/// inspected through the returned handle after the run.
pub fn buffer_console(input: &[u8]) -> (Box<dyn Console>, Rc<RefCell<Vec<u8>>>) {
    let output = Rc::new(RefCell::new(Vec::new()));
    let console = BufferConsole {
        input: VecDeque::from(input.to_vec()),
        output: Rc::clone(&output),
    };
    (Box::new(console), output)
}

/// Assemble a program, load it at 0x0000 and run it to completion. The
/// program is expected to reach a HALT on its own.
pub fn run_program(text: &str) -> CpuVm16 {
    let mut cpu = CpuVm16::new(Bus::new());
    cpu.load_program(&assemble(text), 0).unwrap();
    cpu.run();
    cpu
}

/// As `run_program`, with console traffic scripted and captured.
pub fn run_program_with_console(
    text: &str,
    input: &[u8],
) -> (CpuVm16, Rc<RefCell<Vec<u8>>>) {
    let (console, output) = buffer_console(input);
    let mut cpu = CpuVm16::new(Bus::with_console(console));
    cpu.load_program(&assemble(text), 0).unwrap();
    cpu.run();
    (cpu, output)
}

pub fn assert_register_a(text: &str, value: u16, status: u8) {
    let cpu = run_program(text);
    if cpu.a != value {
        panic!(
            "\n{}\nExpected register A to be {:#x} ({:#b}) but it was {:#x} ({:#b})",
            text, value, value, cpu.a, cpu.a
        );
    }
    assert_status(&cpu, status);
}

pub fn assert_register_b(text: &str, value: u16, status: u8) {
    let cpu = run_program(text);
    if cpu.b != value {
        panic!(
            "\n{}\nExpected register B to be {:#x} ({:#b}) but it was {:#x} ({:#b})",
            text, value, value, cpu.b, cpu.b
        );
    }
    assert_status(&cpu, status);
}

pub fn assert_register_c(text: &str, value: u16, status: u8) {
    let cpu = run_program(text);
    if cpu.c != value {
        panic!(
            "\n{}\nExpected register C to be {:#x} ({:#b}) but it was {:#x} ({:#b})",
            text, value, value, cpu.c, cpu.c
        );
    }
    assert_status(&cpu, status);
}

pub fn assert_register_d(text: &str, value: u16, status: u8) {
    let cpu = run_program(text);
    if cpu.d != value {
        panic!(
            "\n{}\nExpected register D to be {:#x} ({:#b}) but it was {:#x} ({:#b})",
            text, value, value, cpu.d, cpu.d
        );
    }
    assert_status(&cpu, status);
}

pub fn assert_status(cpu: &CpuVm16, value: u8) {
    let flags = [
        ("Zero", Z),
        ("Carry", C),
        ("Negative", N),
        ("Overflow", V),
        ("Halt", H),
    ];

    let mut result = String::new();
    for (name, bit) in flags {
        let expected = value & bit == bit;
        let actual = cpu.flags & bit == bit;
        if expected != actual {
            result.push_str(&format!(
                "Expected StatusFlag::{} to be {} but received {}\n",
                name, expected, actual
            ));
        }
    }

    if cpu.flags != value {
        panic!(
            "\nExpected cpu status 0b{:08b} to match 0b{:08b}\n{}",
            cpu.flags, value, result
        );
    }
}

#[macro_export]
macro_rules! register_a {
    ($name:ident, $a:expr, $status:expr, $text:expr) => {
        #[test]
        fn $name() {
            assert_register_a($text, $a, $status);
        }
    };
}

#[macro_export]
macro_rules! register_b {
    ($name:ident, $b:expr, $status:expr, $text:expr) => {
        #[test]
        fn $name() {
            assert_register_b($text, $b, $status);
        }
    };
}

#[macro_export]
macro_rules! register_c {
    ($name:ident, $c:expr, $status:expr, $text:expr) => {
        #[test]
        fn $name() {
            assert_register_c($text, $c, $status);
        }
    };
}

#[macro_export]
macro_rules! register_d {
    ($name:ident, $d:expr, $status:expr, $text:expr) => {
        #[test]
        fn $name() {
            assert_register_d($text, $d, $status);
        }
    };
}

#[macro_export]
macro_rules! status {
    ($name:ident, $status:expr, $text:expr) => {
        #[test]
        fn $name() {
            let cpu = run_program($text);
            assert_status(&cpu, $status);
        }
    };
}
