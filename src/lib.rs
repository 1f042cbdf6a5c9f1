// Clippy rules to disable.
#![allow(clippy::new_without_default)]

pub mod asm;
pub mod bus;
pub mod constants;
pub mod cpu_vm16;
pub mod demos;
pub mod opcodes;
