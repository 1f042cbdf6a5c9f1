use crate::constants::io_ports;
use crate::cpu_vm16::*;

/// Stop the machine: the Halt flag is the terminal state bit and the run
/// loop exits. A one-line termination notice includes the cycle count.
/// Function: H:=1
/// Flags: H
pub fn halt(cpu: &mut CpuVm16, _mode: Mode, _operand: Operand) {
    cpu.set_status_flag(StatusFlag::Halt, true);
    cpu.running = false;
    println!("\n[CPU HALTED after {} cycles]", cpu.cycles);
}

/// Read a byte from an I/O port into the accumulator. The operand is the
/// port number relative to the start of the I/O window.
/// Function: A:=port[{operand}]
/// Flags: N Z
pub fn in_port(cpu: &mut CpuVm16, _mode: Mode, operand: Operand) {
    let address = io_ports::CONSOLE_IN.wrapping_add(operand.value);
    cpu.a = cpu.bus.read_u8(address) as u16;
    cpu.update_zero_and_negative_flag(cpu.a);
}

/// Write the low byte of the accumulator to the console. The port operand
/// is decoded but ignored; output always goes to the console port.
/// Function: port[1]:=A&0xFF
/// Flags:
pub fn out_port(cpu: &mut CpuVm16, _mode: Mode, _operand: Operand) {
    cpu.bus.set_u8(io_ports::CONSOLE_OUT, (cpu.a & 0xFF) as u8);
}
