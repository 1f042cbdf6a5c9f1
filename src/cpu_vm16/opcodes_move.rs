use crate::cpu_vm16::*;

/// No operation.
/// Function:
/// Flags:
pub fn nop(_cpu: &mut CpuVm16, _mode: Mode, _operand: Operand) {}

/// Load a value into the accumulator.
/// Function: A:={operand}
/// Flags: N Z
pub fn load(cpu: &mut CpuVm16, _mode: Mode, operand: Operand) {
    cpu.a = operand.value;
    cpu.update_zero_and_negative_flag(cpu.a);
}

/// Store the accumulator to memory. Only the modes that carry an effective
/// address (DIRECT and INDIRECT) store anything.
/// Function: {adr}:=A
/// Flags:
pub fn store(cpu: &mut CpuVm16, _mode: Mode, operand: Operand) {
    if let Some(address) = operand.address {
        cpu.bus.set_u16(address, cpu.a);
    }
}

/// Copy a register to another register. The source comes in as the normal
/// REGISTER operand; the destination register number is an additional byte
/// read from the instruction stream.
/// Function: {dst}:={src}
/// Flags: N Z
pub fn mov(cpu: &mut CpuVm16, mode: Mode, operand: Operand) {
    if mode == Mode::Register {
        let destination = cpu.next_u8();
        cpu.set_register(destination, operand.value);
        cpu.update_zero_and_negative_flag(operand.value);
    }
}

/// Push the operand onto the stack.
/// Function: (SP):={operand}
/// Flags:
pub fn push(cpu: &mut CpuVm16, _mode: Mode, operand: Operand) {
    cpu.push_stack_u16(operand.value);
}

/// Pop the top of the stack into the accumulator.
/// Function: A:=(SP)
/// Flags: N Z
pub fn pop(cpu: &mut CpuVm16, _mode: Mode, _operand: Operand) {
    cpu.a = cpu.pull_stack_u16();
    cpu.update_zero_and_negative_flag(cpu.a);
}
