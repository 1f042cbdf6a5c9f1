use crate::cpu_vm16::*;

/// The conditional jumps are a pure predicate over the flags followed by
/// an assignment to the PC.
fn jump(cpu: &mut CpuVm16, operand: Operand, do_jump: bool) {
    if do_jump {
        cpu.pc = operand.value;
    }
}

/// Jump unconditionally.
/// Function: PC:={operand}
/// Flags:
pub fn jmp(cpu: &mut CpuVm16, _mode: Mode, operand: Operand) {
    jump(cpu, operand, true);
}

/// Jump if zero.
/// Function: PC:={operand} if Z=1
/// Flags:
pub fn jz(cpu: &mut CpuVm16, _mode: Mode, operand: Operand) {
    let do_jump = cpu.is_status_flag_set(StatusFlag::Zero);
    jump(cpu, operand, do_jump);
}

/// Jump if not zero.
/// Function: PC:={operand} if Z=0
/// Flags:
pub fn jnz(cpu: &mut CpuVm16, _mode: Mode, operand: Operand) {
    let do_jump = !cpu.is_status_flag_set(StatusFlag::Zero);
    jump(cpu, operand, do_jump);
}

/// Jump if carry.
/// Function: PC:={operand} if C=1
/// Flags:
pub fn jc(cpu: &mut CpuVm16, _mode: Mode, operand: Operand) {
    let do_jump = cpu.is_status_flag_set(StatusFlag::Carry);
    jump(cpu, operand, do_jump);
}

/// Jump if no carry.
/// Function: PC:={operand} if C=0
/// Flags:
pub fn jnc(cpu: &mut CpuVm16, _mode: Mode, operand: Operand) {
    let do_jump = !cpu.is_status_flag_set(StatusFlag::Carry);
    jump(cpu, operand, do_jump);
}

/// Call a subroutine. The PC pushed is the address of the instruction
/// after the CALL, since the operand has already been fetched.
/// Function: (SP):=PC, PC:={operand}
/// Flags:
pub fn call(cpu: &mut CpuVm16, _mode: Mode, operand: Operand) {
    cpu.push_stack_u16(cpu.pc);
    cpu.pc = operand.value;
}

/// Return from a subroutine.
/// Function: PC:=(SP)
/// Flags:
pub fn ret(cpu: &mut CpuVm16, _mode: Mode, _operand: Operand) {
    cpu.pc = cpu.pull_stack_u16();
}
