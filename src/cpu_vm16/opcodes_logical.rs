use crate::cpu_vm16::*;

/// Add to the accumulator. The sum is computed in 32 bits so the 17th bit
/// can land in the carry flag.
/// Function: A:=A+{operand}
/// Flags: N Z C
pub fn add(cpu: &mut CpuVm16, _mode: Mode, operand: Operand) {
    let result = cpu.a as u32 + operand.value as u32;
    cpu.set_status_flag(StatusFlag::Carry, result > 0xFFFF);
    cpu.a = result as u16;
    cpu.update_zero_and_negative_flag(cpu.a);
}

/// Subtract from the accumulator. Computed in signed 32 bits; the carry
/// flag records a borrow.
/// Function: A:=A-{operand}
/// Flags: N Z C
pub fn sub(cpu: &mut CpuVm16, _mode: Mode, operand: Operand) {
    let result = cpu.a as i32 - operand.value as i32;
    cpu.set_status_flag(StatusFlag::Carry, result < 0);
    cpu.a = result as u16;
    cpu.update_zero_and_negative_flag(cpu.a);
}

/// Increment. In REGISTER mode the selected register is incremented in
/// place; in every other mode the accumulator is.
/// Function: {reg}:={reg}+1
/// Flags: N Z
pub fn inc(cpu: &mut CpuVm16, mode: Mode, operand: Operand) {
    match operand.register {
        Some(number) if mode == Mode::Register => {
            let value = cpu.register(number).wrapping_add(1);
            cpu.set_register(number, value);
            cpu.update_zero_and_negative_flag(value);
        }
        _ => {
            cpu.a = cpu.a.wrapping_add(1);
            cpu.update_zero_and_negative_flag(cpu.a);
        }
    }
}

/// Decrement. Register selection works as for INC.
/// Function: {reg}:={reg}-1
/// Flags: N Z
pub fn dec(cpu: &mut CpuVm16, mode: Mode, operand: Operand) {
    match operand.register {
        Some(number) if mode == Mode::Register => {
            let value = cpu.register(number).wrapping_sub(1);
            cpu.set_register(number, value);
            cpu.update_zero_and_negative_flag(value);
        }
        _ => {
            cpu.a = cpu.a.wrapping_sub(1);
            cpu.update_zero_and_negative_flag(cpu.a);
        }
    }
}

/// Multiply the accumulator, keeping the low 16 bits.
/// Function: A:=A*{operand}
/// Flags: N Z
pub fn mul(cpu: &mut CpuVm16, _mode: Mode, operand: Operand) {
    cpu.a = (cpu.a as u32 * operand.value as u32) as u16;
    cpu.update_zero_and_negative_flag(cpu.a);
}

/// Divide the accumulator. Dividing by zero is a silent no-op, the
/// accumulator and the flags are left untouched.
/// Function: A:=A/{operand}
/// Flags: N Z
pub fn div(cpu: &mut CpuVm16, _mode: Mode, operand: Operand) {
    if operand.value != 0 {
        cpu.a /= operand.value;
        cpu.update_zero_and_negative_flag(cpu.a);
    }
}

/// Apply the logical "and" operator on the accumulator.
/// Function: A:=A&{operand}
/// Flags: N Z
pub fn and(cpu: &mut CpuVm16, _mode: Mode, operand: Operand) {
    cpu.a &= operand.value;
    cpu.update_zero_and_negative_flag(cpu.a);
}

/// Apply the logical "or" operator on the accumulator.
/// Function: A:=A|{operand}
/// Flags: N Z
pub fn or(cpu: &mut CpuVm16, _mode: Mode, operand: Operand) {
    cpu.a |= operand.value;
    cpu.update_zero_and_negative_flag(cpu.a);
}

/// Apply the logical "exclusive or" operator on the accumulator.
/// Function: A:=A^{operand}
/// Flags: N Z
pub fn xor(cpu: &mut CpuVm16, _mode: Mode, operand: Operand) {
    cpu.a ^= operand.value;
    cpu.update_zero_and_negative_flag(cpu.a);
}

/// Bitwise complement of the accumulator. Takes no operand.
/// Function: A:=~A
/// Flags: N Z
pub fn not(cpu: &mut CpuVm16, _mode: Mode, _operand: Operand) {
    cpu.a = !cpu.a;
    cpu.update_zero_and_negative_flag(cpu.a);
}

/// Shift the accumulator left. Shift counts of 16 or more clear it.
/// Function: A:=A<<{operand}
/// Flags: N Z
pub fn shl(cpu: &mut CpuVm16, _mode: Mode, operand: Operand) {
    cpu.a = cpu.a.checked_shl(operand.value as u32).unwrap_or(0);
    cpu.update_zero_and_negative_flag(cpu.a);
}

/// Shift the accumulator right (unsigned).
/// Function: A:=A>>{operand}
/// Flags: N Z
pub fn shr(cpu: &mut CpuVm16, _mode: Mode, operand: Operand) {
    cpu.a = cpu.a.checked_shr(operand.value as u32).unwrap_or(0);
    cpu.update_zero_and_negative_flag(cpu.a);
}

/// Compare the accumulator against the operand. Flags are set as for SUB
/// but the accumulator keeps its value.
/// Function: A-{operand}
/// Flags: N Z C
pub fn cmp(cpu: &mut CpuVm16, _mode: Mode, operand: Operand) {
    let result = cpu.a as i32 - operand.value as i32;
    cpu.set_status_flag(StatusFlag::Carry, result < 0);
    cpu.update_zero_and_negative_flag(result as u16);
}

/// Bit test: AND without storing the result.
/// Function: A&{operand}
/// Flags: N Z
pub fn test(cpu: &mut CpuVm16, _mode: Mode, operand: Operand) {
    cpu.update_zero_and_negative_flag(cpu.a & operand.value);
}
