/// The instruction byte packs a 6-bit opcode into the upper bits and a
/// 2-bit addressing mode into the lower bits:
///
///   7  bit  0
///   ---- ----
///   oooo oomm
///   |||| ||||
///   |||| ||++- Addressing mode
///   ++++-++--- Opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    // Data movement
    NOP = 0,
    LOAD = 1,
    STORE = 2,
    MOV = 3,
    PUSH = 4,
    POP = 5,
    // Arithmetic
    ADD = 6,
    SUB = 7,
    INC = 8,
    DEC = 9,
    MUL = 10,
    DIV = 11,
    // Logical
    AND = 12,
    OR = 13,
    XOR = 14,
    NOT = 15,
    SHL = 16,
    SHR = 17,
    // Comparison
    CMP = 18,
    TEST = 19,
    // Control flow
    JMP = 20,
    JZ = 21,
    JNZ = 22,
    JC = 23,
    JNC = 24,
    CALL = 25,
    RET = 26,
    // System
    HALT = 27,
    IN = 28,
    OUT = 29,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// The two bytes after the instruction are a little-endian value.
    Immediate = 0,
    /// The two bytes after the instruction are an address, and the operand
    /// is the 16-bit memory contents at that address.
    Direct = 1,
    /// The byte after the instruction selects a register 0..=3, and the
    /// operand is that register's value.
    Register = 2,
    /// The byte after the instruction selects a register 0..=3, and the
    /// operand is the 16-bit memory contents at the address held in it.
    Indirect = 3,
}

impl OpCode {
    /// Decode the upper 6 bits of an instruction byte. Values past OUT are
    /// not part of the instruction set.
    pub fn from_byte(byte: u8) -> Option<OpCode> {
        Some(match byte {
            0 => OpCode::NOP,
            1 => OpCode::LOAD,
            2 => OpCode::STORE,
            3 => OpCode::MOV,
            4 => OpCode::PUSH,
            5 => OpCode::POP,
            6 => OpCode::ADD,
            7 => OpCode::SUB,
            8 => OpCode::INC,
            9 => OpCode::DEC,
            10 => OpCode::MUL,
            11 => OpCode::DIV,
            12 => OpCode::AND,
            13 => OpCode::OR,
            14 => OpCode::XOR,
            15 => OpCode::NOT,
            16 => OpCode::SHL,
            17 => OpCode::SHR,
            18 => OpCode::CMP,
            19 => OpCode::TEST,
            20 => OpCode::JMP,
            21 => OpCode::JZ,
            22 => OpCode::JNZ,
            23 => OpCode::JC,
            24 => OpCode::JNC,
            25 => OpCode::CALL,
            26 => OpCode::RET,
            27 => OpCode::HALT,
            28 => OpCode::IN,
            29 => OpCode::OUT,
            _ => return None,
        })
    }

    /// NOP, HALT, RET and NOT take no operand, and neither does POP in
    /// immediate mode. Everything else fetches one per the addressing mode.
    pub fn needs_operand(self, mode: Mode) -> bool {
        match self {
            OpCode::NOP | OpCode::HALT | OpCode::RET | OpCode::NOT => false,
            OpCode::POP => mode != Mode::Immediate,
            _ => true,
        }
    }
}

impl Mode {
    pub fn from_byte(byte: u8) -> Mode {
        match byte & 0x03 {
            0 => Mode::Immediate,
            1 => Mode::Direct,
            2 => Mode::Register,
            _ => Mode::Indirect,
        }
    }

    /// How many operand bytes this mode occupies in the instruction stream.
    pub fn operand_size(self) -> u16 {
        match self {
            Mode::Immediate | Mode::Direct => 2,
            Mode::Register | Mode::Indirect => 1,
        }
    }
}

/// Pack an opcode and a mode into a single instruction byte.
pub fn encode_instruction(opcode: OpCode, mode: Mode) -> u8 {
    ((opcode as u8) << 2) | (mode as u8 & 0x03)
}

/// Match a source mnemonic to its opcode. Mnemonics are case-insensitive.
pub fn match_instruction(string: &str) -> Option<OpCode> {
    let opcode = match string.to_uppercase().as_ref() {
        "NOP" => OpCode::NOP,
        "LOAD" => OpCode::LOAD,
        "STORE" => OpCode::STORE,
        "MOV" => OpCode::MOV,
        "PUSH" => OpCode::PUSH,
        "POP" => OpCode::POP,
        "ADD" => OpCode::ADD,
        "SUB" => OpCode::SUB,
        "INC" => OpCode::INC,
        "DEC" => OpCode::DEC,
        "MUL" => OpCode::MUL,
        "DIV" => OpCode::DIV,
        "AND" => OpCode::AND,
        "OR" => OpCode::OR,
        "XOR" => OpCode::XOR,
        "NOT" => OpCode::NOT,
        "SHL" => OpCode::SHL,
        "SHR" => OpCode::SHR,
        "CMP" => OpCode::CMP,
        "TEST" => OpCode::TEST,
        "JMP" => OpCode::JMP,
        "JZ" => OpCode::JZ,
        "JNZ" => OpCode::JNZ,
        "JC" => OpCode::JC,
        "JNC" => OpCode::JNC,
        "CALL" => OpCode::CALL,
        "RET" => OpCode::RET,
        "HALT" => OpCode::HALT,
        "IN" => OpCode::IN,
        "OUT" => OpCode::OUT,
        _ => return None,
    };
    Some(opcode)
}

pub fn opcode_name(opcode: OpCode) -> &'static str {
    match opcode {
        OpCode::NOP => "NOP",
        OpCode::LOAD => "LOAD",
        OpCode::STORE => "STORE",
        OpCode::MOV => "MOV",
        OpCode::PUSH => "PUSH",
        OpCode::POP => "POP",
        OpCode::ADD => "ADD",
        OpCode::SUB => "SUB",
        OpCode::INC => "INC",
        OpCode::DEC => "DEC",
        OpCode::MUL => "MUL",
        OpCode::DIV => "DIV",
        OpCode::AND => "AND",
        OpCode::OR => "OR",
        OpCode::XOR => "XOR",
        OpCode::NOT => "NOT",
        OpCode::SHL => "SHL",
        OpCode::SHR => "SHR",
        OpCode::CMP => "CMP",
        OpCode::TEST => "TEST",
        OpCode::JMP => "JMP",
        OpCode::JZ => "JZ",
        OpCode::JNZ => "JNZ",
        OpCode::JC => "JC",
        OpCode::JNC => "JNC",
        OpCode::CALL => "CALL",
        OpCode::RET => "RET",
        OpCode::HALT => "HALT",
        OpCode::IN => "IN",
        OpCode::OUT => "OUT",
    }
}

/// The display name used by trace output. Immediate-mode forms of the
/// common ALU instructions get an "I" suffix, and the jumps use their
/// longer descriptive aliases.
pub fn instruction_name(opcode: OpCode, mode: Mode) -> String {
    if mode == Mode::Immediate {
        match opcode {
            OpCode::LOAD
            | OpCode::STORE
            | OpCode::ADD
            | OpCode::SUB
            | OpCode::AND
            | OpCode::OR
            | OpCode::XOR
            | OpCode::CMP => return format!("{}I", opcode_name(opcode)),
            _ => {}
        }
    }

    match opcode {
        OpCode::JMP => "JUMP".to_string(),
        OpCode::JZ => "JUMPEQ".to_string(),
        OpCode::JNZ => "JUMPNEQ".to_string(),
        OpCode::JC => "JUMPC".to_string(),
        OpCode::JNC => "JUMPNC".to_string(),
        _ => opcode_name(opcode).to_string(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn instruction_bytes_round_trip() {
        for byte in 0..=29u8 {
            let opcode = OpCode::from_byte(byte).unwrap();
            for mode_byte in 0..=3u8 {
                let mode = Mode::from_byte(mode_byte);
                let instruction = encode_instruction(opcode, mode);
                assert_eq!(OpCode::from_byte((instruction >> 2) & 0x3F), Some(opcode));
                assert_eq!(Mode::from_byte(instruction & 0x03), mode);
            }
        }
    }

    #[test]
    fn unknown_opcodes_do_not_decode() {
        for byte in 30..=63u8 {
            assert_eq!(OpCode::from_byte(byte), None);
        }
    }

    #[test]
    fn operandless_instructions() {
        assert!(!OpCode::NOP.needs_operand(Mode::Immediate));
        assert!(!OpCode::HALT.needs_operand(Mode::Register));
        assert!(!OpCode::RET.needs_operand(Mode::Immediate));
        assert!(!OpCode::NOT.needs_operand(Mode::Direct));
        // POP only skips its operand in immediate mode.
        assert!(!OpCode::POP.needs_operand(Mode::Immediate));
        assert!(OpCode::POP.needs_operand(Mode::Register));
        assert!(OpCode::LOAD.needs_operand(Mode::Immediate));
    }

    #[test]
    fn trace_names() {
        assert_eq!(instruction_name(OpCode::LOAD, Mode::Immediate), "LOADI");
        assert_eq!(instruction_name(OpCode::LOAD, Mode::Register), "LOAD");
        assert_eq!(instruction_name(OpCode::JZ, Mode::Immediate), "JUMPEQ");
        assert_eq!(instruction_name(OpCode::JMP, Mode::Direct), "JUMP");
        assert_eq!(instruction_name(OpCode::HALT, Mode::Immediate), "HALT");
    }
}
