use crate::opcodes::{encode_instruction, match_instruction, Mode, OpCode};
use colored::*;

/// The label table is bounded. 256 entries is far more than any program
/// for this machine has needed.
pub const MAX_LABELS: usize = 256;

/// Maps label names to the code addresses where they were defined. Names
/// are case-sensitive, and each label may be defined exactly once.
pub struct LabelTable {
    entries: Vec<(String, u16)>,
}

impl LabelTable {
    pub fn new() -> LabelTable {
        LabelTable {
            entries: Vec::new(),
        }
    }

    pub fn find(&self, name: &str) -> Option<u16> {
        self.entries
            .iter()
            .find(|(entry_name, _)| entry_name == name)
            .map(|(_, address)| *address)
    }

    pub fn add(&mut self, name: &str, address: u16) -> Result<(), String> {
        if self.entries.len() >= MAX_LABELS {
            return Err("Too many labels".to_string());
        }
        if self.find(name).is_some() {
            return Err(format!("Duplicate label '{}'", name));
        }
        self.entries.push((name.to_string(), address));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An assembly error, tied to the 1-based source line it came from. The
/// `nice_message` renders the surrounding source with the offending line
/// called out.
#[derive(Debug)]
pub struct AsmError {
    pub message: String,
    pub line_number: usize,
    nice_message: String,
}

impl AsmError {
    fn new(message: String, assembler: &Assembler) -> AsmError {
        let error_row_index = assembler.line_number.saturating_sub(1);
        let range = 3;
        let min = error_row_index.saturating_sub(range);
        let max = error_row_index + range;

        let mut nice_message = String::from("\n\n");
        for (row_index, row_text) in assembler.text.lines().enumerate() {
            if row_index > max {
                break;
            }
            if row_index < min {
                continue;
            }

            // Lazypad.
            let col_string = if row_index < 9 {
                format!("   {}: ", row_index + 1)
            } else if row_index < 99 {
                format!("  {}: ", row_index + 1)
            } else if row_index < 999 {
                format!(" {}: ", row_index + 1)
            } else {
                format!("{}: ", row_index + 1)
            };
            nice_message.push_str(&format!("{}", &col_string.cyan()));
            nice_message.push_str(&format!("{}", &row_text.bright_white()));
            nice_message.push('\n');

            if row_index == error_row_index {
                let indent = " ".repeat(6);
                let error_line = format!("^ error on line {}", assembler.line_number);
                nice_message.push_str(&indent);
                nice_message.push_str(&format!("{}", error_line.bright_red()));
                nice_message.push('\n');
                nice_message.push_str(&indent);
                nice_message.push_str(&format!("{}", message.bright_red()));
                nice_message.push('\n');
            }
        }
        nice_message.push('\n');

        AsmError {
            message,
            line_number: assembler.line_number,
            nice_message,
        }
    }

    pub fn nice_message(&self) -> &str {
        &self.nice_message
    }

    pub fn panic_nicely(self) -> ! {
        panic!("{}", self.nice_message);
    }
}

impl std::fmt::Display for AsmError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(formatter, "Error line {}: {}", self.line_number, self.message)
    }
}

/// A parsed operand: the addressing mode, the operand value (a register
/// number for REGISTER/INDIRECT), and for a REGISTER-mode MOV the
/// destination register that is emitted as a trailing byte.
struct ParsedOperand {
    mode: Mode,
    value: u16,
    destination: Option<u8>,
}

/// The two-pass assembler. Pass 1 walks the source accounting instruction
/// sizes and collecting label definitions; pass 2 re-parses the same
/// source, binds label references and emits the binary encoding. The two
/// passes only differ in whether bytes are emitted and whether an unknown
/// label is fatal.
pub struct Assembler<'a> {
    text: &'a str,
    labels: LabelTable,
    output: Vec<u8>,
    current_address: u16,
    line_number: usize,
}

impl<'a> Assembler<'a> {
    pub fn new(text: &'a str) -> Assembler<'a> {
        Assembler {
            text,
            labels: LabelTable::new(),
            output: Vec::new(),
            current_address: 0,
            line_number: 0,
        }
    }

    /// Run both passes and hand back the assembled bytes.
    pub fn assemble(mut self) -> Result<Vec<u8>, AsmError> {
        self.first_pass()?;
        self.second_pass()?;
        Ok(self.output)
    }

    /// Pass 1: collect labels and compute addresses. Nothing is emitted.
    pub fn first_pass(&mut self) -> Result<(), AsmError> {
        self.run_pass(true)
    }

    /// Pass 2: generate code. Label references must resolve now.
    pub fn second_pass(&mut self) -> Result<(), AsmError> {
        self.run_pass(false)
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }

    fn run_pass(&mut self, first_pass: bool) -> Result<(), AsmError> {
        self.current_address = 0;
        self.line_number = 0;
        self.output.clear();

        let text = self.text;
        for line in text.lines() {
            self.line_number += 1;
            if let Err(message) = self.parse_line(line, first_pass) {
                return Err(AsmError::new(message, self));
            }
        }
        Ok(())
    }

    fn parse_line(&mut self, line: &str, first_pass: bool) -> Result<(), String> {
        // Strip a trailing comment.
        let line = match line.find(';') {
            Some(index) => &line[..index],
            None => line,
        };

        let mut rest = line.trim_start();
        if rest.is_empty() {
            return Ok(());
        }

        // A colon defines a label at the current address. What follows the
        // colon is processed as if it were its own line.
        if let Some(colon) = rest.find(':') {
            let label = rest[..colon]
                .split_whitespace()
                .next()
                .ok_or_else(|| "Expected a label name before ':'".to_string())?;
            if first_pass {
                self.labels.add(label, self.current_address)?;
            }
            rest = rest[colon + 1..].trim_start();
            if rest.is_empty() {
                return Ok(());
            }
        }

        // The first token is the mnemonic, the remainder of the line is
        // the operand text.
        let (mnemonic, operand_text) = match rest.find(char::is_whitespace) {
            Some(index) => (&rest[..index], rest[index..].trim()),
            None => (rest, ""),
        };

        let opcode = match_instruction(mnemonic)
            .ok_or_else(|| format!("Unknown instruction '{}'", mnemonic.to_uppercase()))?;
        let operand = self.parse_operand(opcode, operand_text, first_pass)?;

        if first_pass {
            // Account for the encoded size: the instruction byte, the
            // operand bytes for the mode, and MOV's destination byte.
            self.current_address = self
                .current_address
                .wrapping_add(1)
                .wrapping_add(operand.mode.operand_size())
                .wrapping_add(operand.destination.map_or(0, |_| 1));
        } else {
            self.emit_byte(encode_instruction(opcode, operand.mode));
            match operand.mode {
                Mode::Immediate | Mode::Direct => self.emit_word(operand.value),
                Mode::Register | Mode::Indirect => self.emit_byte(operand.value as u8),
            }
            if let Some(destination) = operand.destination {
                self.emit_byte(destination);
            }
        }

        Ok(())
    }

    fn parse_operand(
        &self,
        opcode: OpCode,
        operand: &str,
        first_pass: bool,
    ) -> Result<ParsedOperand, String> {
        // An absent operand still assembles as a zero immediate, so every
        // instruction keeps a fixed encoding shape.
        if operand.is_empty() {
            return Ok(ParsedOperand {
                mode: Mode::Immediate,
                value: 0,
                destination: None,
            });
        }

        // Immediate: #value or #label.
        if let Some(text) = operand.strip_prefix('#') {
            let value = self.resolve_value_or_label(text, first_pass)?;
            return Ok(ParsedOperand {
                mode: Mode::Immediate,
                value,
                destination: None,
            });
        }

        // Indirect: [register].
        if let Some(text) = operand.strip_prefix('[') {
            let inner = match text.find(']') {
                Some(index) => text[..index].trim(),
                None => return Err(format!("Malformed indirect operand '{}'", operand)),
            };
            let number =
                register_number(inner).ok_or_else(|| format!("Unknown register '{}'", inner))?;
            return Ok(ParsedOperand {
                mode: Mode::Indirect,
                value: number as u16,
                destination: None,
            });
        }

        // Register: a bare A..D. MOV also names a destination register,
        // which rides along as a trailing operand byte.
        let mut tokens = operand.split_whitespace();
        let first_token = tokens.next().unwrap_or("");
        if let Some(number) = register_number(first_token) {
            let destination = if opcode == OpCode::MOV {
                let token = tokens
                    .next()
                    .ok_or_else(|| "MOV requires a destination register".to_string())?;
                let destination = register_number(token)
                    .ok_or_else(|| format!("Unknown register '{}'", token))?;
                Some(destination)
            } else {
                None
            };
            return Ok(ParsedOperand {
                mode: Mode::Register,
                value: number as u16,
                destination,
            });
        }

        // Direct: a numeric address or a label.
        let value = self.resolve_value_or_label(operand, first_pass)?;
        Ok(ParsedOperand {
            mode: Mode::Direct,
            value,
            destination: None,
        })
    }

    /// Numbers resolve immediately; labels resolve to a placeholder in
    /// pass 1 and must be defined by pass 2.
    fn resolve_value_or_label(&self, text: &str, first_pass: bool) -> Result<u16, String> {
        let leading = text.chars().next();
        if matches!(leading, Some(character) if character.is_ascii_digit() || character == '-') {
            return Ok(parse_number(text));
        }

        if first_pass {
            Ok(0)
        } else {
            self.labels
                .find(text)
                .ok_or_else(|| format!("Undefined label '{}'", text))
        }
    }

    fn emit_byte(&mut self, byte: u8) {
        self.output.push(byte);
        self.current_address = self.current_address.wrapping_add(1);
    }

    fn emit_word(&mut self, word: u16) {
        let [low, high] = word.to_le_bytes();
        self.emit_byte(low);
        self.emit_byte(high);
    }
}

fn register_number(token: &str) -> Option<u8> {
    match token {
        "A" => Some(0),
        "B" => Some(1),
        "C" => Some(2),
        "D" => Some(3),
        _ => None,
    }
}

/// C-style integer parsing: an `0x` prefix is hex, a remaining leading `0`
/// is octal, anything else is decimal, and a leading `-` negates. Parsing
/// stops at the first character that is not a digit of the base, and the
/// result is truncated to 16 bits.
fn parse_number(text: &str) -> u16 {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let (base, digits) = if let Some(hex_digits) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        (16, hex_digits)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits)
    };

    let mut value: u32 = 0;
    for character in digits.chars() {
        match character.to_digit(base) {
            Some(digit) => value = (value * base + digit) & 0xFFFF,
            None => break,
        }
    }

    if negative {
        (value as u16).wrapping_neg()
    } else {
        value as u16
    }
}
