use crate::constants::{io_ports, memory_range, MEMORY_SIZE};
use std::io::{Read, Write};
use std::time::Instant;

/// The console is the byte-level device behind the 0xFF00/0xFF01 ports.
/// It is a trait so tests can script input and capture output.
pub trait Console {
    /// Pull one byte, blocking until it is available.
    fn read_byte(&mut self) -> u8;
    /// Push one byte out.
    fn write_byte(&mut self, value: u8);
}

/// The real console: stdin and stdout of the hosting process.
pub struct StdConsole;

impl Console for StdConsole {
    fn read_byte(&mut self) -> u8 {
        let mut buffer = [0u8; 1];
        match std::io::stdin().read_exact(&mut buffer) {
            Ok(()) => buffer[0],
            // EOF reads as 0xFF.
            Err(_) => 0xFF,
        }
    }

    fn write_byte(&mut self, value: u8) {
        let mut stdout = std::io::stdout();
        // Console output is best-effort, a broken pipe should not take the
        // machine down.
        let _ = stdout.write_all(&[value]);
        let _ = stdout.flush();
    }
}

/// The bus mediates every load and store the CPU performs: a flat 64KiB
/// byte array, with the window at 0xFF00 and up dispatched to memory-mapped
/// I/O instead of the backing array.
pub struct Bus {
    memory: [u8; MEMORY_SIZE],
    console: Box<dyn Console>,
    timer_start: Instant,
}

impl Bus {
    pub fn new() -> Bus {
        Bus::with_console(Box::new(StdConsole))
    }

    pub fn with_console(console: Box<dyn Console>) -> Bus {
        Bus {
            memory: [0; MEMORY_SIZE],
            console,
            timer_start: Instant::now(),
        }
    }

    pub fn read_u8(&mut self, address: u16) -> u8 {
        if memory_range::IO.contains(address) {
            if address == io_ports::CONSOLE_IN {
                return self.console.read_byte();
            }
            // Undefined ports read as zero.
            return 0;
        }
        self.memory[address as usize]
    }

    pub fn read_u16(&mut self, address: u16) -> u16 {
        // The timer is the one port that is 16 bits wide, so it is handled
        // before the value is composed from byte reads.
        if address == io_ports::TIMER {
            return (self.timer_start.elapsed().as_millis() & 0xFFFF) as u16;
        }

        let low = self.read_u8(address);
        let high = self.read_u8(address.wrapping_add(1));
        u16::from_le_bytes([low, high])
    }

    pub fn set_u8(&mut self, address: u16, value: u8) {
        if memory_range::IO.contains(address) {
            if address == io_ports::CONSOLE_OUT {
                self.console.write_byte(value);
            }
            // Writes to undefined ports are discarded.
            return;
        }
        self.memory[address as usize] = value;
    }

    pub fn set_u16(&mut self, address: u16, value: u16) {
        let [low, high] = value.to_le_bytes();
        self.set_u8(address, low);
        self.set_u8(address.wrapping_add(1), high);
    }

    /// Copy a program into memory at the given start address.
    pub fn load_program(&mut self, program: &[u8], start_address: u16) -> Result<(), String> {
        let start = start_address as usize;
        if start + program.len() > MEMORY_SIZE {
            return Err("Program too large for memory".to_string());
        }
        self.memory[start..start + program.len()].copy_from_slice(program);
        Ok(())
    }

    /// Read the backing array directly, bypassing MMIO. Used by the memory
    /// dump so that inspecting the I/O window has no side effects.
    pub fn peek(&self, address: u16) -> u8 {
        self.memory[address as usize]
    }
}

/// A console for tests: input is served from a scripted queue, output is
/// captured into a shared buffer the test can inspect after the run.
#[cfg(test)]
pub struct BufferConsole {
    pub input: std::collections::VecDeque<u8>,
    pub output: std::rc::Rc<std::cell::RefCell<Vec<u8>>>,
}

#[cfg(test)]
impl Console for BufferConsole {
    fn read_byte(&mut self) -> u8 {
        self.input.pop_front().unwrap_or(0xFF)
    }

    fn write_byte(&mut self, value: u8) {
        self.output.borrow_mut().push(value);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    fn buffer_bus() -> (Bus, Rc<RefCell<Vec<u8>>>) {
        let output = Rc::new(RefCell::new(Vec::new()));
        let console = BufferConsole {
            input: VecDeque::from(vec![b'x']),
            output: Rc::clone(&output),
        };
        (Bus::with_console(Box::new(console)), output)
    }

    #[test]
    fn u16_round_trips_through_ram() {
        let mut bus = Bus::new();
        for &(address, value) in &[(0x0000, 0x1234), (0x0100, 0xFFFF), (0xFEFD, 0xBEEF)] {
            bus.set_u16(address, value);
            assert_eq!(bus.read_u16(address), value);
        }
    }

    #[test]
    fn u16_access_is_little_endian() {
        let mut bus = Bus::new();
        bus.set_u16(0x0200, 0xABCD);
        assert_eq!(bus.peek(0x0200), 0xCD);
        assert_eq!(bus.peek(0x0201), 0xAB);
    }

    #[test]
    fn io_reads_do_not_touch_memory() {
        let (mut bus, _output) = buffer_bus();
        assert_eq!(bus.read_u8(io_ports::CONSOLE_IN), b'x');
        // The console byte never lands in the backing array.
        assert_eq!(bus.peek(io_ports::CONSOLE_IN), 0);
        // Undefined ports read as zero.
        assert_eq!(bus.read_u8(0xFF42), 0);
    }

    #[test]
    fn io_writes_are_dispatched_or_discarded() {
        let (mut bus, output) = buffer_bus();
        bus.set_u8(io_ports::CONSOLE_OUT, b'H');
        bus.set_u8(0xFF42, 0x99);
        assert_eq!(*output.borrow(), vec![b'H']);
        assert_eq!(bus.peek(io_ports::CONSOLE_OUT), 0);
        assert_eq!(bus.peek(0xFF42), 0);
    }

    #[test]
    fn scripted_input_ends_with_eof() {
        let (mut bus, _output) = buffer_bus();
        assert_eq!(bus.read_u8(io_ports::CONSOLE_IN), b'x');
        assert_eq!(bus.read_u8(io_ports::CONSOLE_IN), 0xFF);
    }

    #[test]
    fn timer_reads_as_elapsed_milliseconds() {
        let mut bus = Bus::new();
        // Freshly constructed, the elapsed time is still near zero.
        assert!(bus.read_u16(io_ports::TIMER) < 1000);
        // An 8-bit read of the timer address is just an undefined port.
        assert_eq!(bus.read_u8(io_ports::TIMER), 0);
    }

    #[test]
    fn load_program_rejects_overflow() {
        let mut bus = Bus::new();
        assert!(bus.load_program(&[1, 2, 3], 0xFFFD).is_ok());
        assert!(bus.load_program(&[1, 2, 3], 0xFFFE).is_err());
    }
}
