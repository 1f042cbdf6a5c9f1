use colored::*;
use cpu_vm16::asm::Assembler;
use cpu_vm16::bus::Bus;
use cpu_vm16::cpu_vm16::{CpuVm16, StatusFlag};
use cpu_vm16::demos;
use cpu_vm16::opcodes::{instruction_name, Mode, OpCode};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "cpu-vm16",
    about = "A 16-bit software CPU emulator and two-pass assembler."
)]
enum CliOptions {
    /// Assemble a source file into a binary program.
    Assemble {
        /// The assembly source file (.asm)
        input: PathBuf,
        /// The binary program to write (.bin)
        output: PathBuf,
    },
    /// Run an assembled binary program.
    Run {
        /// The binary program to load at 0x0000 and run to HALT
        program: PathBuf,
    },
    /// Run a built-in demo program with a per-instruction trace.
    Demo {
        /// One of: fibonacci, hello, timer
        name: String,
    },
}

fn main() {
    let options = CliOptions::from_args();
    println!("=== Software CPU Emulator ===\n");

    match options {
        CliOptions::Assemble { input, output } => {
            if assemble_file(&input, &output) {
                println!("Assembly successful!");
            } else {
                println!("Assembly failed!");
                process::exit(1);
            }
        }
        CliOptions::Run { program } => {
            if !run_program_file(&program) {
                process::exit(1);
            }
        }
        CliOptions::Demo { name } => run_demo(&name),
    }
}

/// Assemble `input` and write the binary to `output`. Nothing is written
/// unless both passes succeed.
fn assemble_file(input: &Path, output: &Path) -> bool {
    let source = match fs::read_to_string(input) {
        Ok(source) => source,
        Err(error) => {
            eprintln!(
                "{}",
                format!("Error: Cannot open input file '{}': {}", input.display(), error)
                    .bright_red()
            );
            return false;
        }
    };

    println!("Assembling '{}'...", input.display());

    let mut assembler = Assembler::new(&source);

    if let Err(error) = assembler.first_pass() {
        eprint!("{}", error.nice_message());
        eprintln!("{}", "Assembly failed during first pass".bright_red());
        return false;
    }
    println!("First pass complete. Found {} labels.", assembler.label_count());

    if let Err(error) = assembler.second_pass() {
        eprint!("{}", error.nice_message());
        eprintln!("{}", "Assembly failed during second pass".bright_red());
        return false;
    }
    println!(
        "Second pass complete. Generated {} bytes.",
        assembler.output().len()
    );

    if let Err(error) = fs::write(output, assembler.output()) {
        eprintln!(
            "{}",
            format!(
                "Error: Cannot create output file '{}': {}",
                output.display(),
                error
            )
            .bright_red()
        );
        return false;
    }

    println!("Output written to '{}'", output.display());
    true
}

fn run_program_file(path: &Path) -> bool {
    let program = match fs::read(path) {
        Ok(program) => program,
        Err(error) => {
            eprintln!(
                "{}",
                format!("Error: Cannot open file '{}': {}", path.display(), error).bright_red()
            );
            return false;
        }
    };

    let mut cpu = CpuVm16::new(Bus::new());
    if let Err(message) = cpu.load_program(&program, 0) {
        eprintln!("{}", format!("Error: {}", message).bright_red());
        return false;
    }

    println!(
        "Running program '{}' ({} bytes)...\n",
        path.display(),
        program.len()
    );
    cpu.run();

    cpu.dump_registers();
    true
}

fn run_demo(name: &str) {
    let mut cpu = CpuVm16::new(Bus::new());

    match name {
        "fibonacci" => {
            println!("Creating Fibonacci demo program...");
            if let Err(message) = demos::load_fibonacci(&mut cpu) {
                eprintln!("{}", format!("Error: {}", message).bright_red());
                process::exit(1);
            }
            println!("Program loaded. Computing F(5) = 5");
            println!("Algorithm: Start with F(0)=0, F(1)=1, iterate 4 times");

            run_with_trace(&mut cpu, 150);

            println!("\n--- CPU Halted ---");
            cpu.dump_registers();
            println!("\nFibonacci sequence calculated!");
            println!("F(5) result in register D: {} (expected: 5)", cpu.d);
            cpu.dump_memory(0x0000, 0x0040);
        }
        "hello" => {
            println!("Creating Hello World demo program...");
            if let Err(message) = demos::load_hello(&mut cpu) {
                eprintln!("{}", format!("Error: {}", message).bright_red());
                process::exit(1);
            }
            println!("Program loaded.");
            println!("Output:");

            run_with_trace(&mut cpu, 200);

            println!("\n--- CPU Halted ---");
            cpu.dump_registers();
            cpu.dump_memory(0x0000, 0x0030);
            cpu.dump_memory(0x0100, 0x0010);
        }
        "timer" => {
            println!("Creating Timer/Counter demo program...");
            println!("This program demonstrates Fetch-Decode-Execute cycles.\n");
            if let Err(message) = demos::load_timer(&mut cpu) {
                eprintln!("{}", format!("Error: {}", message).bright_red());
                process::exit(1);
            }

            println!("\n=== Executing with Cycle Tracking ===");
            run_with_trace(&mut cpu, 100);

            println!("\n=== Execution Complete ===");
            cpu.dump_registers();
            println!("\n=== Memory Dump (Program Area) ===");
            cpu.dump_memory(0x0000, 0x0030);
        }
        _ => {
            println!("Unknown demo: {}", name);
            println!("Available demos: fibonacci, hello, timer");
            process::exit(1);
        }
    }
}

/// Drive the CPU one step at a time, printing the machine state after
/// every instruction. The cycle ceiling is a debugging guard for programs
/// that never reach a HALT.
fn run_with_trace(cpu: &mut CpuVm16, max_cycles: u64) {
    println!("\n--- CPU Running ---");
    cpu.running = true;

    while cpu.running && !cpu.is_status_flag_set(StatusFlag::Halt) && cpu.cycles < max_cycles {
        let pc_before = cpu.pc;
        let instruction = cpu.bus.peek(pc_before);
        cpu.step();
        println!("{}", trace_line(cpu, pc_before, instruction));
    }

    if cpu.running && cpu.cycles >= max_cycles {
        println!("\n[Safety limit reached after {} cycles]", max_cycles);
    }
}

/// One line of trace: the instruction that just ran and the register
/// state it left behind.
fn trace_line(cpu: &CpuVm16, pc: u16, instruction: u8) -> String {
    let name = match OpCode::from_byte((instruction >> 2) & 0x3F) {
        Some(opcode) => instruction_name(opcode, Mode::from_byte(instruction & 0x03)),
        None => "UNKNOWN".to_string(),
    };

    let mut zn_flags = 0u8;
    if cpu.is_status_flag_set(StatusFlag::Zero) {
        zn_flags |= 0x10;
    }
    if cpu.is_status_flag_set(StatusFlag::Negative) {
        zn_flags |= 0x01;
    }

    format!(
        "[PC=0x{:04X}] {:<7} | R0=0x{:04X} R1=0x{:04X} R2=0x{:04X} R3=0x{:04X} SP=0x{:04X} ZN={:02X}",
        pc, name, cpu.a, cpu.b, cpu.c, cpu.d, cpu.sp, zn_flags
    )
}
