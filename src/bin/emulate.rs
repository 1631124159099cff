//! Emulator driver
//!
//! Loads a RISC-V executable and either free-runs it to halt,
//! reporting the pass/fail verdict the riscv-tests binaries leave in
//! x10, or drops into an interactive debug shell for single-stepping
//! with changed-state highlighting.

use std::fs;
use std::process::ExitCode;

use clap::Parser;
use clap_num::maybe_hex;
use itertools::Itertools;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use rv32emu::elf_utils::load_elf;
use rv32emu::hart::csr::NUM_CSRS;
use rv32emu::hart::memory::{Wordsize, MEM_SIZE};
use rv32emu::hart::Cpu;
use rv32emu::instr::disasm::disassemble;

/// Emulate a 32-bit RISC-V processor
///
/// Runs an rv32imf executable to completion (the guest halts with
/// ecall or ebreak) and prints the test verdict held in x10, or
/// single-steps it in a small interactive shell.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about)]
struct Args {
    /// Path to the input executable file
    input: String,

    /// Open the interactive debug shell instead of free-running
    #[arg(short, long)]
    debug: bool,

    /// Break on program counter match and open the debug shell (use
    /// 0x prefix for hexadecimal)
    #[arg(short, long, value_parser=maybe_hex::<u32>)]
    breakpoint: Option<u32>,

    /// Give up after this many instructions when free-running
    #[arg(short, long, default_value_t = 100_000_000)]
    max_steps: u64,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let bytes = match fs::read(&args.input) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("could not read {}: {e}", args.input);
            return ExitCode::FAILURE;
        }
    };

    let mut cpu = Cpu::new();
    if let Err(e) = load_elf(&mut cpu, &bytes) {
        eprintln!("could not load {}: {e}", args.input);
        return ExitCode::FAILURE;
    }

    if args.debug {
        return shell(&mut cpu, args.breakpoint);
    }

    if let Some(bp) = args.breakpoint {
        for _ in 0..args.max_steps {
            if cpu.pc == bp {
                println!("breakpoint hit at {:#010x}", cpu.pc);
                return shell(&mut cpu, Some(bp));
            }
            if !cpu.step() {
                return verdict(&cpu);
            }
        }
        eprintln!("gave up after {} instructions", args.max_steps);
        return ExitCode::FAILURE;
    }

    for _ in 0..args.max_steps {
        if !cpu.step() {
            return verdict(&cpu);
        }
    }
    eprintln!("gave up after {} instructions", args.max_steps);
    ExitCode::FAILURE
}

/// The riscv-tests convention: x10 is zero on pass, or the failing
/// subtest number shifted left by one.
fn verdict(cpu: &Cpu) -> ExitCode {
    let result = cpu.x_regs.read(10);
    if result == 0 {
        println!("PASSED");
        ExitCode::SUCCESS
    } else {
        println!("FAILED ({})", result >> 1);
        ExitCode::FAILURE
    }
}

fn shell(cpu: &mut Cpu, breakpoint: Option<u32>) -> ExitCode {
    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("could not open line editor: {e}");
            return ExitCode::FAILURE;
        }
    };
    let mut breakpoint = breakpoint;
    println!("type help for commands; empty line steps once");
    print_location(cpu);
    loop {
        match rl.readline("(emu) ") {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                if !run_command(cpu, line.trim(), &mut breakpoint) {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("input error: {e}");
                break;
            }
        }
    }
    ExitCode::SUCCESS
}

fn print_location(cpu: &Cpu) {
    let word = cpu.memory.read(cpu.pc, Wordsize::Word);
    println!("{:#010x}: {}", cpu.pc, disassemble(word));
}

/// Returns false when the shell should exit
fn run_command(cpu: &mut Cpu, line: &str, breakpoint: &mut Option<u32>) -> bool {
    let mut tokens = line.split_whitespace();
    match tokens.next().unwrap_or("step") {
        "step" | "s" => {
            let count = tokens.next().and_then(parse_number).unwrap_or(1);
            cpu.clear_dirty();
            for _ in 0..count {
                if !cpu.step() {
                    println!("halted");
                    break;
                }
            }
            print_location(cpu);
        }
        "run" | "c" => {
            cpu.clear_dirty();
            loop {
                if !cpu.step() {
                    println!("halted with x10 = {}", cpu.x_regs.read(10));
                    break;
                }
                if Some(cpu.pc) == *breakpoint {
                    println!("breakpoint hit");
                    break;
                }
            }
            print_location(cpu);
        }
        "regs" | "r" => print_int_regs(cpu),
        "fregs" | "f" => print_float_regs(cpu),
        "csr" => match tokens.next().and_then(parse_csr) {
            Some(csr) => println!("csr[{csr:#05x}] = {:#010x}", cpu.csr.read(csr)),
            None => println!("usage: csr <address|fflags|frm|fcsr|mepc>"),
        },
        "mem" | "m" => match tokens.next().and_then(parse_number) {
            Some(base) => print_memory(cpu, base),
            None => println!("usage: mem <address>"),
        },
        "disasm" | "d" => {
            let base = tokens.next().and_then(parse_number).unwrap_or(cpu.pc);
            for n in 0..8 {
                let addr = base.wrapping_add(4 * n);
                let word = cpu.memory.read(addr, Wordsize::Word);
                println!("{addr:#010x}: {}", disassemble(word));
            }
        }
        "break" | "b" => match tokens.next().and_then(parse_number) {
            Some(addr) => {
                *breakpoint = Some(addr);
                println!("breakpoint set at {addr:#010x}");
            }
            None => {
                *breakpoint = None;
                println!("breakpoint cleared");
            }
        },
        "reset" => {
            cpu.reset();
            print_location(cpu);
        }
        "quit" | "q" | "exit" => return false,
        "help" | "h" => {
            println!("step [n]      execute n instructions (default 1)");
            println!("run           run to halt or breakpoint");
            println!("regs, fregs   dump register banks (* marks just-written)");
            println!("csr ADDR      read a control and status register");
            println!("mem ADDR      dump eight words of memory");
            println!("disasm [ADDR] disassemble eight words");
            println!("break [ADDR]  set or clear the breakpoint");
            println!("reset         zero all architectural state");
            println!("quit          leave the shell");
        }
        other => println!("unknown command {other:?}, try help"),
    }
    true
}

fn parse_number(token: &str) -> Option<u32> {
    maybe_hex::<u32>(token).ok()
}

fn parse_csr(token: &str) -> Option<u32> {
    let addr = match token {
        "fflags" => 0x001,
        "frm" => 0x002,
        "fcsr" => 0x003,
        "mepc" => 0x341,
        other => parse_number(other)?,
    };
    (addr < NUM_CSRS as u32).then_some(addr)
}

fn print_int_regs(cpu: &Cpu) {
    println!("pc = {:#010x}", cpu.pc);
    for row in &(0..32).chunks(4) {
        let line = row
            .map(|n| {
                let mark = if cpu.x_regs.dirty(n) { "*" } else { " " };
                format!("x{n:<2}={:#010x}{mark}", cpu.x_regs.read(n))
            })
            .join(" ");
        println!("{line}");
    }
}

fn print_float_regs(cpu: &Cpu) {
    for row in &(0..32).chunks(4) {
        let line = row
            .map(|n| {
                let mark = if cpu.f_regs.dirty(n) { "*" } else { " " };
                format!("f{n:<2}={:#010x}{mark}", cpu.f_regs.read_bits(n))
            })
            .join(" ");
        println!("{line}");
    }
}

fn print_memory(cpu: &Cpu, base: u32) {
    for n in 0..8 {
        let addr = base.wrapping_add(4 * n);
        if addr as usize + 4 > MEM_SIZE {
            println!("{addr:#010x}: out of range");
            break;
        }
        let word = cpu.memory.read(addr, Wordsize::Word);
        let mark = if (0..4).any(|i| cpu.memory.dirty(addr + i)) {
            "*"
        } else {
            " "
        };
        println!("{addr:#010x}: {word:#010x}{mark}");
    }
}
