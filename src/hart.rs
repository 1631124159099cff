//! RISC-V hart
//!
//! The architectural state container and execution engine for a
//! single RV32IMF_Zicsr_Zifencei hart, plus the mret return. This is
//! the simplest possible execution environment (section 1.2 of the
//! unprivileged specification): one hart, one privilege level, all
//! memory readable and writable, and environment calls terminating
//! execution rather than trapping.
//!
//! step() executes the instruction at the current program counter
//! and reports whether the hart should keep running. Within a step,
//! effects happen in a fixed order: fetch, advance pc to pc + 4,
//! read the operand registers, compute, write the destination, and
//! finally let a taken branch or jump replace the advanced pc. An
//! ecall, ebreak or illegal instruction halts the run; the host can
//! keep calling step() afterwards if it chooses, since the program
//! counter has already moved past the halting instruction.

use log::warn;

use crate::instr::decode::{decode, Instr};
use crate::instr::fields::{
    imm_btype, imm_itype, imm_jtype, imm_stype, imm_utype, rd, rs1, rs2, rs3,
};
use crate::utils::sign_extend;

use self::csr::{Csr, CSR_FFLAGS, CSR_MEPC};
use self::memory::{Memory, Wordsize};
use self::registers::{FloatRegisters, IntRegisters};

pub mod csr;
pub mod fpu;
pub mod memory;
pub mod registers;

/// A complete hart: program counter, the two register banks, the
/// CSR file and physical memory. Created once and reused; reset()
/// returns every bank to the all-zero state.
#[derive(Debug, Default)]
pub struct Cpu {
    pub pc: u32,
    pub x_regs: IntRegisters,
    pub f_regs: FloatRegisters,
    pub csr: Csr,
    pub memory: Memory,
}

impl Cpu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero the program counter, every register bank, all CSRs, all
    /// of memory and every dirty flag.
    pub fn reset(&mut self) {
        self.pc = 0;
        self.x_regs.reset();
        self.f_regs.reset();
        self.csr.reset();
        self.memory.reset();
    }

    /// Clear the just-changed markers on every bank. The engine never
    /// touches these; the host clears them at its own cadence.
    pub fn clear_dirty(&mut self) {
        self.x_regs.clear_dirty();
        self.f_regs.clear_dirty();
        self.csr.clear_dirty();
        self.memory.clear_dirty();
    }

    /// Execute one instruction. Returns true to keep running, false
    /// when the guest halts via ecall or ebreak, or when an illegal
    /// instruction is fetched.
    pub fn step(&mut self) -> bool {
        let word = self.memory.read(self.pc, Wordsize::Word);
        let instr = decode(word);
        if instr == Instr::Mret {
            // No privilege state to restore; returning to the address
            // in mepc is all the conformance harnesses need.
            self.pc = self.csr.read(CSR_MEPC);
            return true;
        }
        let old_pc = self.pc;
        self.pc = old_pc.wrapping_add(4);
        match instr {
            Instr::Illegal => {
                warn!("illegal instruction {word:#010x} at pc {old_pc:#010x}");
                false
            }
            Instr::Ecall | Instr::Ebreak => false,
            _ => {
                execute(self, word, instr, old_pc);
                true
            }
        }
    }
}

fn execute(cpu: &mut Cpu, word: u32, instr: Instr, old_pc: u32) {
    match instr {
        Instr::Lui => cpu.x_regs.write(rd(word), imm_utype(word) << 12),
        Instr::Auipc => cpu
            .x_regs
            .write(rd(word), old_pc.wrapping_add(imm_utype(word) << 12)),
        Instr::Jal => exec_jal(cpu, word, old_pc),
        Instr::Jalr => exec_jalr(cpu, word, old_pc),
        Instr::Beq | Instr::Bne | Instr::Blt | Instr::Bge | Instr::Bltu | Instr::Bgeu => {
            exec_branch(cpu, word, instr, old_pc)
        }
        Instr::Lb | Instr::Lh | Instr::Lw | Instr::Lbu | Instr::Lhu => exec_load(cpu, word, instr),
        Instr::Sb | Instr::Sh | Instr::Sw => exec_store(cpu, word, instr),
        Instr::Addi
        | Instr::Slti
        | Instr::Sltiu
        | Instr::Xori
        | Instr::Ori
        | Instr::Andi
        | Instr::Slli
        | Instr::Srli
        | Instr::Srai => exec_op_imm(cpu, word, instr),
        Instr::Add
        | Instr::Sub
        | Instr::Sll
        | Instr::Slt
        | Instr::Sltu
        | Instr::Xor
        | Instr::Srl
        | Instr::Sra
        | Instr::Or
        | Instr::And
        | Instr::Mul
        | Instr::Mulh
        | Instr::Mulhsu
        | Instr::Mulhu
        | Instr::Div
        | Instr::Divu
        | Instr::Rem
        | Instr::Remu => exec_op(cpu, word, instr),
        // Fences order nothing on a single in-order hart
        Instr::Fence | Instr::FenceI => (),
        Instr::Csrrw
        | Instr::Csrrs
        | Instr::Csrrc
        | Instr::Csrrwi
        | Instr::Csrrsi
        | Instr::Csrrci => exec_zicsr(cpu, word, instr),
        Instr::Flw => exec_flw(cpu, word),
        Instr::Fsw => exec_fsw(cpu, word),
        Instr::Fmadd | Instr::Fmsub | Instr::Fnmsub | Instr::Fnmadd => {
            exec_fused(cpu, word, instr)
        }
        _ => exec_fp(cpu, word, instr),
    }
}

/// Jump and link: store the return address pc + 4, then jump to
/// old_pc + offset. The destination write still happens for x0 (and
/// is dropped there), so jal x0 is a plain jump.
fn exec_jal(cpu: &mut Cpu, word: u32, old_pc: u32) {
    let offset = sign_extend(imm_jtype(word), 21);
    cpu.x_regs.write(rd(word), old_pc.wrapping_add(4));
    cpu.pc = old_pc.wrapping_add(offset as u32);
}

/// Jump and link register: base + offset in signed arithmetic with
/// the low bit cleared. Reading the base before writing rd makes
/// jalr with rd == rs1 behave.
fn exec_jalr(cpu: &mut Cpu, word: u32, old_pc: u32) {
    let offset = sign_extend(imm_itype(word), 12);
    let target = cpu.x_regs.read_signed(rs1(word)).wrapping_add(offset) as u32 & !1;
    cpu.x_regs.write(rd(word), old_pc.wrapping_add(4));
    cpu.pc = target;
}

fn exec_branch(cpu: &mut Cpu, word: u32, instr: Instr, old_pc: u32) {
    let src1 = cpu.x_regs.read(rs1(word));
    let src2 = cpu.x_regs.read(rs2(word));
    let taken = match instr {
        Instr::Beq => src1 == src2,
        Instr::Bne => src1 != src2,
        Instr::Blt => (src1 as i32) < (src2 as i32),
        Instr::Bge => (src1 as i32) >= (src2 as i32),
        Instr::Bltu => src1 < src2,
        _ => src1 >= src2,
    };
    if taken {
        let offset = sign_extend(imm_btype(word), 13);
        cpu.pc = old_pc.wrapping_add(offset as u32);
    }
}

fn exec_load(cpu: &mut Cpu, word: u32, instr: Instr) {
    let offset = sign_extend(imm_itype(word), 12);
    let addr = cpu.x_regs.read(rs1(word)).wrapping_add(offset as u32);
    let value = match instr {
        Instr::Lb => sign_extend(cpu.memory.read(addr, Wordsize::Byte), 8) as u32,
        Instr::Lh => sign_extend(cpu.memory.read(addr, Wordsize::Halfword), 16) as u32,
        Instr::Lw => cpu.memory.read(addr, Wordsize::Word),
        Instr::Lbu => cpu.memory.read(addr, Wordsize::Byte),
        _ => cpu.memory.read(addr, Wordsize::Halfword),
    };
    cpu.x_regs.write(rd(word), value);
}

fn exec_store(cpu: &mut Cpu, word: u32, instr: Instr) {
    let offset = sign_extend(imm_stype(word), 12);
    let addr = cpu.x_regs.read(rs1(word)).wrapping_add(offset as u32);
    let value = cpu.x_regs.read(rs2(word));
    let size = match instr {
        Instr::Sb => Wordsize::Byte,
        Instr::Sh => Wordsize::Halfword,
        _ => Wordsize::Word,
    };
    cpu.memory.write(addr, value, size);
}

fn exec_op_imm(cpu: &mut Cpu, word: u32, instr: Instr) {
    let src = cpu.x_regs.read(rs1(word));
    let imm = sign_extend(imm_itype(word), 12);
    let shamt = imm_itype(word) & 0x1f;
    let value = match instr {
        Instr::Addi => src.wrapping_add(imm as u32),
        Instr::Slti => ((src as i32) < imm) as u32,
        Instr::Sltiu => (src < imm as u32) as u32,
        Instr::Xori => src ^ imm as u32,
        Instr::Ori => src | imm as u32,
        Instr::Andi => src & imm as u32,
        Instr::Slli => src << shamt,
        Instr::Srli => src >> shamt,
        _ => ((src as i32) >> shamt) as u32,
    };
    cpu.x_regs.write(rd(word), value);
}

fn exec_op(cpu: &mut Cpu, word: u32, instr: Instr) {
    let src1 = cpu.x_regs.read(rs1(word));
    let src2 = cpu.x_regs.read(rs2(word));
    let value = match instr {
        Instr::Add => src1.wrapping_add(src2),
        Instr::Sub => src1.wrapping_sub(src2),
        Instr::Sll => src1 << (src2 & 0x1f),
        Instr::Slt => ((src1 as i32) < (src2 as i32)) as u32,
        Instr::Sltu => (src1 < src2) as u32,
        Instr::Xor => src1 ^ src2,
        Instr::Srl => src1 >> (src2 & 0x1f),
        Instr::Sra => ((src1 as i32) >> (src2 & 0x1f)) as u32,
        Instr::Or => src1 | src2,
        Instr::And => src1 & src2,
        Instr::Mul => {
            (i64::from(src1 as i32).wrapping_mul(i64::from(src2 as i32))) as u32
        }
        Instr::Mulh => {
            ((i64::from(src1 as i32).wrapping_mul(i64::from(src2 as i32))) >> 32) as u32
        }
        Instr::Mulhsu => ((i64::from(src1 as i32).wrapping_mul(i64::from(src2))) >> 32) as u32,
        Instr::Mulhu => ((u64::from(src1) * u64::from(src2)) >> 32) as u32,
        Instr::Div => {
            // Division by zero yields all ones; INT_MIN / -1 wraps
            // back to INT_MIN (section 7.2, unprivileged spec)
            if src2 == 0 {
                u32::MAX
            } else {
                (src1 as i32).wrapping_div(src2 as i32) as u32
            }
        }
        Instr::Divu => {
            if src2 == 0 {
                u32::MAX
            } else {
                src1 / src2
            }
        }
        Instr::Rem => {
            if src2 == 0 {
                src1
            } else {
                (src1 as i32).wrapping_rem(src2 as i32) as u32
            }
        }
        _ => {
            if src2 == 0 {
                src1
            } else {
                src1 % src2
            }
        }
    };
    cpu.x_regs.write(rd(word), value);
}

/// Zicsr operations. The old CSR value is always read and written to
/// rd (the register file drops the write when rd is x0), then the
/// CSR receives the new value derived from rs1 or the five-bit
/// immediate held in the rs1 field.
fn exec_zicsr(cpu: &mut Cpu, word: u32, instr: Instr) {
    let csr = imm_itype(word);
    let old = cpu.csr.read(csr);
    let rhs = match instr {
        Instr::Csrrw | Instr::Csrrs | Instr::Csrrc => cpu.x_regs.read(rs1(word)),
        _ => rs1(word),
    };
    cpu.x_regs.write(rd(word), old);
    let new = match instr {
        Instr::Csrrw | Instr::Csrrwi => rhs,
        Instr::Csrrs | Instr::Csrrsi => old | rhs,
        _ => old & !rhs,
    };
    cpu.csr.write(csr, new);
}

fn exec_flw(cpu: &mut Cpu, word: u32) {
    let offset = sign_extend(imm_itype(word), 12);
    let addr = cpu.x_regs.read(rs1(word)).wrapping_add(offset as u32);
    cpu.f_regs.write_bits(rd(word), cpu.memory.read(addr, Wordsize::Word));
}

fn exec_fsw(cpu: &mut Cpu, word: u32) {
    let offset = sign_extend(imm_stype(word), 12);
    let addr = cpu.x_regs.read(rs1(word)).wrapping_add(offset as u32);
    cpu.memory
        .write(addr, cpu.f_regs.read_bits(rs2(word)), Wordsize::Word);
}

/// The fused multiply-add family, computed as a multiply followed by
/// an add (two roundings) with the accrued flags of both steps.
fn exec_fused(cpu: &mut Cpu, word: u32, instr: Instr) {
    let a = cpu.f_regs.read(rs1(word));
    let b = cpu.f_regs.read(rs2(word));
    let c = cpu.f_regs.read(rs3(word));
    let (product, mul_flags) = fpu::mul(a, b);
    let (result, add_flags) = match instr {
        Instr::Fmadd => fpu::add(product, c),
        Instr::Fmsub => fpu::add(product, -c),
        Instr::Fnmsub => fpu::add(-product, c),
        _ => fpu::add(-product, -c),
    };
    cpu.csr.write(CSR_FFLAGS, mul_flags | add_flags);
    cpu.f_regs.write(rd(word), result);
}

const SIGN_BIT: u32 = 0x8000_0000;

fn exec_fp(cpu: &mut Cpu, word: u32, instr: Instr) {
    let rd = rd(word);
    match instr {
        Instr::Fadd | Instr::Fsub | Instr::Fmul | Instr::Fdiv | Instr::Fmin | Instr::Fmax => {
            let a = cpu.f_regs.read(rs1(word));
            let b = cpu.f_regs.read(rs2(word));
            let (result, flags) = match instr {
                Instr::Fadd => fpu::add(a, b),
                Instr::Fsub => fpu::sub(a, b),
                Instr::Fmul => fpu::mul(a, b),
                Instr::Fdiv => fpu::div(a, b),
                Instr::Fmin => fpu::min(a, b),
                _ => fpu::max(a, b),
            };
            cpu.csr.write(CSR_FFLAGS, flags);
            cpu.f_regs.write(rd, result);
        }
        Instr::Fsqrt => {
            let (result, flags) = fpu::sqrt(cpu.f_regs.read(rs1(word)));
            cpu.csr.write(CSR_FFLAGS, flags);
            cpu.f_regs.write(rd, result);
        }
        Instr::Fsgnj | Instr::Fsgnjn | Instr::Fsgnjx => {
            let bits1 = cpu.f_regs.read_bits(rs1(word));
            let bits2 = cpu.f_regs.read_bits(rs2(word));
            let sign = match instr {
                Instr::Fsgnj => bits2 & SIGN_BIT,
                Instr::Fsgnjn => !bits2 & SIGN_BIT,
                _ => (bits1 ^ bits2) & SIGN_BIT,
            };
            cpu.f_regs.write_bits(rd, sign | (bits1 & !SIGN_BIT));
        }
        Instr::Feq | Instr::Flt | Instr::Fle => {
            let a = cpu.f_regs.read(rs1(word));
            let b = cpu.f_regs.read(rs2(word));
            let (result, flags) = match instr {
                Instr::Feq => fpu::feq(a, b),
                Instr::Flt => fpu::flt(a, b),
                _ => fpu::fle(a, b),
            };
            cpu.csr.write(CSR_FFLAGS, flags);
            cpu.x_regs.write(rd, result as u32);
        }
        Instr::FcvtWS => {
            let (value, flags) = fpu::cvt_w_s(cpu.f_regs.read(rs1(word)));
            cpu.csr.write(CSR_FFLAGS, flags);
            cpu.x_regs.write(rd, value as u32);
        }
        Instr::FcvtWuS => {
            let (value, flags) = fpu::cvt_wu_s(cpu.f_regs.read(rs1(word)));
            cpu.csr.write(CSR_FFLAGS, flags);
            cpu.x_regs.write(rd, value);
        }
        Instr::Fclass => {
            let value = fpu::classify(cpu.f_regs.read(rs1(word)));
            cpu.x_regs.write(rd, value);
        }
        Instr::FmvXW => cpu.x_regs.write(rd, cpu.f_regs.read_bits(rs1(word))),
        Instr::FmvWX => cpu.f_regs.write_bits(rd, cpu.x_regs.read(rs1(word))),
        Instr::FcvtSW => cpu
            .f_regs
            .write(rd, cpu.x_regs.read_signed(rs1(word)) as f32),
        Instr::FcvtSWu => cpu.f_regs.write(rd, cpu.x_regs.read(rs1(word)) as f32),
        _ => unreachable!("non-FP instruction dispatched to exec_fp"),
    }
}
