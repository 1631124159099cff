//! Instruction decoding
//!
//! Classifies a raw 32-bit word as one of the closed set of
//! instructions the hart implements (RV32I, Zifencei, Zicsr, M, F
//! and the mret return), or Illegal. Decoding is a pure hierarchical
//! match: first the two-bit quadrant, then one full-word comparison
//! for mret, then the seven-bit major opcode, then funct3 and (where
//! the format requires it) funct7 or rs2.
//!
//! The three compressed quadrants (0b00, 0b01, 0b10) are not
//! implemented and decode as Illegal rather than trapping. The
//! fence.i encoding under opcode 0001111 is collapsed into Fence
//! (both are no-ops here), so the decoder never produces FenceI even
//! though it is part of the closed set.

use super::fields::{funct3, funct7, imm_itype, opcode, quadrant, rs2};
use super::opcodes::*;

/// The closed set of instructions the execution engine dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instr {
    Illegal,

    // Privileged
    Mret,

    // RV32I
    Lui,
    Auipc,
    Jal,
    Jalr,
    Beq,
    Bne,
    Blt,
    Bge,
    Bltu,
    Bgeu,
    Lb,
    Lh,
    Lw,
    Lbu,
    Lhu,
    Sb,
    Sh,
    Sw,
    Addi,
    Slti,
    Sltiu,
    Xori,
    Ori,
    Andi,
    Slli,
    Srli,
    Srai,
    Add,
    Sub,
    Sll,
    Slt,
    Sltu,
    Xor,
    Srl,
    Sra,
    Or,
    And,
    Fence,
    Ecall,
    Ebreak,

    // Zifencei
    FenceI,

    // Zicsr
    Csrrw,
    Csrrs,
    Csrrc,
    Csrrwi,
    Csrrsi,
    Csrrci,

    // M
    Mul,
    Mulh,
    Mulhsu,
    Mulhu,
    Div,
    Divu,
    Rem,
    Remu,

    // F
    Flw,
    Fsw,
    Fmadd,
    Fmsub,
    Fnmsub,
    Fnmadd,
    Fadd,
    Fsub,
    Fmul,
    Fdiv,
    Fsqrt,
    Fsgnj,
    Fsgnjn,
    Fsgnjx,
    Fmin,
    Fmax,
    FcvtWS,
    FcvtWuS,
    FmvXW,
    Feq,
    Flt,
    Fle,
    Fclass,
    FcvtSW,
    FcvtSWu,
    FmvWX,
}

impl Instr {
    /// The canonical mnemonic. The match is exhaustive, so the name
    /// table cannot drift out of step with the instruction set.
    pub fn name(&self) -> &'static str {
        match self {
            Instr::Illegal => "illegal",
            Instr::Mret => "mret",
            Instr::Lui => "lui",
            Instr::Auipc => "auipc",
            Instr::Jal => "jal",
            Instr::Jalr => "jalr",
            Instr::Beq => "beq",
            Instr::Bne => "bne",
            Instr::Blt => "blt",
            Instr::Bge => "bge",
            Instr::Bltu => "bltu",
            Instr::Bgeu => "bgeu",
            Instr::Lb => "lb",
            Instr::Lh => "lh",
            Instr::Lw => "lw",
            Instr::Lbu => "lbu",
            Instr::Lhu => "lhu",
            Instr::Sb => "sb",
            Instr::Sh => "sh",
            Instr::Sw => "sw",
            Instr::Addi => "addi",
            Instr::Slti => "slti",
            Instr::Sltiu => "sltiu",
            Instr::Xori => "xori",
            Instr::Ori => "ori",
            Instr::Andi => "andi",
            Instr::Slli => "slli",
            Instr::Srli => "srli",
            Instr::Srai => "srai",
            Instr::Add => "add",
            Instr::Sub => "sub",
            Instr::Sll => "sll",
            Instr::Slt => "slt",
            Instr::Sltu => "sltu",
            Instr::Xor => "xor",
            Instr::Srl => "srl",
            Instr::Sra => "sra",
            Instr::Or => "or",
            Instr::And => "and",
            Instr::Fence => "fence",
            Instr::Ecall => "ecall",
            Instr::Ebreak => "ebreak",
            Instr::FenceI => "fence.i",
            Instr::Csrrw => "csrrw",
            Instr::Csrrs => "csrrs",
            Instr::Csrrc => "csrrc",
            Instr::Csrrwi => "csrrwi",
            Instr::Csrrsi => "csrrsi",
            Instr::Csrrci => "csrrci",
            Instr::Mul => "mul",
            Instr::Mulh => "mulh",
            Instr::Mulhsu => "mulhsu",
            Instr::Mulhu => "mulhu",
            Instr::Div => "div",
            Instr::Divu => "divu",
            Instr::Rem => "rem",
            Instr::Remu => "remu",
            Instr::Flw => "flw",
            Instr::Fsw => "fsw",
            Instr::Fmadd => "fmadd.s",
            Instr::Fmsub => "fmsub.s",
            Instr::Fnmsub => "fnmsub.s",
            Instr::Fnmadd => "fnmadd.s",
            Instr::Fadd => "fadd.s",
            Instr::Fsub => "fsub.s",
            Instr::Fmul => "fmul.s",
            Instr::Fdiv => "fdiv.s",
            Instr::Fsqrt => "fsqrt.s",
            Instr::Fsgnj => "fsgnj.s",
            Instr::Fsgnjn => "fsgnjn.s",
            Instr::Fsgnjx => "fsgnjx.s",
            Instr::Fmin => "fmin.s",
            Instr::Fmax => "fmax.s",
            Instr::FcvtWS => "fcvt.w.s",
            Instr::FcvtWuS => "fcvt.wu.s",
            Instr::FmvXW => "fmv.x.w",
            Instr::Feq => "feq.s",
            Instr::Flt => "flt.s",
            Instr::Fle => "fle.s",
            Instr::Fclass => "fclass.s",
            Instr::FcvtSW => "fcvt.s.w",
            Instr::FcvtSWu => "fcvt.s.wu",
            Instr::FmvWX => "fmv.w.x",
        }
    }
}

/// Decode a raw instruction word. Total and pure: every word maps to
/// exactly one variant, with Illegal for anything unrecognised.
pub fn decode(instr: u32) -> Instr {
    if quadrant(instr) != 0b11 {
        return Instr::Illegal;
    }
    if instr == INSTR_MRET {
        return Instr::Mret;
    }
    match opcode(instr) {
        OP_LUI => Instr::Lui,
        OP_AUIPC => Instr::Auipc,
        OP_JAL => Instr::Jal,
        OP_JALR => Instr::Jalr,
        OP_BRANCH => match funct3(instr) {
            FUNCT3_BEQ => Instr::Beq,
            FUNCT3_BNE => Instr::Bne,
            FUNCT3_BLT => Instr::Blt,
            FUNCT3_BGE => Instr::Bge,
            FUNCT3_BLTU => Instr::Bltu,
            FUNCT3_BGEU => Instr::Bgeu,
            _ => Instr::Illegal,
        },
        OP_LOAD => match funct3(instr) {
            FUNCT3_B => Instr::Lb,
            FUNCT3_H => Instr::Lh,
            FUNCT3_W => Instr::Lw,
            FUNCT3_BU => Instr::Lbu,
            FUNCT3_HU => Instr::Lhu,
            _ => Instr::Illegal,
        },
        OP_STORE => match funct3(instr) {
            FUNCT3_B => Instr::Sb,
            FUNCT3_H => Instr::Sh,
            FUNCT3_W => Instr::Sw,
            _ => Instr::Illegal,
        },
        OP_IMM => match funct3(instr) {
            FUNCT3_ADDI => Instr::Addi,
            FUNCT3_SLTI => Instr::Slti,
            FUNCT3_SLTIU => Instr::Sltiu,
            FUNCT3_XORI => Instr::Xori,
            FUNCT3_ORI => Instr::Ori,
            FUNCT3_ANDI => Instr::Andi,
            FUNCT3_SLLI => Instr::Slli,
            FUNCT3_SRLI_SRAI => match funct7(instr) {
                FUNCT7_BASE => Instr::Srli,
                FUNCT7_SUB_SRA => Instr::Srai,
                _ => Instr::Illegal,
            },
            _ => Instr::Illegal,
        },
        OP => match (funct3(instr), funct7(instr)) {
            (FUNCT3_ADD_SUB_MUL, FUNCT7_BASE) => Instr::Add,
            (FUNCT3_ADD_SUB_MUL, FUNCT7_SUB_SRA) => Instr::Sub,
            (FUNCT3_ADD_SUB_MUL, FUNCT7_MULDIV) => Instr::Mul,
            (FUNCT3_SLL_MULH, FUNCT7_BASE) => Instr::Sll,
            (FUNCT3_SLL_MULH, FUNCT7_MULDIV) => Instr::Mulh,
            (FUNCT3_SLT_MULHSU, FUNCT7_BASE) => Instr::Slt,
            (FUNCT3_SLT_MULHSU, FUNCT7_MULDIV) => Instr::Mulhsu,
            (FUNCT3_SLTU_MULHU, FUNCT7_BASE) => Instr::Sltu,
            (FUNCT3_SLTU_MULHU, FUNCT7_MULDIV) => Instr::Mulhu,
            (FUNCT3_XOR_DIV, FUNCT7_BASE) => Instr::Xor,
            (FUNCT3_XOR_DIV, FUNCT7_MULDIV) => Instr::Div,
            (FUNCT3_SRL_SRA_DIVU, FUNCT7_BASE) => Instr::Srl,
            (FUNCT3_SRL_SRA_DIVU, FUNCT7_SUB_SRA) => Instr::Sra,
            (FUNCT3_SRL_SRA_DIVU, FUNCT7_MULDIV) => Instr::Divu,
            (FUNCT3_OR_REM, FUNCT7_BASE) => Instr::Or,
            (FUNCT3_OR_REM, FUNCT7_MULDIV) => Instr::Rem,
            (FUNCT3_AND_REMU, FUNCT7_BASE) => Instr::And,
            (FUNCT3_AND_REMU, FUNCT7_MULDIV) => Instr::Remu,
            _ => Instr::Illegal,
        },
        OP_MISC_MEM => Instr::Fence,
        OP_SYSTEM => match funct3(instr) {
            FUNCT3_PRIV => match imm_itype(instr) {
                IMM_ECALL => Instr::Ecall,
                IMM_EBREAK => Instr::Ebreak,
                _ => Instr::Illegal,
            },
            FUNCT3_CSRRW => Instr::Csrrw,
            FUNCT3_CSRRS => Instr::Csrrs,
            FUNCT3_CSRRC => Instr::Csrrc,
            FUNCT3_CSRRWI => Instr::Csrrwi,
            FUNCT3_CSRRSI => Instr::Csrrsi,
            FUNCT3_CSRRCI => Instr::Csrrci,
            _ => Instr::Illegal,
        },
        OP_LOAD_FP => Instr::Flw,
        OP_STORE_FP => Instr::Fsw,
        OP_FMADD => Instr::Fmadd,
        OP_FMSUB => Instr::Fmsub,
        OP_FNMSUB => Instr::Fnmsub,
        OP_FNMADD => Instr::Fnmadd,
        OP_FP => match funct7(instr) {
            FUNCT7_FADD => Instr::Fadd,
            FUNCT7_FSUB => Instr::Fsub,
            FUNCT7_FMUL => Instr::Fmul,
            FUNCT7_FDIV => Instr::Fdiv,
            FUNCT7_FSQRT => Instr::Fsqrt,
            FUNCT7_FSGNJ => match funct3(instr) {
                FUNCT3_FSGNJ => Instr::Fsgnj,
                FUNCT3_FSGNJN => Instr::Fsgnjn,
                FUNCT3_FSGNJX => Instr::Fsgnjx,
                _ => Instr::Illegal,
            },
            FUNCT7_FMINMAX => match funct3(instr) {
                FUNCT3_FMIN => Instr::Fmin,
                FUNCT3_FMAX => Instr::Fmax,
                _ => Instr::Illegal,
            },
            FUNCT7_FCVT_INT => match rs2(instr) {
                RS2_FCVT_W => Instr::FcvtWS,
                RS2_FCVT_WU => Instr::FcvtWuS,
                _ => Instr::Illegal,
            },
            FUNCT7_FMV_X_W_FCLASS => match funct3(instr) {
                FUNCT3_FMV_X_W => Instr::FmvXW,
                FUNCT3_FCLASS => Instr::Fclass,
                _ => Instr::Illegal,
            },
            FUNCT7_FCMP => match funct3(instr) {
                FUNCT3_FEQ => Instr::Feq,
                FUNCT3_FLT => Instr::Flt,
                FUNCT3_FLE => Instr::Fle,
                _ => Instr::Illegal,
            },
            FUNCT7_FCVT_FLOAT => match rs2(instr) {
                RS2_FCVT_W => Instr::FcvtSW,
                RS2_FCVT_WU => Instr::FcvtSWu,
                _ => Instr::Illegal,
            },
            FUNCT7_FMV_W_X => Instr::FmvWX,
            _ => Instr::Illegal,
        },
        _ => Instr::Illegal,
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn check_compressed_quadrants_are_illegal() {
        assert_eq!(decode(0x0000_0000), Instr::Illegal);
        assert_eq!(decode(0x0000_4601), Instr::Illegal);
        assert_eq!(decode(0xffff_fffe), Instr::Illegal);
        for word in [0x12345678u32, 0xdeadbeef, 0x00000073] {
            if word & 0b11 != 0b11 {
                assert_eq!(decode(word), Instr::Illegal);
            }
        }
    }

    #[test]
    fn check_mret_full_word_match() {
        assert_eq!(decode(0x30200073), Instr::Mret);
        // Any disturbed bit falls back to the system decoder
        assert_eq!(decode(0x30200072), Instr::Illegal);
        assert_eq!(decode(0x30300073), Instr::Illegal);
    }

    #[test]
    fn check_base_decodes() {
        let cases = [
            (0x00001a37, Instr::Lui),
            (0xffffe517, Instr::Auipc),
            (0xfe1ff06f, Instr::Jal),
            (0x00008067, Instr::Jalr),
            (0x10e78463, Instr::Beq),
            (0xfe5210e3, Instr::Bne),
            (0x1220c063, Instr::Blt),
            (0x0020d663, Instr::Bge),
            (0xfec7ece3, Instr::Bltu),
            (0x00f5f463, Instr::Bgeu),
            (0x02008283, Instr::Lb),
            (0x00411f03, Instr::Lh),
            (0x02052403, Instr::Lw),
            (0x0006c783, Instr::Lbu),
            (0x0060df03, Instr::Lhu),
            (0x00e78023, Instr::Sb),
            (0x00111223, Instr::Sh),
            (0x05612c23, Instr::Sw),
            (0x00200793, Instr::Addi),
            (0x0010af13, Instr::Slti),
            (0x0017b613, Instr::Sltiu),
            (0x999ac093, Instr::Xori),
            (0x00156513, Instr::Ori),
            (0xff867693, Instr::Andi),
            (0x00381813, Instr::Slli),
            (0x00c7d793, Instr::Srli),
            (0x41f55893, Instr::Srai),
            (0x00c58633, Instr::Add),
            (0x40b50533, Instr::Sub),
            (0x00209f33, Instr::Sll),
            (0x0020af33, Instr::Slt),
            (0x0020bf33, Instr::Sltu),
            (0x00f647b3, Instr::Xor),
            (0x0020d0b3, Instr::Srl),
            (0x4020df33, Instr::Sra),
            (0x00b7e5b3, Instr::Or),
            (0x00d57533, Instr::And),
            (0x0ff0000f, Instr::Fence),
            (0x00000073, Instr::Ecall),
            (0x00100073, Instr::Ebreak),
        ];
        for (word, expected) in cases {
            assert_eq!(decode(word), expected, "word {word:#010x}");
        }
    }

    #[test]
    fn check_fence_i_collapses_to_fence() {
        // fence.i encoding (funct3 = 001 under opcode 0001111)
        assert_eq!(decode(0x0000100f), Instr::Fence);
    }

    #[test]
    fn check_zicsr_and_m_decodes() {
        let cases = [
            (0x10569073, Instr::Csrrw),
            (0x1006a073, Instr::Csrrs),
            (0x1004b073, Instr::Csrrc),
            (0x14005073, Instr::Csrrwi),
            (0x10016073, Instr::Csrrsi),
            (0x100176f3, Instr::Csrrci),
            (0x021080b3, Instr::Mul),
            (0x02209133, Instr::Mulh),
            (0x0220a133, Instr::Mulhsu),
            (0x0220bf33, Instr::Mulhu),
            (0x0220cf33, Instr::Div),
            (0x0220df33, Instr::Divu),
            (0x0220ef33, Instr::Rem),
            (0x0220ff33, Instr::Remu),
        ];
        for (word, expected) in cases {
            assert_eq!(decode(word), expected, "word {word:#010x}");
        }
    }

    #[test]
    fn check_float_decodes() {
        let cases = [
            (0x0004a787, Instr::Flw),
            (0x00aa2027, Instr::Fsw),
            (0xd19b1543, Instr::Fmadd),
            (0x3166dd47, Instr::Fmsub),
            (0xc9cd48cb, Instr::Fnmsub),
            (0x19613e4f, Instr::Fnmadd),
            (0x0127f553, Instr::Fadd),
            (0x0897f7d3, Instr::Fsub),
            (0x10f97953, Instr::Fmul),
            (0x1947f553, Instr::Fdiv),
            (0x58057553, Instr::Fsqrt),
            (0x21ca0ed3, Instr::Fsgnj),
            (0x21dd1b53, Instr::Fsgnjn),
            (0x20eb2153, Instr::Fsgnjx),
            (0x286b82d3, Instr::Fmin),
            (0x29441153, Instr::Fmax),
            (0xc0056553, Instr::FcvtWS),
            (0xc014cb53, Instr::FcvtWuS),
            (0xe00482d3, Instr::FmvXW),
            (0xa0742153, Instr::Feq),
            (0xa0651953, Instr::Flt),
            (0xa1ff8d53, Instr::Fle),
            (0xe00a1e53, Instr::Fclass),
            (0xd009d7d3, Instr::FcvtSW),
            (0xd01c27d3, Instr::FcvtSWu),
            (0xf0000e53, Instr::FmvWX),
        ];
        for (word, expected) in cases {
            assert_eq!(decode(word), expected, "word {word:#010x}");
        }
    }

    #[test]
    fn check_unknown_encodings_are_illegal() {
        // Reserved funct7 under OP
        assert_eq!(decode(0xfe000033), Instr::Illegal);
        // funct3 = 011 under OP_LOAD is unused in RV32
        assert_eq!(decode(0x0000b003), Instr::Illegal);
        // funct3 = 100 under OP_SYSTEM is unused
        assert_eq!(decode(0x00004073), Instr::Illegal);
        // Reserved funct7 under OP_FP
        assert_eq!(decode(0x0c05f553), Instr::Illegal);
    }
}
