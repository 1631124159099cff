//! Instruction encoding
//!
//! Assembles instruction words from their fields. The format-level
//! functions place fields without checking ranges (out-of-range
//! arguments are masked); the per-instruction helpers below fix the
//! opcode and funct fields so tests and host tooling can build
//! programs without hand-packing bits. Encoding then decoding any
//! helper's output yields the corresponding instruction.

use crate::utils::{bits, ones};

use super::opcodes::*;

/// Make an R-type instruction
pub fn rtype(funct7: u32, rs2: u32, rs1: u32, funct3: u32, rd: u32, opcode: u32) -> u32 {
    funct7 << 25 | rs2 << 20 | rs1 << 15 | funct3 << 12 | rd << 7 | opcode
}

/// Make an R4-type (fused multiply-add) instruction
pub fn r4type(rs3: u32, rs2: u32, rs1: u32, funct3: u32, rd: u32, opcode: u32) -> u32 {
    rs3 << 27 | rs2 << 20 | rs1 << 15 | funct3 << 12 | rd << 7 | opcode
}

/// Make an I-type instruction. The immediate is masked to 12 bits.
pub fn itype(imm: u32, rs1: u32, funct3: u32, rd: u32, opcode: u32) -> u32 {
    (imm & ones::<u32>(12)) << 20 | rs1 << 15 | funct3 << 12 | rd << 7 | opcode
}

/// Make an S-type instruction from a 12-bit immediate
pub fn stype(imm: u32, rs2: u32, rs1: u32, funct3: u32, opcode: u32) -> u32 {
    let imm11_5 = bits(imm, 11, 5);
    let imm4_0 = bits(imm, 4, 0);
    rtype(imm11_5, rs2, rs1, funct3, imm4_0, opcode)
}

/// Make a B-type instruction from a 13-bit immediate (bit 0 dropped)
pub fn btype(imm: u32, rs2: u32, rs1: u32, funct3: u32, opcode: u32) -> u32 {
    let imm12 = bits(imm, 12, 12);
    let imm11 = bits(imm, 11, 11);
    let imm10_5 = bits(imm, 10, 5);
    let imm4_1 = bits(imm, 4, 1);
    rtype(
        imm12 << 6 | imm10_5,
        rs2,
        rs1,
        funct3,
        imm4_1 << 1 | imm11,
        opcode,
    )
}

/// Make a U-type instruction from the 20-bit upper immediate
pub fn utype(imm: u32, rd: u32, opcode: u32) -> u32 {
    (imm & ones::<u32>(20)) << 12 | rd << 7 | opcode
}

/// Make a J-type instruction from a 21-bit immediate (bit 0 dropped)
pub fn jtype(imm: u32, rd: u32, opcode: u32) -> u32 {
    let imm20 = bits(imm, 20, 20);
    let imm19_12 = bits(imm, 19, 12);
    let imm11 = bits(imm, 11, 11);
    let imm10_1 = bits(imm, 10, 1);
    (imm20 << 31) | (imm10_1 << 21) | (imm11 << 20) | (imm19_12 << 12) | rd << 7 | opcode
}

pub fn lui(rd: u32, imm: i32) -> u32 {
    utype(imm as u32, rd, OP_LUI)
}

pub fn auipc(rd: u32, imm: i32) -> u32 {
    utype(imm as u32, rd, OP_AUIPC)
}

pub fn jal(rd: u32, offset: i32) -> u32 {
    jtype(offset as u32, rd, OP_JAL)
}

pub fn jalr(rd: u32, rs1: u32, offset: i32) -> u32 {
    itype(offset as u32, rs1, 0b000, rd, OP_JALR)
}

fn branch(funct3: u32, rs1: u32, rs2: u32, offset: i32) -> u32 {
    btype(offset as u32, rs2, rs1, funct3, OP_BRANCH)
}

pub fn beq(rs1: u32, rs2: u32, offset: i32) -> u32 {
    branch(FUNCT3_BEQ, rs1, rs2, offset)
}

pub fn bne(rs1: u32, rs2: u32, offset: i32) -> u32 {
    branch(FUNCT3_BNE, rs1, rs2, offset)
}

pub fn blt(rs1: u32, rs2: u32, offset: i32) -> u32 {
    branch(FUNCT3_BLT, rs1, rs2, offset)
}

pub fn bge(rs1: u32, rs2: u32, offset: i32) -> u32 {
    branch(FUNCT3_BGE, rs1, rs2, offset)
}

pub fn bltu(rs1: u32, rs2: u32, offset: i32) -> u32 {
    branch(FUNCT3_BLTU, rs1, rs2, offset)
}

pub fn bgeu(rs1: u32, rs2: u32, offset: i32) -> u32 {
    branch(FUNCT3_BGEU, rs1, rs2, offset)
}

fn load(funct3: u32, rd: u32, rs1: u32, offset: i32) -> u32 {
    itype(offset as u32, rs1, funct3, rd, OP_LOAD)
}

pub fn lb(rd: u32, rs1: u32, offset: i32) -> u32 {
    load(FUNCT3_B, rd, rs1, offset)
}

pub fn lh(rd: u32, rs1: u32, offset: i32) -> u32 {
    load(FUNCT3_H, rd, rs1, offset)
}

pub fn lw(rd: u32, rs1: u32, offset: i32) -> u32 {
    load(FUNCT3_W, rd, rs1, offset)
}

pub fn lbu(rd: u32, rs1: u32, offset: i32) -> u32 {
    load(FUNCT3_BU, rd, rs1, offset)
}

pub fn lhu(rd: u32, rs1: u32, offset: i32) -> u32 {
    load(FUNCT3_HU, rd, rs1, offset)
}

fn store(funct3: u32, rs2: u32, rs1: u32, offset: i32) -> u32 {
    stype(offset as u32, rs2, rs1, funct3, OP_STORE)
}

pub fn sb(rs2: u32, rs1: u32, offset: i32) -> u32 {
    store(FUNCT3_B, rs2, rs1, offset)
}

pub fn sh(rs2: u32, rs1: u32, offset: i32) -> u32 {
    store(FUNCT3_H, rs2, rs1, offset)
}

pub fn sw(rs2: u32, rs1: u32, offset: i32) -> u32 {
    store(FUNCT3_W, rs2, rs1, offset)
}

fn op_imm(funct3: u32, rd: u32, rs1: u32, imm: i32) -> u32 {
    itype(imm as u32, rs1, funct3, rd, OP_IMM)
}

pub fn addi(rd: u32, rs1: u32, imm: i32) -> u32 {
    op_imm(FUNCT3_ADDI, rd, rs1, imm)
}

pub fn slti(rd: u32, rs1: u32, imm: i32) -> u32 {
    op_imm(FUNCT3_SLTI, rd, rs1, imm)
}

pub fn sltiu(rd: u32, rs1: u32, imm: i32) -> u32 {
    op_imm(FUNCT3_SLTIU, rd, rs1, imm)
}

pub fn xori(rd: u32, rs1: u32, imm: i32) -> u32 {
    op_imm(FUNCT3_XORI, rd, rs1, imm)
}

pub fn ori(rd: u32, rs1: u32, imm: i32) -> u32 {
    op_imm(FUNCT3_ORI, rd, rs1, imm)
}

pub fn andi(rd: u32, rs1: u32, imm: i32) -> u32 {
    op_imm(FUNCT3_ANDI, rd, rs1, imm)
}

pub fn slli(rd: u32, rs1: u32, shamt: u32) -> u32 {
    itype(shamt & 0x1f, rs1, FUNCT3_SLLI, rd, OP_IMM)
}

pub fn srli(rd: u32, rs1: u32, shamt: u32) -> u32 {
    itype(shamt & 0x1f, rs1, FUNCT3_SRLI_SRAI, rd, OP_IMM)
}

pub fn srai(rd: u32, rs1: u32, shamt: u32) -> u32 {
    itype(FUNCT7_SUB_SRA << 5 | (shamt & 0x1f), rs1, FUNCT3_SRLI_SRAI, rd, OP_IMM)
}

fn op(funct7: u32, funct3: u32, rd: u32, rs1: u32, rs2: u32) -> u32 {
    rtype(funct7, rs2, rs1, funct3, rd, OP)
}

pub fn add(rd: u32, rs1: u32, rs2: u32) -> u32 {
    op(FUNCT7_BASE, FUNCT3_ADD_SUB_MUL, rd, rs1, rs2)
}

pub fn sub(rd: u32, rs1: u32, rs2: u32) -> u32 {
    op(FUNCT7_SUB_SRA, FUNCT3_ADD_SUB_MUL, rd, rs1, rs2)
}

pub fn sll(rd: u32, rs1: u32, rs2: u32) -> u32 {
    op(FUNCT7_BASE, FUNCT3_SLL_MULH, rd, rs1, rs2)
}

pub fn slt(rd: u32, rs1: u32, rs2: u32) -> u32 {
    op(FUNCT7_BASE, FUNCT3_SLT_MULHSU, rd, rs1, rs2)
}

pub fn sltu(rd: u32, rs1: u32, rs2: u32) -> u32 {
    op(FUNCT7_BASE, FUNCT3_SLTU_MULHU, rd, rs1, rs2)
}

pub fn xor(rd: u32, rs1: u32, rs2: u32) -> u32 {
    op(FUNCT7_BASE, FUNCT3_XOR_DIV, rd, rs1, rs2)
}

pub fn srl(rd: u32, rs1: u32, rs2: u32) -> u32 {
    op(FUNCT7_BASE, FUNCT3_SRL_SRA_DIVU, rd, rs1, rs2)
}

pub fn sra(rd: u32, rs1: u32, rs2: u32) -> u32 {
    op(FUNCT7_SUB_SRA, FUNCT3_SRL_SRA_DIVU, rd, rs1, rs2)
}

pub fn or(rd: u32, rs1: u32, rs2: u32) -> u32 {
    op(FUNCT7_BASE, FUNCT3_OR_REM, rd, rs1, rs2)
}

pub fn and(rd: u32, rs1: u32, rs2: u32) -> u32 {
    op(FUNCT7_BASE, FUNCT3_AND_REMU, rd, rs1, rs2)
}

pub fn fence() -> u32 {
    itype(0, 0, 0b000, 0, OP_MISC_MEM)
}

pub fn ecall() -> u32 {
    itype(IMM_ECALL, 0, FUNCT3_PRIV, 0, OP_SYSTEM)
}

pub fn ebreak() -> u32 {
    itype(IMM_EBREAK, 0, FUNCT3_PRIV, 0, OP_SYSTEM)
}

pub fn mret() -> u32 {
    INSTR_MRET
}

fn zicsr(funct3: u32, rd: u32, csr: u32, rs1_or_uimm: u32) -> u32 {
    itype(csr, rs1_or_uimm, funct3, rd, OP_SYSTEM)
}

pub fn csrrw(rd: u32, csr: u32, rs1: u32) -> u32 {
    zicsr(FUNCT3_CSRRW, rd, csr, rs1)
}

pub fn csrrs(rd: u32, csr: u32, rs1: u32) -> u32 {
    zicsr(FUNCT3_CSRRS, rd, csr, rs1)
}

pub fn csrrc(rd: u32, csr: u32, rs1: u32) -> u32 {
    zicsr(FUNCT3_CSRRC, rd, csr, rs1)
}

pub fn csrrwi(rd: u32, csr: u32, uimm: u32) -> u32 {
    zicsr(FUNCT3_CSRRWI, rd, csr, uimm)
}

pub fn csrrsi(rd: u32, csr: u32, uimm: u32) -> u32 {
    zicsr(FUNCT3_CSRRSI, rd, csr, uimm)
}

pub fn csrrci(rd: u32, csr: u32, uimm: u32) -> u32 {
    zicsr(FUNCT3_CSRRCI, rd, csr, uimm)
}

fn muldiv(funct3: u32, rd: u32, rs1: u32, rs2: u32) -> u32 {
    op(FUNCT7_MULDIV, funct3, rd, rs1, rs2)
}

pub fn mul(rd: u32, rs1: u32, rs2: u32) -> u32 {
    muldiv(FUNCT3_ADD_SUB_MUL, rd, rs1, rs2)
}

pub fn mulh(rd: u32, rs1: u32, rs2: u32) -> u32 {
    muldiv(FUNCT3_SLL_MULH, rd, rs1, rs2)
}

pub fn mulhsu(rd: u32, rs1: u32, rs2: u32) -> u32 {
    muldiv(FUNCT3_SLT_MULHSU, rd, rs1, rs2)
}

pub fn mulhu(rd: u32, rs1: u32, rs2: u32) -> u32 {
    muldiv(FUNCT3_SLTU_MULHU, rd, rs1, rs2)
}

pub fn div(rd: u32, rs1: u32, rs2: u32) -> u32 {
    muldiv(FUNCT3_XOR_DIV, rd, rs1, rs2)
}

pub fn divu(rd: u32, rs1: u32, rs2: u32) -> u32 {
    muldiv(FUNCT3_SRL_SRA_DIVU, rd, rs1, rs2)
}

pub fn rem(rd: u32, rs1: u32, rs2: u32) -> u32 {
    muldiv(FUNCT3_OR_REM, rd, rs1, rs2)
}

pub fn remu(rd: u32, rs1: u32, rs2: u32) -> u32 {
    muldiv(FUNCT3_AND_REMU, rd, rs1, rs2)
}

/// The dynamic rounding mode, used as the rm field when a test has no
/// interest in rounding (the hart uses host rounding either way).
pub const RM_DYN: u32 = 0b111;

pub fn flw(rd: u32, rs1: u32, offset: i32) -> u32 {
    itype(offset as u32, rs1, FUNCT3_W, rd, OP_LOAD_FP)
}

pub fn fsw(rs2: u32, rs1: u32, offset: i32) -> u32 {
    stype(offset as u32, rs2, rs1, FUNCT3_W, OP_STORE_FP)
}

pub fn fmadd(rd: u32, rs1: u32, rs2: u32, rs3: u32, rm: u32) -> u32 {
    r4type(rs3, rs2, rs1, rm, rd, OP_FMADD)
}

pub fn fmsub(rd: u32, rs1: u32, rs2: u32, rs3: u32, rm: u32) -> u32 {
    r4type(rs3, rs2, rs1, rm, rd, OP_FMSUB)
}

pub fn fnmsub(rd: u32, rs1: u32, rs2: u32, rs3: u32, rm: u32) -> u32 {
    r4type(rs3, rs2, rs1, rm, rd, OP_FNMSUB)
}

pub fn fnmadd(rd: u32, rs1: u32, rs2: u32, rs3: u32, rm: u32) -> u32 {
    r4type(rs3, rs2, rs1, rm, rd, OP_FNMADD)
}

fn op_fp(funct7: u32, rs2: u32, rs1: u32, funct3: u32, rd: u32) -> u32 {
    rtype(funct7, rs2, rs1, funct3, rd, OP_FP)
}

pub fn fadd(rd: u32, rs1: u32, rs2: u32, rm: u32) -> u32 {
    op_fp(FUNCT7_FADD, rs2, rs1, rm, rd)
}

pub fn fsub(rd: u32, rs1: u32, rs2: u32, rm: u32) -> u32 {
    op_fp(FUNCT7_FSUB, rs2, rs1, rm, rd)
}

pub fn fmul(rd: u32, rs1: u32, rs2: u32, rm: u32) -> u32 {
    op_fp(FUNCT7_FMUL, rs2, rs1, rm, rd)
}

pub fn fdiv(rd: u32, rs1: u32, rs2: u32, rm: u32) -> u32 {
    op_fp(FUNCT7_FDIV, rs2, rs1, rm, rd)
}

pub fn fsqrt(rd: u32, rs1: u32, rm: u32) -> u32 {
    op_fp(FUNCT7_FSQRT, 0, rs1, rm, rd)
}

pub fn fsgnj(rd: u32, rs1: u32, rs2: u32) -> u32 {
    op_fp(FUNCT7_FSGNJ, rs2, rs1, FUNCT3_FSGNJ, rd)
}

pub fn fsgnjn(rd: u32, rs1: u32, rs2: u32) -> u32 {
    op_fp(FUNCT7_FSGNJ, rs2, rs1, FUNCT3_FSGNJN, rd)
}

pub fn fsgnjx(rd: u32, rs1: u32, rs2: u32) -> u32 {
    op_fp(FUNCT7_FSGNJ, rs2, rs1, FUNCT3_FSGNJX, rd)
}

pub fn fmin(rd: u32, rs1: u32, rs2: u32) -> u32 {
    op_fp(FUNCT7_FMINMAX, rs2, rs1, FUNCT3_FMIN, rd)
}

pub fn fmax(rd: u32, rs1: u32, rs2: u32) -> u32 {
    op_fp(FUNCT7_FMINMAX, rs2, rs1, FUNCT3_FMAX, rd)
}

pub fn fcvt_w_s(rd: u32, rs1: u32, rm: u32) -> u32 {
    op_fp(FUNCT7_FCVT_INT, RS2_FCVT_W, rs1, rm, rd)
}

pub fn fcvt_wu_s(rd: u32, rs1: u32, rm: u32) -> u32 {
    op_fp(FUNCT7_FCVT_INT, RS2_FCVT_WU, rs1, rm, rd)
}

pub fn fmv_x_w(rd: u32, rs1: u32) -> u32 {
    op_fp(FUNCT7_FMV_X_W_FCLASS, 0, rs1, FUNCT3_FMV_X_W, rd)
}

pub fn feq(rd: u32, rs1: u32, rs2: u32) -> u32 {
    op_fp(FUNCT7_FCMP, rs2, rs1, FUNCT3_FEQ, rd)
}

pub fn flt(rd: u32, rs1: u32, rs2: u32) -> u32 {
    op_fp(FUNCT7_FCMP, rs2, rs1, FUNCT3_FLT, rd)
}

pub fn fle(rd: u32, rs1: u32, rs2: u32) -> u32 {
    op_fp(FUNCT7_FCMP, rs2, rs1, FUNCT3_FLE, rd)
}

pub fn fclass(rd: u32, rs1: u32) -> u32 {
    op_fp(FUNCT7_FMV_X_W_FCLASS, 0, rs1, FUNCT3_FCLASS, rd)
}

pub fn fcvt_s_w(rd: u32, rs1: u32, rm: u32) -> u32 {
    op_fp(FUNCT7_FCVT_FLOAT, RS2_FCVT_W, rs1, rm, rd)
}

pub fn fcvt_s_wu(rd: u32, rs1: u32, rm: u32) -> u32 {
    op_fp(FUNCT7_FCVT_FLOAT, RS2_FCVT_WU, rs1, rm, rd)
}

pub fn fmv_w_x(rd: u32, rs1: u32) -> u32 {
    op_fp(FUNCT7_FMV_W_X, 0, rs1, FUNCT3_FMV_X_W, rd)
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::instr::decode::{decode, Instr};

    #[test]
    fn check_known_encodings() {
        assert_eq!(lui(20, 1), 0x00001a37);
        assert_eq!(jal(0, -32), 0xfe1ff06f);
        assert_eq!(jalr(0, 1, 0), 0x00008067);
        assert_eq!(beq(15, 14, 264), 0x10e78463);
        assert_eq!(bne(4, 5, -32), 0xfe5210e3);
        assert_eq!(lb(5, 1, 32), 0x02008283);
        assert_eq!(sb(14, 15, 0), 0x00e78023);
        assert_eq!(sw(22, 2, 88), 0x05612c23);
        assert_eq!(addi(15, 0, 2), 0x00200793);
        assert_eq!(srai(17, 10, 31), 0x41f55893);
        assert_eq!(add(12, 11, 12), 0x00c58633);
        assert_eq!(csrrs(0, 0x100, 13), 0x1006a073);
        assert_eq!(mul(1, 1, 1), 0x021080b3);
        assert_eq!(fsqrt(10, 10, RM_DYN), 0x58057553);
        assert_eq!(fmv_x_w(5, 9), 0xe00482d3);
        assert_eq!(fmadd(10, 22, 25, 26, 0b001), 0xd19b1543);
        assert_eq!(ecall(), 0x00000073);
        assert_eq!(ebreak(), 0x00100073);
        assert_eq!(mret(), 0x30200073);
    }

    #[test]
    fn check_encode_decode_round_trip() {
        let cases = [
            (lui(1, -1), Instr::Lui),
            (auipc(2, 0x7ffff), Instr::Auipc),
            (jal(31, 1 << 19), Instr::Jal),
            (jalr(3, 4, -2048), Instr::Jalr),
            (bgeu(5, 6, -4096), Instr::Bgeu),
            (blt(7, 8, 4094), Instr::Blt),
            (lhu(9, 10, 2047), Instr::Lhu),
            (sh(11, 12, -2048), Instr::Sh),
            (sltiu(13, 14, -1), Instr::Sltiu),
            (slli(15, 16, 31), Instr::Slli),
            (srli(15, 16, 31), Instr::Srli),
            (srai(15, 16, 31), Instr::Srai),
            (sub(17, 18, 19), Instr::Sub),
            (sra(20, 21, 22), Instr::Sra),
            (fence(), Instr::Fence),
            (csrrwi(23, 0x340, 31), Instr::Csrrwi),
            (csrrci(24, 0x003, 5), Instr::Csrrci),
            (mulhsu(25, 26, 27), Instr::Mulhsu),
            (remu(28, 29, 30), Instr::Remu),
            (flw(1, 2, -4), Instr::Flw),
            (fsw(3, 4, 2040), Instr::Fsw),
            (fnmsub(5, 6, 7, 8, 0), Instr::Fnmsub),
            (fnmadd(9, 10, 11, 12, 0b100), Instr::Fnmadd),
            (fdiv(13, 14, 15, RM_DYN), Instr::Fdiv),
            (fsgnjx(16, 17, 18), Instr::Fsgnjx),
            (fmin(19, 20, 21), Instr::Fmin),
            (fcvt_w_s(22, 23, 0b001), Instr::FcvtWS),
            (fcvt_wu_s(24, 25, 0b001), Instr::FcvtWuS),
            (fcvt_s_w(26, 27, RM_DYN), Instr::FcvtSW),
            (fcvt_s_wu(28, 29, RM_DYN), Instr::FcvtSWu),
            (feq(1, 2, 3), Instr::Feq),
            (fle(4, 5, 6), Instr::Fle),
            (fclass(7, 8), Instr::Fclass),
            (fmv_w_x(9, 10), Instr::FmvWX),
        ];
        for (word, expected) in cases {
            assert_eq!(decode(word), expected, "word {word:#010x}");
        }
    }
}
