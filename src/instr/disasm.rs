//! Instruction disassembly
//!
//! Renders any decoded instruction as a single canonical text line,
//! at most 31 characters. Register operands use numeric names (x7,
//! f12). CSR operands print their symbolic name when the address is
//! in the known-CSR table, falling back to decimal otherwise. Float
//! instructions with a rounding-mode field append its symbolic name,
//! except for the dynamic mode (0b111) which renders as no suffix.

use crate::utils::sign_extend;

use super::decode::{decode, Instr};
use super::fields::{
    funct3, imm_btype, imm_itype, imm_jtype, imm_stype, imm_utype, rd, rs1, rs2, rs3,
};

/// Longest rendering, excluding the terminator the original kept.
pub const MAX_LEN: usize = 31;

/// Symbolic name of a floating-point rounding mode. The dynamic mode
/// (0b111) renders as the empty string; the two reserved encodings
/// render as "unknown".
fn rm_name(rm: u32) -> &'static str {
    match rm {
        0b000 => "rne",
        0b001 => "rtz",
        0b010 => "rdn",
        0b011 => "rup",
        0b100 => "rmm",
        0b111 => "",
        _ => "unknown",
    }
}

/// Append the rounding-mode suffix, if the mode has one.
fn push_rm(line: &mut String, rm: u32) {
    let name = rm_name(rm);
    if !name.is_empty() {
        line.push_str(", ");
        line.push_str(name);
    }
}

/// Disassemble a raw instruction word into its canonical text line.
/// Pure; decoding an unrecognised word renders as "illegal".
pub fn disassemble(word: u32) -> String {
    let instr = decode(word);
    let name = instr.name();
    let mut line = match instr {
        Instr::Illegal
        | Instr::Mret
        | Instr::Fence
        | Instr::FenceI
        | Instr::Ecall
        | Instr::Ebreak => name.to_string(),
        Instr::Addi
        | Instr::Slti
        | Instr::Sltiu
        | Instr::Andi
        | Instr::Ori
        | Instr::Xori
        | Instr::Jalr => {
            format!(
                "{name} x{}, x{}, {}",
                rd(word),
                rs1(word),
                sign_extend(imm_itype(word), 12)
            )
        }
        Instr::Slli | Instr::Srli | Instr::Srai => {
            format!("{name} x{}, x{}, {}", rd(word), rs1(word), imm_itype(word) & 0x1f)
        }
        Instr::Lui | Instr::Auipc => {
            format!("{name} x{}, {}", rd(word), sign_extend(imm_utype(word), 20))
        }
        Instr::Add
        | Instr::Sub
        | Instr::Slt
        | Instr::Sltu
        | Instr::And
        | Instr::Or
        | Instr::Xor
        | Instr::Sll
        | Instr::Srl
        | Instr::Sra
        | Instr::Mul
        | Instr::Mulh
        | Instr::Mulhsu
        | Instr::Mulhu
        | Instr::Div
        | Instr::Divu
        | Instr::Rem
        | Instr::Remu => {
            format!("{name} x{}, x{}, x{}", rd(word), rs1(word), rs2(word))
        }
        Instr::Jal => {
            format!("{name} x{}, {}", rd(word), sign_extend(imm_jtype(word), 21))
        }
        Instr::Beq | Instr::Bne | Instr::Blt | Instr::Bltu | Instr::Bge | Instr::Bgeu => {
            format!(
                "{name} x{}, x{}, {}",
                rs1(word),
                rs2(word),
                sign_extend(imm_btype(word), 13)
            )
        }
        Instr::Lw | Instr::Lh | Instr::Lhu | Instr::Lb | Instr::Lbu => {
            format!(
                "{name} x{}, {}(x{})",
                rd(word),
                sign_extend(imm_itype(word), 12),
                rs1(word)
            )
        }
        Instr::Sw | Instr::Sh | Instr::Sb => {
            format!(
                "{name} x{}, {}(x{})",
                rs2(word),
                sign_extend(imm_stype(word), 12),
                rs1(word)
            )
        }
        Instr::Csrrw
        | Instr::Csrrs
        | Instr::Csrrc
        | Instr::Csrrwi
        | Instr::Csrrsi
        | Instr::Csrrci => {
            let csr = imm_itype(word);
            match csr_name(csr) {
                Some(csr_repr) => {
                    format!("{name} x{}, {}, x{}", rd(word), csr_repr, rs1(word))
                }
                None => format!("{name} x{}, {}, x{}", rd(word), csr, rs1(word)),
            }
        }
        Instr::Flw => {
            format!(
                "{name} f{}, {}(x{})",
                rd(word),
                sign_extend(imm_itype(word), 12),
                rs1(word)
            )
        }
        Instr::Fsw => {
            format!(
                "{name} f{}, {}(x{})",
                rs2(word),
                sign_extend(imm_stype(word), 12),
                rs1(word)
            )
        }
        Instr::Fsgnj
        | Instr::Fsgnjn
        | Instr::Fsgnjx
        | Instr::Fmin
        | Instr::Fmax
        | Instr::Feq
        | Instr::Flt
        | Instr::Fle => {
            format!("{name} f{}, f{}, f{}", rd(word), rs1(word), rs2(word))
        }
        Instr::Fmadd | Instr::Fmsub | Instr::Fnmsub | Instr::Fnmadd => {
            let mut line = format!(
                "{name} f{}, f{}, f{}, f{}",
                rd(word),
                rs1(word),
                rs2(word),
                rs3(word)
            );
            push_rm(&mut line, funct3(word));
            line
        }
        Instr::Fadd | Instr::Fsub | Instr::Fmul | Instr::Fdiv => {
            let mut line = format!("{name} f{}, f{}, f{}", rd(word), rs1(word), rs2(word));
            push_rm(&mut line, funct3(word));
            line
        }
        Instr::Fsqrt => {
            let mut line = format!("{name} f{}, f{}", rd(word), rs1(word));
            push_rm(&mut line, funct3(word));
            line
        }
        Instr::FcvtWS | Instr::FcvtWuS => {
            let mut line = format!("{name} x{}, f{}", rd(word), rs1(word));
            push_rm(&mut line, funct3(word));
            line
        }
        Instr::FcvtSW | Instr::FcvtSWu => {
            let mut line = format!("{name} f{}, x{}", rd(word), rs1(word));
            push_rm(&mut line, funct3(word));
            line
        }
        Instr::Fclass | Instr::FmvXW => {
            format!("{name} x{}, f{}", rd(word), rs1(word))
        }
        Instr::FmvWX => {
            format!("{name} f{}, x{}", rd(word), rs1(word))
        }
    };
    line.truncate(MAX_LEN);
    line
}

/// Symbolic name of a CSR address, for the known addresses of the
/// unprivileged and privileged specifications. Closed mapping; the
/// disassembler falls back to decimal for anything else.
pub fn csr_name(csr: u32) -> Option<&'static str> {
    match csr {
        0x000 => Some("ustatus"),
        0x001 => Some("fflags"),
        0x002 => Some("frm"),
        0x003 => Some("fcsr"),
        0x004 => Some("uie"),
        0x005 => Some("utvec"),
        0x040 => Some("uscratch"),
        0x041 => Some("uepc"),
        0x042 => Some("ucause"),
        0x043 => Some("utval"),
        0x044 => Some("uip"),
        0x100 => Some("sstatus"),
        0x102 => Some("sedeleg"),
        0x103 => Some("sideleg"),
        0x104 => Some("sie"),
        0x105 => Some("stvec"),
        0x106 => Some("scounteren"),
        0x140 => Some("sscratch"),
        0x141 => Some("sepc"),
        0x142 => Some("scause"),
        0x143 => Some("stval"),
        0x144 => Some("sip"),
        0x180 => Some("satp"),
        0x200 => Some("vsstatus"),
        0x204 => Some("vsie"),
        0x205 => Some("vstvec"),
        0x240 => Some("vsscratch"),
        0x241 => Some("vsepc"),
        0x242 => Some("vscause"),
        0x243 => Some("vstval"),
        0x244 => Some("vsip"),
        0x280 => Some("vsatp"),
        0x300 => Some("mstatus"),
        0x301 => Some("misa"),
        0x302 => Some("medeleg"),
        0x303 => Some("mideleg"),
        0x304 => Some("mie"),
        0x305 => Some("mtvec"),
        0x306 => Some("mcounteren"),
        0x310 => Some("mstatush"),
        0x320 => Some("mcountinhibit"),
        0x323 => Some("mhpmevent3"),
        0x324 => Some("mhpmevent4"),
        0x325 => Some("mhpmevent5"),
        0x326 => Some("mhpmevent6"),
        0x327 => Some("mhpmevent7"),
        0x328 => Some("mhpmevent8"),
        0x329 => Some("mhpmevent9"),
        0x32a => Some("mhpmevent10"),
        0x32b => Some("mhpmevent11"),
        0x32c => Some("mhpmevent12"),
        0x32d => Some("mhpmevent13"),
        0x32e => Some("mhpmevent14"),
        0x32f => Some("mhpmevent15"),
        0x330 => Some("mhpmevent16"),
        0x331 => Some("mhpmevent17"),
        0x332 => Some("mhpmevent18"),
        0x333 => Some("mhpmevent19"),
        0x334 => Some("mhpmevent20"),
        0x335 => Some("mhpmevent21"),
        0x336 => Some("mhpmevent22"),
        0x337 => Some("mhpmevent23"),
        0x338 => Some("mhpmevent24"),
        0x339 => Some("mhpmevent25"),
        0x33a => Some("mhpmevent26"),
        0x33b => Some("mhpmevent27"),
        0x33c => Some("mhpmevent28"),
        0x33d => Some("mhpmevent29"),
        0x33e => Some("mhpmevent30"),
        0x33f => Some("mhpmevent31"),
        0x340 => Some("mscratch"),
        0x341 => Some("mepc"),
        0x342 => Some("mcause"),
        0x343 => Some("mtval"),
        0x344 => Some("mip"),
        0x34a => Some("mtinst"),
        0x34b => Some("mtval2"),
        0x380 => Some("mbase"),
        0x381 => Some("mbound"),
        0x382 => Some("mibase"),
        0x383 => Some("mibound"),
        0x384 => Some("mdbase"),
        0x385 => Some("mdbound"),
        0x3a0 => Some("pmpcfg0"),
        0x3a1 => Some("pmpcfg1"),
        0x3a2 => Some("pmpcfg2"),
        0x3a3 => Some("pmpcfg3"),
        0x3a4 => Some("pmpcfg4"),
        0x3a5 => Some("pmpcfg5"),
        0x3a6 => Some("pmpcfg6"),
        0x3a7 => Some("pmpcfg7"),
        0x3a8 => Some("pmpcfg8"),
        0x3a9 => Some("pmpcfg9"),
        0x3aa => Some("pmpcfg10"),
        0x3ab => Some("pmpcfg11"),
        0x3ac => Some("pmpcfg12"),
        0x3ad => Some("pmpcfg13"),
        0x3ae => Some("pmpcfg14"),
        0x3af => Some("pmpcfg15"),
        0x3b0 => Some("pmpaddr0"),
        0x3b1 => Some("pmpaddr1"),
        0x3b2 => Some("pmpaddr2"),
        0x3b3 => Some("pmpaddr3"),
        0x3b4 => Some("pmpaddr4"),
        0x3b5 => Some("pmpaddr5"),
        0x3b6 => Some("pmpaddr6"),
        0x3b7 => Some("pmpaddr7"),
        0x3b8 => Some("pmpaddr8"),
        0x3b9 => Some("pmpaddr9"),
        0x3ba => Some("pmpaddr10"),
        0x3bb => Some("pmpaddr11"),
        0x3bc => Some("pmpaddr12"),
        0x3bd => Some("pmpaddr13"),
        0x3be => Some("pmpaddr14"),
        0x3bf => Some("pmpaddr15"),
        0x3c0 => Some("pmpaddr16"),
        0x3c1 => Some("pmpaddr17"),
        0x3c2 => Some("pmpaddr18"),
        0x3c3 => Some("pmpaddr19"),
        0x3c4 => Some("pmpaddr20"),
        0x3c5 => Some("pmpaddr21"),
        0x3c6 => Some("pmpaddr22"),
        0x3c7 => Some("pmpaddr23"),
        0x3c8 => Some("pmpaddr24"),
        0x3c9 => Some("pmpaddr25"),
        0x3ca => Some("pmpaddr26"),
        0x3cb => Some("pmpaddr27"),
        0x3cc => Some("pmpaddr28"),
        0x3cd => Some("pmpaddr29"),
        0x3ce => Some("pmpaddr30"),
        0x3cf => Some("pmpaddr31"),
        0x3d0 => Some("pmpaddr32"),
        0x3d1 => Some("pmpaddr33"),
        0x3d2 => Some("pmpaddr34"),
        0x3d3 => Some("pmpaddr35"),
        0x3d4 => Some("pmpaddr36"),
        0x3d5 => Some("pmpaddr37"),
        0x3d6 => Some("pmpaddr38"),
        0x3d7 => Some("pmpaddr39"),
        0x3d8 => Some("pmpaddr40"),
        0x3d9 => Some("pmpaddr41"),
        0x3da => Some("pmpaddr42"),
        0x3db => Some("pmpaddr43"),
        0x3dc => Some("pmpaddr44"),
        0x3dd => Some("pmpaddr45"),
        0x3de => Some("pmpaddr46"),
        0x3df => Some("pmpaddr47"),
        0x3e0 => Some("pmpaddr48"),
        0x3e1 => Some("pmpaddr49"),
        0x3e2 => Some("pmpaddr50"),
        0x3e3 => Some("pmpaddr51"),
        0x3e4 => Some("pmpaddr52"),
        0x3e5 => Some("pmpaddr53"),
        0x3e6 => Some("pmpaddr54"),
        0x3e7 => Some("pmpaddr55"),
        0x3e8 => Some("pmpaddr56"),
        0x3e9 => Some("pmpaddr57"),
        0x3ea => Some("pmpaddr58"),
        0x3eb => Some("pmpaddr59"),
        0x3ec => Some("pmpaddr60"),
        0x3ed => Some("pmpaddr61"),
        0x3ee => Some("pmpaddr62"),
        0x3ef => Some("pmpaddr63"),
        0x600 => Some("hstatus"),
        0x602 => Some("hedeleg"),
        0x603 => Some("hideleg"),
        0x604 => Some("hie"),
        0x605 => Some("htimedelta"),
        0x606 => Some("hcounteren"),
        0x607 => Some("hgeie"),
        0x615 => Some("htimedeltah"),
        0x643 => Some("htval"),
        0x644 => Some("hip"),
        0x64a => Some("htinst"),
        0x680 => Some("hgatp"),
        0x7a0 => Some("tselect"),
        0x7a1 => Some("tdata1"),
        0x7a2 => Some("tdata2"),
        0x7a3 => Some("tdata3"),
        0x7b0 => Some("dcsr"),
        0x7b1 => Some("dpc"),
        0x7b2 => Some("dscratch0"),
        0x7b3 => Some("dscratch1"),
        0xb00 => Some("mcycle"),
        0xb02 => Some("minstret"),
        0xb03 => Some("mhpmcounter3"),
        0xb04 => Some("mhpmcounter4"),
        0xb05 => Some("mhpmcounter5"),
        0xb06 => Some("mhpmcounter6"),
        0xb07 => Some("mhpmcounter7"),
        0xb08 => Some("mhpmcounter8"),
        0xb09 => Some("mhpmcounter9"),
        0xb0a => Some("mhpmcounter10"),
        0xb0b => Some("mhpmcounter11"),
        0xb0c => Some("mhpmcounter12"),
        0xb0d => Some("mhpmcounter13"),
        0xb0e => Some("mhpmcounter14"),
        0xb0f => Some("mhpmcounter15"),
        0xb10 => Some("mhpmcounter16"),
        0xb11 => Some("mhpmcounter17"),
        0xb12 => Some("mhpmcounter18"),
        0xb13 => Some("mhpmcounter19"),
        0xb14 => Some("mhpmcounter20"),
        0xb15 => Some("mhpmcounter21"),
        0xb16 => Some("mhpmcounter22"),
        0xb17 => Some("mhpmcounter23"),
        0xb18 => Some("mhpmcounter24"),
        0xb19 => Some("mhpmcounter25"),
        0xb1a => Some("mhpmcounter26"),
        0xb1b => Some("mhpmcounter27"),
        0xb1c => Some("mhpmcounter28"),
        0xb1d => Some("mhpmcounter29"),
        0xb1e => Some("mhpmcounter30"),
        0xb1f => Some("mhpmcounter31"),
        0xb80 => Some("mcycleh"),
        0xb82 => Some("minstreth"),
        0xb83 => Some("mhpmcounter3h"),
        0xb84 => Some("mhpmcounter4h"),
        0xb85 => Some("mhpmcounter5h"),
        0xb86 => Some("mhpmcounter6h"),
        0xb87 => Some("mhpmcounter7h"),
        0xb88 => Some("mhpmcounter8h"),
        0xb89 => Some("mhpmcounter9h"),
        0xb8a => Some("mhpmcounter10h"),
        0xb8b => Some("mhpmcounter11h"),
        0xb8c => Some("mhpmcounter12h"),
        0xb8d => Some("mhpmcounter13h"),
        0xb8e => Some("mhpmcounter14h"),
        0xb8f => Some("mhpmcounter15h"),
        0xb90 => Some("mhpmcounter16h"),
        0xb91 => Some("mhpmcounter17h"),
        0xb92 => Some("mhpmcounter18h"),
        0xb93 => Some("mhpmcounter19h"),
        0xb94 => Some("mhpmcounter20h"),
        0xb95 => Some("mhpmcounter21h"),
        0xb96 => Some("mhpmcounter22h"),
        0xb97 => Some("mhpmcounter23h"),
        0xb98 => Some("mhpmcounter24h"),
        0xb99 => Some("mhpmcounter25h"),
        0xb9a => Some("mhpmcounter26h"),
        0xb9b => Some("mhpmcounter27h"),
        0xb9c => Some("mhpmcounter28h"),
        0xb9d => Some("mhpmcounter29h"),
        0xb9e => Some("mhpmcounter30h"),
        0xb9f => Some("mhpmcounter31h"),
        0xc00 => Some("cycle"),
        0xc01 => Some("time"),
        0xc02 => Some("instret"),
        0xc03 => Some("hpmcounter3"),
        0xc04 => Some("hpmcounter4"),
        0xc05 => Some("hpmcounter5"),
        0xc06 => Some("hpmcounter6"),
        0xc07 => Some("hpmcounter7"),
        0xc08 => Some("hpmcounter8"),
        0xc09 => Some("hpmcounter9"),
        0xc0a => Some("hpmcounter10"),
        0xc0b => Some("hpmcounter11"),
        0xc0c => Some("hpmcounter12"),
        0xc0d => Some("hpmcounter13"),
        0xc0e => Some("hpmcounter14"),
        0xc0f => Some("hpmcounter15"),
        0xc10 => Some("hpmcounter16"),
        0xc11 => Some("hpmcounter17"),
        0xc12 => Some("hpmcounter18"),
        0xc13 => Some("hpmcounter19"),
        0xc14 => Some("hpmcounter20"),
        0xc15 => Some("hpmcounter21"),
        0xc16 => Some("hpmcounter22"),
        0xc17 => Some("hpmcounter23"),
        0xc18 => Some("hpmcounter24"),
        0xc19 => Some("hpmcounter25"),
        0xc1a => Some("hpmcounter26"),
        0xc1b => Some("hpmcounter27"),
        0xc1c => Some("hpmcounter28"),
        0xc1d => Some("hpmcounter29"),
        0xc1e => Some("hpmcounter30"),
        0xc1f => Some("hpmcounter31"),
        0xc80 => Some("cycleh"),
        0xc81 => Some("timeh"),
        0xc82 => Some("instreth"),
        0xc83 => Some("hpmcounter3h"),
        0xc84 => Some("hpmcounter4h"),
        0xc85 => Some("hpmcounter5h"),
        0xc86 => Some("hpmcounter6h"),
        0xc87 => Some("hpmcounter7h"),
        0xc88 => Some("hpmcounter8h"),
        0xc89 => Some("hpmcounter9h"),
        0xc8a => Some("hpmcounter10h"),
        0xc8b => Some("hpmcounter11h"),
        0xc8c => Some("hpmcounter12h"),
        0xc8d => Some("hpmcounter13h"),
        0xc8e => Some("hpmcounter14h"),
        0xc8f => Some("hpmcounter15h"),
        0xc90 => Some("hpmcounter16h"),
        0xc91 => Some("hpmcounter17h"),
        0xc92 => Some("hpmcounter18h"),
        0xc93 => Some("hpmcounter19h"),
        0xc94 => Some("hpmcounter20h"),
        0xc95 => Some("hpmcounter21h"),
        0xc96 => Some("hpmcounter22h"),
        0xc97 => Some("hpmcounter23h"),
        0xc98 => Some("hpmcounter24h"),
        0xc99 => Some("hpmcounter25h"),
        0xc9a => Some("hpmcounter26h"),
        0xc9b => Some("hpmcounter27h"),
        0xc9c => Some("hpmcounter28h"),
        0xc9d => Some("hpmcounter29h"),
        0xc9e => Some("hpmcounter30h"),
        0xc9f => Some("hpmcounter31h"),
        0xe12 => Some("hgeip"),
        0xf11 => Some("mvendorid"),
        0xf12 => Some("marchid"),
        0xf13 => Some("mimpid"),
        0xf14 => Some("mhartid"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    fn check(cases: &[(u32, &str)]) {
        for (word, expected) in cases {
            assert_eq!(disassemble(*word), *expected, "word {word:#010x}");
        }
    }

    #[test]
    fn check_no_operand_forms() {
        check(&[
            (0x00000000, "illegal"),
            (0x30200073, "mret"),
            (0x0ff0000f, "fence"),
            (0x00000073, "ecall"),
            (0x00100073, "ebreak"),
        ]);
    }

    #[test]
    fn check_upper_immediate_and_jump_forms() {
        check(&[
            (0x00001a37, "lui x20, 1"),
            (0x800002b7, "lui x5, -524288"),
            (0x212120b7, "lui x1, 135698"),
            (0xffffe517, "auipc x10, -2"),
            (0xfffff797, "auipc x15, -1"),
            (0xfe1ff06f, "jal x0, -32"),
            (0x0000006f, "jal x0, 0"),
            (0xf89ff06f, "jal x0, -120"),
            (0x00008067, "jalr x0, x1, 0"),
            (0x000f0067, "jalr x0, x30, 0"),
        ]);
    }

    #[test]
    fn check_branch_forms() {
        check(&[
            (0x10e78463, "beq x15, x14, 264"),
            (0x00050a63, "beq x10, x0, 20"),
            (0xfe5210e3, "bne x4, x5, -32"),
        ]);
    }

    #[test]
    fn check_load_store_forms() {
        check(&[
            (0x02008283, "lb x5, 32(x1)"),
            (0xffe0df03, "lhu x30, -2(x1)"),
            (0x00e78023, "sb x14, 0(x15)"),
            (0xfee78fa3, "sb x14, -1(x15)"),
            (0xfe209d23, "sh x2, -6(x1)"),
            (0x00111223, "sh x1, 4(x2)"),
            (0x05612c23, "sw x22, 88(x2)"),
        ]);
    }

    #[test]
    fn check_alu_immediate_forms() {
        check(&[
            (0x00200793, "addi x15, x0, 2"),
            (0x00000013, "addi x0, x0, 0"),
            (0x7ff0af13, "slti x30, x1, 2047"),
            (0x8000af13, "slti x30, x1, -2048"),
            (0xfff0bf13, "sltiu x30, x1, -1"),
            (0x999ac093, "xori x1, x21, -1639"),
            (0x5391e193, "ori x3, x3, 1337"),
            (0xff867693, "andi x13, x12, -8"),
            (0x00381813, "slli x16, x16, 3"),
            (0x01059793, "slli x15, x11, 16"),
            // The shift amount is the immediate masked to five bits
            (0x03079793, "slli x15, x15, 16"),
            (0x00c7d793, "srli x15, x15, 12"),
            (0x41f55893, "srai x17, x10, 31"),
        ]);
    }

    #[test]
    fn check_alu_register_forms() {
        check(&[
            (0x00c58633, "add x12, x11, x12"),
            (0x40b50533, "sub x10, x10, x11"),
            (0x00209f33, "sll x30, x1, x2"),
            (0x0020af33, "slt x30, x1, x2"),
            (0x000030b3, "sltu x1, x0, x0"),
            (0x0020cf33, "xor x30, x1, x2"),
            (0x4020df33, "sra x30, x1, x2"),
            (0x00b7e5b3, "or x11, x15, x11"),
            (0x00d57533, "and x10, x10, x13"),
            (0x021080b3, "mul x1, x1, x1"),
            (0x0220ef33, "rem x30, x1, x2"),
        ]);
    }

    #[test]
    fn check_csr_forms() {
        check(&[
            (0x10569073, "csrrw x0, stvec, x13"),
            (0x18079073, "csrrw x0, satp, x15"),
            (0x1006a073, "csrrs x0, sstatus, x13"),
            (0x1004b073, "csrrc x0, sstatus, x9"),
            (0x14005073, "csrrwi x0, sscratch, x0"),
            (0x10016073, "csrrsi x0, sstatus, x2"),
            (0x100176f3, "csrrci x13, sstatus, x2"),
            // Unknown CSR addresses fall back to decimal
            (0x7c029373, "csrrw x6, 1984, x5"),
        ]);
    }

    #[test]
    fn check_float_load_store_forms() {
        check(&[
            (0x0004a787, "flw f15, 0(x9)"),
            (0x1e872687, "flw f13, 488(x14)"),
            (0x00aa2027, "fsw f10, 0(x20)"),
        ]);
    }

    #[test]
    fn check_float_arithmetic_forms() {
        check(&[
            (0xd19b1543, "fmadd.s f10, f22, f25, f26, rtz"),
            (0x50077347, "fmsub.s f6, f14, f0, f10"),
            (0x19613e4f, "fnmadd.s f28, f2, f22, f3, rup"),
            (0x0127f553, "fadd.s f10, f15, f18"),
            (0x0897f7d3, "fsub.s f15, f15, f9"),
            (0x10f97953, "fmul.s f18, f18, f15"),
            (0x1947f553, "fdiv.s f10, f15, f20"),
            (0x58057553, "fsqrt.s f10, f10"),
            (0x580e35d3, "fsqrt.s f11, f28, rup"),
        ]);
    }

    #[test]
    fn check_float_sign_injection_min_max_compare_forms() {
        check(&[
            (0x21ca0ed3, "fsgnj.s f29, f20, f28"),
            (0x21dd1b53, "fsgnjn.s f22, f26, f29"),
            (0x20eb2153, "fsgnjx.s f2, f22, f14"),
            (0x286b82d3, "fmin.s f5, f23, f6"),
            (0x29441153, "fmax.s f2, f8, f20"),
            (0xa0742153, "feq.s f2, f8, f7"),
            (0xa0651953, "flt.s f18, f10, f6"),
            (0xa1ff8d53, "fle.s f26, f31, f31"),
        ]);
    }

    #[test]
    fn check_float_conversion_and_move_forms() {
        check(&[
            (0xc0056553, "fcvt.w.s x10, f10, unknown"),
            (0xc006fad3, "fcvt.w.s x21, f13"),
            (0xc00fa8d3, "fcvt.w.s x17, f31, rdn"),
            (0xc014cb53, "fcvt.wu.s x22, f9, rmm"),
            (0xe00482d3, "fmv.x.w x5, f9"),
            (0xe0088053, "fmv.x.w x0, f17"),
            (0xe00a1e53, "fclass.s x28, f20"),
            (0xd009d7d3, "fcvt.s.w f15, x19, unknown"),
            (0xd001a953, "fcvt.s.w f18, x3, rdn"),
            (0xd01c27d3, "fcvt.s.wu f15, x24, rdn"),
            (0xf0000e53, "fmv.w.x f28, x0"),
        ]);
    }

    #[test]
    fn check_lines_are_clipped_to_max_len() {
        // Widest renderings run over and keep the first 31 characters
        check(&[
            (0x08cf53c3, "fmadd.s f7, f30, f12, f1, unkno"),
            (0xc9cd48cb, "fnmsub.s f17, f26, f28, f25, rm"),
        ]);
        for word in [0x08cf53c3u32, 0xc9cd48cb, 0xd19b1543, 0x00001a37] {
            assert!(disassemble(word).len() <= MAX_LEN);
        }
    }

    #[test]
    fn check_csr_name_table() {
        assert_eq!(csr_name(0x001), Some("fflags"));
        assert_eq!(csr_name(0x002), Some("frm"));
        assert_eq!(csr_name(0x003), Some("fcsr"));
        assert_eq!(csr_name(0x100), Some("sstatus"));
        assert_eq!(csr_name(0x180), Some("satp"));
        assert_eq!(csr_name(0x341), Some("mepc"));
        assert_eq!(csr_name(0xc00), Some("cycle"));
        assert_eq!(csr_name(0xc80), Some("cycleh"));
        assert_eq!(csr_name(0xc1f), Some("hpmcounter31"));
        assert_eq!(csr_name(0x3b0), Some("pmpaddr0"));
        assert_eq!(csr_name(0x3ef), Some("pmpaddr63"));
        assert_eq!(csr_name(0x33f), Some("mhpmevent31"));
        assert_eq!(csr_name(0x7c0), None);
        assert_eq!(csr_name(0xfff), None);
    }
}
