//! ELF loading
//!
//! Takes the bytes of a 32-bit little-endian RISC-V executable,
//! validates its identification and header fields one step at a
//! time, and loads every PT_LOAD segment into hart memory at its
//! physical address. The test binaries link at 0x80000000 and use
//! the top address bit as a physical/virtual marker, so the entry
//! point and each load address have that bit masked off.
//!
//! Only the program-header table matters for execution; section
//! headers are linking metadata and are ignored. A segment's file
//! image is copied as-is, and any p_memsz tail beyond p_filesz is
//! left as the zeroes the preceding reset put there.

use elf::abi;
use elf::endian::AnyEndian;
use elf::ElfBytes;
use log::debug;
use thiserror::Error;

use crate::hart::Cpu;

/// The top address bit marks the virtual alias of physical memory
const PHYS_ADDR_MASK: u32 = 0x7fff_ffff;

/// Why an executable image was rejected. Nothing is written to the
/// hart unless loading succeeds.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("missing ELF identification")]
    WrongMagic,
    #[error("ELF file is not 32-bit")]
    WrongClass,
    #[error("ELF file is not little-endian")]
    WrongData,
    #[error("ELF file is not an executable")]
    WrongType,
    #[error("ELF file targets the wrong machine, expected RISC-V")]
    WrongMachine,
    #[error("ELF file has the wrong version, expected 1")]
    WrongVersion,
    #[error("ELF file does not specify an entry point")]
    NoEntry,
}

/// Validate an executable image and load it. On success the hart is
/// reset, the program counter points at the (masked) entry point,
/// and every PT_LOAD segment sits in memory.
pub fn load_elf(cpu: &mut Cpu, bytes: &[u8]) -> Result<(), LoadError> {
    if bytes.len() < 16
        || bytes[0..4] != [abi::ELFMAG0, abi::ELFMAG1, abi::ELFMAG2, abi::ELFMAG3]
    {
        return Err(LoadError::WrongMagic);
    }
    if bytes[abi::EI_CLASS] != abi::ELFCLASS32 {
        return Err(LoadError::WrongClass);
    }
    if bytes[abi::EI_DATA] != abi::ELFDATA2LSB {
        return Err(LoadError::WrongData);
    }

    let file = ElfBytes::<AnyEndian>::minimal_parse(bytes).map_err(|_| LoadError::WrongMagic)?;
    let ehdr = file.ehdr;
    if ehdr.e_type != abi::ET_EXEC {
        return Err(LoadError::WrongType);
    }
    if ehdr.e_machine != abi::EM_RISCV {
        return Err(LoadError::WrongMachine);
    }
    if ehdr.version != abi::EV_CURRENT as u32 {
        return Err(LoadError::WrongVersion);
    }
    if ehdr.e_entry == 0 {
        return Err(LoadError::NoEntry);
    }

    cpu.reset();
    cpu.pc = ehdr.e_entry as u32 & PHYS_ADDR_MASK;

    if let Some(segments) = file.segments() {
        for phdr in segments.iter() {
            if phdr.p_type != abi::PT_LOAD {
                continue;
            }
            let paddr = phdr.p_paddr as u32 & PHYS_ADDR_MASK;
            let offset = phdr.p_offset as usize;
            let filesz = phdr.p_filesz as usize;
            debug!(
                "loading segment: {filesz} bytes from offset {offset:#x} to {paddr:#010x}"
            );
            cpu.memory.load_image(paddr, &bytes[offset..offset + filesz]);
        }
    }
    Ok(())
}
