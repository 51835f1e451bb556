use crate::mappers::{Mapper0, Mapper1};
use crate::CartridgeError;
use common::MirroringMode;

/// Where a mapped address ends up inside the cartridge memories
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum MappingResult {
    PrgRom(usize),
    PrgRam(usize),
    Chr(usize),
    /// no memory behind this address, or the write was consumed by
    /// the mapper registers
    Denied,
}

/// Address translation for a cartridge board.
///
/// `read_*` and `write_*` take a CPU (`prg`) or PPU (`ppu`) address and
/// return the physical offset to use, the cartridge does the actual memory
/// access.
pub trait Mapper {
    fn read_prg(&self, address: u16) -> MappingResult;

    /// writes to the register space update the mapper state and return
    /// `MappingResult::Denied`
    fn write_prg(&mut self, address: u16, data: u8) -> MappingResult;

    fn read_ppu(&self, address: u16) -> MappingResult;

    fn write_ppu(&mut self, address: u16) -> MappingResult;

    /// `None` means the mirroring is hardwired on the board and the
    /// header value should be used
    fn mirroring(&self) -> Option<MirroringMode> {
        None
    }
}

pub enum MapperType {
    Nrom(Mapper0),
    Mmc1(Mapper1),
}

impl MapperType {
    /// `prg_count` in 16KB units, `chr_count` in 8KB units (0 for CHR RAM),
    /// `prg_ram_count` in 8KB units
    pub fn new(
        mapper_id: u16,
        prg_count: u8,
        chr_count: u8,
        prg_ram_count: u8,
    ) -> Result<Self, CartridgeError> {
        let is_chr_ram = chr_count == 0;

        match mapper_id {
            0 => Ok(Self::Nrom(Mapper0::new(prg_count, is_chr_ram))),
            1 => {
                // CHR RAM is always 8KB, which is two 4KB banks
                let chr_4kb_count = if is_chr_ram { 2 } else { chr_count * 2 };
                Ok(Self::Mmc1(Mapper1::new(
                    prg_count,
                    chr_4kb_count,
                    is_chr_ram,
                    prg_ram_count,
                )))
            }
            _ => Err(CartridgeError::MapperNotImplemented(mapper_id)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Nrom(_) => "NROM",
            Self::Mmc1(_) => "MMC1",
        }
    }
}

impl Mapper for MapperType {
    fn read_prg(&self, address: u16) -> MappingResult {
        match self {
            Self::Nrom(mapper) => mapper.read_prg(address),
            Self::Mmc1(mapper) => mapper.read_prg(address),
        }
    }

    fn write_prg(&mut self, address: u16, data: u8) -> MappingResult {
        match self {
            Self::Nrom(mapper) => mapper.write_prg(address, data),
            Self::Mmc1(mapper) => mapper.write_prg(address, data),
        }
    }

    fn read_ppu(&self, address: u16) -> MappingResult {
        match self {
            Self::Nrom(mapper) => mapper.read_ppu(address),
            Self::Mmc1(mapper) => mapper.read_ppu(address),
        }
    }

    fn write_ppu(&mut self, address: u16) -> MappingResult {
        match self {
            Self::Nrom(mapper) => mapper.write_ppu(address),
            Self::Mmc1(mapper) => mapper.write_ppu(address),
        }
    }

    fn mirroring(&self) -> Option<MirroringMode> {
        match self {
            Self::Nrom(mapper) => mapper.mirroring(),
            Self::Mmc1(mapper) => mapper.mirroring(),
        }
    }
}
