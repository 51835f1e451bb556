use crate::mapper::{Mapper, MappingResult};

/// NROM, no bank switching at all
pub struct Mapper0 {
    has_32kb_prg_rom: bool,
    is_chr_ram: bool,
}

impl Mapper0 {
    pub fn new(prg_count: u8, is_chr_ram: bool) -> Self {
        Self {
            has_32kb_prg_rom: prg_count >= 2,
            is_chr_ram,
        }
    }
}

impl Mapper for Mapper0 {
    fn read_prg(&self, address: u16) -> MappingResult {
        match address {
            0x6000..=0x7FFF => MappingResult::PrgRam((address & 0x1FFF) as usize),
            0x8000..=0xFFFF => {
                // 16KB carts are mirrored into 0xC000-0xFFFF
                let address = if self.has_32kb_prg_rom {
                    address & 0x7FFF
                } else {
                    address & 0x3FFF
                };

                MappingResult::PrgRom(address as usize)
            }
            _ => MappingResult::Denied,
        }
    }

    fn write_prg(&mut self, address: u16, _data: u8) -> MappingResult {
        match address {
            0x6000..=0x7FFF => MappingResult::PrgRam((address & 0x1FFF) as usize),
            _ => MappingResult::Denied,
        }
    }

    fn read_ppu(&self, address: u16) -> MappingResult {
        if address < 0x2000 {
            MappingResult::Chr(address as usize)
        } else {
            MappingResult::Denied
        }
    }

    fn write_ppu(&mut self, address: u16) -> MappingResult {
        if self.is_chr_ram && address < 0x2000 {
            MappingResult::Chr(address as usize)
        } else {
            MappingResult::Denied
        }
    }
}
