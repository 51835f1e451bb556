use crate::error::CartridgeError;
use crate::mapper::{Mapper, MapperType, MappingResult};
use common::{MirroringMode, MirroringProvider};
use std::{fs::File, io::Read, path::Path};

const PRG_ROM_BANK_SIZE: usize = 16 * 1024;
const CHR_ROM_BANK_SIZE: usize = 8 * 1024;
const PRG_RAM_BANK_SIZE: usize = 8 * 1024;
const TRAINER_SIZE: usize = 512;
const FOUR_SCREEN_RAM_SIZE: usize = 4 * 1024;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum TvSystem {
    Ntsc,
    Pal,
}

/// The decoded 16 bytes iNES (v1) header
#[derive(Debug, Clone)]
pub struct CartridgeHeader {
    /// in 16KB units
    pub prg_rom_count: u8,
    /// in 8KB units, 0 means the board uses 8KB of CHR RAM
    pub chr_rom_count: u8,
    /// in 8KB units, a 0 in the file is read as 1
    pub prg_ram_count: u8,
    pub mapper_id: u16,
    /// only Horizontal, Vertical or FourScreen
    pub mirroring: MirroringMode,
    pub has_battery: bool,
    pub has_trainer: bool,
    pub vs_unisystem: bool,
    pub playchoice_10: bool,
    pub is_nes_2: bool,
    pub tv_system: TvSystem,
}

impl CartridgeHeader {
    pub fn from_bytes(header: &[u8; 16]) -> Result<Self, CartridgeError> {
        let mut header = *header;

        Self::check_magic(&header[0..4])?;

        let prg_rom_count = header[4];
        let chr_rom_count = header[5];

        let mirroring_vertical = header[6] & 1 != 0;
        header[6] >>= 1;
        let has_battery = header[6] & 1 != 0;
        header[6] >>= 1;
        let has_trainer = header[6] & 1 != 0;
        header[6] >>= 1;
        let four_screen = header[6] & 1 != 0;
        header[6] >>= 1;
        let lower_mapper = header[6]; // the rest

        let vs_unisystem = header[7] & 1 != 0;
        header[7] >>= 1;
        let playchoice_10 = header[7] & 1 != 0;
        header[7] >>= 1;
        let is_nes_2 = header[7] & 0b11 == 2;
        header[7] >>= 2;
        let upper_mapper = header[7]; // the rest

        let mapper_id = (upper_mapper as u16) << 4 | lower_mapper as u16;

        let prg_ram_count = header[8].max(1);

        let tv_system = if header[9] & 1 == 0 {
            TvSystem::Ntsc
        } else {
            TvSystem::Pal
        };

        let mirroring = if four_screen {
            MirroringMode::FourScreen
        } else if mirroring_vertical {
            MirroringMode::Vertical
        } else {
            MirroringMode::Horizontal
        };

        Ok(Self {
            prg_rom_count,
            chr_rom_count,
            prg_ram_count,
            mapper_id,
            mirroring,
            has_battery,
            has_trainer,
            vs_unisystem,
            playchoice_10,
            is_nes_2,
            tv_system,
        })
    }

    fn check_magic(header: &[u8]) -> Result<(), CartridgeError> {
        let real = [0x4E, 0x45, 0x53, 0x1A];

        if header == real {
            Ok(())
        } else {
            Err(CartridgeError::HeaderError)
        }
    }
}

pub struct Cartridge {
    header: CartridgeHeader,

    trainer_data: Vec<u8>,
    prg_data: Vec<u8>,
    chr_data: Vec<u8>,
    is_chr_ram: bool,

    prg_ram_data: Vec<u8>,

    /// only allocated for four-screen boards, covers PPU $2000-$2FFF
    four_screen_ram: Vec<u8>,

    mapper: MapperType,
}

impl Cartridge {
    pub fn from_file<P: AsRef<Path>>(filename: P) -> Result<Self, CartridgeError> {
        let file = File::open(filename)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, CartridgeError> {
        let mut header = [0; 16];
        reader.read_exact(&mut header)?;

        let header = CartridgeHeader::from_bytes(&header)?;

        if header.is_nes_2 {
            log::warn!("NES 2.0 header detected, only the iNES 1 fields will be used");
        }

        let mut trainer_data = Vec::new();

        // read trainer data if present
        if header.has_trainer {
            trainer_data.resize(TRAINER_SIZE, 0);
            reader.read_exact(&mut trainer_data)?;
        }

        let mut prg_data = vec![0; header.prg_rom_count as usize * PRG_ROM_BANK_SIZE];
        reader.read_exact(&mut prg_data)?;

        let is_chr_ram = header.chr_rom_count == 0;
        let chr_data = if is_chr_ram {
            vec![0; CHR_ROM_BANK_SIZE]
        } else {
            let mut chr_data = vec![0; header.chr_rom_count as usize * CHR_ROM_BANK_SIZE];
            reader.read_exact(&mut chr_data)?;
            chr_data
        };

        // there should be nothing after the CHR data
        let mut rest = Vec::new();
        let rest_size = reader.read_to_end(&mut rest)?;
        if rest_size != 0 {
            return Err(CartridgeError::TooLargeFile(rest_size as u64));
        }

        let mapper = MapperType::new(
            header.mapper_id,
            header.prg_rom_count,
            header.chr_rom_count,
            header.prg_ram_count,
        )?;

        log::info!(
            "cartridge loaded: mapper {} ({}), PRG {}x16KB, CHR {}, mirroring {:?}",
            header.mapper_id,
            mapper.name(),
            header.prg_rom_count,
            if is_chr_ram {
                "8KB RAM".to_owned()
            } else {
                format!("{}x8KB", header.chr_rom_count)
            },
            header.mirroring,
        );

        let four_screen_ram = if header.mirroring == MirroringMode::FourScreen {
            vec![0; FOUR_SCREEN_RAM_SIZE]
        } else {
            Vec::new()
        };

        Ok(Self {
            prg_ram_data: vec![0; header.prg_ram_count as usize * PRG_RAM_BANK_SIZE],
            header,
            trainer_data,
            prg_data,
            chr_data,
            is_chr_ram,
            four_screen_ram,
            mapper,
        })
    }

    pub fn header(&self) -> &CartridgeHeader {
        &self.header
    }

    pub fn trainer(&self) -> &[u8] {
        &self.trainer_data
    }

    pub fn is_chr_ram(&self) -> bool {
        self.is_chr_ram
    }

    /// CPU read from $4020-$FFFF, `None` is open bus
    pub fn read_prg(&self, address: u16) -> Option<u8> {
        match self.mapper.read_prg(address) {
            MappingResult::PrgRom(offset) => self.prg_data.get(offset).copied(),
            MappingResult::PrgRam(offset) => self.prg_ram_data.get(offset).copied(),
            MappingResult::Chr(_) | MappingResult::Denied => None,
        }
    }

    pub fn write_prg(&mut self, address: u16, data: u8) {
        if let MappingResult::PrgRam(offset) = self.mapper.write_prg(address, data) {
            if let Some(cell) = self.prg_ram_data.get_mut(offset) {
                *cell = data;
            }
        }
    }

    /// PPU read from $0000-$1FFF, or from $2000-$2FFF on four-screen boards
    pub fn read_ppu(&self, address: u16) -> u8 {
        if address >= 0x2000 {
            return self
                .four_screen_ram
                .get((address & 0xFFF) as usize)
                .copied()
                .unwrap_or(0);
        }

        match self.mapper.read_ppu(address) {
            MappingResult::Chr(offset) => self.chr_data.get(offset).copied().unwrap_or(0),
            _ => 0,
        }
    }

    pub fn write_ppu(&mut self, address: u16, data: u8) {
        if address >= 0x2000 {
            if let Some(cell) = self.four_screen_ram.get_mut((address & 0xFFF) as usize) {
                *cell = data;
            }
            return;
        }

        if let MappingResult::Chr(offset) = self.mapper.write_ppu(address) {
            if let Some(cell) = self.chr_data.get_mut(offset) {
                *cell = data;
            }
        }
    }
}

impl MirroringProvider for Cartridge {
    fn mirroring_mode(&self) -> MirroringMode {
        if self.header.mirroring == MirroringMode::FourScreen {
            MirroringMode::FourScreen
        } else {
            self.mapper.mirroring().unwrap_or(self.header.mirroring)
        }
    }
}
