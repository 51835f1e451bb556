use crate::ppu2c02::PPU2C02;
use common::{Bus, Device};

const OAM_DMA_ADDRESS: u16 = 0x4014;

memory_mapped_registers! {
    pub enum Register (mask 0x2007) {
        Control = 0x2000,
        Mask = 0x2001,
        Status = 0x2002,
        OamAddress = 0x2003,
        OamData = 0x2004,
        Scroll = 0x2005,
        PPUAddress = 0x2006,
        PPUData = 0x2007,
    }
}

bitflags! {
    /// PPUCTRL, write only
    pub struct ControlReg: u8 {
        const NAMETABLE = 0b00000011;
        const INCREMENT_32 = 0b00000100;
        const SPRITE_TABLE = 0b00001000;
        const BACKGROUND_TABLE = 0b00010000;
        const TALL_SPRITES = 0b00100000;
        /// EXT pins direction, unused on the NES
        const MASTER_SLAVE = 0b01000000;
        const NMI_ENABLE = 0b10000000;
    }
}

impl ControlReg {
    /// 0: $2000, 1: $2400, 2: $2800, 3: $2C00
    pub fn nametable(&self) -> u8 {
        (*self & Self::NAMETABLE).bits()
    }

    pub fn vram_increment(&self) -> u16 {
        if self.contains(Self::INCREMENT_32) {
            32
        } else {
            1
        }
    }

    /// for 8x8 sprites only, 8x16 sprites take it from their tile index
    pub fn sprite_pattern_table(&self) -> u16 {
        if self.contains(Self::SPRITE_TABLE) {
            0x1000
        } else {
            0
        }
    }

    pub fn background_pattern_table(&self) -> u16 {
        if self.contains(Self::BACKGROUND_TABLE) {
            0x1000
        } else {
            0
        }
    }

    pub fn sprite_height(&self) -> u8 {
        if self.contains(Self::TALL_SPRITES) {
            16
        } else {
            8
        }
    }

    pub fn nmi_enabled(&self) -> bool {
        self.contains(Self::NMI_ENABLE)
    }
}

bitflags! {
    /// PPUMASK, write only
    pub struct MaskReg: u8 {
        const GRAYSCALE = 0b00000001;
        const BACKGROUND_LEFT_COLUMN = 0b00000010;
        const SPRITES_LEFT_COLUMN = 0b00000100;
        const BACKGROUND = 0b00001000;
        const SPRITES = 0b00010000;
        const EMPHASIZE_RED = 0b00100000;
        const EMPHASIZE_GREEN = 0b01000000;
        const EMPHASIZE_BLUE = 0b10000000;
    }
}

impl MaskReg {
    pub fn rendering_enabled(&self) -> bool {
        self.intersects(Self::BACKGROUND | Self::SPRITES)
    }

    /// background pixels at `x`, the left 8 pixels can be hidden
    pub fn shows_background_at(&self, x: u16) -> bool {
        self.contains(Self::BACKGROUND) && (x >= 8 || self.contains(Self::BACKGROUND_LEFT_COLUMN))
    }

    pub fn shows_sprites_at(&self, x: u16) -> bool {
        self.contains(Self::SPRITES) && (x >= 8 || self.contains(Self::SPRITES_LEFT_COLUMN))
    }
}

bitflags! {
    /// PPUSTATUS, only the top 3 bits are driven
    pub struct StatusReg: u8 {
        const SPRITE_OVERFLOW = 0b00100000;
        const SPRITE_0_HIT = 0b01000000;
        const VERTICAL_BLANK = 0b10000000;
    }
}

/// all of `$2000-$3FFF` decodes to one of the 8 registers, anything else is
/// not a register
pub(crate) fn mirrored_register(address: u16) -> Option<Register> {
    match address {
        0x2000..=0x3FFF => Register::from_address(address),
        _ => None,
    }
}

/// The CPU side of the PPU, `$2000-$3FFF` (mirrored every 8 bytes) and the
/// `$4014` DMA port. The CPU bus never routes other addresses here.
impl<T> Bus for PPU2C02<T>
where
    T: Bus,
{
    fn read(&self, address: u16, _device: Device) -> u8 {
        match mirrored_register(address) {
            Some(register) => self.read_register(register),
            None => unreachable!("PPU read from non register address {:04X}", address),
        }
    }

    fn write(&mut self, address: u16, data: u8, _device: Device) {
        match mirrored_register(address) {
            Some(register) => self.write_register(register, data),
            None if address == OAM_DMA_ADDRESS => self.request_dma(data),
            None => unreachable!("PPU write to non register address {:04X}", address),
        }
    }
}
