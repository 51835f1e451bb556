use crate::mapper::{Mapper, MappingResult};
use common::MirroringMode;

const MIRRORING_TABLE: [MirroringMode; 4] = [
    MirroringMode::SingleScreenLowBank,
    MirroringMode::SingleScreenHighBank,
    MirroringMode::Vertical,
    MirroringMode::Horizontal,
];

/// the bit that reaches position 0 after 4 shifts, signaling that the
/// next write is the fifth one
const SHIFT_REGISTER_EMPTY: u8 = 0b10000;

/// MMC1 (SxROM boards)
///
/// The registers are loaded serially, one bit per write to $8000-$FFFF,
/// the fifth write commits the collected 5 bits into the register selected
/// by the address of that last write.
pub struct Mapper1 {
    shift_register: u8,

    /// ```text
    /// C PP MM
    /// | || ++- nametable mirroring, see `MIRRORING_TABLE`
    /// | ++---- PRG mode: 0/1 one 32KB bank, 2 first bank fixed at $8000,
    /// |        3 last bank fixed at $C000
    /// +------- CHR mode: 0 one 8KB bank, 1 two 4KB banks
    /// ```
    control_register: u8,

    /// CHR bank at PPU $0000, on SNROM/SUROM boards the upper bits also
    /// carry the PRG RAM disable and the 256KB outer PRG bank
    chr_0_bank: u8,

    /// same as `chr_0_bank` but for PPU $1000, only used in 4KB mode
    chr_1_bank: u8,

    /// -PPPP, 16KB PRG bank (low bit ignored in 32KB mode)
    prg_bank: u8,

    prg_ram_enable: bool,

    is_chr_ram: bool,

    /// in 4kb units
    chr_count: u8,

    /// in 16kb units
    prg_count: u8,

    /// in 8kb units
    prg_ram_count: u8,
}

impl Mapper1 {
    pub fn new(prg_count: u8, chr_count: u8, is_chr_ram: bool, prg_ram_count: u8) -> Self {
        Self {
            shift_register: SHIFT_REGISTER_EMPTY,
            // power-up, last bank fixed at $C000
            control_register: 0x0C,
            chr_0_bank: 0,
            chr_1_bank: 0,
            prg_bank: 0,

            prg_ram_enable: true,

            is_chr_ram,

            chr_count: chr_count.max(1),
            prg_count: prg_count.max(1),

            prg_ram_count,
        }
    }

    fn reset_shift_register(&mut self) {
        self.shift_register = SHIFT_REGISTER_EMPTY;
    }

    fn write_register(&mut self, address: u16, data: u8) {
        if data & 0x80 != 0 {
            self.reset_shift_register();
            self.control_register |= 0x0C;
            return;
        }

        let is_last_write = self.shift_register & 1 != 0;

        self.shift_register >>= 1;
        self.shift_register |= (data & 1) << 4;

        if is_last_write {
            let result = self.shift_register & 0b11111;

            match address {
                0x8000..=0x9FFF => self.control_register = result,
                0xA000..=0xBFFF => self.chr_0_bank = result,
                0xC000..=0xDFFF => self.chr_1_bank = result,
                _ => {
                    self.prg_bank = result & 0xF;
                    self.prg_ram_enable = result & 0x10 == 0;
                }
            }

            self.reset_shift_register();
        }
    }

    fn is_prg_32kb_mode(&self) -> bool {
        self.control_register & 0b01000 == 0
    }

    /// only valid in 16KB mode, `true` if $8000 is fixed to the first bank
    /// and $C000 is switchable, `false` if $C000 is fixed to the last bank
    /// and $8000 is switchable
    fn is_first_prg_chunk_fixed(&self) -> bool {
        self.control_register & 0b00100 == 0
    }

    fn is_chr_8kb_mode(&self) -> bool {
        self.control_register & 0b10000 == 0
    }

    /// the CHR register that is active for the board extra bits
    fn board_bits_register(&self) -> u8 {
        if self.is_chr_8kb_mode() {
            self.chr_0_bank
        } else {
            self.chr_1_bank
        }
    }

    fn is_prg_ram_enabled(&self) -> bool {
        // SNROM (8KB CHR, not 512KB PRG) uses CHR bit 4 as an extra disable
        let snrom_prg_ram_enabled = if self.chr_count == 2 && self.prg_count <= 16 {
            self.board_bits_register() & 0x10 == 0
        } else {
            true
        };

        self.prg_ram_count > 0 && self.prg_ram_enable && snrom_prg_ram_enabled
    }

    fn get_ppu_bank(&self, is_low_bank: bool) -> u8 {
        let bank = if self.is_chr_8kb_mode() {
            (self.chr_0_bank & 0b11110) + !is_low_bank as u8
        } else if is_low_bank {
            self.chr_0_bank
        } else {
            self.chr_1_bank
        };

        bank % self.chr_count
    }

    fn get_prg_rom_bank(&self, is_low_bank: bool) -> u8 {
        let mut bank = if self.is_prg_32kb_mode() {
            (self.prg_bank & 0b11110) + !is_low_bank as u8
        } else {
            match (is_low_bank, self.is_first_prg_chunk_fixed()) {
                (true, true) => 0,
                (true, false) => self.prg_bank,
                (false, true) => self.prg_bank,
                (false, false) => (self.prg_count - 1) & 0xF,
            }
        };

        // SUROM, 512KB PRG is split into two 256KB halves selected by CHR bit 4
        if self.prg_count > 16 {
            bank |= self.board_bits_register() & 0x10;
        }

        bank % self.prg_count
    }

    fn get_prg_ram_bank(&self) -> usize {
        if self.prg_ram_count > 1 {
            (((self.board_bits_register() >> 2) & 0x3) % self.prg_ram_count) as usize
        } else {
            0
        }
    }

    fn map_prg_ram(&self, address: u16) -> MappingResult {
        if self.is_prg_ram_enabled() {
            MappingResult::PrgRam(self.get_prg_ram_bank() * 0x2000 + (address & 0x1FFF) as usize)
        } else {
            MappingResult::Denied
        }
    }

    fn map_chr(&self, address: u16) -> MappingResult {
        let bank = self.get_ppu_bank(address < 0x1000) as usize;
        MappingResult::Chr(bank * 0x1000 + (address & 0xFFF) as usize)
    }
}

impl Mapper for Mapper1 {
    fn read_prg(&self, address: u16) -> MappingResult {
        match address {
            0x6000..=0x7FFF => self.map_prg_ram(address),
            0x8000..=0xFFFF => {
                let bank = self.get_prg_rom_bank(address < 0xC000) as usize;
                MappingResult::PrgRom(bank * 0x4000 + (address & 0x3FFF) as usize)
            }
            _ => MappingResult::Denied,
        }
    }

    fn write_prg(&mut self, address: u16, data: u8) -> MappingResult {
        match address {
            0x6000..=0x7FFF => self.map_prg_ram(address),
            0x8000..=0xFFFF => {
                self.write_register(address, data);
                MappingResult::Denied
            }
            _ => MappingResult::Denied,
        }
    }

    fn read_ppu(&self, address: u16) -> MappingResult {
        if address < 0x2000 {
            self.map_chr(address)
        } else {
            MappingResult::Denied
        }
    }

    fn write_ppu(&mut self, address: u16) -> MappingResult {
        if self.is_chr_ram && address < 0x2000 {
            self.map_chr(address)
        } else {
            MappingResult::Denied
        }
    }

    fn mirroring(&self) -> Option<MirroringMode> {
        Some(MIRRORING_TABLE[(self.control_register & 0b11) as usize])
    }
}
