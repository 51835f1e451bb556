use common::MirroringMode;

/// The 2KB of nametable RAM inside the console.
///
/// The cartridge decides how the four logical nametables map to the two
/// physical ones, so the mirroring mode is given on every access.
pub struct VRam {
    vram_data: [u8; 0x800],
}

impl VRam {
    pub fn new() -> Self {
        Self {
            vram_data: [0; 0x800],
        }
    }

    /*
     * Each nametable is 0x400 in size, the logical nametables are
     * [0x2000, 0x2400, 0x2800, 0x2C00] => bits 10 and 11 of the address
     *
     * Vertical:   [A, B, A, B] => drop bit 11, keep bit 10
     * Horizontal: [A, A, B, B] => bit 11 becomes bit 10
     * Single:     [A, A, A, A] or [B, B, B, B] => fixed bit 10
     */
    fn map_address(address: u16, mode: MirroringMode) -> usize {
        let address = match mode {
            MirroringMode::Vertical => address & 0x7FF,
            MirroringMode::Horizontal => ((address >> 1) & 0x400) | (address & 0x3FF),
            MirroringMode::SingleScreenLowBank => address & 0x3FF,
            MirroringMode::SingleScreenHighBank => 0x400 | (address & 0x3FF),
            // the cartridge provides the other 2KB, the caller should not
            // route here, use the console RAM for the first two
            MirroringMode::FourScreen => address & 0x7FF,
        };

        address as usize
    }

    pub fn read(&self, address: u16, mode: MirroringMode) -> u8 {
        self.vram_data[Self::map_address(address, mode)]
    }

    pub fn write(&mut self, address: u16, data: u8, mode: MirroringMode) {
        self.vram_data[Self::map_address(address, mode)] = data;
    }
}

impl Default for VRam {
    fn default() -> Self {
        Self::new()
    }
}
