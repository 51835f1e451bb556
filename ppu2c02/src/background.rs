/// The background half of the pixel pipeline.
///
/// Every 8 dots a tile is fetched into the latches, then moved into the low
/// byte of the 16-bit shift registers while the high byte is being drawn.
#[derive(Default)]
pub(crate) struct Background {
    tile_index: u8,
    palette: u8,
    pattern: [u8; 2],

    pattern_shifters: [u16; 2],
    /// one bit of the 2-bit palette each, spread over the 8 pixels of the tile
    palette_shifters: [u16; 2],
}

impl Background {
    pub fn tile_index(&self) -> u8 {
        self.tile_index
    }

    pub fn latch_tile_index(&mut self, tile_index: u8) {
        self.tile_index = tile_index;
    }

    pub fn latch_palette(&mut self, palette: u8) {
        self.palette = palette & 0b11;
    }

    pub fn latch_pattern(&mut self, plane: usize, data: u8) {
        self.pattern[plane] = data;
    }

    pub fn reload(&mut self) {
        for plane in 0..2 {
            let palette_bits = if (self.palette >> plane) & 1 != 0 { 0xFF } else { 0 };

            self.pattern_shifters[plane] =
                (self.pattern_shifters[plane] & 0xFF00) | self.pattern[plane] as u16;
            self.palette_shifters[plane] = (self.palette_shifters[plane] & 0xFF00) | palette_bits;
        }
    }

    pub fn shift(&mut self) {
        for register in self
            .pattern_shifters
            .iter_mut()
            .chain(self.palette_shifters.iter_mut())
        {
            *register <<= 1;
        }
    }

    /// (color bits, palette) of the pixel `fine_x` bits from the left
    pub fn pixel(&self, fine_x: u8) -> (u8, u8) {
        let bit = |register: u16| ((register >> (15 - fine_x as u16)) & 1) as u8;

        (
            bit(self.pattern_shifters[1]) << 1 | bit(self.pattern_shifters[0]),
            bit(self.palette_shifters[1]) << 1 | bit(self.palette_shifters[0]),
        )
    }
}
