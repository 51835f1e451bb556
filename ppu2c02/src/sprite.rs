bitflags! {
    pub struct SpriteAttribute: u8 {
        const PALETTE = 0b00000011;
        const BEHIND_BACKGROUND = 0b00100000;
        const FLIP_HORIZONTAL = 0b01000000;
        const FLIP_VERTICAL = 0b10000000;
    }
}

impl SpriteAttribute {
    pub fn palette(&self) -> u8 {
        (*self & Self::PALETTE).bits()
    }

    pub fn is_behind_background(&self) -> bool {
        self.contains(Self::BEHIND_BACKGROUND)
    }
}

/// One OAM entry, in the byte order of OAM: Y, tile, attributes, X
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sprite {
    y: u8,
    tile_index: u8,
    /// bits 2-4 do not exist in OAM and always read back as 0
    attributes: SpriteAttribute,
    x: u8,
}

impl Sprite {
    pub fn empty() -> Self {
        Self::from_bytes([0; 4])
    }

    /// the value secondary OAM is cleared to
    pub fn filled_ff() -> Self {
        Self::from_bytes([0xFF; 4])
    }

    fn from_bytes(bytes: [u8; 4]) -> Self {
        let mut sprite = Self {
            y: 0,
            tile_index: 0,
            attributes: SpriteAttribute::empty(),
            x: 0,
        };
        for (offset, &data) in bytes.iter().enumerate() {
            sprite.write_offset(offset as u8, data);
        }

        sprite
    }

    pub fn get_tile(&self) -> u8 {
        self.tile_index
    }

    pub fn get_attribute(&self) -> SpriteAttribute {
        self.attributes
    }

    pub fn get_x(&self) -> u8 {
        self.x
    }

    /// the row of the sprite that falls on `scanline`, if any. OAM Y is one
    /// less than the first line drawn, evaluation happens a line early.
    pub fn row_on(&self, scanline: u16, height: u8) -> Option<u8> {
        let row = scanline as i16 - self.y as i16;

        if (0..height as i16).contains(&row) {
            Some(row as u8)
        } else {
            None
        }
    }

    pub fn read_offset(&self, offset: u8) -> u8 {
        match offset & 0b11 {
            0 => self.y,
            1 => self.tile_index,
            2 => self.attributes.bits(),
            _ => self.x,
        }
    }

    pub fn write_offset(&mut self, offset: u8, data: u8) {
        match offset & 0b11 {
            0 => self.y = data,
            1 => self.tile_index = data,
            2 => self.attributes = SpriteAttribute::from_bits_truncate(data),
            _ => self.x = data,
        }
    }
}

/// One of the 8 sprite units drawing the current line, a down counter for
/// X and the two pattern planes to shift out once it reaches 0
#[derive(Debug, Copy, Clone)]
pub(crate) struct SpriteSlot {
    pattern: [u8; 2],
    attributes: SpriteAttribute,
    x_counter: u8,
}

impl SpriteSlot {
    /// transparent, never contributes a pixel
    pub fn empty() -> Self {
        Self {
            pattern: [0; 2],
            attributes: SpriteAttribute::empty(),
            x_counter: 0xFF,
        }
    }

    /// `pattern` is already flipped
    pub fn new(pattern: [u8; 2], attributes: SpriteAttribute, x: u8) -> Self {
        Self {
            pattern,
            attributes,
            x_counter: x,
        }
    }

    pub fn attributes(&self) -> SpriteAttribute {
        self.attributes
    }

    /// one dot, returns the color bits when the sprite is being drawn
    pub fn tick(&mut self) -> Option<u8> {
        if self.x_counter != 0 {
            self.x_counter -= 1;
            return None;
        }

        let color_bits = (self.pattern[1] >> 7) << 1 | self.pattern[0] >> 7;
        self.pattern[0] <<= 1;
        self.pattern[1] <<= 1;

        Some(color_bits)
    }
}
