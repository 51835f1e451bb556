/// The internal `v` (current) and `t` (temporary) registers.
///
/// ```text
/// yyy NN YYYYY XXXXX
/// ||| || ||||| +++++-- coarse X scroll
/// ||| || +++++-------- coarse Y scroll
/// ||| ++-------------- nametable select
/// +++----------------- fine Y scroll
/// ```
///
/// Outside rendering, `v` is also the address used by PPUDATA.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub(crate) struct VramAddress(u16);

const COARSE_X: u16 = 0x001F;
const COARSE_Y: u16 = 0x03E0;
const NAMETABLE_X: u16 = 0x0400;
const NAMETABLE_Y: u16 = 0x0800;
const FINE_Y: u16 = 0x7000;

const HORIZONTAL_BITS: u16 = NAMETABLE_X | COARSE_X;
const VERTICAL_BITS: u16 = FINE_Y | NAMETABLE_Y | COARSE_Y;

impl VramAddress {
    pub fn address(self) -> u16 {
        self.0
    }

    fn replace(&mut self, mask: u16, value: u16) {
        self.0 = (self.0 & !mask) | (value & mask);
    }

    fn coarse_x(self) -> u16 {
        self.0 & COARSE_X
    }

    fn coarse_y(self) -> u16 {
        (self.0 & COARSE_Y) >> 5
    }

    pub fn fine_y(self) -> u8 {
        ((self.0 & FINE_Y) >> 12) as u8
    }

    /// PPUCTRL bits 0-1
    pub fn set_nametable(&mut self, nametable: u8) {
        self.replace(NAMETABLE_X | NAMETABLE_Y, (nametable as u16) << 10);
    }

    /// first PPUSCROLL write, returns the fine X part which is kept outside
    pub fn set_x_scroll(&mut self, scroll: u8) -> u8 {
        self.replace(COARSE_X, (scroll >> 3) as u16);

        scroll & 0b111
    }

    /// second PPUSCROLL write
    pub fn set_y_scroll(&mut self, scroll: u8) {
        self.replace(COARSE_Y, ((scroll >> 3) as u16) << 5);
        self.replace(FINE_Y, ((scroll & 0b111) as u16) << 12);
    }

    /// first PPUADDR write, only 6 bits are used and bit 14 is cleared
    pub fn set_high_byte(&mut self, data: u8) {
        self.replace(0xFF00, ((data & 0x3F) as u16) << 8);
    }

    /// second PPUADDR write
    pub fn set_low_byte(&mut self, data: u8) {
        self.replace(0x00FF, data as u16);
    }

    /// PPUDATA accesses, by 1 or 32
    pub fn increment(&mut self, amount: u16) {
        self.0 = self.0.wrapping_add(amount) & 0x7FFF;
    }

    /// moving to the next tile, wraps into the next horizontal nametable
    pub fn increment_coarse_x(&mut self) {
        if self.coarse_x() == 31 {
            self.0 &= !COARSE_X;
            self.0 ^= NAMETABLE_X;
        } else {
            self.0 += 1;
        }
    }

    /// moving to the next row of pixels. Coarse Y wraps into the next
    /// vertical nametable after row 29, rows 30 and 31 are the attributes
    /// and wrap to 0 in the same nametable.
    pub fn increment_y(&mut self) {
        if self.fine_y() < 7 {
            self.0 += 0x1000;
            return;
        }

        self.0 &= !FINE_Y;

        match self.coarse_y() {
            29 => {
                self.replace(COARSE_Y, 0);
                self.0 ^= NAMETABLE_Y;
            }
            31 => self.replace(COARSE_Y, 0),
            coarse_y => self.replace(COARSE_Y, (coarse_y + 1) << 5),
        }
    }

    pub fn copy_horizontal(&mut self, from: VramAddress) {
        self.replace(HORIZONTAL_BITS, from.0);
    }

    pub fn copy_vertical(&mut self, from: VramAddress) {
        self.replace(VERTICAL_BITS, from.0);
    }

    /// nametable byte of the current tile
    pub fn tile_address(self) -> u16 {
        0x2000 | (self.0 & 0x0FFF)
    }

    /// ```text
    /// NN 1111 YYY XXX
    /// || |||| ||| +++-- high 3 bits of coarse X
    /// || |||| +++------ high 3 bits of coarse Y
    /// || ++++---------- attribute table at 0x3C0 of the nametable
    /// ++--------------- nametable select
    /// ```
    pub fn attribute_address(self) -> u16 {
        let nametable = self.0 & (NAMETABLE_X | NAMETABLE_Y);

        0x23C0 | nametable | (self.coarse_y() >> 2) << 3 | (self.coarse_x() >> 2)
    }

    /// Each attribute byte covers 4x4 tiles, 2 bits for each 2x2 quarter:
    /// `(bottom_right << 6) | (bottom_left << 4) | (top_right << 2) | top_left`
    pub fn attribute_shift(self) -> u8 {
        ((self.coarse_y() & 0b10) << 1 | (self.coarse_x() & 0b10)) as u8
    }
}
