#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn to_rgb(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// The 64 colors the PPU can output, indexed by the 6-bit palette value
pub const COLORS: [Color; 64] = [
    // 0x00
    color!(0x54, 0x54, 0x54),
    color!(0x00, 0x1E, 0x74),
    color!(0x08, 0x10, 0x90),
    color!(0x30, 0x00, 0x88),
    color!(0x44, 0x00, 0x64),
    color!(0x5C, 0x00, 0x30),
    color!(0x54, 0x04, 0x00),
    color!(0x3C, 0x18, 0x00),
    color!(0x20, 0x2A, 0x00),
    color!(0x08, 0x3A, 0x00),
    color!(0x00, 0x40, 0x00),
    color!(0x00, 0x3C, 0x00),
    color!(0x00, 0x30, 0x2C),
    color!(0x00, 0x00, 0x00),
    color!(0x00, 0x00, 0x00),
    color!(0x00, 0x00, 0x00),
    // 0x10
    color!(0x98, 0x96, 0x98),
    color!(0x08, 0x4C, 0xC4),
    color!(0x30, 0x32, 0xEC),
    color!(0x5C, 0x1E, 0xE4),
    color!(0x88, 0x14, 0xB0),
    color!(0xA0, 0x14, 0x64),
    color!(0x98, 0x22, 0x20),
    color!(0x78, 0x3C, 0x00),
    color!(0x54, 0x5A, 0x00),
    color!(0x28, 0x72, 0x00),
    color!(0x08, 0x7C, 0x00),
    color!(0x00, 0x76, 0x28),
    color!(0x00, 0x66, 0x78),
    color!(0x00, 0x00, 0x00),
    color!(0x00, 0x00, 0x00),
    color!(0x00, 0x00, 0x00),
    // 0x20
    color!(0xEC, 0xEE, 0xEC),
    color!(0x3C, 0x7E, 0xEC),
    color!(0x5C, 0x5C, 0xEC),
    color!(0x88, 0x44, 0xEC),
    color!(0xB0, 0x2C, 0xEC),
    color!(0xE0, 0x28, 0xB0),
    color!(0xD8, 0x3C, 0x50),
    color!(0xC4, 0x54, 0x00),
    color!(0xAC, 0x70, 0x00),
    color!(0x80, 0x88, 0x00),
    color!(0x40, 0x9C, 0x30),
    color!(0x20, 0xA4, 0x58),
    color!(0x20, 0x9A, 0x88),
    color!(0x40, 0x40, 0x40),
    color!(0x00, 0x00, 0x00),
    color!(0x00, 0x00, 0x00),
    // 0x30
    color!(0xEC, 0xEE, 0xEC),
    color!(0xA8, 0xBC, 0xEC),
    color!(0xBC, 0xAC, 0xEC),
    color!(0xD4, 0xA0, 0xEC),
    color!(0xEC, 0x94, 0xEC),
    color!(0xEC, 0x90, 0xD4),
    color!(0xEC, 0x9C, 0xB4),
    color!(0xE4, 0xB0, 0x90),
    color!(0xDC, 0xC8, 0x78),
    color!(0xD4, 0xDC, 0x78),
    color!(0xB8, 0xEC, 0x98),
    color!(0xA8, 0xEC, 0xBC),
    color!(0xA0, 0xE4, 0xE4),
    color!(0xA0, 0xA0, 0xA0),
    color!(0x00, 0x00, 0x00),
    color!(0x00, 0x00, 0x00),
];
