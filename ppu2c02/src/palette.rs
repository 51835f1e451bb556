use common::{Bus, Device};

/// What the palette RAM holds when the console is powered, the values vary
/// between consoles and these are the commonly observed ones
const POWER_UP_PALETTE: [u8; 0x20] = [
    0x09, 0x01, 0x00, 0x01, 0x00, 0x02, 0x02, 0x0D, //
    0x08, 0x10, 0x08, 0x24, 0x00, 0x00, 0x04, 0x2C, //
    0x09, 0x01, 0x34, 0x03, 0x00, 0x04, 0x00, 0x14, //
    0x08, 0x3A, 0x00, 0x02, 0x00, 0x20, 0x2C, 0x08, //
];

/// The 32 bytes of palette RAM at `$3F00-$3F1F`, mirrored up to `$3FFF`.
///
/// Entry 0 of every sprite palette is shared with the background palette
/// of the same number.
pub struct Palette {
    entries: [u8; 0x20],
}

impl Palette {
    pub fn new() -> Self {
        Self {
            entries: POWER_UP_PALETTE,
        }
    }

    fn index(address: u16) -> usize {
        let index = (address & 0x1F) as usize;

        if index & 0x13 == 0x10 {
            index & 0x0F
        } else {
            index
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for Palette {
    fn read(&self, address: u16, _device: Device) -> u8 {
        self.entries[Self::index(address)]
    }

    fn write(&mut self, address: u16, data: u8, _device: Device) {
        self.entries[Self::index(address)] = data & 0x3F;
    }
}
