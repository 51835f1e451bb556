#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate common;

mod background;
mod palette;
mod ppu2c02;
mod ppu2c02_registers;
mod sprite;
mod vram;
mod vram_address;


pub use crate::palette::Palette;
pub use crate::ppu2c02::PPU2C02;
pub use crate::vram::VRam;
