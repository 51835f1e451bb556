#[macro_use]
extern crate common;

mod apu2a03;
mod apu2a03_registers;


pub use crate::apu2a03::APU2A03;
