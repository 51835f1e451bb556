mod bus;
mod error;
mod nes;


pub use crate::bus::{CPUBus, PPUBus};
pub use crate::error::NesError;
pub use crate::nes::{StopHandle, NES};
