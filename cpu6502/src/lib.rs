#[macro_use]
extern crate bitflags;

mod cpu6502;
mod error;
pub mod instruction;

use common::{interconnection::PPUCPUConnection, BusError};

pub use crate::cpu6502::{CPURegisters, Interrupt, StatusFlags, CPU6502};
pub use crate::error::CPUError;

/// The view the CPU has of the rest of the machine.
///
/// Every call to `read` or `write` is one CPU cycle.
pub trait CPUBusTrait: PPUCPUConnection {
    fn read(&mut self, address: u16) -> Result<u8, BusError>;

    fn write(&mut self, address: u16, data: u8) -> Result<(), BusError>;

    /// read without side effects (no register reads, no open bus update),
    /// used for traces and debugging
    fn peek(&self, address: u16) -> u8;
}
