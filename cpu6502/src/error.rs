use common::BusError;
use std::{
    convert::From,
    error::Error,
    fmt::{Debug, Display, Formatter, Result as fmtResult},
};

#[derive(PartialEq, Clone, Copy)]
pub enum CPUError {
    /// opcodes with no usable definition (their result depends on analog
    /// properties of the chip)
    InvalidOpcode { opcode: u8, pc: u16 },
    /// the CPU executed one of the KIL opcodes and is now stuck
    Jam { opcode: u8, pc: u16 },
    Bus(BusError),
}

impl CPUError {
    fn get_message(&self) -> String {
        match self {
            Self::InvalidOpcode { opcode, pc } => {
                format!("InvalidOpcode: {:02X} at {:04X}", opcode, pc)
            }
            Self::Jam { opcode, pc } => format!("Jam: CPU halted by {:02X} at {:04X}", opcode, pc),
            Self::Bus(err) => format!("BusError: {}", err),
        }
    }
}

impl Error for CPUError {}

impl Display for CPUError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmtResult {
        write!(f, "{}", self.get_message())
    }
}

impl Debug for CPUError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmtResult {
        write!(f, "{}", self.get_message())
    }
}

impl From<BusError> for CPUError {
    fn from(from: BusError) -> Self {
        Self::Bus(from)
    }
}
