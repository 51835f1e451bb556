use cartridge::CartridgeError;
use cpu6502::CPUError;
use std::{
    convert::From,
    error::Error,
    fmt::{Debug, Display, Formatter, Result as fmtResult},
};

pub enum NesError {
    Cartridge(CartridgeError),
    Cpu(CPUError),
}

impl NesError {
    fn get_message(&self) -> String {
        match self {
            Self::Cartridge(err) => format!("CartridgeError: {}", err),
            Self::Cpu(err) => format!("CPUError: {}", err),
        }
    }
}

impl Error for NesError {}

impl Display for NesError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmtResult {
        write!(f, "{}", self.get_message())
    }
}

impl Debug for NesError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmtResult {
        write!(f, "{}", self.get_message())
    }
}

impl From<CartridgeError> for NesError {
    fn from(from: CartridgeError) -> Self {
        Self::Cartridge(from)
    }
}

impl From<CPUError> for NesError {
    fn from(from: CPUError) -> Self {
        Self::Cpu(from)
    }
}
