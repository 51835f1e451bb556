use std::{
    error::Error,
    fmt::{Debug, Display, Formatter, Result as fmtResult},
};

#[derive(PartialEq, Clone, Copy)]
pub enum BusError {
    /// the address belongs to the cartridge space but no cartridge is inserted
    MissingCartridge(u16),
}

impl BusError {
    fn get_message(&self) -> String {
        match self {
            Self::MissingCartridge(address) => format!(
                "MissingCartridge: access to {:04X} with no cartridge inserted",
                address
            ),
        }
    }
}

impl Error for BusError {}

impl Display for BusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmtResult {
        write!(f, "{}", self.get_message())
    }
}

impl Debug for BusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmtResult {
        write!(f, "{}", self.get_message())
    }
}
