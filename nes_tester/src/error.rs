use cartridge::CartridgeError;
use nes_base::NesError;
use std::{
    convert::From,
    error::Error,
    fmt::{Debug, Display, Formatter, Result as fmtResult},
    io::Error as ioError,
};

pub enum TestError {
    Cartridge(CartridgeError),
    Nes(NesError),
    ResultError(u8),
    /// a fixture that could not be loaded or did not match
    Fixture(String),
    Io(ioError),
}

impl TestError {
    fn get_message(&self) -> String {
        match self {
            Self::Cartridge(err) => format!("CartridgeError: {}", err),
            Self::Nes(err) => format!("NesError: {}", err),
            Self::ResultError(code) => format!("ResultError: test failed with code {}", code),
            Self::Fixture(message) => format!("FixtureError: {}", message),
            Self::Io(err) => format!("IoError: {}", err),
        }
    }
}

impl Error for TestError {}

impl Display for TestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmtResult {
        write!(f, "{}", self.get_message())
    }
}

impl Debug for TestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmtResult {
        write!(f, "{}", self.get_message())
    }
}

impl From<CartridgeError> for TestError {
    fn from(from: CartridgeError) -> Self {
        Self::Cartridge(from)
    }
}

impl From<NesError> for TestError {
    fn from(from: NesError) -> Self {
        Self::Nes(from)
    }
}

impl From<ioError> for TestError {
    fn from(from: ioError) -> Self {
        Self::Io(from)
    }
}

impl From<serde_json::Error> for TestError {
    fn from(from: serde_json::Error) -> Self {
        Self::Fixture(from.to_string())
    }
}
