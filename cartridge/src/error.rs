use std::{
    convert::From,
    error::Error,
    fmt::{Debug, Display, Formatter, Result as fmtResult},
    io::Error as ioError,
};

pub enum CartridgeError {
    FileError(ioError),
    HeaderError,
    /// number of bytes left in the file after reading all the banks
    TooLargeFile(u64),
    MapperNotImplemented(u16),
}

impl CartridgeError {
    fn get_message(&self) -> String {
        match self {
            Self::FileError(err) => format!("FileError: could not read the ROM: {}", err),
            Self::HeaderError => "HeaderError: missing the iNES magic number".to_owned(),
            Self::TooLargeFile(extra) => format!(
                "TooLargeFile: {} unexpected bytes after the PRG and CHR banks",
                extra
            ),
            Self::MapperNotImplemented(mapper) => {
                format!("MapperNotImplemented: mapper {} is not supported", mapper)
            }
        }
    }
}

impl Error for CartridgeError {}

impl Display for CartridgeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmtResult {
        write!(f, "{}", self.get_message())
    }
}

impl Debug for CartridgeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmtResult {
        write!(f, "{}", self.get_message())
    }
}

impl From<ioError> for CartridgeError {
    fn from(from: ioError) -> Self {
        Self::FileError(from)
    }
}
