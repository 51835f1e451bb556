mod cartridge;
mod error;
mod mapper;
mod mappers;


pub use crate::cartridge::{Cartridge, CartridgeHeader, TvSystem};
pub use crate::error::CartridgeError;
pub use crate::mapper::{Mapper, MapperType, MappingResult};
pub use crate::mappers::{Mapper0, Mapper1};
