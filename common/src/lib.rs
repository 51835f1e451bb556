mod bus;
mod error;
mod mirroring;

pub mod interconnection;

pub use bus::{Bus, Device};
pub use error::BusError;
pub use mirroring::{MirroringMode, MirroringProvider};
