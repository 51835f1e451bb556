#[macro_use]
extern crate bitflags;

mod controller;


pub use crate::controller::Controller;
pub use crate::controller::StandardNESControllerState;
pub use crate::controller::StandardNESKey;
