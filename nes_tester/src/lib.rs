mod error;
pub mod fixture;
mod tester;
pub mod trace;

pub use crate::error::TestError;
pub use crate::tester::NesTester;
pub use crate::trace::TraceLine;
