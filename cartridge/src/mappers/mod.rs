mod mapper0;
mod mapper1;


pub use mapper0::Mapper0;
pub use mapper1::Mapper1;
