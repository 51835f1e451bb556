#[derive(Debug, PartialEq, Copy, Clone)]
pub enum MirroringMode {
    Vertical,
    Horizontal,
    SingleScreenLowBank,
    SingleScreenHighBank,
    /// the cartridge supplies the extra 2KB and maps all four nametables
    FourScreen,
}

pub trait MirroringProvider {
    fn mirroring_mode(&self) -> MirroringMode;
}
