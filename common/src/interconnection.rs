/// Lines going from the PPU side of the machine into the CPU.
///
/// The PPU never calls into the CPU, it only raises these flags and whoever
/// drives the CPU polls and clears them.
pub trait PPUCPUConnection {
    fn is_nmi_pin_set(&self) -> bool;
    fn clear_nmi_pin(&mut self);
    fn is_dma_request(&self) -> bool;
    fn clear_dma_request(&mut self);
    /// the page (high byte) the OAM DMA should copy from
    fn dma_address(&self) -> u8;
}
