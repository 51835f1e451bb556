use crate::{trace::TraceLine, TestError};
use cartridge::Cartridge;
use common::{Bus, Device};
use display::COLORS;
use nes_base::NES;
use std::{io::Write, path::Path};

/// A powered NES with helpers to run test ROMs to completion
pub struct NesTester {
    nes: NES,
}

impl NesTester {
    pub fn new<P: AsRef<Path>>(filename: P) -> Result<Self, TestError> {
        Self::from_nes(NES::new(filename)?)
    }

    pub fn with_cartridge(cartridge: Cartridge) -> Result<Self, TestError> {
        Self::from_nes(NES::with_cartridge(cartridge))
    }

    fn from_nes(mut nes: NES) -> Result<Self, TestError> {
        nes.power()?;

        Ok(Self { nes })
    }

    pub fn nes(&self) -> &NES {
        &self.nes
    }

    pub fn nes_mut(&mut self) -> &mut NES {
        &mut self.nes
    }

    pub fn cpu_read_address(&self, address: u16) -> u8 {
        self.nes.peek(address)
    }

    pub fn ppu_read_address(&self, address: u16) -> u8 {
        self.nes
            .cpu()
            .bus()
            .ppu()
            .ppu_bus()
            .read(address, Device::Ppu)
    }

    /// jump somewhere else than the reset vector, `nestest` automation
    /// mode starts at `C000`
    pub fn set_pc(&mut self, pc: u16) {
        let mut registers = self.nes.cpu().registers();
        registers.pc = pc;
        self.nes.cpu_mut().set_registers(registers);
    }

    pub fn trace_line(&self) -> TraceLine {
        TraceLine::capture(self.nes.cpu(), self.nes.ppu_position())
    }

    pub fn step(&mut self) -> Result<u32, TestError> {
        Ok(self.nes.step()?)
    }

    /// Writes a trace line then executes, for at most `max_instructions`.
    ///
    /// Returns the number of executed instructions.
    pub fn write_trace<W: Write>(
        &mut self,
        writer: &mut W,
        max_instructions: usize,
    ) -> Result<usize, TestError> {
        for executed in 0..max_instructions {
            writeln!(writer, "{}", self.trace_line())?;

            if let Err(err) = self.nes.step() {
                log::error!("trace stopped after {} instructions", executed);
                return Err(err.into());
            }
        }

        Ok(max_instructions)
    }

    /// until an instruction jumps to itself (`JMP *` or a branch to self)
    pub fn step_until_infinite_loop(&mut self) -> Result<(), TestError> {
        loop {
            let pc = self.nes.cpu().registers().pc;
            self.step()?;

            if self.nes.cpu().registers().pc == pc {
                return Ok(());
            }
        }
    }

    /// loop until the memory at `address` does not equal to `data`
    pub fn step_until_memory_neq(&mut self, address: u16, data: u8) -> Result<(), TestError> {
        loop {
            self.step()?;

            if self.cpu_read_address(address) != data {
                return Ok(());
            }
        }
    }

    /// until the pixel at `x, y` of a published frame has the color
    /// `color_code`
    pub fn step_until_pixel_appears(
        &mut self,
        x: usize,
        y: usize,
        color_code: u8,
    ) -> Result<(), TestError> {
        let color = COLORS[(color_code & 0x3F) as usize];
        let frame_handle = self.nes.frame_handle();
        let mut frame_count = self.nes.frame_count();

        loop {
            self.step()?;

            if self.nes.frame_count() != frame_count {
                frame_count = self.nes.frame_count();

                if frame_handle.latest().pixel(x, y) == color {
                    return Ok(());
                }
            }
        }
    }

    pub fn run_frames(&mut self, frames: u64) -> Result<(), TestError> {
        for _ in 0..frames {
            self.nes.run_frame()?;
        }

        Ok(())
    }
}
