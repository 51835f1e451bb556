use apu2a03::APU2A03;
use cartridge::Cartridge;
use common::{
    interconnection::PPUCPUConnection, Bus, BusError, Device, MirroringMode, MirroringProvider,
};
use controller::Controller;
use cpu6502::CPUBusTrait;
use ppu2c02::{Palette, VRam, PPU2C02};
use std::{cell::RefCell, rc::Rc};

/// nametable layout of the console RAM when no cartridge drives CIRAM A10
const DEFAULT_MIRRORING: MirroringMode = MirroringMode::Horizontal;

/// PPU address space: pattern tables on the cartridge, nametables in the
/// console VRAM (or the cartridge on four-screen boards) and the palette
pub struct PPUBus {
    cartridge: Option<Rc<RefCell<Cartridge>>>,
    vram: VRam,
    palettes: Palette,
}

impl PPUBus {
    pub fn new(cartridge: Option<Rc<RefCell<Cartridge>>>) -> Self {
        Self {
            cartridge,
            vram: VRam::new(),
            palettes: Palette::new(),
        }
    }

    /// the mapper can change it at any time, so it is asked on every access
    pub fn mirroring_mode(&self) -> MirroringMode {
        match &self.cartridge {
            Some(cartridge) => cartridge.borrow().mirroring_mode(),
            None => DEFAULT_MIRRORING,
        }
    }
}

impl Bus for PPUBus {
    fn read(&self, address: u16, device: Device) -> u8 {
        match address {
            0x0000..=0x1FFF => match &self.cartridge {
                Some(cartridge) => cartridge.borrow().read_ppu(address),
                None => 0,
            },
            0x2000..=0x3EFF => {
                let address = address & 0x2FFF;
                let mode = self.mirroring_mode();

                match &self.cartridge {
                    Some(cartridge) if mode == MirroringMode::FourScreen => {
                        cartridge.borrow().read_ppu(address)
                    }
                    _ => self.vram.read(address, mode),
                }
            }
            0x3F00..=0x3FFF => self.palettes.read(address, device),
            // mirror
            0x4000..=0xFFFF => self.read(address & 0x3FFF, device),
        }
    }

    fn write(&mut self, address: u16, data: u8, device: Device) {
        match address {
            0x0000..=0x1FFF => {
                if let Some(cartridge) = &self.cartridge {
                    cartridge.borrow_mut().write_ppu(address, data);
                }
            }
            0x2000..=0x3EFF => {
                let address = address & 0x2FFF;
                let mode = self.mirroring_mode();

                match &self.cartridge {
                    Some(cartridge) if mode == MirroringMode::FourScreen => {
                        cartridge.borrow_mut().write_ppu(address, data)
                    }
                    _ => self.vram.write(address, data, mode),
                }
            }
            0x3F00..=0x3FFF => self.palettes.write(address, data, device),
            // mirror
            0x4000..=0xFFFF => self.write(address & 0x3FFF, data, device),
        }
    }
}

/// CPU address space
///
/// | range         | target                                |
/// |---------------|---------------------------------------|
/// | `$0000-$1FFF` | 2KB RAM, mirrored                     |
/// | `$2000-$3FFF` | PPU registers, mirrored every 8 bytes |
/// | `$4000-$4017` | APU, OAM DMA and controller ports     |
/// | `$4018-$401F` | disabled test registers               |
/// | `$4020-$5FFF` | expansion, not connected              |
/// | `$6000-$FFFF` | cartridge                             |
pub struct CPUBus {
    ram: [u8; 0x800],
    ppu: PPU2C02<PPUBus>,
    apu: APU2A03,
    controller: Controller,
    cartridge: Option<Rc<RefCell<Cartridge>>>,

    /// the last value on the data bus, returned for unmapped reads
    open_bus: u8,
}

impl CPUBus {
    pub fn new(cartridge: Option<Rc<RefCell<Cartridge>>>, ppu: PPU2C02<PPUBus>) -> Self {
        Self {
            ram: [0; 0x800],
            ppu,
            apu: APU2A03::new(),
            controller: Controller::new(),
            cartridge,

            open_bus: 0,
        }
    }

    pub fn ppu(&self) -> &PPU2C02<PPUBus> {
        &self.ppu
    }

    pub fn ppu_mut(&mut self) -> &mut PPU2C02<PPUBus> {
        &mut self.ppu
    }

    pub fn apu(&self) -> &APU2A03 {
        &self.apu
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn open_bus(&self) -> u8 {
        self.open_bus
    }

    /// the reset line, RAM and cartridge are kept
    pub fn reset(&mut self) {
        self.ppu.reset();
        self.apu.reset();
    }

    /// cold boot state, the RAM content is not defined on hardware, we
    /// use zeros
    pub fn power(&mut self) {
        self.ram = [0; 0x800];
        self.open_bus = 0;
        self.reset();
    }
}

impl CPUBusTrait for CPUBus {
    fn read(&mut self, address: u16) -> Result<u8, BusError> {
        let data = match address {
            0x0000..=0x1FFF => self.ram[(address & 0x7FF) as usize],
            0x2000..=0x3FFF => self.ppu.read(0x2000 | (address & 0x7), Device::Cpu),
            0x4000..=0x4013 | 0x4015 => self.apu.read(address, Device::Cpu),
            // write only
            0x4014 => self.open_bus,
            // only D0 is driven by the controller
            0x4016 => self.controller.read(address, Device::Cpu) | (self.open_bus & 0xE0),
            // second controller, not connected
            0x4017 => 0,
            0x4018..=0x401F => 0,
            0x4020..=0x5FFF => self.open_bus,
            0x6000..=0xFFFF => match &self.cartridge {
                Some(cartridge) => cartridge.borrow().read_prg(address).unwrap_or(self.open_bus),
                None => return Err(BusError::MissingCartridge(address)),
            },
        };

        self.open_bus = data;

        Ok(data)
    }

    fn write(&mut self, address: u16, data: u8) -> Result<(), BusError> {
        self.open_bus = data;

        match address {
            0x0000..=0x1FFF => self.ram[(address & 0x7FF) as usize] = data,
            0x2000..=0x3FFF => self
                .ppu
                .write(0x2000 | (address & 0x7), data, Device::Cpu),
            0x4014 => self.ppu.write(address, data, Device::Cpu),
            0x4000..=0x4013 | 0x4015 | 0x4017 => self.apu.write(address, data, Device::Cpu),
            0x4016 => self.controller.write(address, data, Device::Cpu),
            0x4018..=0x5FFF => {
                // ignored
            }
            0x6000..=0xFFFF => match &self.cartridge {
                Some(cartridge) => cartridge.borrow_mut().write_prg(address, data),
                None => return Err(BusError::MissingCartridge(address)),
            },
        };

        Ok(())
    }

    fn peek(&self, address: u16) -> u8 {
        match address {
            0x0000..=0x1FFF => self.ram[(address & 0x7FF) as usize],
            // registers, reading them would change their state
            0x2000..=0x401F => 0xFF,
            0x4020..=0x5FFF => self.open_bus,
            0x6000..=0xFFFF => match &self.cartridge {
                Some(cartridge) => cartridge.borrow().read_prg(address).unwrap_or(self.open_bus),
                None => self.open_bus,
            },
        }
    }
}

impl PPUCPUConnection for CPUBus {
    fn is_nmi_pin_set(&self) -> bool {
        self.ppu.is_nmi_pin_set()
    }

    fn clear_nmi_pin(&mut self) {
        self.ppu.clear_nmi_pin()
    }

    fn is_dma_request(&self) -> bool {
        self.ppu.is_dma_request()
    }

    fn clear_dma_request(&mut self) {
        self.ppu.clear_dma_request()
    }

    fn dma_address(&self) -> u8 {
        self.ppu.dma_address()
    }
}
