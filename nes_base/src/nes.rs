use crate::bus::{CPUBus, PPUBus};
use crate::error::NesError;
use cartridge::Cartridge;
use common::interconnection::PPUCPUConnection;
use controller::{Controller, StandardNESControllerState};
use cpu6502::{CPUBusTrait, CPU6502};
use display::{FrameHandle, TV};
use ppu2c02::PPU2C02;
use std::{
    cell::RefCell,
    path::Path,
    rc::Rc,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

/// PPU dots for every CPU cycle (NTSC)
const PPU_DOTS_PER_CPU_CYCLE: u32 = 3;

/// Stops [`NES::run`] from any thread, the flag is checked before every
/// instruction
#[derive(Clone)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

pub struct NES {
    cpu: CPU6502<CPUBus>,
    frame_handle: FrameHandle,
    stop_flag: Arc<AtomicBool>,
}

impl NES {
    pub fn new<P: AsRef<Path>>(filename: P) -> Result<Self, NesError> {
        let cartridge = Cartridge::from_file(filename)?;

        Ok(Self::with_cartridge(cartridge))
    }

    pub fn with_cartridge(cartridge: Cartridge) -> Self {
        Self::create(Some(Rc::new(RefCell::new(cartridge))))
    }

    /// every access to `$6000-$FFFF` fails with `MissingCartridge`, so
    /// this can not be powered, the buses are still usable
    pub fn new_without_cartridge() -> Self {
        Self::create(None)
    }

    fn create(cartridge: Option<Rc<RefCell<Cartridge>>>) -> Self {
        let ppubus = PPUBus::new(cartridge.clone());

        let tv = TV::new();
        let frame_handle = tv.frame_handle();

        let ppu = PPU2C02::new(ppubus, tv);

        let cpubus = CPUBus::new(cartridge, ppu);

        let cpu = CPU6502::new(cpubus);

        Self {
            cpu,
            frame_handle,
            stop_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Cold boot, the CPU goes through its reset sequence and the PPU is
    /// kept in step with it
    pub fn power(&mut self) -> Result<(), NesError> {
        self.cpu.bus_mut().power();
        self.cpu.power()?;

        let cycles = self.cpu.cycles();
        self.cpu
            .bus_mut()
            .ppu_mut()
            .execute(cycles * PPU_DOTS_PER_CPU_CYCLE);

        log::info!(
            "powered on, reset vector {:04X}",
            self.cpu.registers().pc
        );

        Ok(())
    }

    /// The reset button
    pub fn reset(&mut self) -> Result<(), NesError> {
        self.cpu.bus_mut().reset();

        let start_cycles = self.cpu.cycles();
        self.cpu.reset()?;
        let cycles = self.cpu.cycles().wrapping_sub(start_cycles);

        self.cpu
            .bus_mut()
            .ppu_mut()
            .execute(cycles * PPU_DOTS_PER_CPU_CYCLE);

        log::info!("reset, jumping to {:04X}", self.cpu.registers().pc);

        Ok(())
    }

    /// Runs one instruction and the PPU dots it took, returns the CPU
    /// cycles spent.
    ///
    /// An NMI raised by the PPU during these dots is serviced after the
    /// next instruction.
    pub fn step(&mut self) -> Result<u32, NesError> {
        let cycles = self.cpu.execute()?;

        let frames_before = self.frame_count();

        let bus = self.cpu.bus_mut();
        bus.ppu_mut().execute(cycles * PPU_DOTS_PER_CPU_CYCLE);

        if bus.is_nmi_pin_set() {
            bus.clear_nmi_pin();
            self.cpu.schedule_nmi();
        }

        if self.frame_count() != frames_before {
            log::debug!("frame {} completed", self.frame_count());
        }

        Ok(cycles)
    }

    /// Runs until the PPU publishes the next frame
    pub fn run_frame(&mut self) -> Result<(), NesError> {
        let target = self.frame_count() + 1;

        while self.frame_count() < target {
            self.step()?;
        }

        Ok(())
    }

    /// Runs until stopped through a [`StopHandle`] or an error happens.
    ///
    /// Once stopped, later calls return right away.
    pub fn run(&mut self) -> Result<(), NesError> {
        while !self.stop_flag.load(Ordering::SeqCst) {
            self.step()?;
        }

        log::info!(
            "stopped at {:04X} after {} frames",
            self.cpu.registers().pc,
            self.frame_count()
        );

        Ok(())
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            flag: self.stop_flag.clone(),
        }
    }

    /// can be sent to other threads, always holds the last complete frame
    pub fn frame_handle(&self) -> FrameHandle {
        self.frame_handle.clone()
    }

    pub fn frame_count(&self) -> u64 {
        self.cpu.bus().ppu().frame_count()
    }

    pub fn controller(&self) -> &Controller {
        self.cpu.bus().controller()
    }

    /// the pressed keys of the first controller, for a frontend thread
    pub fn controller_state(&self) -> Arc<Mutex<StandardNESControllerState>> {
        self.controller().get_primary_controller_state()
    }

    pub fn cpu(&self) -> &CPU6502<CPUBus> {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut CPU6502<CPUBus> {
        &mut self.cpu
    }

    /// (scanline, dot)
    pub fn ppu_position(&self) -> (u16, u16) {
        self.cpu.bus().ppu().position()
    }

    /// CPU memory without side effects
    pub fn peek(&self, address: u16) -> u8 {
        self.cpu.bus().peek(address)
    }
}
