use crate::apu2a03::APU2A03;
use common::{Bus, Device};

memory_mapped_registers! {
    pub enum Register {
        Pulse1Control = 0x4000,
        Pulse1Sweep = 0x4001,
        Pulse1TimerLow = 0x4002,
        Pulse1Length = 0x4003,

        Pulse2Control = 0x4004,
        Pulse2Sweep = 0x4005,
        Pulse2TimerLow = 0x4006,
        Pulse2Length = 0x4007,

        TriangleLinearCounter = 0x4008,
        TriangleUnused = 0x4009,
        TriangleTimerLow = 0x400A,
        TriangleLength = 0x400B,

        NoiseControl = 0x400C,
        NoiseUnused = 0x400D,
        NoisePeriod = 0x400E,
        NoiseLength = 0x400F,

        DmcControl = 0x4010,
        DmcLoad = 0x4011,
        DmcSampleAddress = 0x4012,
        DmcSampleLength = 0x4013,

        Status = 0x4015,

        FrameCounter = 0x4017,
    }
}

impl Bus for APU2A03 {
    fn read(&self, address: u16, _device: Device) -> u8 {
        match Register::from_address(address) {
            Some(register) => self.read_register(register),
            None => {
                log::warn!("read from unmapped APU address {:04X}", address);
                0
            }
        }
    }

    fn write(&mut self, address: u16, data: u8, _device: Device) {
        match Register::from_address(address) {
            Some(register) => self.write_register(register, data),
            None => log::warn!("write to unmapped APU address {:04X}", address),
        }
    }
}
