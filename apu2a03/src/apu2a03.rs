use crate::apu2a03_registers::Register;

/// Register file of the APU with no sound generation.
///
/// Writes are kept so they can be inspected, reads of the status register
/// report every channel as silent and no frame IRQ.
pub struct APU2A03 {
    /// last value written to each register, indexed by `address - 0x4000`
    registers: [u8; 0x18],
}

impl APU2A03 {
    pub fn new() -> Self {
        Self {
            registers: [0; 0x18],
        }
    }

    pub(crate) fn read_register(&self, register: Register) -> u8 {
        match register {
            // no length counters running, no DMC, no IRQ
            Register::Status => 0,
            _ => {
                // unreadable
                0
            }
        }
    }

    pub(crate) fn write_register(&mut self, register: Register, data: u8) {
        log::trace!("APU write {:?} = {:02X}", register, data);

        self.registers[(register as u16 - 0x4000) as usize] = data;
    }

    /// the last value written to the register at `address`
    pub fn last_write(&self, address: u16) -> Option<u8> {
        Register::from_address(address)
            .map(|register| self.registers[(register as u16 - 0x4000) as usize])
    }

    pub fn reset(&mut self) {
        self.registers = [0; 0x18];
    }
}

impl Default for APU2A03 {
    fn default() -> Self {
        Self::new()
    }
}
