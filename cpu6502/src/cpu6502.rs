use super::instruction::{AddressingMode, Instruction, Opcode};
use super::{CPUBusTrait, CPUError};
use serde::Deserialize;

const NMI_VECTOR_ADDRESS: u16 = 0xFFFA;
const RESET_VECTOR_ADDRESS: u16 = 0xFFFC;
const IRQ_VECTOR_ADDRESS: u16 = 0xFFFE;

const OAM_DATA_ADDRESS: u16 = 0x2004;

// helper function
fn is_on_same_page(address1: u16, address2: u16) -> bool {
    address1 & 0xff00 == address2 & 0xff00
}

bitflags! {
    /// flags: [N, V, _, B, D, I, Z, C]
    pub struct StatusFlags: u8 {
        const CARRY = 1 << 0;
        const ZERO = 1 << 1;
        const INTERRUPT_DISABLE = 1 << 2;
        /// no effect on the 2A03, but can be set and cleared
        const DECIMAL_MODE = 1 << 3;
        /// only exist on the stack copy of the register
        const BREAK = 1 << 4;
        const UNUSED = 1 << 5;
        const OVERFLOW = 1 << 6;
        const NEGATIVE = 1 << 7;
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Interrupt {
    Nmi,
    Reset,
    Irq,
    Brk,
}

#[derive(Debug, Default, PartialEq, Clone, Copy, Deserialize)]
pub struct CPURegisters {
    pub pc: u16,
    pub s: u8,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub p: u8,
}

/// How the instruction uses its memory operand, decides the dummy reads
/// of the indexed addressing modes
#[derive(PartialEq, Clone, Copy)]
enum AccessKind {
    Read,
    Write,
    ReadModifyWrite,
}

pub struct CPU6502<T: CPUBusTrait> {
    reg_pc: u16,
    reg_sp: u8,
    reg_a: u8,
    reg_x: u8,
    reg_y: u8,
    reg_status: StatusFlags,

    cycles: u32,

    nmi_pin_status: bool,
    irq_pin_status: bool,

    /// page to copy into OAM on the next read cycle
    dma_page: Option<u8>,

    /// (opcode, pc) of the KIL instruction that halted the CPU
    jammed: Option<(u8, u16)>,

    bus: T,
}

// public
impl<T> CPU6502<T>
where
    T: CPUBusTrait,
{
    pub fn new(bus: T) -> Self {
        CPU6502 {
            reg_pc: 0,
            reg_sp: 0,
            reg_a: 0,
            reg_x: 0,
            reg_y: 0,
            reg_status: StatusFlags::empty(),

            cycles: 0,

            nmi_pin_status: false,
            irq_pin_status: false,

            dma_page: None,

            jammed: None,

            bus,
        }
    }

    /// Power-up state followed by the reset sequence
    pub fn power(&mut self) -> Result<(), CPUError> {
        self.reg_a = 0;
        self.reg_x = 0;
        self.reg_y = 0;
        self.reg_sp = 0xFD;
        self.reg_status = StatusFlags::from_bits_truncate(0x24);

        self.cycles = 0;

        self.nmi_pin_status = false;
        self.irq_pin_status = false;
        self.dma_page = None;
        self.jammed = None;

        self.interrupt(Interrupt::Reset)
    }

    /// The reset button, registers are kept but the stack pointer moves as
    /// if 3 bytes were pushed
    pub fn reset(&mut self) -> Result<(), CPUError> {
        self.reg_sp = self.reg_sp.wrapping_sub(3);

        self.nmi_pin_status = false;
        self.irq_pin_status = false;
        self.dma_page = None;
        self.jammed = None;

        self.interrupt(Interrupt::Reset)
    }

    /// Executes one full instruction, then services any pending interrupt.
    ///
    /// Returns the number of cycles spent, including OAM DMA stalls and the
    /// interrupt sequence.
    pub fn execute(&mut self) -> Result<u32, CPUError> {
        if let Some((opcode, pc)) = self.jammed {
            return Err(CPUError::Jam { opcode, pc });
        }

        let start_cycles = self.cycles;
        let pc = self.reg_pc;

        let opcode_byte = self.fetch_byte()?;
        let instruction = Instruction::from_byte(opcode_byte);

        match instruction.opcode {
            Opcode::Jam => {
                log::warn!("CPU jammed by {:02X} at {:04X}", opcode_byte, pc);
                self.jammed = Some((opcode_byte, pc));
                return Err(CPUError::Jam {
                    opcode: opcode_byte,
                    pc,
                });
            }
            Opcode::Ane | Opcode::Lxa => {
                return Err(CPUError::InvalidOpcode {
                    opcode: opcode_byte,
                    pc,
                });
            }
            _ => {}
        }

        self.run_instruction(&instruction)?;

        self.check_and_run_interrupts()?;

        Ok(self.cycles.wrapping_sub(start_cycles))
    }

    /// Push the return state and jump through the vector of `kind`, 7 cycles
    pub fn interrupt(&mut self, kind: Interrupt) -> Result<(), CPUError> {
        match kind {
            // the stack accesses are turned into reads, nothing is pushed
            Interrupt::Reset => self.cycles = self.cycles.wrapping_add(5),
            Interrupt::Nmi | Interrupt::Irq => {
                self.read_bus(self.reg_pc)?;
                self.read_bus(self.reg_pc)?;
            }
            // the opcode and the padding byte were already fetched
            Interrupt::Brk => {}
        }

        if kind != Interrupt::Reset {
            self.push_stack((self.reg_pc >> 8) as u8)?;
            self.push_stack(self.reg_pc as u8)?;

            let status = if kind == Interrupt::Nmi {
                self.reg_status
            } else {
                self.reg_status | StatusFlags::BREAK | StatusFlags::UNUSED
            };
            self.push_stack(status.bits)?;
        }

        self.reg_status.insert(StatusFlags::INTERRUPT_DISABLE);

        let vector = match kind {
            Interrupt::Nmi => NMI_VECTOR_ADDRESS,
            Interrupt::Reset => RESET_VECTOR_ADDRESS,
            Interrupt::Irq | Interrupt::Brk => IRQ_VECTOR_ADDRESS,
        };

        let low = self.read_bus(vector)? as u16;
        let high = self.read_bus(vector + 1)? as u16;
        self.reg_pc = high << 8 | low;

        log::debug!("{:?} interrupt, jumping to {:04X}", kind, self.reg_pc);

        Ok(())
    }

    /// Serviced after the currently executing instruction
    pub fn schedule_nmi(&mut self) {
        self.nmi_pin_status = true;
    }

    /// Serviced after the currently executing instruction when the interrupt
    /// disable flag is clear, stays pending until then
    pub fn schedule_irq(&mut self) {
        self.irq_pin_status = true;
    }

    /// Copy the 256 bytes of `page` into OAM, starts on the next read cycle
    pub fn schedule_dma_oam(&mut self, page: u8) {
        self.dma_page = Some(page);
    }

    pub fn registers(&self) -> CPURegisters {
        CPURegisters {
            pc: self.reg_pc,
            s: self.reg_sp,
            a: self.reg_a,
            x: self.reg_x,
            y: self.reg_y,
            p: self.reg_status.bits,
        }
    }

    pub fn set_registers(&mut self, registers: CPURegisters) {
        self.reg_pc = registers.pc;
        self.reg_sp = registers.s;
        self.reg_a = registers.a;
        self.reg_x = registers.x;
        self.reg_y = registers.y;
        self.reg_status = StatusFlags::from_bits_truncate(registers.p);
    }

    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn set_cycles(&mut self, cycles: u32) {
        self.cycles = cycles;
    }

    pub fn is_jammed(&self) -> bool {
        self.jammed.is_some()
    }

    pub fn bus(&self) -> &T {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut T {
        &mut self.bus
    }
}

// private
impl<T> CPU6502<T>
where
    T: CPUBusTrait,
{
    fn read_bus(&mut self, address: u16) -> Result<u8, CPUError> {
        if let Some(page) = self.dma_page.take() {
            self.run_dma_oam(page)?;
        }

        self.cycles = self.cycles.wrapping_add(1);
        Ok(self.bus.read(address)?)
    }

    fn write_bus(&mut self, address: u16, data: u8) -> Result<(), CPUError> {
        self.cycles = self.cycles.wrapping_add(1);
        self.bus.write(address, data)?;

        // $4014 write
        if self.bus.is_dma_request() {
            let page = self.bus.dma_address();
            self.bus.clear_dma_request();
            self.schedule_dma_oam(page);
        }

        Ok(())
    }

    /// 1 halt cycle plus 1 alignment cycle when starting on an odd cycle,
    /// then 256 read/write pairs
    fn run_dma_oam(&mut self, page: u8) -> Result<(), CPUError> {
        log::trace!("OAM DMA from page {:02X} at cycle {}", page, self.cycles);

        let halt_cycles = if self.cycles % 2 == 0 { 1 } else { 2 };
        self.cycles = self.cycles.wrapping_add(halt_cycles);

        let base = (page as u16) << 8;
        for offset in 0..0x100 {
            self.cycles = self.cycles.wrapping_add(1);
            let data = self.bus.read(base | offset)?;

            self.cycles = self.cycles.wrapping_add(1);
            self.bus.write(OAM_DATA_ADDRESS, data)?;
        }

        Ok(())
    }

    fn check_and_run_interrupts(&mut self) -> Result<(), CPUError> {
        if self.nmi_pin_status {
            self.nmi_pin_status = false;
            self.interrupt(Interrupt::Nmi)
        } else if self.irq_pin_status
            && !self.reg_status.contains(StatusFlags::INTERRUPT_DISABLE)
        {
            self.irq_pin_status = false;
            self.interrupt(Interrupt::Irq)
        } else {
            Ok(())
        }
    }

    fn fetch_byte(&mut self) -> Result<u8, CPUError> {
        let data = self.read_bus(self.reg_pc)?;
        self.reg_pc = self.reg_pc.wrapping_add(1);
        Ok(data)
    }

    fn fetch_word(&mut self) -> Result<u16, CPUError> {
        let low = self.fetch_byte()? as u16;
        let high = self.fetch_byte()? as u16;
        Ok(high << 8 | low)
    }

    /// the second cycle of one byte instructions reads the next byte and
    /// throws it away
    fn dummy_read_pc(&mut self) -> Result<(), CPUError> {
        self.read_bus(self.reg_pc)?;
        Ok(())
    }

    fn push_stack(&mut self, data: u8) -> Result<(), CPUError> {
        self.write_bus(0x0100 | self.reg_sp as u16, data)?;
        self.reg_sp = self.reg_sp.wrapping_sub(1);
        Ok(())
    }

    fn pull_stack(&mut self) -> Result<u8, CPUError> {
        self.reg_sp = self.reg_sp.wrapping_add(1);
        self.read_bus(0x0100 | self.reg_sp as u16)
    }

    /// the stack pointer is read before it is incremented by a pull
    fn dummy_read_stack(&mut self) -> Result<(), CPUError> {
        self.read_bus(0x0100 | self.reg_sp as u16)?;
        Ok(())
    }

    /// bits 4 and 5 do not exist in the register, pulls drop the B flag
    /// and keep the unused bit set
    fn set_status_from_stack(&mut self, data: u8) {
        self.reg_status =
            (StatusFlags::from_bits_truncate(data) - StatusFlags::BREAK) | StatusFlags::UNUSED;
    }

    fn is_flag_set(&self, flag: StatusFlags) -> bool {
        self.reg_status.contains(flag)
    }

    fn update_zero_negative_flags(&mut self, result: u8) {
        self.reg_status.set(StatusFlags::ZERO, result == 0);
        self.reg_status.set(StatusFlags::NEGATIVE, result & 0x80 != 0);
    }

    /// Resolve the effective address of `mode`, performing all the bus
    /// accesses the hardware does on the way.
    ///
    /// Returns (address before indexing, effective address).
    fn resolve_address(
        &mut self,
        mode: AddressingMode,
        access: AccessKind,
    ) -> Result<(u16, u16), CPUError> {
        let result = match mode {
            AddressingMode::ZeroPage => {
                let address = self.fetch_byte()? as u16;
                (address, address)
            }
            AddressingMode::ZeroPageIndexX | AddressingMode::ZeroPageIndexY => {
                let base = self.fetch_byte()?;
                // reads the base while adding the index
                self.read_bus(base as u16)?;

                let index = if mode == AddressingMode::ZeroPageIndexX {
                    self.reg_x
                } else {
                    self.reg_y
                };

                (base as u16, base.wrapping_add(index) as u16)
            }
            AddressingMode::Absolute => {
                let address = self.fetch_word()?;
                (address, address)
            }
            AddressingMode::AbsoluteX | AddressingMode::AbsoluteY => {
                let base = self.fetch_word()?;
                let index = if mode == AddressingMode::AbsoluteX {
                    self.reg_x
                } else {
                    self.reg_y
                };

                let address = self.index_address(base, index, access)?;
                (base, address)
            }
            AddressingMode::XIndirect => {
                let pointer = self.fetch_byte()?;
                self.read_bus(pointer as u16)?;

                let pointer = pointer.wrapping_add(self.reg_x);
                let low = self.read_bus(pointer as u16)? as u16;
                let high = self.read_bus(pointer.wrapping_add(1) as u16)? as u16;

                let address = high << 8 | low;
                (address, address)
            }
            AddressingMode::IndirectY => {
                let pointer = self.fetch_byte()?;
                let low = self.read_bus(pointer as u16)? as u16;
                let high = self.read_bus(pointer.wrapping_add(1) as u16)? as u16;

                let base = high << 8 | low;
                let address = self.index_address(base, self.reg_y, access)?;
                (base, address)
            }
            AddressingMode::Indirect => {
                let pointer = self.fetch_word()?;
                let low = self.read_bus(pointer)? as u16;
                // if the indirect vector is at the last of the page (0xff) then
                // wrap around on the same page
                let high = self.read_bus((pointer & 0xFF00) | (pointer.wrapping_add(1) & 0xFF))?
                    as u16;

                let address = high << 8 | low;
                (address, address)
            }
            AddressingMode::Immediate
            | AddressingMode::Accumulator
            | AddressingMode::Relative
            | AddressingMode::Implied => {
                unreachable!("{:?} has no memory operand", mode)
            }
        };

        Ok(result)
    }

    /// Adds `index` to `base`, the hardware first reads from the address with
    /// only the low byte fixed, this read is skipped by read instructions
    /// that did not cross a page.
    fn index_address(&mut self, base: u16, index: u8, access: AccessKind) -> Result<u16, CPUError> {
        let address = base.wrapping_add(index as u16);

        if access != AccessKind::Read || !is_on_same_page(base, address) {
            self.read_bus((base & 0xFF00) | (address & 0x00FF))?;
        }

        Ok(address)
    }

    fn operand_address(
        &mut self,
        mode: AddressingMode,
        access: AccessKind,
    ) -> Result<u16, CPUError> {
        Ok(self.resolve_address(mode, access)?.1)
    }

    fn read_operand(&mut self, mode: AddressingMode) -> Result<u8, CPUError> {
        if mode == AddressingMode::Immediate {
            self.fetch_byte()
        } else {
            let address = self.operand_address(mode, AccessKind::Read)?;
            self.read_bus(address)
        }
    }

    fn write_operand(&mut self, mode: AddressingMode, data: u8) -> Result<(), CPUError> {
        let address = self.operand_address(mode, AccessKind::Write)?;
        self.write_bus(address, data)
    }

    /// read, write back the original value, then write the result of `f`
    fn modify_operand<F>(&mut self, mode: AddressingMode, f: F) -> Result<u8, CPUError>
    where
        F: FnOnce(&mut Self, u8) -> u8,
    {
        if mode == AddressingMode::Accumulator {
            self.dummy_read_pc()?;
            let operand = self.reg_a;
            let result = f(self, operand);
            self.reg_a = result;
            return Ok(result);
        }

        let address = self.operand_address(mode, AccessKind::ReadModifyWrite)?;
        let operand = self.read_bus(address)?;
        self.write_bus(address, operand)?;

        let result = f(self, operand);
        self.write_bus(address, result)?;

        Ok(result)
    }

    /// SHA, SHX, SHY and TAS, the stored value is ANDed with the high byte
    /// of the base address plus one, and on a page cross that value also
    /// replaces the high byte of the target. Real chips are not consistent
    /// here, this is the commonly documented behavior.
    fn run_unstable_store(&mut self, mode: AddressingMode, value: u8) -> Result<(), CPUError> {
        let (base, address) = self.resolve_address(mode, AccessKind::Write)?;

        let data = value & ((base >> 8) as u8).wrapping_add(1);
        let address = if is_on_same_page(base, address) {
            address
        } else {
            (data as u16) << 8 | (address & 0xFF)
        };

        self.write_bus(address, data)
    }

    fn run_adc(&mut self, operand: u8) {
        let carry = self.is_flag_set(StatusFlags::CARRY) as u16;
        let result = self.reg_a as u16 + operand as u16 + carry;

        // the sign of both inputs is the same, but the result sign differs
        self.reg_status.set(
            StatusFlags::OVERFLOW,
            !(self.reg_a ^ operand) & (self.reg_a ^ result as u8) & 0x80 != 0,
        );
        self.reg_status.set(StatusFlags::CARRY, result & 0xff00 != 0);
        self.update_zero_negative_flags(result as u8);

        self.reg_a = result as u8;
    }

    fn run_sbc(&mut self, operand: u8) {
        self.run_adc(!operand);
    }

    fn run_bitwise_operation<F>(&mut self, operand: u8, f: F)
    where
        F: Fn(u8, u8) -> u8,
    {
        let result = f(operand, self.reg_a);

        self.update_zero_negative_flags(result);

        self.reg_a = result;
    }

    fn run_cmp_operation(&mut self, operand: u8, register: u8) {
        let result = (register as u16).wrapping_sub(operand as u16);

        self.update_zero_negative_flags(result as u8);
        self.reg_status.set(StatusFlags::CARRY, result & 0xff00 == 0);
    }

    fn run_asl(&mut self, operand: u8) -> u8 {
        // There is a bit at the leftmost position, it will be moved to the carry
        self.reg_status.set(StatusFlags::CARRY, operand & 0x80 != 0);
        let result = operand << 1;
        self.update_zero_negative_flags(result);
        result
    }

    fn run_lsr(&mut self, operand: u8) -> u8 {
        self.reg_status.set(StatusFlags::CARRY, operand & 0x01 != 0);
        let result = operand >> 1;
        self.update_zero_negative_flags(result);
        result
    }

    fn run_rol(&mut self, operand: u8) -> u8 {
        let old_carry = self.is_flag_set(StatusFlags::CARRY) as u8;
        self.reg_status.set(StatusFlags::CARRY, operand & 0x80 != 0);
        let result = operand << 1 | old_carry;
        self.update_zero_negative_flags(result);
        result
    }

    fn run_ror(&mut self, operand: u8) -> u8 {
        let old_carry = self.is_flag_set(StatusFlags::CARRY) as u8;
        self.reg_status.set(StatusFlags::CARRY, operand & 0x01 != 0);
        let result = operand >> 1 | old_carry << 7;
        self.update_zero_negative_flags(result);
        result
    }

    fn run_inc(&mut self, operand: u8) -> u8 {
        let result = operand.wrapping_add(1);
        self.update_zero_negative_flags(result);
        result
    }

    fn run_dec(&mut self, operand: u8) -> u8 {
        let result = operand.wrapping_sub(1);
        self.update_zero_negative_flags(result);
        result
    }

    fn run_branch_condition(&mut self, condition: bool) -> Result<(), CPUError> {
        let offset = self.fetch_byte()?;

        if condition {
            self.dummy_read_pc()?;

            let target = self.reg_pc.wrapping_add(offset as i8 as u16);

            if !is_on_same_page(self.reg_pc, target) {
                // PCH is fixed one cycle after PCL
                self.read_bus((self.reg_pc & 0xFF00) | (target & 0x00FF))?;
            }

            self.reg_pc = target;
        }

        Ok(())
    }

    fn run_instruction(&mut self, instruction: &Instruction) -> Result<(), CPUError> {
        let mode = instruction.addressing_mode;

        match instruction.opcode {
            Opcode::Adc => {
                let operand = self.read_operand(mode)?;
                self.run_adc(operand);
            }
            Opcode::Sbc => {
                let operand = self.read_operand(mode)?;
                self.run_sbc(operand);
            }
            Opcode::And => {
                let operand = self.read_operand(mode)?;
                self.run_bitwise_operation(operand, |a, b| a & b);
            }
            Opcode::Eor => {
                let operand = self.read_operand(mode)?;
                self.run_bitwise_operation(operand, |a, b| a ^ b);
            }
            Opcode::Ora => {
                let operand = self.read_operand(mode)?;
                self.run_bitwise_operation(operand, |a, b| a | b);
            }
            Opcode::Asl => {
                self.modify_operand(mode, Self::run_asl)?;
            }
            Opcode::Lsr => {
                self.modify_operand(mode, Self::run_lsr)?;
            }
            Opcode::Rol => {
                self.modify_operand(mode, Self::run_rol)?;
            }
            Opcode::Ror => {
                self.modify_operand(mode, Self::run_ror)?;
            }
            Opcode::Inc => {
                self.modify_operand(mode, Self::run_inc)?;
            }
            Opcode::Dec => {
                self.modify_operand(mode, Self::run_dec)?;
            }
            Opcode::Bit => {
                let operand = self.read_operand(mode)?;
                // move the negative and overflow flags to the status register
                self.reg_status
                    .set(StatusFlags::NEGATIVE, operand & StatusFlags::NEGATIVE.bits != 0);
                self.reg_status
                    .set(StatusFlags::OVERFLOW, operand & StatusFlags::OVERFLOW.bits != 0);
                self.reg_status
                    .set(StatusFlags::ZERO, operand & self.reg_a == 0);
            }
            Opcode::Cmp => {
                let operand = self.read_operand(mode)?;
                self.run_cmp_operation(operand, self.reg_a);
            }
            Opcode::Cpx => {
                let operand = self.read_operand(mode)?;
                self.run_cmp_operation(operand, self.reg_x);
            }
            Opcode::Cpy => {
                let operand = self.read_operand(mode)?;
                self.run_cmp_operation(operand, self.reg_y);
            }
            Opcode::Brk => {
                // padding byte, skipped by the return address
                self.fetch_byte()?;
                self.interrupt(Interrupt::Brk)?;
            }
            Opcode::Bcc => self.run_branch_condition(!self.is_flag_set(StatusFlags::CARRY))?,
            Opcode::Bcs => self.run_branch_condition(self.is_flag_set(StatusFlags::CARRY))?,
            Opcode::Beq => self.run_branch_condition(self.is_flag_set(StatusFlags::ZERO))?,
            Opcode::Bmi => self.run_branch_condition(self.is_flag_set(StatusFlags::NEGATIVE))?,
            Opcode::Bne => self.run_branch_condition(!self.is_flag_set(StatusFlags::ZERO))?,
            Opcode::Bpl => self.run_branch_condition(!self.is_flag_set(StatusFlags::NEGATIVE))?,
            Opcode::Bvc => self.run_branch_condition(!self.is_flag_set(StatusFlags::OVERFLOW))?,
            Opcode::Bvs => self.run_branch_condition(self.is_flag_set(StatusFlags::OVERFLOW))?,
            Opcode::Clc => {
                self.dummy_read_pc()?;
                self.reg_status.remove(StatusFlags::CARRY);
            }
            Opcode::Cld => {
                self.dummy_read_pc()?;
                self.reg_status.remove(StatusFlags::DECIMAL_MODE);
            }
            Opcode::Cli => {
                self.dummy_read_pc()?;
                self.reg_status.remove(StatusFlags::INTERRUPT_DISABLE);
            }
            Opcode::Clv => {
                self.dummy_read_pc()?;
                self.reg_status.remove(StatusFlags::OVERFLOW);
            }
            Opcode::Sec => {
                self.dummy_read_pc()?;
                self.reg_status.insert(StatusFlags::CARRY);
            }
            Opcode::Sed => {
                self.dummy_read_pc()?;
                self.reg_status.insert(StatusFlags::DECIMAL_MODE);
            }
            Opcode::Sei => {
                self.dummy_read_pc()?;
                self.reg_status.insert(StatusFlags::INTERRUPT_DISABLE);
            }
            Opcode::Jmp => {
                self.reg_pc = self.operand_address(mode, AccessKind::Read)?;
            }
            Opcode::Jsr => {
                let low = self.fetch_byte()? as u16;
                self.dummy_read_stack()?;

                // the pushed address is the last byte of this instruction
                self.push_stack((self.reg_pc >> 8) as u8)?;
                self.push_stack(self.reg_pc as u8)?;

                let high = self.read_bus(self.reg_pc)? as u16;
                self.reg_pc = high << 8 | low;
            }
            Opcode::Rti => {
                self.dummy_read_pc()?;
                self.dummy_read_stack()?;

                let status = self.pull_stack()?;
                self.set_status_from_stack(status);

                let low = self.pull_stack()? as u16;
                let high = self.pull_stack()? as u16;
                self.reg_pc = high << 8 | low;
            }
            Opcode::Rts => {
                self.dummy_read_pc()?;
                self.dummy_read_stack()?;

                let low = self.pull_stack()? as u16;
                let high = self.pull_stack()? as u16;
                self.reg_pc = high << 8 | low;

                self.fetch_byte()?;
            }
            Opcode::Lda => {
                let operand = self.read_operand(mode)?;
                self.reg_a = operand;
                self.update_zero_negative_flags(operand);
            }
            Opcode::Ldx => {
                let operand = self.read_operand(mode)?;
                self.reg_x = operand;
                self.update_zero_negative_flags(operand);
            }
            Opcode::Ldy => {
                let operand = self.read_operand(mode)?;
                self.reg_y = operand;
                self.update_zero_negative_flags(operand);
            }
            Opcode::Nop => {
                if mode == AddressingMode::Implied {
                    self.dummy_read_pc()?;
                } else {
                    self.read_operand(mode)?;
                }
            }
            Opcode::Dex => {
                self.dummy_read_pc()?;
                self.reg_x = self.run_dec(self.reg_x);
            }
            Opcode::Dey => {
                self.dummy_read_pc()?;
                self.reg_y = self.run_dec(self.reg_y);
            }
            Opcode::Inx => {
                self.dummy_read_pc()?;
                self.reg_x = self.run_inc(self.reg_x);
            }
            Opcode::Iny => {
                self.dummy_read_pc()?;
                self.reg_y = self.run_inc(self.reg_y);
            }
            Opcode::Tax => {
                self.dummy_read_pc()?;
                self.reg_x = self.reg_a;
                self.update_zero_negative_flags(self.reg_x);
            }
            Opcode::Tay => {
                self.dummy_read_pc()?;
                self.reg_y = self.reg_a;
                self.update_zero_negative_flags(self.reg_y);
            }
            Opcode::Txa => {
                self.dummy_read_pc()?;
                self.reg_a = self.reg_x;
                self.update_zero_negative_flags(self.reg_a);
            }
            Opcode::Tya => {
                self.dummy_read_pc()?;
                self.reg_a = self.reg_y;
                self.update_zero_negative_flags(self.reg_a);
            }
            Opcode::Tsx => {
                self.dummy_read_pc()?;
                self.reg_x = self.reg_sp;
                self.update_zero_negative_flags(self.reg_x);
            }
            Opcode::Txs => {
                // no flags are affected
                self.dummy_read_pc()?;
                self.reg_sp = self.reg_x;
            }
            Opcode::Pha => {
                self.dummy_read_pc()?;
                self.push_stack(self.reg_a)?;
            }
            Opcode::Php => {
                self.dummy_read_pc()?;
                // software push, B is set
                let status = self.reg_status | StatusFlags::BREAK | StatusFlags::UNUSED;
                self.push_stack(status.bits)?;
            }
            Opcode::Pla => {
                self.dummy_read_pc()?;
                self.dummy_read_stack()?;
                self.reg_a = self.pull_stack()?;
                self.update_zero_negative_flags(self.reg_a);
            }
            Opcode::Plp => {
                self.dummy_read_pc()?;
                self.dummy_read_stack()?;
                let status = self.pull_stack()?;
                self.set_status_from_stack(status);
            }
            Opcode::Sta => self.write_operand(mode, self.reg_a)?,
            Opcode::Stx => self.write_operand(mode, self.reg_x)?,
            Opcode::Sty => self.write_operand(mode, self.reg_y)?,

            Opcode::Slo => {
                let result = self.modify_operand(mode, Self::run_asl)?;
                self.run_bitwise_operation(result, |a, b| a | b);
            }
            Opcode::Rla => {
                let result = self.modify_operand(mode, Self::run_rol)?;
                self.run_bitwise_operation(result, |a, b| a & b);
            }
            Opcode::Sre => {
                let result = self.modify_operand(mode, Self::run_lsr)?;
                self.run_bitwise_operation(result, |a, b| a ^ b);
            }
            Opcode::Rra => {
                let result = self.modify_operand(mode, Self::run_ror)?;
                self.run_adc(result);
            }
            Opcode::Dcp => {
                let result = self.modify_operand(mode, |_, operand| operand.wrapping_sub(1))?;
                self.run_cmp_operation(result, self.reg_a);
            }
            Opcode::Isb => {
                let result = self.modify_operand(mode, |_, operand| operand.wrapping_add(1))?;
                self.run_sbc(result);
            }
            Opcode::Sax => self.write_operand(mode, self.reg_a & self.reg_x)?,
            Opcode::Lax => {
                let operand = self.read_operand(mode)?;
                self.reg_a = operand;
                self.reg_x = operand;
                self.update_zero_negative_flags(operand);
            }
            Opcode::Anc => {
                let operand = self.read_operand(mode)?;
                self.run_bitwise_operation(operand, |a, b| a & b);
                let negative = self.is_flag_set(StatusFlags::NEGATIVE);
                self.reg_status.set(StatusFlags::CARRY, negative);
            }
            Opcode::Alr => {
                let operand = self.read_operand(mode)?;
                let result = self.run_lsr(self.reg_a & operand);
                self.reg_a = result;
            }
            Opcode::Arr => {
                let operand = self.read_operand(mode)?;
                let anded = self.reg_a & operand;
                let result = anded >> 1 | (self.is_flag_set(StatusFlags::CARRY) as u8) << 7;

                self.update_zero_negative_flags(result);
                self.reg_status.set(StatusFlags::CARRY, result & 0x40 != 0);
                self.reg_status.set(
                    StatusFlags::OVERFLOW,
                    ((result >> 6) ^ (result >> 5)) & 1 != 0,
                );

                self.reg_a = result;
            }
            Opcode::Axs => {
                let operand = self.read_operand(mode)?;
                let anded = self.reg_a & self.reg_x;
                let result = anded.wrapping_sub(operand);

                self.reg_status.set(StatusFlags::CARRY, anded >= operand);
                self.update_zero_negative_flags(result);

                self.reg_x = result;
            }
            Opcode::Las => {
                let operand = self.read_operand(mode)?;
                let result = operand & self.reg_sp;

                self.reg_a = result;
                self.reg_x = result;
                self.reg_sp = result;
                self.update_zero_negative_flags(result);
            }
            Opcode::Sha => self.run_unstable_store(mode, self.reg_a & self.reg_x)?,
            Opcode::Shx => self.run_unstable_store(mode, self.reg_x)?,
            Opcode::Shy => self.run_unstable_store(mode, self.reg_y)?,
            Opcode::Tas => {
                self.reg_sp = self.reg_a & self.reg_x;
                self.run_unstable_store(mode, self.reg_sp)?;
            }
            // rejected in `execute`
            Opcode::Ane | Opcode::Lxa | Opcode::Jam => {
                unreachable!("{} is never executed", instruction.opcode)
            }
        }

        Ok(())
    }
}
