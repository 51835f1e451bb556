use cpu6502::{
    instruction::{AddressingMode, Instruction, Opcode},
    CPUBusTrait, CPURegisters, CPU6502,
};
use std::fmt::{Display, Formatter, Result as fmtResult};

/// One line of a `nestest.log` style trace, the state right before the
/// instruction at PC executes:
///
/// ```text
/// C000  4C F5 C5  JMP $C5F5                       A:00 X:00 Y:00 P:24 SP:FD PPU:  0, 21 CYC:7
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TraceLine {
    bytes: Vec<u8>,
    is_official: bool,
    disassembly: String,
    registers: CPURegisters,
    ppu_position: (u16, u16),
    cycles: u32,
}

impl TraceLine {
    /// memory is read with `peek` only, capturing never changes the machine
    pub fn capture<T: CPUBusTrait>(cpu: &CPU6502<T>, ppu_position: (u16, u16)) -> Self {
        let registers = cpu.registers();
        let bus = cpu.bus();

        let instruction = Instruction::from_byte(bus.peek(registers.pc));
        let bytes = (0..instruction.get_instruction_len() as u16)
            .map(|offset| bus.peek(registers.pc.wrapping_add(offset)))
            .collect::<Vec<u8>>();

        let disassembly = disassemble(bus, &instruction, &bytes, &registers);

        Self {
            bytes,
            is_official: instruction.is_official(),
            disassembly,
            registers,
            ppu_position,
            cycles: cpu.cycles(),
        }
    }

    pub fn pc(&self) -> u16 {
        self.registers.pc
    }

    pub fn registers(&self) -> CPURegisters {
        self.registers
    }

    pub fn disassembly(&self) -> &str {
        &self.disassembly
    }
}

impl Display for TraceLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmtResult {
        let bytes = self
            .bytes
            .iter()
            .map(|byte| format!("{:02X}", byte))
            .collect::<Vec<String>>()
            .join(" ");

        write!(
            f,
            "{:04X}  {:<9}{}{:<32}A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} PPU:{:>3},{:>3} CYC:{}",
            self.registers.pc,
            bytes,
            if self.is_official { ' ' } else { '*' },
            self.disassembly,
            self.registers.a,
            self.registers.x,
            self.registers.y,
            self.registers.p,
            self.registers.s,
            self.ppu_position.0,
            self.ppu_position.1,
            self.cycles
        )
    }
}

/// mnemonic and operand, with the effective address (`@ AAAA`) and the
/// memory value (`= VV`) where the instruction touches memory
fn disassemble<T: CPUBusTrait>(
    bus: &T,
    instruction: &Instruction,
    bytes: &[u8],
    registers: &CPURegisters,
) -> String {
    // zero page pointers wrap inside the zero page
    let peek_pointer = |pointer: u8| -> u16 {
        let low = bus.peek(pointer as u16) as u16;
        let high = bus.peek(pointer.wrapping_add(1) as u16) as u16;
        high << 8 | low
    };

    let operand8 = bytes.get(1).copied().unwrap_or(0);
    let operand16 = (bytes.get(2).copied().unwrap_or(0) as u16) << 8 | operand8 as u16;

    let is_jump = matches!(instruction.opcode, Opcode::Jmp | Opcode::Jsr);

    let operand = match instruction.addressing_mode {
        AddressingMode::Implied => String::new(),
        AddressingMode::Accumulator => "A".to_owned(),
        AddressingMode::Immediate => format!("#${:02X}", operand8),
        AddressingMode::ZeroPage => {
            format!("${:02X} = {:02X}", operand8, bus.peek(operand8 as u16))
        }
        AddressingMode::ZeroPageIndexX => {
            let address = operand8.wrapping_add(registers.x);
            format!(
                "${:02X},X @ {:02X} = {:02X}",
                operand8,
                address,
                bus.peek(address as u16)
            )
        }
        AddressingMode::ZeroPageIndexY => {
            let address = operand8.wrapping_add(registers.y);
            format!(
                "${:02X},Y @ {:02X} = {:02X}",
                operand8,
                address,
                bus.peek(address as u16)
            )
        }
        AddressingMode::Absolute if is_jump => format!("${:04X}", operand16),
        AddressingMode::Absolute => {
            format!("${:04X} = {:02X}", operand16, bus.peek(operand16))
        }
        AddressingMode::AbsoluteX => {
            let address = operand16.wrapping_add(registers.x as u16);
            format!(
                "${:04X},X @ {:04X} = {:02X}",
                operand16,
                address,
                bus.peek(address)
            )
        }
        AddressingMode::AbsoluteY => {
            let address = operand16.wrapping_add(registers.y as u16);
            format!(
                "${:04X},Y @ {:04X} = {:02X}",
                operand16,
                address,
                bus.peek(address)
            )
        }
        AddressingMode::Indirect => {
            // the high byte does not cross the page
            let high_address = (operand16 & 0xFF00) | (operand16.wrapping_add(1) & 0x00FF);
            let target = (bus.peek(high_address) as u16) << 8 | bus.peek(operand16) as u16;
            format!("(${:04X}) = {:04X}", operand16, target)
        }
        AddressingMode::XIndirect => {
            let pointer = operand8.wrapping_add(registers.x);
            let address = peek_pointer(pointer);
            format!(
                "(${:02X},X) @ {:02X} = {:04X} = {:02X}",
                operand8,
                pointer,
                address,
                bus.peek(address)
            )
        }
        AddressingMode::IndirectY => {
            let base = peek_pointer(operand8);
            let address = base.wrapping_add(registers.y as u16);
            format!(
                "(${:02X}),Y = {:04X} @ {:04X} = {:02X}",
                operand8,
                base,
                address,
                bus.peek(address)
            )
        }
        AddressingMode::Relative => {
            let target = registers
                .pc
                .wrapping_add(2)
                .wrapping_add(operand8 as i8 as u16);
            format!("${:04X}", target)
        }
    };

    if operand.is_empty() {
        instruction.opcode.to_string()
    } else {
        format!("{} {}", instruction.opcode, operand)
    }
}
