use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instruction {
    pub opcode_byte: u8,
    pub opcode: Opcode,
    pub addressing_mode: AddressingMode,
}

#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    // arithmetic and logic
    Adc, And, Asl, Eor, Lsr, Ora, Rol, Ror, Sbc,
    Bit, Cmp, Cpx, Cpy,
    Dec, Inc, Dex, Dey, Inx, Iny,

    // control flow
    Brk, Jmp, Jsr, Rti, Rts,
    Bcc, Bcs, Beq, Bmi, Bne, Bpl, Bvc, Bvs,

    // flags
    Clc, Cld, Cli, Clv, Sec, Sed, Sei,

    // loads, stores and transfers
    Lda, Ldx, Ldy, Sta, Stx, Sty,
    Tax, Tay, Txa, Tya, Tsx, Txs,
    Pha, Php, Pla, Plp,

    Nop,

    // unofficial, two official operations combined
    Slo, // ASL + ORA
    Rla, // ROL + AND
    Sre, // LSR + EOR
    Rra, // ROR + ADC
    Dcp, // DEC + CMP
    Isb, // INC + SBC
    Sax, // M = A & X
    Lax, // A, X = M
    Anc, // AND, C = N
    Alr, // AND + LSR A
    Arr, // AND + ROR A, C and V from bits 6 and 5
    Axs, // X = (A & X) - M, no borrow in
    Las, // A, X, S = M & S

    // unstable, the stored value is ANDed with the high byte of the address + 1
    Sha,
    Shx,
    Shy,
    Tas,
    // unstable, depend on an analog constant
    Ane,
    Lxa,

    Jam,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    Immediate,      // #$aa
    ZeroPage,       // $aa
    ZeroPageIndexX, // $aa, X
    ZeroPageIndexY, // $aa, Y
    Indirect,       // ($aabb)
    XIndirect,      // ($aa, X)
    IndirectY,      // ($aa), Y
    Absolute,       // $aabb
    AbsoluteX,      // $aabb, X
    AbsoluteY,      // $aabb, Y
    Accumulator,    // A
    Relative,       // $aa (relative to current PC)
    Implied,        // Single byte instruction
}

impl AddressingMode {
    pub fn get_instruction_len(&self) -> usize {
        match self {
            Self::Immediate => 2,
            Self::ZeroPage => 2,
            Self::ZeroPageIndexX => 2,
            Self::ZeroPageIndexY => 2,
            Self::Indirect => 3,
            Self::XIndirect => 2,
            Self::IndirectY => 2,
            Self::Absolute => 3,
            Self::AbsoluteX => 3,
            Self::AbsoluteY => 3,
            Self::Accumulator => 1,
            Self::Relative => 2,
            Self::Implied => 1,
        }
    }
}

fn decode(byte: u8) -> (Opcode, AddressingMode) {
    use AddressingMode::*;
    use Opcode::*;

    #[rustfmt::skip]
    const TABLE: [(Opcode, AddressingMode); 256] = [
        // 0x00
        (Brk, Implied), (Ora, XIndirect), (Jam, Implied), (Slo, XIndirect),
        (Nop, ZeroPage), (Ora, ZeroPage), (Asl, ZeroPage), (Slo, ZeroPage),
        (Php, Implied), (Ora, Immediate), (Asl, Accumulator), (Anc, Immediate),
        (Nop, Absolute), (Ora, Absolute), (Asl, Absolute), (Slo, Absolute),
        // 0x10
        (Bpl, Relative), (Ora, IndirectY), (Jam, Implied), (Slo, IndirectY),
        (Nop, ZeroPageIndexX), (Ora, ZeroPageIndexX), (Asl, ZeroPageIndexX), (Slo, ZeroPageIndexX),
        (Clc, Implied), (Ora, AbsoluteY), (Nop, Implied), (Slo, AbsoluteY),
        (Nop, AbsoluteX), (Ora, AbsoluteX), (Asl, AbsoluteX), (Slo, AbsoluteX),
        // 0x20
        (Jsr, Absolute), (And, XIndirect), (Jam, Implied), (Rla, XIndirect),
        (Bit, ZeroPage), (And, ZeroPage), (Rol, ZeroPage), (Rla, ZeroPage),
        (Plp, Implied), (And, Immediate), (Rol, Accumulator), (Anc, Immediate),
        (Bit, Absolute), (And, Absolute), (Rol, Absolute), (Rla, Absolute),
        // 0x30
        (Bmi, Relative), (And, IndirectY), (Jam, Implied), (Rla, IndirectY),
        (Nop, ZeroPageIndexX), (And, ZeroPageIndexX), (Rol, ZeroPageIndexX), (Rla, ZeroPageIndexX),
        (Sec, Implied), (And, AbsoluteY), (Nop, Implied), (Rla, AbsoluteY),
        (Nop, AbsoluteX), (And, AbsoluteX), (Rol, AbsoluteX), (Rla, AbsoluteX),
        // 0x40
        (Rti, Implied), (Eor, XIndirect), (Jam, Implied), (Sre, XIndirect),
        (Nop, ZeroPage), (Eor, ZeroPage), (Lsr, ZeroPage), (Sre, ZeroPage),
        (Pha, Implied), (Eor, Immediate), (Lsr, Accumulator), (Alr, Immediate),
        (Jmp, Absolute), (Eor, Absolute), (Lsr, Absolute), (Sre, Absolute),
        // 0x50
        (Bvc, Relative), (Eor, IndirectY), (Jam, Implied), (Sre, IndirectY),
        (Nop, ZeroPageIndexX), (Eor, ZeroPageIndexX), (Lsr, ZeroPageIndexX), (Sre, ZeroPageIndexX),
        (Cli, Implied), (Eor, AbsoluteY), (Nop, Implied), (Sre, AbsoluteY),
        (Nop, AbsoluteX), (Eor, AbsoluteX), (Lsr, AbsoluteX), (Sre, AbsoluteX),
        // 0x60
        (Rts, Implied), (Adc, XIndirect), (Jam, Implied), (Rra, XIndirect),
        (Nop, ZeroPage), (Adc, ZeroPage), (Ror, ZeroPage), (Rra, ZeroPage),
        (Pla, Implied), (Adc, Immediate), (Ror, Accumulator), (Arr, Immediate),
        (Jmp, Indirect), (Adc, Absolute), (Ror, Absolute), (Rra, Absolute),
        // 0x70
        (Bvs, Relative), (Adc, IndirectY), (Jam, Implied), (Rra, IndirectY),
        (Nop, ZeroPageIndexX), (Adc, ZeroPageIndexX), (Ror, ZeroPageIndexX), (Rra, ZeroPageIndexX),
        (Sei, Implied), (Adc, AbsoluteY), (Nop, Implied), (Rra, AbsoluteY),
        (Nop, AbsoluteX), (Adc, AbsoluteX), (Ror, AbsoluteX), (Rra, AbsoluteX),
        // 0x80
        (Nop, Immediate), (Sta, XIndirect), (Nop, Immediate), (Sax, XIndirect),
        (Sty, ZeroPage), (Sta, ZeroPage), (Stx, ZeroPage), (Sax, ZeroPage),
        (Dey, Implied), (Nop, Immediate), (Txa, Implied), (Ane, Immediate),
        (Sty, Absolute), (Sta, Absolute), (Stx, Absolute), (Sax, Absolute),
        // 0x90
        (Bcc, Relative), (Sta, IndirectY), (Jam, Implied), (Sha, IndirectY),
        (Sty, ZeroPageIndexX), (Sta, ZeroPageIndexX), (Stx, ZeroPageIndexY), (Sax, ZeroPageIndexY),
        (Tya, Implied), (Sta, AbsoluteY), (Txs, Implied), (Tas, AbsoluteY),
        (Shy, AbsoluteX), (Sta, AbsoluteX), (Shx, AbsoluteY), (Sha, AbsoluteY),
        // 0xA0
        (Ldy, Immediate), (Lda, XIndirect), (Ldx, Immediate), (Lax, XIndirect),
        (Ldy, ZeroPage), (Lda, ZeroPage), (Ldx, ZeroPage), (Lax, ZeroPage),
        (Tay, Implied), (Lda, Immediate), (Tax, Implied), (Lxa, Immediate),
        (Ldy, Absolute), (Lda, Absolute), (Ldx, Absolute), (Lax, Absolute),
        // 0xB0
        (Bcs, Relative), (Lda, IndirectY), (Jam, Implied), (Lax, IndirectY),
        (Ldy, ZeroPageIndexX), (Lda, ZeroPageIndexX), (Ldx, ZeroPageIndexY), (Lax, ZeroPageIndexY),
        (Clv, Implied), (Lda, AbsoluteY), (Tsx, Implied), (Las, AbsoluteY),
        (Ldy, AbsoluteX), (Lda, AbsoluteX), (Ldx, AbsoluteY), (Lax, AbsoluteY),
        // 0xC0
        (Cpy, Immediate), (Cmp, XIndirect), (Nop, Immediate), (Dcp, XIndirect),
        (Cpy, ZeroPage), (Cmp, ZeroPage), (Dec, ZeroPage), (Dcp, ZeroPage),
        (Iny, Implied), (Cmp, Immediate), (Dex, Implied), (Axs, Immediate),
        (Cpy, Absolute), (Cmp, Absolute), (Dec, Absolute), (Dcp, Absolute),
        // 0xD0
        (Bne, Relative), (Cmp, IndirectY), (Jam, Implied), (Dcp, IndirectY),
        (Nop, ZeroPageIndexX), (Cmp, ZeroPageIndexX), (Dec, ZeroPageIndexX), (Dcp, ZeroPageIndexX),
        (Cld, Implied), (Cmp, AbsoluteY), (Nop, Implied), (Dcp, AbsoluteY),
        (Nop, AbsoluteX), (Cmp, AbsoluteX), (Dec, AbsoluteX), (Dcp, AbsoluteX),
        // 0xE0
        (Cpx, Immediate), (Sbc, XIndirect), (Nop, Immediate), (Isb, XIndirect),
        (Cpx, ZeroPage), (Sbc, ZeroPage), (Inc, ZeroPage), (Isb, ZeroPage),
        (Inx, Implied), (Sbc, Immediate), (Nop, Implied), (Sbc, Immediate),
        (Cpx, Absolute), (Sbc, Absolute), (Inc, Absolute), (Isb, Absolute),
        // 0xF0
        (Beq, Relative), (Sbc, IndirectY), (Jam, Implied), (Isb, IndirectY),
        (Nop, ZeroPageIndexX), (Sbc, ZeroPageIndexX), (Inc, ZeroPageIndexX), (Isb, ZeroPageIndexX),
        (Sed, Implied), (Sbc, AbsoluteY), (Nop, Implied), (Isb, AbsoluteY),
        (Nop, AbsoluteX), (Sbc, AbsoluteX), (Inc, AbsoluteX), (Isb, AbsoluteX),
    ];

    TABLE[byte as usize]
}

impl Opcode {
    pub fn is_unofficial(&self) -> bool {
        use Opcode::*;
        matches!(
            self,
            Slo | Rla
                | Sre
                | Rra
                | Sax
                | Lax
                | Dcp
                | Isb
                | Anc
                | Alr
                | Arr
                | Axs
                | Las
                | Sha
                | Shx
                | Shy
                | Tas
                | Ane
                | Lxa
                | Jam
        )
    }
}

impl Instruction {
    /// every one of the 256 values decodes to something, undefined and
    /// halting opcodes are rejected by the CPU when executing
    pub fn from_byte(byte: u8) -> Instruction {
        let (opcode, addressing_mode) = decode(byte);

        Instruction {
            opcode_byte: byte,
            opcode,
            addressing_mode,
        }
    }

    pub fn get_instruction_len(&self) -> usize {
        // the length of the instruction depend on the type of its addressing mode
        self.addressing_mode.get_instruction_len()
    }

    /// `0xEA` is the only official NOP and `0xE9` the only official
    /// immediate SBC
    pub fn is_official(&self) -> bool {
        match self.opcode {
            Opcode::Nop => self.opcode_byte == 0xEA,
            Opcode::Sbc => self.opcode_byte != 0xEB,
            opcode => !opcode.is_unofficial(),
        }
    }
}

/// the mnemonic, as disassemblers print it
impl Display for Opcode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_uppercase())
    }
}
