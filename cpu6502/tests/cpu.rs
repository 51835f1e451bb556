extern crate cpu6502;

use common::{interconnection::PPUCPUConnection, BusError};
use cpu6502::{CPUBusTrait, CPUError, CPURegisters, Interrupt, StatusFlags, CPU6502};

const PROGRAM_START: u16 = 0x8000;

#[derive(Debug, PartialEq, Clone, Copy)]
enum Access {
    Read(u16, u8),
    Write(u16, u8),
}

/// flat 64KB memory that logs every access, writes to $4014 request a DMA
/// and reads from $5000-$5FFF fail
struct DummyBus {
    data: Vec<u8>,
    accesses: Vec<Access>,
    dma_request: Option<u8>,
}

impl DummyBus {
    fn new() -> Self {
        Self {
            data: vec![0; 0x10000],
            accesses: Vec::new(),
            dma_request: None,
        }
    }
}

impl CPUBusTrait for DummyBus {
    fn read(&mut self, address: u16) -> Result<u8, BusError> {
        if (0x5000..0x6000).contains(&address) {
            return Err(BusError::MissingCartridge(address));
        }

        let data = self.data[address as usize];
        self.accesses.push(Access::Read(address, data));
        Ok(data)
    }

    fn write(&mut self, address: u16, data: u8) -> Result<(), BusError> {
        self.accesses.push(Access::Write(address, data));

        if address == 0x4014 {
            self.dma_request = Some(data);
        } else {
            self.data[address as usize] = data;
        }
        Ok(())
    }

    fn peek(&self, address: u16) -> u8 {
        self.data[address as usize]
    }
}

impl PPUCPUConnection for DummyBus {
    fn is_nmi_pin_set(&self) -> bool {
        false
    }
    fn clear_nmi_pin(&mut self) {}
    fn is_dma_request(&self) -> bool {
        self.dma_request.is_some()
    }
    fn clear_dma_request(&mut self) {
        self.dma_request = None;
    }
    fn dma_address(&self) -> u8 {
        self.dma_request.unwrap_or(0)
    }
}

/// powered CPU with `program` at $8000 and an empty access log
fn cpu_with_program(program: &[u8]) -> CPU6502<DummyBus> {
    let mut bus = DummyBus::new();
    let start = PROGRAM_START as usize;
    bus.data[start..start + program.len()].copy_from_slice(program);
    bus.data[0xFFFC] = PROGRAM_START as u8;
    bus.data[0xFFFD] = (PROGRAM_START >> 8) as u8;
    bus.data[0xFFFA] = 0x00;
    bus.data[0xFFFB] = 0x90;
    bus.data[0xFFFE] = 0x00;
    bus.data[0xFFFF] = 0xA0;

    let mut cpu = CPU6502::new(bus);
    cpu.power().unwrap();
    cpu.bus_mut().accesses.clear();
    cpu
}

fn set_pc_and_status(cpu: &mut CPU6502<DummyBus>, pc: u16, p: u8) {
    let registers = CPURegisters {
        pc,
        p,
        ..cpu.registers()
    };
    cpu.set_registers(registers);
}

#[test]
fn power_up_state() {
    let cpu = cpu_with_program(&[0xEA]);
    let registers = cpu.registers();

    assert_eq!(cpu.cycles(), 7);
    assert_eq!(registers.pc, PROGRAM_START);
    assert_eq!(registers.s, 0xFD);
    assert_eq!(registers.p, 0x24);
    assert_eq!((registers.a, registers.x, registers.y), (0, 0, 0));
}

#[test]
fn load_immediate_sets_flags() {
    let mut cpu = cpu_with_program(&[0xA9, 0x80, 0xA9, 0x00]);

    assert_eq!(cpu.execute(), Ok(2));
    assert_eq!(cpu.registers().a, 0x80);
    assert_ne!(cpu.registers().p & StatusFlags::NEGATIVE.bits(), 0);

    assert_eq!(cpu.execute(), Ok(2));
    assert_ne!(cpu.registers().p & StatusFlags::ZERO.bits(), 0);
    assert_eq!(cpu.registers().p & StatusFlags::NEGATIVE.bits(), 0);
}

#[test]
fn absolute_indexed_read_page_cross() {
    // LDX #1; LDA $10FF,X; LDA $1000,X
    let mut cpu = cpu_with_program(&[0xA2, 0x01, 0xBD, 0xFF, 0x10, 0xBD, 0x00, 0x10]);
    cpu.bus_mut().data[0x1100] = 0x77;

    assert_eq!(cpu.execute(), Ok(2));
    cpu.bus_mut().accesses.clear();

    assert_eq!(cpu.execute(), Ok(5));
    assert_eq!(cpu.registers().a, 0x77);
    assert_eq!(
        cpu.bus().accesses,
        vec![
            Access::Read(0x8002, 0xBD),
            Access::Read(0x8003, 0xFF),
            Access::Read(0x8004, 0x10),
            Access::Read(0x1000, 0x00),
            Access::Read(0x1100, 0x77),
        ]
    );

    // same page, no dummy read
    assert_eq!(cpu.execute(), Ok(4));
}

#[test]
fn indexed_store_always_reads_first() {
    // LDX #1; STA $1000,X
    let mut cpu = cpu_with_program(&[0xA2, 0x01, 0x9D, 0x00, 0x10]);
    cpu.execute().unwrap();
    cpu.bus_mut().accesses.clear();

    assert_eq!(cpu.execute(), Ok(5));
    assert_eq!(
        &cpu.bus().accesses[3..],
        &[Access::Read(0x1001, 0x00), Access::Write(0x1001, 0x00)]
    );
}

#[test]
fn read_modify_write_writes_twice() {
    // INC $10
    let mut cpu = cpu_with_program(&[0xE6, 0x10]);
    cpu.bus_mut().data[0x10] = 0x41;

    assert_eq!(cpu.execute(), Ok(5));
    assert_eq!(
        cpu.bus().accesses,
        vec![
            Access::Read(0x8000, 0xE6),
            Access::Read(0x8001, 0x10),
            Access::Read(0x0010, 0x41),
            Access::Write(0x0010, 0x41),
            Access::Write(0x0010, 0x42),
        ]
    );
}

#[test]
fn zero_page_indexed_wraps() {
    // LDX #$20; LDA $F0,X
    let mut cpu = cpu_with_program(&[0xA2, 0x20, 0xB5, 0xF0]);
    cpu.bus_mut().data[0x0010] = 0x99;
    cpu.bus_mut().data[0x0110] = 0x11;

    cpu.execute().unwrap();
    assert_eq!(cpu.execute(), Ok(4));
    assert_eq!(cpu.registers().a, 0x99);
}

#[test]
fn jmp_indirect_page_wrap() {
    let mut cpu = cpu_with_program(&[0x6C, 0xFF, 0x30]);
    cpu.bus_mut().data[0x30FF] = 0x34;
    cpu.bus_mut().data[0x3000] = 0x12;
    cpu.bus_mut().data[0x3100] = 0x56;

    assert_eq!(cpu.execute(), Ok(5));
    assert_eq!(cpu.registers().pc, 0x1234);
}

#[test]
fn adc_and_sbc_overflow() {
    // CLC; LDA #$50; ADC #$50; SEC; LDA #$50; SBC #$B0
    let mut cpu = cpu_with_program(&[
        0x18, 0xA9, 0x50, 0x69, 0x50, 0x38, 0xA9, 0x50, 0xE9, 0xB0,
    ]);

    for _ in 0..3 {
        cpu.execute().unwrap();
    }
    let registers = cpu.registers();
    assert_eq!(registers.a, 0xA0);
    assert_ne!(registers.p & StatusFlags::OVERFLOW.bits(), 0);
    assert_eq!(registers.p & StatusFlags::CARRY.bits(), 0);

    for _ in 0..3 {
        cpu.execute().unwrap();
    }
    let registers = cpu.registers();
    assert_eq!(registers.a, 0xA0);
    assert_ne!(registers.p & StatusFlags::OVERFLOW.bits(), 0);
    // borrow happened
    assert_eq!(registers.p & StatusFlags::CARRY.bits(), 0);
}

#[test]
fn compare_sets_carry_on_greater_or_equal() {
    // LDA #$40; CMP #$40; CMP #$41
    let mut cpu = cpu_with_program(&[0xA9, 0x40, 0xC9, 0x40, 0xC9, 0x41]);

    cpu.execute().unwrap();
    cpu.execute().unwrap();
    let p = cpu.registers().p;
    assert_ne!(p & StatusFlags::CARRY.bits(), 0);
    assert_ne!(p & StatusFlags::ZERO.bits(), 0);

    cpu.execute().unwrap();
    let p = cpu.registers().p;
    assert_eq!(p & StatusFlags::CARRY.bits(), 0);
    assert_ne!(p & StatusFlags::NEGATIVE.bits(), 0);
}

#[test]
fn status_register_through_the_stack() {
    for value in 0..=255u8 {
        // PLP; PHP
        let mut cpu = cpu_with_program(&[0x28, 0x08]);
        cpu.set_registers(CPURegisters {
            pc: PROGRAM_START,
            s: 0xFE,
            ..Default::default()
        });
        cpu.bus_mut().data[0x01FF] = value;

        assert_eq!(cpu.execute(), Ok(4));
        assert_eq!(cpu.registers().p, (value & !0x10) | 0x20);

        assert_eq!(cpu.execute(), Ok(3));
        assert_eq!(cpu.bus().data[0x01FF], value | 0x30);
    }
}

#[test]
fn nmi_pushes_status_without_break() {
    for value in 0..=255u8 {
        // PLP
        let mut cpu = cpu_with_program(&[0x28]);
        cpu.set_registers(CPURegisters {
            pc: PROGRAM_START,
            s: 0xFE,
            ..Default::default()
        });
        cpu.bus_mut().data[0x01FF] = value;

        cpu.execute().unwrap();
        cpu.interrupt(Interrupt::Nmi).unwrap();

        assert_eq!(cpu.bus().data[0x01FD], (value & !0x10) | 0x20);
    }
}

#[test]
fn nmi_is_serviced_after_the_instruction() {
    let mut cpu = cpu_with_program(&[0xEA]);
    cpu.schedule_nmi();

    assert_eq!(cpu.execute(), Ok(2 + 7));

    let registers = cpu.registers();
    assert_eq!(registers.pc, 0x9000);
    assert_eq!(registers.s, 0xFA);
    assert_ne!(registers.p & StatusFlags::INTERRUPT_DISABLE.bits(), 0);

    let bus = cpu.bus();
    // return address is the next instruction
    assert_eq!(bus.data[0x01FD], 0x80);
    assert_eq!(bus.data[0x01FC], 0x01);
    assert_eq!(bus.data[0x01FB] & 0x10, 0);

    // only once
    assert_eq!(cpu.execute(), Ok(2));
}

#[test]
fn irq_waits_for_interrupt_disable_clear() {
    // NOP; CLI
    let mut cpu = cpu_with_program(&[0xEA, 0x58]);
    cpu.schedule_irq();

    assert_eq!(cpu.execute(), Ok(2));
    assert_eq!(cpu.registers().pc, 0x8001);

    assert_eq!(cpu.execute(), Ok(2 + 7));
    assert_eq!(cpu.registers().pc, 0xA000);
    assert_ne!(cpu.bus().data[0x01FB] & 0x30, 0);
}

#[test]
fn brk_skips_the_padding_byte() {
    let mut cpu = cpu_with_program(&[0x00, 0xFF]);

    assert_eq!(cpu.execute(), Ok(7));
    assert_eq!(cpu.registers().pc, 0xA000);

    let bus = cpu.bus();
    assert_eq!(bus.data[0x01FD], 0x80);
    assert_eq!(bus.data[0x01FC], 0x02);
    assert_eq!(bus.data[0x01FB] & 0x30, 0x30);
}

#[test]
fn jsr_and_rts() {
    let mut cpu = cpu_with_program(&[0x20, 0x00, 0x90]);
    cpu.bus_mut().data[0x9000] = 0x60;

    assert_eq!(cpu.execute(), Ok(6));
    assert_eq!(cpu.registers().pc, 0x9000);
    // last byte of the JSR
    assert_eq!(cpu.bus().data[0x01FD], 0x80);
    assert_eq!(cpu.bus().data[0x01FC], 0x02);

    assert_eq!(cpu.execute(), Ok(6));
    assert_eq!(cpu.registers().pc, 0x8003);
    assert_eq!(cpu.registers().s, 0xFD);
}

#[test]
fn branch_cycles() {
    let mut cpu = cpu_with_program(&[]);
    cpu.bus_mut().data[0x8000] = 0xD0;
    cpu.bus_mut().data[0x8001] = 0x05;
    cpu.bus_mut().data[0x80FD] = 0xD0;
    cpu.bus_mut().data[0x80FE] = 0x05;
    cpu.bus_mut().data[0x8100] = 0xD0;
    cpu.bus_mut().data[0x8101] = 0xFC;
    cpu.bus_mut().data[0x8200] = 0xF0;
    cpu.bus_mut().data[0x8201] = 0x05;

    set_pc_and_status(&mut cpu, 0x8000, 0x20);
    assert_eq!(cpu.execute(), Ok(3));
    assert_eq!(cpu.registers().pc, 0x8007);

    set_pc_and_status(&mut cpu, 0x80FD, 0x20);
    assert_eq!(cpu.execute(), Ok(4));
    assert_eq!(cpu.registers().pc, 0x8104);

    // backwards across the page
    set_pc_and_status(&mut cpu, 0x8100, 0x20);
    assert_eq!(cpu.execute(), Ok(4));
    assert_eq!(cpu.registers().pc, 0x80FE);

    // not taken
    set_pc_and_status(&mut cpu, 0x8200, 0x20);
    assert_eq!(cpu.execute(), Ok(2));
    assert_eq!(cpu.registers().pc, 0x8202);
}

fn run_dma_from_cycle(start_cycle: u32) -> (u32, CPU6502<DummyBus>) {
    // LDA #$02; STA $4014; NOP
    let mut cpu = cpu_with_program(&[0xA9, 0x02, 0x8D, 0x14, 0x40, 0xEA]);
    for i in 0..0x100 {
        cpu.bus_mut().data[0x0200 + i] = i as u8;
    }

    cpu.execute().unwrap();
    cpu.execute().unwrap();
    cpu.set_cycles(start_cycle);
    cpu.bus_mut().accesses.clear();

    let cycles = cpu.execute().unwrap();
    (cycles, cpu)
}

#[test]
fn oam_dma_even_cycle() {
    let (cycles, cpu) = run_dma_from_cycle(100);
    assert_eq!(cycles, 513 + 2);

    let oam_writes = cpu
        .bus()
        .accesses
        .iter()
        .filter_map(|access| match access {
            Access::Write(0x2004, data) => Some(*data),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(oam_writes, (0..=255).collect::<Vec<u8>>());
}

#[test]
fn oam_dma_odd_cycle() {
    let (cycles, cpu) = run_dma_from_cycle(101);
    assert_eq!(cycles, 514 + 2);
    assert_eq!(cpu.registers().pc, 0x8006);
}

#[test]
fn jam_halts_the_cpu() {
    let mut cpu = cpu_with_program(&[0x02]);
    let error = CPUError::Jam {
        opcode: 0x02,
        pc: PROGRAM_START,
    };

    assert_eq!(cpu.execute(), Err(error));
    assert!(cpu.is_jammed());
    assert_eq!(cpu.execute(), Err(error));

    // power clears it
    cpu.power().unwrap();
    assert!(!cpu.is_jammed());
}

#[test]
fn unstable_opcodes_are_rejected() {
    for &opcode in &[0x8B, 0xAB] {
        let mut cpu = cpu_with_program(&[opcode, 0x00]);
        assert_eq!(
            cpu.execute(),
            Err(CPUError::InvalidOpcode {
                opcode,
                pc: PROGRAM_START
            })
        );
    }
}

#[test]
fn bus_errors_are_propagated() {
    // LDA $5000
    let mut cpu = cpu_with_program(&[0xAD, 0x00, 0x50]);

    assert_eq!(
        cpu.execute(),
        Err(CPUError::Bus(BusError::MissingCartridge(0x5000)))
    );
}

#[test]
fn unofficial_load_and_store() {
    // LAX $10; SAX $11 (after LDX #$0F); DCP $12
    let mut cpu = cpu_with_program(&[0xA7, 0x10, 0xA2, 0x0F, 0x87, 0x11, 0xC7, 0x12]);
    cpu.bus_mut().data[0x10] = 0x3C;
    cpu.bus_mut().data[0x12] = 0x3D;

    assert_eq!(cpu.execute(), Ok(3));
    assert_eq!((cpu.registers().a, cpu.registers().x), (0x3C, 0x3C));

    cpu.execute().unwrap();
    assert_eq!(cpu.execute(), Ok(3));
    assert_eq!(cpu.bus().data[0x11], 0x0C);

    assert_eq!(cpu.execute(), Ok(5));
    assert_eq!(cpu.bus().data[0x12], 0x3C);
    // A == decremented value
    assert_ne!(cpu.registers().p & StatusFlags::ZERO.bits(), 0);
    assert_ne!(cpu.registers().p & StatusFlags::CARRY.bits(), 0);
}

#[test]
fn axs_subtracts_from_a_and_x() {
    // LDA #$F0; LDX #$3C; AXS #$10
    let mut cpu = cpu_with_program(&[0xA9, 0xF0, 0xA2, 0x3C, 0xCB, 0x10]);
    for _ in 0..3 {
        cpu.execute().unwrap();
    }

    assert_eq!(cpu.registers().x, 0x20);
    assert_ne!(cpu.registers().p & StatusFlags::CARRY.bits(), 0);
}

#[test]
fn accumulator_shifts_and_rotates_through_carry() {
    // LDA #$81; ASL A; ROL A; ROR A; LSR A; SEC; ROR A
    let mut cpu = cpu_with_program(&[0xA9, 0x81, 0x0A, 0x2A, 0x6A, 0x4A, 0x38, 0x6A]);
    let carry = StatusFlags::CARRY.bits();
    cpu.execute().unwrap();
    cpu.bus_mut().accesses.clear();

    assert_eq!(cpu.execute(), Ok(2));
    assert_eq!(cpu.registers().a, 0x02);
    assert_ne!(cpu.registers().p & carry, 0);
    assert_eq!(
        cpu.bus().accesses,
        vec![Access::Read(0x8002, 0x0A), Access::Read(0x8003, 0x2A)]
    );

    // the carry goes into bit 0
    assert_eq!(cpu.execute(), Ok(2));
    assert_eq!(cpu.registers().a, 0x05);
    assert_eq!(cpu.registers().p & carry, 0);

    assert_eq!(cpu.execute(), Ok(2));
    assert_eq!(cpu.registers().a, 0x02);
    assert_ne!(cpu.registers().p & carry, 0);

    // LSR ignores the carry
    assert_eq!(cpu.execute(), Ok(2));
    assert_eq!(cpu.registers().a, 0x01);
    assert_eq!(cpu.registers().p & carry, 0);

    cpu.execute().unwrap();
    assert_eq!(cpu.execute(), Ok(2));
    assert_eq!(cpu.registers().a, 0x80);
    assert_ne!(cpu.registers().p & carry, 0);
    assert_ne!(cpu.registers().p & StatusFlags::NEGATIVE.bits(), 0);
}

#[test]
fn memory_shifts_and_rotates_through_carry() {
    // SEC; ROL $10; ROR $11; LSR $12; ASL $13
    let mut cpu = cpu_with_program(&[0x38, 0x26, 0x10, 0x66, 0x11, 0x46, 0x12, 0x06, 0x13]);
    cpu.bus_mut().data[0x10] = 0x80;
    cpu.bus_mut().data[0x11] = 0x00;
    cpu.bus_mut().data[0x12] = 0x01;
    cpu.bus_mut().data[0x13] = 0x40;
    cpu.execute().unwrap();
    cpu.bus_mut().accesses.clear();

    assert_eq!(cpu.execute(), Ok(5));
    assert_eq!(
        cpu.bus().accesses,
        vec![
            Access::Read(0x8001, 0x26),
            Access::Read(0x8002, 0x10),
            Access::Read(0x0010, 0x80),
            Access::Write(0x0010, 0x80),
            Access::Write(0x0010, 0x01),
        ]
    );
    assert_eq!(cpu.registers().p, 0x25);

    assert_eq!(cpu.execute(), Ok(5));
    assert_eq!(cpu.bus().data[0x11], 0x80);
    assert_eq!(cpu.registers().p, 0xA4);

    assert_eq!(cpu.execute(), Ok(5));
    assert_eq!(cpu.bus().data[0x12], 0x00);
    assert_eq!(cpu.registers().p, 0x27);

    assert_eq!(cpu.execute(), Ok(5));
    assert_eq!(cpu.bus().data[0x13], 0x80);
    assert_eq!(cpu.registers().p, 0xA4);
}

#[test]
fn shift_then_operate_on_a() {
    // LDA #$01; SLO $10; RLA $11; SRE $12; RRA $13
    let mut cpu = cpu_with_program(&[0xA9, 0x01, 0x07, 0x10, 0x27, 0x11, 0x47, 0x12, 0x67, 0x13]);
    cpu.bus_mut().data[0x10] = 0x81;
    cpu.bus_mut().data[0x11] = 0x40;
    cpu.bus_mut().data[0x12] = 0x03;
    cpu.bus_mut().data[0x13] = 0x02;
    cpu.execute().unwrap();
    cpu.bus_mut().accesses.clear();

    // ASL then ORA
    assert_eq!(cpu.execute(), Ok(5));
    assert_eq!(
        cpu.bus().accesses,
        vec![
            Access::Read(0x8002, 0x07),
            Access::Read(0x8003, 0x10),
            Access::Read(0x0010, 0x81),
            Access::Write(0x0010, 0x81),
            Access::Write(0x0010, 0x02),
        ]
    );
    assert_eq!(cpu.registers().a, 0x03);
    assert_eq!(cpu.registers().p, 0x25);

    // ROL (carry in) then AND
    assert_eq!(cpu.execute(), Ok(5));
    assert_eq!(cpu.bus().data[0x11], 0x81);
    assert_eq!(cpu.registers().a, 0x01);
    assert_eq!(cpu.registers().p, 0x24);

    // LSR then EOR
    assert_eq!(cpu.execute(), Ok(5));
    assert_eq!(cpu.bus().data[0x12], 0x01);
    assert_eq!(cpu.registers().a, 0x00);
    assert_eq!(cpu.registers().p, 0x27);

    // ROR (carry in) then ADC with the carry shifted out
    assert_eq!(cpu.execute(), Ok(5));
    assert_eq!(cpu.bus().data[0x13], 0x81);
    assert_eq!(cpu.registers().a, 0x81);
    assert_eq!(cpu.registers().p, 0xA4);
}

#[test]
fn isb_absolute_indexed_page_cross() {
    // SEC; LDA #$20; LDX #1; ISB $10FF,X
    let mut cpu = cpu_with_program(&[0x38, 0xA9, 0x20, 0xA2, 0x01, 0xFF, 0xFF, 0x10]);
    cpu.bus_mut().data[0x1100] = 0x0F;
    for _ in 0..3 {
        cpu.execute().unwrap();
    }
    cpu.bus_mut().accesses.clear();

    assert_eq!(cpu.execute(), Ok(7));
    assert_eq!(
        cpu.bus().accesses,
        vec![
            Access::Read(0x8005, 0xFF),
            Access::Read(0x8006, 0xFF),
            Access::Read(0x8007, 0x10),
            Access::Read(0x1000, 0x00),
            Access::Read(0x1100, 0x0F),
            Access::Write(0x1100, 0x0F),
            Access::Write(0x1100, 0x10),
        ]
    );
    assert_eq!(cpu.registers().a, 0x10);
    assert_eq!(cpu.registers().p, 0x25);
}

#[test]
fn and_combined_immediates() {
    // LDA #$F0; ANC #$81
    let mut cpu = cpu_with_program(&[0xA9, 0xF0, 0x0B, 0x81]);
    cpu.execute().unwrap();
    cpu.bus_mut().accesses.clear();

    assert_eq!(cpu.execute(), Ok(2));
    assert_eq!(
        cpu.bus().accesses,
        vec![Access::Read(0x8002, 0x0B), Access::Read(0x8003, 0x81)]
    );
    assert_eq!(cpu.registers().a, 0x80);
    // carry copies the negative flag
    assert_eq!(cpu.registers().p, 0xA5);

    // LDA #$03; ALR #$FE; ALR #$FF
    let mut cpu = cpu_with_program(&[0xA9, 0x03, 0x4B, 0xFE, 0x4B, 0xFF]);
    cpu.execute().unwrap();
    assert_eq!(cpu.execute(), Ok(2));
    assert_eq!(cpu.registers().a, 0x01);
    assert_eq!(cpu.registers().p, 0x24);
    assert_eq!(cpu.execute(), Ok(2));
    assert_eq!(cpu.registers().a, 0x00);
    assert_eq!(cpu.registers().p, 0x27);

    // SEC; LDA #$C0; ARR #$FF
    let mut cpu = cpu_with_program(&[0x38, 0xA9, 0xC0, 0x6B, 0xFF]);
    cpu.execute().unwrap();
    cpu.execute().unwrap();
    assert_eq!(cpu.execute(), Ok(2));
    assert_eq!(cpu.registers().a, 0xE0);
    // C from bit 6, V from bit 6 xor bit 5
    assert_eq!(cpu.registers().p, 0xA5);

    // LDA #$80; ARR #$FF
    let mut cpu = cpu_with_program(&[0xA9, 0x80, 0x6B, 0xFF]);
    cpu.execute().unwrap();
    assert_eq!(cpu.execute(), Ok(2));
    assert_eq!(cpu.registers().a, 0x40);
    assert_eq!(cpu.registers().p, 0x65);
}

#[test]
fn high_byte_and_stores_on_the_same_page() {
    // LDA #$FF; LDX #$F3; LDY #1; SHA $3000,Y; TAS $3010,Y; SHX $3020,Y; SHY $3000,X
    let mut cpu = cpu_with_program(&[
        0xA9, 0xFF, 0xA2, 0xF3, 0xA0, 0x01, 0x9F, 0x00, 0x30, 0x9B, 0x10, 0x30, 0x9E, 0x20,
        0x30, 0x9C, 0x00, 0x30,
    ]);
    for _ in 0..3 {
        cpu.execute().unwrap();
    }
    cpu.bus_mut().accesses.clear();

    assert_eq!(cpu.execute(), Ok(5));
    assert_eq!(
        cpu.bus().accesses,
        vec![
            Access::Read(0x8006, 0x9F),
            Access::Read(0x8007, 0x00),
            Access::Read(0x8008, 0x30),
            Access::Read(0x3001, 0x00),
            Access::Write(0x3001, 0x31),
        ]
    );

    assert_eq!(cpu.execute(), Ok(5));
    assert_eq!(cpu.registers().s, 0xF3);
    assert_eq!(cpu.bus().data[0x3011], 0x31);

    assert_eq!(cpu.execute(), Ok(5));
    assert_eq!(cpu.bus().data[0x3021], 0x31);

    assert_eq!(cpu.execute(), Ok(5));
    assert_eq!(cpu.bus().data[0x30F3], 0x01);
}

#[test]
fn high_byte_and_stores_replace_the_crossed_page() {
    // LDA #$0F; LDX #$0F; LDY #1; SHX $10FF,Y; SHA ($20),Y
    let mut cpu = cpu_with_program(&[
        0xA9, 0x0F, 0xA2, 0x0F, 0xA0, 0x01, 0x9E, 0xFF, 0x10, 0x93, 0x20,
    ]);
    cpu.bus_mut().data[0x20] = 0xFF;
    cpu.bus_mut().data[0x21] = 0x42;
    for _ in 0..3 {
        cpu.execute().unwrap();
    }
    cpu.bus_mut().accesses.clear();

    assert_eq!(cpu.execute(), Ok(5));
    assert_eq!(
        cpu.bus().accesses,
        vec![
            Access::Read(0x8006, 0x9E),
            Access::Read(0x8007, 0xFF),
            Access::Read(0x8008, 0x10),
            Access::Read(0x1000, 0x00),
            Access::Write(0x0100, 0x01),
        ]
    );
    assert_eq!(cpu.bus().data[0x1100], 0x00);
    cpu.bus_mut().accesses.clear();

    assert_eq!(cpu.execute(), Ok(6));
    assert_eq!(
        cpu.bus().accesses,
        vec![
            Access::Read(0x8009, 0x93),
            Access::Read(0x800A, 0x20),
            Access::Read(0x0020, 0xFF),
            Access::Read(0x0021, 0x42),
            Access::Read(0x4200, 0x00),
            Access::Write(0x0300, 0x03),
        ]
    );
}
