//! Single instruction fixtures in the JSON format of the public 6502
//! single-step suites.
//!
//! ```json
//! {
//!   "name": "a9 42 00",
//!   "initial": {"pc": 512, "s": 253, "a": 0, "x": 0, "y": 0, "p": 36, "ram": [[512, 169], [513, 66]]},
//!   "final":   {"pc": 514, "s": 253, "a": 66, "x": 0, "y": 0, "p": 36, "ram": [[512, 169], [513, 66]]},
//!   "cycles":  [[512, 169, "read"], [513, 66, "read"]]
//! }
//! ```

use crate::TestError;
use common::{interconnection::PPUCPUConnection, BusError};
use cpu6502::{
    instruction::{Instruction, Opcode},
    CPUBusTrait, CPURegisters, CPU6502,
};
use serde::Deserialize;
use std::{fs::File, io::BufReader, path::Path};

#[derive(Deserialize, Debug, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum BusOperationKind {
    Read,
    Write,
}

/// (address, value, kind), one per CPU cycle
pub type BusOperation = (u16, u8, BusOperationKind);

/// the register names of the JSON (`pc`, `s`, `a`, `x`, `y`, `p`) are the
/// fields of [`CPURegisters`]
#[derive(Deserialize, Debug, Clone)]
pub struct FixtureState {
    #[serde(flatten)]
    pub registers: CPURegisters,
    pub ram: Vec<(u16, u8)>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Fixture {
    pub name: String,
    pub initial: FixtureState,
    #[serde(rename = "final")]
    pub final_state: FixtureState,
    pub cycles: Vec<BusOperation>,
}

/// Flat 64KB of RAM that logs every access, nothing is memory mapped
pub struct FixtureBus {
    memory: Vec<u8>,
    operations: Vec<BusOperation>,
}

impl FixtureBus {
    pub fn new() -> Self {
        Self {
            memory: vec![0; 0x10000],
            operations: Vec::new(),
        }
    }

    pub fn operations(&self) -> &[BusOperation] {
        &self.operations
    }

    pub fn set(&mut self, address: u16, data: u8) {
        self.memory[address as usize] = data;
    }
}

impl Default for FixtureBus {
    fn default() -> Self {
        Self::new()
    }
}

impl CPUBusTrait for FixtureBus {
    fn read(&mut self, address: u16) -> Result<u8, BusError> {
        let data = self.memory[address as usize];
        self.operations
            .push((address, data, BusOperationKind::Read));

        Ok(data)
    }

    fn write(&mut self, address: u16, data: u8) -> Result<(), BusError> {
        self.memory[address as usize] = data;
        self.operations
            .push((address, data, BusOperationKind::Write));

        Ok(())
    }

    fn peek(&self, address: u16) -> u8 {
        self.memory[address as usize]
    }
}

impl PPUCPUConnection for FixtureBus {
    fn is_nmi_pin_set(&self) -> bool {
        false
    }

    fn clear_nmi_pin(&mut self) {}

    fn is_dma_request(&self) -> bool {
        false
    }

    fn clear_dma_request(&mut self) {}

    fn dma_address(&self) -> u8 {
        0
    }
}

pub fn parse_fixtures(json: &str) -> Result<Vec<Fixture>, TestError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_fixtures<P: AsRef<Path>>(path: P) -> Result<Vec<Fixture>, TestError> {
    let file = File::open(path)?;

    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// `false` for the opcodes this CPU does not model exactly: the halting
/// ones, ANE and LXA (rejected) and the unstable high-byte stores
pub fn is_exactly_modeled(opcode: u8) -> bool {
    !matches!(
        Instruction::from_byte(opcode).opcode,
        Opcode::Jam
            | Opcode::Ane
            | Opcode::Lxa
            | Opcode::Sha
            | Opcode::Shx
            | Opcode::Shy
            | Opcode::Tas
    )
}

/// Runs one instruction from the initial state and compares registers,
/// memory and every bus access with the final state
pub fn run_fixture(fixture: &Fixture) -> Result<(), TestError> {
    let mut bus = FixtureBus::new();
    for &(address, data) in &fixture.initial.ram {
        bus.set(address, data);
    }

    let mut cpu = CPU6502::new(bus);
    cpu.set_registers(fixture.initial.registers);

    cpu.execute()
        .map_err(|err| TestError::Fixture(format!("{}: {}", fixture.name, err)))?;

    // bits 4 and 5 are not stored in the register
    let mut registers = cpu.registers();
    registers.p |= 0x30;
    let mut expected = fixture.final_state.registers;
    expected.p |= 0x30;

    if registers != expected {
        return Err(TestError::Fixture(format!(
            "{}: registers {:X?}, expected {:X?}",
            fixture.name, registers, expected
        )));
    }

    for &(address, data) in &fixture.final_state.ram {
        let actual = cpu.bus().peek(address);
        if actual != data {
            return Err(TestError::Fixture(format!(
                "{}: memory {:04X} = {:02X}, expected {:02X}",
                fixture.name, address, actual, data
            )));
        }
    }

    let operations = cpu.bus().operations();
    if operations != &fixture.cycles[..] {
        return Err(TestError::Fixture(format!(
            "{}: bus operations {:X?}, expected {:X?}",
            fixture.name, operations, fixture.cycles
        )));
    }

    Ok(())
}
