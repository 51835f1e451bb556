use cartridge::Cartridge;
use nes_tester::{NesTester, TestError};

/// 16KB NROM with `program` at $C000, also the reset vector
fn tester_with_program(program: &[u8]) -> Result<NesTester, TestError> {
    let mut rom = vec![0x4E, 0x45, 0x53, 0x1A, 1, 1, 0, 0];
    rom.resize(16, 0);

    let mut prg = vec![0xEA; 0x4000];
    prg[..program.len()].copy_from_slice(program);
    prg[0x3FFC] = 0x00;
    prg[0x3FFD] = 0xC0;

    rom.extend(prg);
    rom.extend(vec![0; 0x2000]);

    NesTester::with_cartridge(Cartridge::from_reader(&rom[..])?)
}

#[test]
fn first_line_of_nestest() -> Result<(), TestError> {
    let tester = tester_with_program(&[0x4C, 0xF5, 0xC5])?;

    assert_eq!(
        tester.trace_line().to_string(),
        "C000  4C F5 C5  JMP $C5F5                       A:00 X:00 Y:00 P:24 SP:FD PPU:  0, 21 CYC:7"
    );

    Ok(())
}

#[test]
fn operands_and_effective_addresses() -> Result<(), TestError> {
    let program = [
        0xA2, 0x05, // LDX #$05
        0xB5, 0x10, // LDA $10,X
        0x8D, 0x00, 0x02, // STA $0200
        0xA1, 0x20, // LDA ($20,X)
        0x0A, // ASL A
        0x04, 0x33, // NOP $33
        0xD0, 0xF2, // BNE $C000
        0x6C, 0xFF, 0x02, // JMP ($02FF)
    ];
    let mut tester = tester_with_program(&program)?;

    let expected = [
        "LDX #$05",
        "LDA $10,X @ 15 = 00",
        "STA $0200 = 00",
        "LDA ($20,X) @ 25 = 0000 = 00",
        "ASL A",
        "NOP $33 = 00",
        "BNE $C000",
        "JMP ($02FF) = 0000",
    ];

    for disassembly in expected.iter() {
        let line = tester.trace_line();
        assert_eq!(line.disassembly(), *disassembly);

        match line.pc() {
            0xC004 => assert_eq!(
                line.to_string(),
                "C004  8D 00 02  STA $0200 = 00                  A:00 X:05 Y:00 P:26 SP:FD PPU:  0, 39 CYC:13"
            ),
            0xC00A => assert_eq!(
                line.to_string(),
                "C00A  04 33    *NOP $33 = 00                    A:00 X:05 Y:00 P:26 SP:FD PPU:  0, 75 CYC:25"
            ),
            _ => {}
        }

        tester.step()?;
    }

    Ok(())
}

#[test]
fn indirect_indexed_operand() -> Result<(), TestError> {
    let program = [
        0xA9, 0xF8, 0x85, 0x80, // pointer low
        0xA9, 0x02, 0x85, 0x81, // pointer high
        0xA9, 0x77, 0x8D, 0x08, 0x03, // target
        0xA0, 0x10, // LDY #$10
        0xB1, 0x80, // LDA ($80),Y
    ];
    let mut tester = tester_with_program(&program)?;

    for _ in 0..7 {
        tester.step()?;
    }

    let line = tester.trace_line();
    assert_eq!(line.pc(), 0xC00F);
    assert_eq!(line.disassembly(), "LDA ($80),Y = 02F8 @ 0308 = 77");

    Ok(())
}

#[test]
fn trace_to_writer() -> Result<(), TestError> {
    let mut tester = tester_with_program(&[0xE8, 0xE8, 0x4C, 0x00, 0xC0])?;
    let mut output = Vec::new();

    assert_eq!(tester.write_trace(&mut output, 4)?, 4);

    let output = String::from_utf8_lossy(&output);
    let lines = output.lines().collect::<Vec<&str>>();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("C000  E8        INX "));
    assert!(lines[1].contains("A:00 X:01"));
    assert!(lines[2].starts_with("C002  4C 00 C0  JMP $C000 "));
    assert!(lines[3].starts_with("C000"));
    assert!(lines[3].ends_with("CYC:14"));

    Ok(())
}

#[test]
fn trace_does_not_touch_registers() -> Result<(), TestError> {
    // LDA $2002
    let tester = tester_with_program(&[0xAD, 0x02, 0x20])?;

    let line = tester.trace_line();
    assert_eq!(line.disassembly(), "LDA $2002 = FF");
    assert_eq!(tester.nes().cpu().cycles(), 7);

    Ok(())
}
