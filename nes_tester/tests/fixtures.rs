use cpu6502::CPURegisters;
use nes_tester::{
    fixture::{is_exactly_modeled, load_fixtures, parse_fixtures, run_fixture, Fixture},
    TestError,
};
use std::{fs, path::Path};

fn run_all(json: &str) -> Result<(), TestError> {
    let fixtures = parse_fixtures(json)?;
    assert!(!fixtures.is_empty());

    for fixture in &fixtures {
        run_fixture(fixture)?;
    }

    Ok(())
}

#[test]
fn state_registers_are_parsed() -> Result<(), TestError> {
    let fixtures = parse_fixtures(
        r#"[{
            "name": "ea",
            "initial": {"pc": 49152, "s": 250, "a": 1, "x": 2, "y": 3, "p": 100, "ram": [[49152, 234]]},
            "final":   {"pc": 49153, "s": 250, "a": 1, "x": 2, "y": 3, "p": 100, "ram": []},
            "cycles":  [[49152, 234, "read"], [49153, 0, "read"]]
        }]"#,
    )?;

    assert_eq!(
        fixtures[0].initial.registers,
        CPURegisters {
            pc: 0xC000,
            s: 0xFA,
            a: 1,
            x: 2,
            y: 3,
            p: 0x64,
        }
    );
    assert_eq!(fixtures[0].initial.ram, vec![(0xC000, 0xEA)]);
    assert_eq!(fixtures[0].final_state.registers.pc, 0xC001);

    run_fixture(&fixtures[0])
}

#[test]
fn immediate_load() -> Result<(), TestError> {
    run_all(
        r#"[{
            "name": "a9 42",
            "initial": {"pc": 512, "s": 253, "a": 0, "x": 0, "y": 0, "p": 36, "ram": [[512, 169], [513, 66]]},
            "final":   {"pc": 514, "s": 253, "a": 66, "x": 0, "y": 0, "p": 36, "ram": [[512, 169], [513, 66]]},
            "cycles":  [[512, 169, "read"], [513, 66, "read"]]
        }]"#,
    )
}

#[test]
fn read_modify_write_writes_twice() -> Result<(), TestError> {
    run_all(
        r#"[{
            "name": "e6 10",
            "initial": {"pc": 512, "s": 253, "a": 0, "x": 0, "y": 0, "p": 36, "ram": [[512, 230], [513, 16], [16, 127]]},
            "final":   {"pc": 514, "s": 253, "a": 0, "x": 0, "y": 0, "p": 164, "ram": [[16, 128]]},
            "cycles":  [
                [512, 230, "read"], [513, 16, "read"], [16, 127, "read"],
                [16, 127, "write"], [16, 128, "write"]
            ]
        }]"#,
    )
}

#[test]
fn indexed_store_reads_before_fixing_the_high_byte() -> Result<(), TestError> {
    run_all(
        r#"[{
            "name": "9d f0 12",
            "initial": {"pc": 512, "s": 253, "a": 85, "x": 32, "y": 0, "p": 36, "ram": [[512, 157], [513, 240], [514, 18]]},
            "final":   {"pc": 515, "s": 253, "a": 85, "x": 32, "y": 0, "p": 36, "ram": [[4880, 85]]},
            "cycles":  [
                [512, 157, "read"], [513, 240, "read"], [514, 18, "read"],
                [4624, 0, "read"], [4880, 85, "write"]
            ]
        }]"#,
    )
}

#[test]
fn indirect_jump_wraps_inside_the_page() -> Result<(), TestError> {
    run_all(
        r#"[{
            "name": "6c ff 02",
            "initial": {"pc": 512, "s": 253, "a": 0, "x": 0, "y": 0, "p": 36, "ram": [[512, 108], [513, 255], [514, 2], [767, 52]]},
            "final":   {"pc": 27700, "s": 253, "a": 0, "x": 0, "y": 0, "p": 36, "ram": []},
            "cycles":  [
                [512, 108, "read"], [513, 255, "read"], [514, 2, "read"],
                [767, 52, "read"], [512, 108, "read"]
            ]
        }]"#,
    )
}

#[test]
fn branch_across_a_page() -> Result<(), TestError> {
    run_all(
        r#"[{
            "name": "d0 05",
            "initial": {"pc": 765, "s": 253, "a": 0, "x": 0, "y": 0, "p": 36, "ram": [[765, 208], [766, 5]]},
            "final":   {"pc": 772, "s": 253, "a": 0, "x": 0, "y": 0, "p": 36, "ram": []},
            "cycles":  [
                [765, 208, "read"], [766, 5, "read"], [767, 0, "read"], [516, 0, "read"]
            ]
        }]"#,
    )
}

#[test]
fn status_push_sets_break() -> Result<(), TestError> {
    run_all(
        r#"[{
            "name": "08",
            "initial": {"pc": 512, "s": 253, "a": 0, "x": 0, "y": 0, "p": 36, "ram": [[512, 8]]},
            "final":   {"pc": 513, "s": 252, "a": 0, "x": 0, "y": 0, "p": 36, "ram": [[509, 52]]},
            "cycles":  [[512, 8, "read"], [513, 0, "read"], [509, 52, "write"]]
        }]"#,
    )
}

#[test]
fn unofficial_load_to_a_and_x() -> Result<(), TestError> {
    run_all(
        r#"[{
            "name": "a7 10",
            "initial": {"pc": 512, "s": 253, "a": 0, "x": 0, "y": 0, "p": 38, "ram": [[512, 167], [513, 16], [16, 128]]},
            "final":   {"pc": 514, "s": 253, "a": 128, "x": 128, "y": 0, "p": 164, "ram": []},
            "cycles":  [[512, 167, "read"], [513, 16, "read"], [16, 128, "read"]]
        }]"#,
    )
}

#[test]
fn mismatch_is_reported() -> Result<(), TestError> {
    let fixtures = parse_fixtures(
        r#"[{
            "name": "a9 42",
            "initial": {"pc": 512, "s": 253, "a": 0, "x": 0, "y": 0, "p": 36, "ram": [[512, 169], [513, 66]]},
            "final":   {"pc": 514, "s": 253, "a": 67, "x": 0, "y": 0, "p": 36, "ram": []},
            "cycles":  [[512, 169, "read"], [513, 66, "read"]]
        }]"#,
    )?;

    assert!(matches!(
        run_fixture(&fixtures[0]),
        Err(TestError::Fixture(_))
    ));

    Ok(())
}

#[test]
fn malformed_json() {
    assert!(matches!(
        parse_fixtures(r#"[{"name": "a9 42"}]"#),
        Err(TestError::Fixture(_))
    ));
}

#[test]
fn unmodeled_opcodes() {
    // JAM, ANE, LXA, SHA, SHX, SHY and TAS
    for &opcode in &[0x02, 0x8B, 0xAB, 0x9F, 0x9E, 0x9C, 0x9B] {
        assert!(!is_exactly_modeled(opcode), "{:02X}", opcode);
    }

    for &opcode in &[0xA9, 0xA7, 0xEB, 0x6C, 0x00] {
        assert!(is_exactly_modeled(opcode), "{:02X}", opcode);
    }
}

fn opcode_of(fixture: &Fixture) -> Option<u8> {
    fixture
        .initial
        .ram
        .iter()
        .find(|(address, _)| *address == fixture.initial.registers.pc)
        .map(|&(_, data)| data)
}

/// The single step suite, one `xx.json` file per opcode, placed in
/// `tests/fixtures/nes6502`
#[test]
#[ignore]
fn single_step_suite() -> Result<(), TestError> {
    let directory = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/nes6502");

    let mut paths = fs::read_dir(&directory)?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().map_or(false, |extension| extension == "json"))
        .collect::<Vec<_>>();
    paths.sort();

    let mut failures = 0;
    for path in paths {
        for fixture in load_fixtures(&path)? {
            if !opcode_of(&fixture).map_or(false, is_exactly_modeled) {
                continue;
            }

            if let Err(err) = run_fixture(&fixture) {
                println!("{}", err);
                failures += 1;
            }
        }
    }

    assert_eq!(failures, 0);

    Ok(())
}
