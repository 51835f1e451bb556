mod tests;

use clap::Parser;
use display::{Frame, TV_HEIGHT, TV_WIDTH};
use nes_tester::{NesTester, TestError};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    process, thread,
    time::Duration,
};
use tracing_subscriber::filter::LevelFilter;

/// Runs an iNES ROM without a window
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// the `.nes` file to run
    rom: PathBuf,

    /// stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// print a nestest.log style line to stdout before every instruction
    #[arg(long)]
    trace: bool,

    /// start executing here instead of the reset vector (hex, `C000` for
    /// nestest)
    #[arg(long, value_parser = parse_hex_address)]
    start_pc: Option<u16>,

    /// stop after this many instructions
    #[arg(long)]
    max_instructions: Option<u64>,

    /// write the last complete frame as a binary PPM when done
    #[arg(long)]
    dump_frame: Option<PathBuf>,

    /// stop after this many seconds of wall time
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// `off`, `error`, `warn`, `info`, `debug` or `trace`
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn parse_hex_address(value: &str) -> Result<u16, String> {
    let value = value.trim_start_matches("0x").trim_start_matches('$');

    u16::from_str_radix(value, 16).map_err(|err| format!("invalid address {}: {}", value, err))
}

fn dump_frame(path: &Path, frame: &Frame) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);

    write!(file, "P6\n{} {}\n255\n", TV_WIDTH, TV_HEIGHT)?;
    file.write_all(&frame.to_rgb24())?;
    file.flush()
}

fn run(args: &Args, tester: &mut NesTester) -> Result<(), TestError> {
    let stop_handle = tester.nes().stop_handle();

    if let Some(seconds) = args.timeout_secs {
        let stop_handle = stop_handle.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_secs(seconds));
            log::warn!("timeout of {} seconds reached", seconds);
            stop_handle.stop();
        });
    }

    // nothing to count, the stop handle is the only way out
    if !args.trace && args.frames.is_none() && args.max_instructions.is_none() {
        return Ok(tester.nes_mut().run()?);
    }

    let last_frame = args.frames.map(|frames| tester.nes().frame_count() + frames);

    let stdout = io::stdout();
    let mut output = BufWriter::new(stdout.lock());
    let mut instructions = 0;

    while !stop_handle.is_stopped()
        && last_frame.map_or(true, |last_frame| tester.nes().frame_count() < last_frame)
        && args.max_instructions.map_or(true, |max| instructions < max)
    {
        if args.trace {
            writeln!(output, "{}", tester.trace_line())?;
        }

        tester.step()?;
        instructions += 1;
    }

    output.flush()?;

    log::info!(
        "executed {} instructions, {} frames",
        instructions,
        tester.nes().frame_count()
    );

    Ok(())
}

fn main() {
    let args = Args::parse();

    // also installs the bridge for the `log` records of the core crates
    if let Err(err) = tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(io::stderr)
        .try_init()
    {
        eprintln!("could not install the logger: {}", err);
    }

    let mut tester = match NesTester::new(&args.rom) {
        Ok(tester) => tester,
        Err(err) => {
            log::error!("could not start {}: {}", args.rom.display(), err);
            process::exit(1);
        }
    };

    if let Some(pc) = args.start_pc {
        tester.set_pc(pc);
    }

    let result = run(&args, &mut tester);

    if let Some(path) = &args.dump_frame {
        if let Err(err) = dump_frame(path, &tester.nes().frame_handle().latest()) {
            log::error!("could not write {}: {}", path.display(), err);
            process::exit(1);
        }
    }

    if let Err(err) = result {
        // jams and invalid opcodes carry their own PC and opcode
        log::error!(
            "{}, registers {:X?}",
            err,
            tester.nes().cpu().registers()
        );
        process::exit(1);
    }
}
