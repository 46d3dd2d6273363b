pub mod args;
pub mod cartridge;
pub mod constants;
pub mod cpu;
pub mod error;
pub mod gameboy;
pub mod joypad;
pub mod mmu;
pub mod opcodes;
pub mod ppu;
pub mod serial;
pub mod session;
pub mod timer;

use std::io;
use std::io::Write;
use std::path::PathBuf;

use log::info;

pub use error::EmulatorError;
pub use gameboy::{GameBoy, StepControl, StepObserver, StepReport};

use serial::SerialInterceptor;
use session::{Session, SessionOutcome};

pub fn setup_logging(log_path: &Option<PathBuf>) -> Result<(), io::Error> {
    let env = env_logger::Env::default().default_filter_or("info");
    let mut builder = env_logger::Builder::from_env(env);
    // Message only, so Doctor traces can be diffed directly.
    builder.format(|buf, record| writeln!(buf, "{}", record.args()));

    // If a path is provided, redirect output to the file
    if let Some(path) = log_path {
        let file = std::fs::File::create(path)?;
        // We use Target::Pipe to send logs to the file instead of stderr
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

/// Loads the ROM (and bootrom) named by `args` and runs it.
/// Returns when a test verdict is printed over serial, when
/// `--max-instructions` is reached or on a setup error.
pub fn rom_exec(args: args::Args) -> Result<SessionOutcome, EmulatorError> {
    setup_logging(&args.log_path)?;

    let rom = cartridge::load_rom(&args.load_rom)?;
    let mut gameboy = GameBoy::from_rom(rom)?;
    info!(
        "Running '{}'",
        gameboy.cartridge()?.headers.title.as_deref().unwrap_or("untitled")
    );

    if let Some(path) = &args.bootrom {
        gameboy.set_bootrom(cartridge::load_bootrom(path)?)?;
    }

    Ok(run_session(&mut gameboy, &args))
}

/// Drives an assembled machine the way the binary does: serial capture,
/// optional Doctor trace and limit, stopping on a "Passed"/"Failed" verdict.
pub fn run_session(gameboy: &mut GameBoy, args: &args::Args) -> SessionOutcome {
    gameboy.set_pacing(!args.no_pacing);

    let serial = SerialInterceptor::new().with_echo(args.serial);
    let output = serial.output();
    gameboy.add_interceptor(serial);

    let mut session = Session::new()
        .with_trace(args.trace)
        .with_limit(args.max_instructions)
        .stop_on_serial_verdict(output);
    gameboy.run_with(&mut session);
    info!(
        "Stopped after {} instructions, {} cycles: {:?}",
        session.executed(),
        gameboy.total_cycles(),
        session.outcome()
    );
    session.outcome()
}
