use std::process::ExitCode;

use clap::Parser;

use gameboy_core::args::Args;
use gameboy_core::session::SessionOutcome;

fn main() -> ExitCode {
    let args = Args::parse();
    match gameboy_core::rom_exec(args) {
        Ok(SessionOutcome::Failed) => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
