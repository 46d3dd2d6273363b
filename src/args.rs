use std::path::PathBuf;

use clap::Parser;

/// Runs a Game Boy ROM on the DMG CPU core.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// ROM image to insert (.gb or .gbc)
    #[arg(long)]
    pub load_rom: PathBuf,

    /// Optional bootrom mapped over 0x0000-0x00FF until 0xFF50 is written
    #[arg(long)]
    pub bootrom: Option<PathBuf>,

    // Optional log path, if none given, logs go to stderr.
    #[arg(long)]
    pub log_path: Option<PathBuf>,

    /// Stop after this many instructions instead of running forever
    #[arg(long)]
    pub max_instructions: Option<u64>,

    /// Run as fast as possible instead of ~59.7 frames per second
    #[arg(long)]
    pub no_pacing: bool,

    /// Echo bytes sent over the serial port to stdout
    #[arg(long)]
    pub serial: bool,

    // Log every CPU state in Gameboy Doctor format, one line per instruction.
    #[arg(long)]
    pub trace: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let args = Args::try_parse_from(["gameboy_core", "--load-rom", "game.gb"]).unwrap();
        assert_eq!(args.load_rom, PathBuf::from("game.gb"));
        assert!(args.bootrom.is_none());
        assert!(!args.no_pacing);
        assert_eq!(args.max_instructions, None);
    }

    #[test]
    fn test_parse_harness_flags() {
        let args = Args::try_parse_from([
            "gameboy_core",
            "--load-rom",
            "cpu_instrs.gb",
            "--max-instructions",
            "1000",
            "--no-pacing",
            "--serial",
            "--trace",
        ])
        .unwrap();
        assert_eq!(args.max_instructions, Some(1000));
        assert!(args.no_pacing && args.serial && args.trace);
    }

    #[test]
    fn test_rom_is_required() {
        assert!(Args::try_parse_from(["gameboy_core"]).is_err());
    }
}
