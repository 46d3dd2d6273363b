mod cartridge;
mod header;
mod loader;
mod mbc_trait;
mod rom;

pub use cartridge::Cartridge;
pub use header::Headers;
pub use loader::{LoadError, load_bootrom, load_rom, validate_extension};
pub use mbc_trait::Mbc;
pub use rom::RomOnly;
