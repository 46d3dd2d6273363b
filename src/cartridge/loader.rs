use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use log::info;

use crate::constants::GAME_BOY_FILE_EXT;

/// Colour titles share the DMG instruction set and header layout.
const COLOR_FILE_EXT: &str = "gbc";

/// Why an image could not be read from disk.
#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    MissingExtension,
    InvalidExtension {
        expected: &'static str,
        found: String,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(err) => write!(f, "cannot read image: {}", err),
            LoadError::MissingExtension => write!(f, "ROM path has no extension"),
            LoadError::InvalidExtension { expected, found } => {
                write!(f, "ROM extension '.{}' is not one of {}", found, expected)
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        LoadError::Io(err)
    }
}

/// Accepts `.gb` and `.gbc`, in any case.
pub fn validate_extension(path: &Path) -> Result<(), LoadError> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(LoadError::MissingExtension)?;

    if [GAME_BOY_FILE_EXT, COLOR_FILE_EXT]
        .iter()
        .any(|known| ext.eq_ignore_ascii_case(known))
    {
        Ok(())
    } else {
        Err(LoadError::InvalidExtension {
            expected: ".gb, .gbc",
            found: ext.to_string(),
        })
    }
}

pub fn load_rom(path: &Path) -> Result<Vec<u8>, LoadError> {
    validate_extension(path)?;

    let buffer = fs::read(path)?;
    info!("Loaded ROM {:?}, {} bytes", path, buffer.len());

    Ok(buffer)
}

/// Reads a bootrom blob. Any extension is accepted; the size is checked
/// when the image is mapped onto the bus.
pub fn load_bootrom(path: &Path) -> Result<Vec<u8>, LoadError> {
    let buffer = fs::read(path)?;
    info!("Loaded bootrom {:?}, {} bytes", path, buffer.len());
    Ok(buffer)
}
