use std::fmt;
use std::io;

use crate::cartridge::LoadError;
use crate::constants::BOOTROM_SIZE;

/// Failures surfaced while assembling or running a machine.
#[derive(Debug)]
pub enum EmulatorError {
    Load(LoadError),
    Io(io::Error),
    MissingCartridge,
    BootromTooLarge { len: usize },
    EmptyBootrom,
    RomTooSmall { len: usize },
    UnsupportedCartridge { cart_type: u8 },
}

impl fmt::Display for EmulatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmulatorError::Load(err) => write!(f, "Failed to load ROM: {}", err),
            EmulatorError::Io(err) => write!(f, "I/O error: {}", err),
            EmulatorError::MissingCartridge => write!(f, "No cartridge inserted"),
            EmulatorError::BootromTooLarge { len } => write!(
                f,
                "Bootrom is {} bytes, at most {} fit the overlay",
                len, BOOTROM_SIZE
            ),
            EmulatorError::EmptyBootrom => write!(f, "Bootrom is empty"),
            EmulatorError::RomTooSmall { len } => {
                write!(f, "ROM size {} too small for a cartridge header", len)
            }
            EmulatorError::UnsupportedCartridge { cart_type } => {
                write!(f, "Unsupported cartridge type: 0x{:02X}", cart_type)
            }
        }
    }
}

impl std::error::Error for EmulatorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EmulatorError::Load(LoadError::Io(err)) | EmulatorError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LoadError> for EmulatorError {
    fn from(err: LoadError) -> Self {
        EmulatorError::Load(err)
    }
}

impl From<io::Error> for EmulatorError {
    fn from(err: io::Error) -> Self {
        EmulatorError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_bootrom_too_large() {
        let err = EmulatorError::BootromTooLarge { len: 0x101 };
        assert_eq!(
            err.to_string(),
            "Bootrom is 257 bytes, at most 256 fit the overlay"
        );
    }

    #[test]
    fn test_load_error_is_wrapped() {
        let err: EmulatorError = LoadError::MissingExtension.into();
        assert!(matches!(err, EmulatorError::Load(LoadError::MissingExtension)));
        assert_eq!(err.to_string(), "Failed to load ROM: ROM path has no extension");
    }

    #[test]
    fn test_unsupported_cartridge_display() {
        let err = EmulatorError::UnsupportedCartridge { cart_type: 0x1B };
        assert_eq!(err.to_string(), "Unsupported cartridge type: 0x1B");
    }
}
