use log::{debug, warn};

/// Bitmap at 0x0104-0x0133 that the bootrom compares before handing over.
pub const NINTENDO_LOGO: [u8; 48] = [
    0xCE, 0xED, 0x66, 0x66, 0xCC, 0x0D, 0x00, 0x0B, 0x03, 0x73, 0x00, 0x83, 0x00, 0x0C, 0x00, 0x0D,
    0x00, 0x08, 0x11, 0x1F, 0x88, 0x89, 0x00, 0x0E, 0xDC, 0xCC, 0x6E, 0xE6, 0xDD, 0xDD, 0xD9, 0x99,
    0xBB, 0xBB, 0x67, 0x63, 0x6E, 0x0E, 0xEC, 0xCC, 0xDD, 0xDC, 0x99, 0x9F, 0xBB, 0xB9, 0x33, 0x3E,
];

const LOGO: std::ops::Range<usize> = 0x0104..0x0134;
const TITLE: std::ops::Range<usize> = 0x0134..0x0144;
const CART_TYPE: usize = 0x0147;
const ROM_SIZE: usize = 0x0148;
const RAM_SIZE: usize = 0x0149;
const HEADER_CHECKSUM: usize = 0x014D;
/// Bytes covered by the header checksum.
const CHECKSUMMED: std::ops::RangeInclusive<usize> = 0x0134..=0x014C;

/// One past the last header byte.
pub const HEADER_END: usize = 0x0150;

/// The parts of the cartridge header the machine acts on.
///
/// A bad logo or checksum is only reported; the image still runs, since
/// test ROMs often skip both.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Headers {
    pub title: Option<String>,
    /// Byte 0x0147, picks the mapper.
    pub cart_type: u8,
    pub rom_size_code: u8,
    pub ram_size_code: u8,
    pub logo_ok: bool,
    pub checksum_ok: bool,
}

impl Headers {
    /// Parses the header of `content`. Images too short to hold one give
    /// the all-zero default.
    pub fn new(content: &[u8]) -> Self {
        if content.len() < HEADER_END {
            return Self::default();
        }

        let headers = Self {
            title: title_of(&content[TITLE]),
            cart_type: content[CART_TYPE],
            rom_size_code: content[ROM_SIZE],
            ram_size_code: content[RAM_SIZE],
            logo_ok: content[LOGO] == NINTENDO_LOGO,
            checksum_ok: header_checksum(content) == content[HEADER_CHECKSUM],
        };

        if !headers.logo_ok {
            warn!("Cartridge logo does not match, a real DMG would not boot this");
        }
        if !headers.checksum_ok {
            warn!(
                "Header checksum 0x{:02X} does not match computed 0x{:02X}",
                content[HEADER_CHECKSUM],
                header_checksum(content)
            );
        }
        debug!("{:?}", headers);
        headers
    }

    pub fn is_valid(&self) -> bool {
        self.logo_ok && self.checksum_ok
    }

    /// ROM size declared by byte 0x0148: 32 KiB doubled per step.
    pub fn rom_size(&self) -> usize {
        0x8000 << self.rom_size_code.min(8)
    }

    pub fn rom_banks(&self) -> usize {
        self.rom_size() / 0x4000
    }

    /// External RAM declared by byte 0x0149, in bytes.
    pub fn ram_size(&self) -> usize {
        match self.ram_size_code {
            0x02 => 8 * 1024,
            0x03 => 32 * 1024,
            0x04 => 128 * 1024,
            0x05 => 64 * 1024,
            _ => 0,
        }
    }
}

/// x = x - byte - 1 over 0x0134..=0x014C.
fn header_checksum(content: &[u8]) -> u8 {
    content[CHECKSUMMED]
        .iter()
        .fold(0u8, |x, &b| x.wrapping_sub(b).wrapping_sub(1))
}

/// NUL-terminated ASCII. Blank titles are `None`.
fn title_of(bytes: &[u8]) -> Option<String> {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let title = String::from_utf8_lossy(&bytes[..end]).trim_end().to_string();
    (!title.is_empty()).then_some(title)
}
