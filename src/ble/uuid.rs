//! Attribute UUIDs

use core::fmt;
use heapless::Vec;

/// A 16-bit SIG assigned or 128-bit vendor UUID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uuid {
    Uuid16(u16),
    Uuid128(u128),
}

impl Uuid {
    /// Little-endian wire encoding, as carried in declarations
    pub fn to_le_bytes(&self) -> Vec<u8, 16> {
        // Both encodings fit in 16 bytes, so the fallback is never taken
        match self {
            Uuid::Uuid16(v) => Vec::from_slice(&v.to_le_bytes()),
            Uuid::Uuid128(v) => Vec::from_slice(&v.to_le_bytes()),
        }
        .unwrap_or_default()
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Uuid::Uuid16(v) => write!(f, "{v:04x}"),
            Uuid::Uuid128(v) => write!(
                f,
                "{:08x}-{:04x}-{:04x}-{:04x}-{:012x}",
                (v >> 96) as u32,
                (v >> 80) as u16,
                (v >> 64) as u16,
                (v >> 48) as u16,
                v & 0xFFFF_FFFF_FFFF,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::nus;

    #[test]
    fn test_uuid16_le() {
        assert_eq!(Uuid::Uuid16(0x2902).to_le_bytes().as_slice(), &[0x02, 0x29]);
    }

    #[test]
    fn test_uuid128_le_matches_advertised_bytes() {
        let bytes = Uuid::Uuid128(nus::SERVICE_UUID).to_le_bytes();
        assert_eq!(
            bytes.as_slice(),
            &[
                0x9E, 0xCA, 0xDC, 0x24, 0x0E, 0xE5, 0xA9, 0xE0, 0x93, 0xF3, 0xA3, 0xB5, 0x01,
                0x00, 0x40, 0x6E
            ]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            format!("{}", Uuid::Uuid128(nus::RX_UUID)),
            "6e400002-b5a3-f393-e0a9-e50e24dcca9e"
        );
        assert_eq!(format!("{}", Uuid::Uuid16(0x2800)), "2800");
    }
}
