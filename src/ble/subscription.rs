//! TX notification subscription, driven by the CCC descriptor

use crate::config::gatt::CCCD_NOTIFY;

/// Whether the peer has enabled TX notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubscriptionState {
    #[default]
    Disabled,
    Enabled,
}

/// Last configuration written to the CCC descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClientConfig {
    value: u16,
}

impl ClientConfig {
    /// Decode a descriptor write.
    ///
    /// The value is a little-endian `u16`; missing bytes read as zero and
    /// anything past the second byte is ignored. Every write is accepted.
    pub fn from_write(data: &[u8]) -> Self {
        let lo = data.first().copied().unwrap_or(0);
        let hi = data.get(1).copied().unwrap_or(0);
        Self {
            value: u16::from_le_bytes([lo, hi]),
        }
    }

    pub fn value(&self) -> u16 {
        self.value
    }

    /// Only the exact notify sentinel enables; indicate, disable and
    /// anything else leave notifications off.
    pub fn state(&self) -> SubscriptionState {
        if self.value == CCCD_NOTIFY {
            SubscriptionState::Enabled
        } else {
            SubscriptionState::Disabled
        }
    }

    pub fn to_le_bytes(&self) -> [u8; 2] {
        self.value.to_le_bytes()
    }
}
