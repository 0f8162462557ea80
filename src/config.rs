//! Service configuration constants for the Nordic UART Service peripheral

/// Nordic UART Service identity and buffer sizes
pub mod nus {
    /// Service UUID: 6E400001-B5A3-F393-E0A9-E50E24DCCA9E
    pub const SERVICE_UUID: u128 = 0x6E400001_B5A3_F393_E0A9_E50E24DCCA9E;

    /// RX characteristic UUID (peer writes here)
    pub const RX_UUID: u128 = 0x6E400002_B5A3_F393_E0A9_E50E24DCCA9E;

    /// TX characteristic UUID (we notify here)
    pub const TX_UUID: u128 = 0x6E400003_B5A3_F393_E0A9_E50E24DCCA9E;

    /// Backing buffer size of the RX characteristic value
    pub const RX_BUFFER_SIZE: usize = 26;

    /// Bytes carried by one TX notification
    pub const TX_PAYLOAD_SIZE: usize = 1;
}

/// Generic attribute protocol constants
pub mod gatt {
    /// Handle assigned to the first attribute of the service
    pub const FIRST_HANDLE: u16 = 0x0001;

    /// Primary service declaration attribute type
    pub const PRIMARY_SERVICE_UUID: u16 = 0x2800;

    /// Characteristic declaration attribute type
    pub const CHARACTERISTIC_UUID: u16 = 0x2803;

    /// Client characteristic configuration descriptor attribute type
    pub const CCCD_UUID: u16 = 0x2902;

    /// CCC value enabling notifications
    pub const CCCD_NOTIFY: u16 = 0x0001;

    /// CCC value enabling indications
    pub const CCCD_INDICATE: u16 = 0x0002;
}

/// Link security defaults
pub mod security {
    use crate::ble::SecurityLevel;

    /// Level the notification driver waits for before sending
    pub const REQUIRED_LEVEL: SecurityLevel = SecurityLevel::Open;
}

/// Periodic notification driver defaults
pub mod driver {
    /// Delay between notification attempts
    pub const NOTIFY_INTERVAL_MS: u64 = 1000;

    /// First byte of the cycled alphabet
    pub const ALPHABET_START: u8 = b'A';

    /// Number of letters cycled before wrapping
    pub const ALPHABET_LEN: usize = 26;
}
