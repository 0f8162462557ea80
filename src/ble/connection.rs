//! Connection identity, link security and the security gate

use core::fmt;

/// Opaque transport handle of one link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnHandle(pub u16);

impl fmt::Display for ConnHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

/// Negotiated link protection, weakest to strongest
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SecurityLevel {
    /// Level 1: no encryption, no authentication
    Open = 1,
    /// Level 2: encrypted, unauthenticated (no MITM protection)
    Encrypted = 2,
    /// Level 3: encrypted and authenticated (MITM protection)
    Authenticated = 3,
    /// Level 4: authenticated LE Secure Connections with a 128-bit key
    SecureConnections = 4,
}

impl SecurityLevel {
    /// Map a level number as reported by the controller
    pub fn from_u8(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::Open),
            2 => Some(Self::Encrypted),
            3 => Some(Self::Authenticated),
            4 => Some(Self::SecureConnections),
            _ => None,
        }
    }
}

/// The single live link tracked by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub handle: ConnHandle,
    pub security: SecurityLevel,
}

impl Connection {
    /// A freshly accepted link, before any pairing
    pub fn new(handle: ConnHandle) -> Self {
        Self {
            handle,
            security: SecurityLevel::Open,
        }
    }
}

/// How the current security level is compared against the required one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityPolicy {
    /// Level must be at least this
    Minimum(SecurityLevel),
    /// Level must be exactly this
    Exact(SecurityLevel),
}

impl SecurityPolicy {
    pub fn permits(&self, level: SecurityLevel) -> bool {
        match *self {
            SecurityPolicy::Minimum(required) => level >= required,
            SecurityPolicy::Exact(required) => level == required,
        }
    }
}

impl Default for SecurityPolicy {
    fn default() -> Self {
        SecurityPolicy::Minimum(crate::config::security::REQUIRED_LEVEL)
    }
}
