//! Error types returned by the service engine.
//!
//! Transport failures are carried unchanged through the generic `E`
//! parameter so callers see exactly what their transport reported.

use core::fmt;

// ---------------------------------------------------------------------------
// Initialisation
// ---------------------------------------------------------------------------

/// Failure to bring up the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError<E> {
    /// No data handler was supplied; the service was not registered.
    MissingHandler,
    /// The service has already been registered with the transport.
    AlreadyInitialized,
    /// The transport refused the attribute table.
    Registration(E),
}

impl<E: fmt::Debug> fmt::Display for InitError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHandler => write!(f, "no data handler supplied"),
            Self::AlreadyInitialized => write!(f, "service already initialised"),
            Self::Registration(e) => write!(f, "service registration failed: {e:?}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Attribute access
// ---------------------------------------------------------------------------

/// Attribute protocol level rejection of a read or write.
///
/// The connection stays open; the transport reports [`AttrError::att_code`]
/// back to the peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrError {
    /// No attribute at the requested index.
    InvalidHandle,
    /// The attribute does not permit reads.
    ReadNotPermitted,
    /// The attribute does not permit writes.
    WriteNotPermitted,
    /// `offset + len` exceeds the attribute's capacity.
    InvalidOffset,
    /// The RX buffer is lent to the data handler and cannot be written.
    Unlikely,
}

impl AttrError {
    /// ATT error code sent to the peer
    pub fn att_code(&self) -> u8 {
        match self {
            Self::InvalidHandle => 0x01,
            Self::ReadNotPermitted => 0x02,
            Self::WriteNotPermitted => 0x03,
            Self::InvalidOffset => 0x07,
            Self::Unlikely => 0x0E,
        }
    }
}

impl fmt::Display for AttrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHandle => write!(f, "invalid handle"),
            Self::ReadNotPermitted => write!(f, "read not permitted"),
            Self::WriteNotPermitted => write!(f, "write not permitted"),
            Self::InvalidOffset => write!(f, "invalid offset"),
            Self::Unlikely => write!(f, "attribute busy"),
        }
    }
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// Failure to push a TX notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyError<E> {
    /// The peer has not enabled notifications. Expected and benign.
    NotSubscribed,
    /// The transport failed to send.
    Transport(E),
}

impl<E: fmt::Debug> fmt::Display for NotifyError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotSubscribed => write!(f, "peer not subscribed"),
            Self::Transport(e) => write!(f, "transport: {e:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_att_codes() {
        assert_eq!(AttrError::InvalidHandle.att_code(), 0x01);
        assert_eq!(AttrError::ReadNotPermitted.att_code(), 0x02);
        assert_eq!(AttrError::WriteNotPermitted.att_code(), 0x03);
        assert_eq!(AttrError::InvalidOffset.att_code(), 0x07);
        assert_eq!(AttrError::Unlikely.att_code(), 0x0E);
    }

    #[test]
    fn test_display() {
        let err: InitError<u8> = InitError::Registration(5);
        assert_eq!(format!("{}", err), "service registration failed: 5");

        let err: NotifyError<u8> = NotifyError::NotSubscribed;
        assert_eq!(format!("{}", err), "peer not subscribed");

        assert_eq!(format!("{}", AttrError::InvalidOffset), "invalid offset");
    }
}
