//! Transport traits for abstraction and testability
//!
//! The service engine never talks to a radio directly. The BLE host stack
//! implements [`Transport`] to accept the attribute table and send
//! notifications, and feeds link events into [`ConnectionEvents`].

use crate::ble::attribute::AttributeTable;
use crate::ble::connection::{ConnHandle, SecurityLevel};

/// Outbound half of the BLE host stack
pub trait Transport {
    /// Error reported by the stack, passed through unchanged
    type Error: core::fmt::Debug;

    /// Make the attribute table visible to peers
    fn register_service(&self, table: &AttributeTable) -> Result<(), Self::Error>;

    /// Send `payload` as a notification of the attribute at `attribute_index`
    fn send_notification(
        &self,
        conn: ConnHandle,
        attribute_index: usize,
        payload: &[u8],
    ) -> Result<(), Self::Error>;
}

/// Link lifecycle events delivered by the BLE host stack
pub trait ConnectionEvents {
    fn connected(&self, conn: ConnHandle);

    /// `reason` is the HCI disconnect reason code
    fn disconnected(&self, conn: ConnHandle, reason: u8);

    fn security_changed(&self, conn: ConnHandle, level: SecurityLevel);
}
