//! Nordic UART Service (NUS) engine
//!
//! Owns the session state of the one supported link and implements the
//! attribute handlers of the service:
//! - RX value: written by the peer, read back on request, forwarded to the
//!   registered [`DataHandler`]
//! - TX value: notified one byte at a time once the peer has subscribed
//! - TX CCC descriptor: the peer's subscription switch
//!
//! Each piece of state (RX buffer, subscription, current connection) sits in
//! its own blocking mutex, so the engine can be shared between the BLE event
//! context and the notification driver.

use core::cell::{Cell, RefCell};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Vec;
use log::{debug, error, info, warn};

use crate::ble::attribute::{AttributeKind, AttributeTable, NUS_TABLE};
use crate::ble::buffer::{read_at, RxBuffer};
use crate::ble::connection::{ConnHandle, Connection, SecurityLevel};
use crate::ble::handler::DataHandler;
use crate::ble::subscription::{ClientConfig, SubscriptionState};
use crate::ble::traits::{ConnectionEvents, Transport};
use crate::config::{gatt, nus};
use crate::error::{AttrError, InitError, NotifyError};

/// RX buffer sized for the service
pub type NusBuffer = RxBuffer<{ nus::RX_BUFFER_SIZE }>;

/// Runtime options of the service engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Handle the transport assigns to attribute index 0
    pub first_handle: u16,
    /// Drop the peer's subscription when its link goes away, so a
    /// reconnecting peer has to write the CCC descriptor again
    pub reset_subscription_on_disconnect: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            first_handle: gatt::FIRST_HANDLE,
            reset_subscription_on_disconnect: true,
        }
    }
}

/// Nordic UART Service engine
pub struct NusService<M: RawMutex, T: Transport, H: DataHandler> {
    transport: T,
    config: ServiceConfig,
    table: AttributeTable,
    handler: Option<H>,
    rx: Mutex<M, RefCell<NusBuffer>>,
    cccd: Mutex<M, Cell<ClientConfig>>,
    link: Mutex<M, Cell<Option<Connection>>>,
}

impl<M: RawMutex, T: Transport, H: DataHandler> NusService<M, T, H> {
    /// Create an unregistered service with default configuration
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ServiceConfig::default())
    }

    pub fn with_config(transport: T, config: ServiceConfig) -> Self {
        Self {
            transport,
            config,
            table: NUS_TABLE,
            handler: None,
            rx: Mutex::new(RefCell::new(NusBuffer::new())),
            cccd: Mutex::new(Cell::new(ClientConfig::default())),
            link: Mutex::new(Cell::new(None)),
        }
    }

    /// Store the data handler and register the attribute table.
    ///
    /// Without a handler nothing is registered. Once this returns `Ok` the
    /// service is visible to peers.
    pub fn initialize(&mut self, handler: Option<H>) -> Result<(), InitError<T::Error>> {
        let Some(handler) = handler else {
            error!("NUS init failed: no data handler");
            return Err(InitError::MissingHandler);
        };

        if self.handler.is_some() {
            warn!("NUS init called twice, keeping the first handler");
            return Err(InitError::AlreadyInitialized);
        }

        self.transport.register_service(&self.table).map_err(|e| {
            error!("NUS service registration failed: {:?}", e);
            InitError::Registration(e)
        })?;

        self.handler = Some(handler);
        info!(
            "NUS registered: {} attributes from handle {:#06x}",
            self.table.len(),
            self.config.first_handle
        );
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.handler.is_some()
    }

    /// Handle a write to the RX characteristic value.
    ///
    /// Returns the number of bytes accepted. On success the data handler is
    /// called with exactly the written bytes before this returns.
    pub fn on_write(&self, conn: ConnHandle, offset: u16, data: &[u8]) -> Result<u16, AttrError> {
        let len = self
            .rx
            .lock(|cell| -> Result<usize, AttrError> {
                let len = cell
                    .try_borrow_mut()
                    .map_err(|_| AttrError::Unlikely)?
                    .write(offset, data)?
                    .len();

                let Some(handler) = &self.handler else {
                    debug!("RX write of {} bytes with no data handler", len);
                    return Ok(len);
                };

                // Same lock as the write, but only a shared borrow while the
                // handler runs: it may read or notify, a nested RX write is
                // refused.
                let buf = cell.try_borrow().map_err(|_| AttrError::Unlikely)?;
                let start = offset as usize;
                let view = buf
                    .as_slice()
                    .get(start..start + len)
                    .ok_or(AttrError::Unlikely)?;
                handler.on_data(conn, view);
                Ok(len)
            })
            .map_err(|e| {
                warn!(
                    "RX write rejected ({}): offset({}) len({}) capacity({})",
                    e,
                    offset,
                    data.len(),
                    nus::RX_BUFFER_SIZE
                );
                e
            })?;

        Ok(len as u16)
    }

    /// Handle a read of the RX characteristic value
    pub fn on_read(&self, offset: u16, max_len: u16) -> Vec<u8, { nus::RX_BUFFER_SIZE }> {
        debug!("RX read: offset {} max_len {}", offset, max_len);
        let mut out = [0u8; nus::RX_BUFFER_SIZE];
        let limit = (max_len as usize).min(out.len());
        let count = self.rx.lock(|cell| match cell.try_borrow() {
            Ok(buf) => buf.read(offset, &mut out[..limit]),
            Err(_) => 0,
        });
        Vec::from_slice(&out[..count]).unwrap_or_default()
    }

    /// Handle a write to the TX CCC descriptor. Never fails.
    pub fn on_cccd_write(&self, data: &[u8]) {
        let cfg = ClientConfig::from_write(data);
        self.cccd.lock(|cell| cell.set(cfg));
        info!("NUS CCC value {:#06x}: notifications {:?}", cfg.value(), cfg.state());
    }

    /// Route an attribute write by table index
    pub fn write_attribute(
        &self,
        conn: ConnHandle,
        index: usize,
        offset: u16,
        data: &[u8],
    ) -> Result<u16, AttrError> {
        let attr = self.table.get(index).ok_or(AttrError::InvalidHandle)?;
        if !attr.is_writable() {
            return Err(AttrError::WriteNotPermitted);
        }

        match attr.kind {
            AttributeKind::RxValue(_) => self.on_write(conn, offset, data),
            AttributeKind::ClientConfig => {
                self.on_cccd_write(data);
                Ok(u16::try_from(data.len()).unwrap_or(u16::MAX))
            }
            _ => Err(AttrError::WriteNotPermitted),
        }
    }

    /// Route an attribute read by table index into `out`.
    ///
    /// At most `out.len()` bytes are copied; an offset past the end of the
    /// value yields an empty read.
    pub fn read_attribute(&self, index: usize, offset: u16, out: &mut [u8]) -> Result<usize, AttrError> {
        let attr = self.table.get(index).ok_or(AttrError::InvalidHandle)?;
        if !attr.is_readable() {
            return Err(AttrError::ReadNotPermitted);
        }

        match attr.kind {
            AttributeKind::RxValue(_) => self.rx.lock(|cell| {
                cell.try_borrow()
                    .map(|buf| buf.read(offset, out))
                    .map_err(|_| AttrError::Unlikely)
            }),
            AttributeKind::ClientConfig => {
                let value = self.cccd.lock(|cell| cell.get()).to_le_bytes();
                Ok(read_at(&value, offset, out))
            }
            AttributeKind::PrimaryService(_) | AttributeKind::Characteristic { .. } => {
                let value = self
                    .table
                    .declaration_value(index, self.config.first_handle)
                    .ok_or(AttrError::InvalidHandle)?;
                Ok(read_at(&value, offset, out))
            }
            AttributeKind::TxValue(_) => Err(AttrError::ReadNotPermitted),
        }
    }

    /// Send one byte to `conn` as a TX notification.
    ///
    /// Fails with [`NotifyError::NotSubscribed`] without touching the
    /// transport unless the peer has enabled notifications.
    pub fn notify(&self, conn: ConnHandle, byte: u8) -> Result<(), NotifyError<T::Error>> {
        if self.subscription() != SubscriptionState::Enabled {
            debug!("NUS notify skipped: peer not subscribed");
            return Err(NotifyError::NotSubscribed);
        }

        let payload: [u8; nus::TX_PAYLOAD_SIZE] = [byte];
        self.transport
            .send_notification(conn, self.table.tx_value_index(), &payload)
            .map_err(|e| {
                warn!("NUS notify to {} failed: {:?}", conn, e);
                NotifyError::Transport(e)
            })
    }

    pub fn subscription(&self) -> SubscriptionState {
        self.cccd.lock(|cell| cell.get()).state()
    }

    /// The current link, if any
    pub fn connection(&self) -> Option<Connection> {
        self.link.lock(|cell| cell.get())
    }

    /// Negotiated security of the current link
    pub fn security_level(&self) -> Option<SecurityLevel> {
        self.connection().map(|c| c.security)
    }

    pub fn table(&self) -> &AttributeTable {
        &self.table
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn reset_subscription(&self) {
        self.cccd.lock(|cell| cell.set(ClientConfig::default()));
    }
}

impl<M: RawMutex, T: Transport, H: DataHandler> ConnectionEvents for NusService<M, T, H> {
    fn connected(&self, conn: ConnHandle) {
        let previous = self.link.lock(|cell| cell.replace(Some(Connection::new(conn))));
        info!("Connected {}", conn);

        if let Some(prev) = previous {
            if prev.handle != conn {
                warn!("Connection {} replaced by {}", prev.handle, conn);
                if self.config.reset_subscription_on_disconnect {
                    self.reset_subscription();
                }
            }
        }
    }

    fn disconnected(&self, conn: ConnHandle, reason: u8) {
        info!("Disconnected {} (reason {:#04x})", conn, reason);

        let was_current = self.link.lock(|cell| match cell.get() {
            Some(current) if current.handle == conn => {
                cell.set(None);
                true
            }
            _ => false,
        });

        if !was_current {
            warn!("Disconnect for {} which is not the current connection", conn);
            return;
        }

        if self.config.reset_subscription_on_disconnect {
            self.reset_subscription();
        }
    }

    fn security_changed(&self, conn: ConnHandle, level: SecurityLevel) {
        let updated = self.link.lock(|cell| match cell.get() {
            Some(mut current) if current.handle == conn => {
                current.security = level;
                cell.set(Some(current));
                true
            }
            _ => false,
        });

        if updated {
            info!("Security changed: {} level {:?}", conn, level);
        } else {
            warn!("Security change for {} which is not the current connection", conn);
        }
    }
}
