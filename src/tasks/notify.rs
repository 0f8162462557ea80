//! Periodic TX notification driver
//!
//! Cycles through the letters `A..Z`, pushing one per tick to the connected
//! peer. A letter is only consumed once it has actually been sent, so a peer
//! that subscribes late still starts at the letter where the driver left off.

use core::future::Future;

use embassy_sync::blocking_mutex::raw::RawMutex;
use log::{debug, info};

use crate::ble::connection::{SecurityLevel, SecurityPolicy};
use crate::ble::handler::DataHandler;
use crate::ble::service::NusService;
use crate::ble::traits::Transport;
use crate::config::driver::{ALPHABET_LEN, ALPHABET_START};
use crate::error::NotifyError;

/// Source of the driver's cadence
pub trait Pacer {
    /// Wait for the next tick.
    ///
    /// Returns `false` when the driver should stop.
    fn wait(&mut self) -> impl Future<Output = bool>;
}

#[cfg(feature = "embedded")]
impl Pacer for embassy_time::Ticker {
    async fn wait(&mut self) -> bool {
        self.next().await;
        true
    }
}

/// Ticker firing at the configured notification interval
#[cfg(feature = "embedded")]
pub fn default_ticker() -> embassy_time::Ticker {
    embassy_time::Ticker::every(embassy_time::Duration::from_millis(
        crate::config::driver::NOTIFY_INTERVAL_MS,
    ))
}

/// Result of one driver tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome<E> {
    /// The byte was handed to the transport
    Sent(u8),
    /// Nobody is connected
    NoConnection,
    /// The link's security level does not satisfy the policy
    InsufficientSecurity(SecurityLevel),
    /// The peer has not enabled notifications
    NotSubscribed,
    /// The transport refused the notification
    TransportFailed(E),
}

/// Drives TX notifications at a fixed cadence
pub struct NotificationDriver {
    index: usize,
    policy: SecurityPolicy,
}

impl NotificationDriver {
    pub fn new(policy: SecurityPolicy) -> Self {
        Self { index: 0, policy }
    }

    pub fn policy(&self) -> SecurityPolicy {
        self.policy
    }

    /// Byte the next successful tick will send
    pub fn next_byte(&self) -> u8 {
        ALPHABET_START + (self.index % ALPHABET_LEN) as u8
    }

    /// Attempt a single notification
    pub fn tick<M, T, H>(&mut self, service: &NusService<M, T, H>) -> TickOutcome<T::Error>
    where
        M: RawMutex,
        T: Transport,
        H: DataHandler,
    {
        let Some(conn) = service.connection() else {
            return TickOutcome::NoConnection;
        };

        if !self.policy.permits(conn.security) {
            debug!("NUS notify held: security {:?} vs {:?}", conn.security, self.policy);
            return TickOutcome::InsufficientSecurity(conn.security);
        }

        let byte = self.next_byte();
        match service.notify(conn.handle, byte) {
            Ok(()) => {
                info!("NUS sent {}", byte as char);
                self.index = (self.index + 1) % ALPHABET_LEN;
                TickOutcome::Sent(byte)
            }
            Err(NotifyError::NotSubscribed) => TickOutcome::NotSubscribed,
            Err(NotifyError::Transport(e)) => TickOutcome::TransportFailed(e),
        }
    }

    /// Tick on every pacer beat until the pacer stops.
    ///
    /// Returns the number of notifications sent.
    pub async fn run<M, T, H, P>(&mut self, service: &NusService<M, T, H>, pacer: &mut P) -> usize
    where
        M: RawMutex,
        T: Transport,
        H: DataHandler,
        P: Pacer,
    {
        let mut sent = 0;
        while pacer.wait().await {
            if let TickOutcome::Sent(_) = self.tick(service) {
                sent += 1;
            }
        }
        sent
    }
}

impl Default for NotificationDriver {
    fn default() -> Self {
        Self::new(SecurityPolicy::default())
    }
}
