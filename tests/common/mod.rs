//! Recording transport shared by the host integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use nus_uart_service::ble::AttributeTable;
use nus_uart_service::{ConnHandle, NusService, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkDown;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub conn: ConnHandle,
    pub attribute_index: usize,
    pub payload: Vec<u8>,
}

/// Transport double that records every call
#[derive(Default)]
pub struct RecordingTransport {
    pub registrations: Cell<usize>,
    pub notifications: RefCell<Vec<Notification>>,
    pub fail_sends: Cell<bool>,
}

impl RecordingTransport {
    pub fn calls(&self) -> usize {
        self.registrations.get() + self.notifications.borrow().len()
    }
}

impl Transport for RecordingTransport {
    type Error = LinkDown;

    fn register_service(&self, _table: &AttributeTable) -> Result<(), LinkDown> {
        self.registrations.set(self.registrations.get() + 1);
        Ok(())
    }

    fn send_notification(
        &self,
        conn: ConnHandle,
        attribute_index: usize,
        payload: &[u8],
    ) -> Result<(), LinkDown> {
        if self.fail_sends.get() {
            return Err(LinkDown);
        }
        self.notifications.borrow_mut().push(Notification {
            conn,
            attribute_index,
            payload: payload.to_vec(),
        });
        Ok(())
    }
}

pub type Service<H> = NusService<CriticalSectionRawMutex, RecordingTransport, H>;

pub fn service<H: nus_uart_service::DataHandler>(handler: H) -> Service<H> {
    let mut svc = Service::new(RecordingTransport::default());
    svc.initialize(Some(handler))
        .expect("initialisation with a handler succeeds");
    svc
}
