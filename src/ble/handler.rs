//! Application-side receiver of RX writes

use crate::ble::connection::ConnHandle;

/// Called once per accepted RX write with exactly the bytes just written.
///
/// Runs synchronously in the event context; the slice borrows the RX buffer
/// and is only valid for the duration of the call.
pub trait DataHandler {
    fn on_data(&self, conn: ConnHandle, data: &[u8]);
}

impl<F> DataHandler for F
where
    F: Fn(ConnHandle, &[u8]),
{
    fn on_data(&self, conn: ConnHandle, data: &[u8]) {
        self(conn, data)
    }
}

/// Logs every received chunk
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingDataHandler;

impl DataHandler for LoggingDataHandler {
    fn on_data(&self, conn: ConnHandle, data: &[u8]) {
        match core::str::from_utf8(data) {
            Ok(text) => log::info!("NUS data received on {}, len: {}, data: {}", conn, data.len(), text),
            Err(_) => log::info!("NUS data received on {}, len: {}, data: {:02x?}", conn, data.len(), data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ble::service::NusService;
    use crate::ble::traits::mock::MockTransport;
    use core::cell::RefCell;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    #[test]
    fn test_closure_handler() {
        let seen = RefCell::new(Vec::new());
        let handler = |conn: ConnHandle, data: &[u8]| {
            seen.borrow_mut().push((conn, data.to_vec()));
        };

        handler.on_data(ConnHandle(1), b"HI");

        assert_eq!(seen.borrow().as_slice(), &[(ConnHandle(1), b"HI".to_vec())]);
    }

    #[test]
    fn test_logging_handler_as_service_handler() {
        let mut svc = NusService::<NoopRawMutex, _, _>::new(MockTransport::new());
        assert_eq!(svc.initialize(Some(LoggingDataHandler)), Ok(()));

        assert_eq!(svc.on_write(ConnHandle(1), 0, &[0xFF, 0x00, 0xC3]), Ok(3));
        assert_eq!(svc.on_write(ConnHandle(1), 3, b"text"), Ok(4));
        assert_eq!(svc.on_read(0, 7).as_slice(), b"\xFF\x00\xC3text");
    }
}
