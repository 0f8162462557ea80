//! Bluetooth Low Energy module
//!
//! Implements the GATT side of the Nordic UART Service (NUS): the attribute
//! table, the RX/TX/CCC handlers and the session state that gates TX
//! notifications. The BLE host stack is reached only through the traits in
//! [`traits`].

pub mod attribute;
pub mod buffer;
pub mod connection;
pub mod handler;
pub mod service;
pub mod subscription;
pub mod traits;
pub mod uuid;

pub use attribute::{Attribute, AttributeKind, AttributeTable, Permission, Property, NUS_TABLE};
pub use connection::{ConnHandle, Connection, SecurityLevel, SecurityPolicy};
pub use handler::{DataHandler, LoggingDataHandler};
pub use service::{NusService, ServiceConfig};
pub use subscription::SubscriptionState;
pub use traits::{ConnectionEvents, Transport};
pub use uuid::Uuid;
