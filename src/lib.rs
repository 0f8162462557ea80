#![cfg_attr(not(test), no_std)]

pub mod ble;
pub mod config;
pub mod error;
pub mod tasks;

pub use ble::{ConnHandle, ConnectionEvents, DataHandler, NusService, SecurityLevel, Transport};
pub use error::{AttrError, InitError, NotifyError};
