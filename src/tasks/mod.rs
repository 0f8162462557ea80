//! Tasks module
//!
//! Contains the periodic work that runs alongside the service engine.

pub mod notify;

pub use notify::{NotificationDriver, Pacer, TickOutcome};
