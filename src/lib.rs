//! Grove Wi-Fi driver library.
//!
//! Drives an ESP-AT based Grove UART Wi-Fi module: a command/response
//! transaction engine over a serial link, the attach-time setup sequence,
//! and an operator-facing attribute directory for raw AT commands.
//!
//! All ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module; everything else builds and tests on the host.

#![deny(unused_must_use)]

pub mod adapters;
pub mod admin;
pub mod at;
pub mod config;
pub mod device;
pub mod drivers;
pub mod link;

mod error;

pub use error::{CommandError, Error, InitError, Result, TransactionError};
