//! AT command/response protocol engine.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     AT protocol core                         │
//! │                                                              │
//! │   bytes ──▶ ┌───────────────┐ ──▶ ┌──────────┐               │
//! │  (receive)  │ ResponseFrame │     │ classify │──▶ signal     │
//! │             └───────────────┘     └──────────┘      │        │
//! │                                                     ▼        │
//! │   init / submit ──▶ DeviceSession::run_command ──▶ Verdict   │
//! │                     (reset · write · wait)                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod classify;
pub mod command;
pub mod frame;
pub mod init;
pub mod session;
