//! Serial link to the Wi-Fi module.
//!
//! [`transport`] defines the port traits the rest of the driver is written
//! against; [`rx_pump`] moves inbound bytes from a poll-style port into a
//! session.

pub mod rx_pump;
pub mod transport;
