//! Serial port abstraction: the byte channel to the Wi-Fi module.
//!
//! Concrete implementations:
//! - ESP-IDF UART driver (on target)
//! - Simulated ESP-AT module (host builds and tests)
//!
//! The write half is owned by the [`DeviceSession`]; the read half is
//! owned by the RX pump, so receiving never contends with a blocked write.
//! Push-style transports skip the read half entirely and call
//! [`DeviceSession::receive`] from their own RX callback.
//!
//! [`DeviceSession`]: crate::at::session::DeviceSession
//! [`DeviceSession::receive`]: crate::at::session::DeviceSession::receive

use core::time::Duration;

/// Outbound half of the serial channel.
pub trait SerialWrite: Send {
    /// Error type for this port.
    type Error: core::fmt::Debug;

    /// Write `data`, blocking at most `timeout`.
    /// Returns the number of bytes the port accepted.
    fn write(&mut self, data: &[u8], timeout: Duration) -> Result<usize, Self::Error>;
}

/// Inbound half of the serial channel.
pub trait SerialRead: Send {
    /// Error type for this port.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns 0 if no data is available (non-blocking).
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// A port that swallows every write and never receives anything.
/// Every transaction over it ends in a response timeout.
pub struct NullPort;

impl SerialWrite for NullPort {
    type Error = ();

    fn write(&mut self, data: &[u8], _timeout: Duration) -> Result<usize, ()> {
        Ok(data.len())
    }
}

impl SerialRead for NullPort {
    type Error = ();

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, ()> {
        Ok(0)
    }
}
