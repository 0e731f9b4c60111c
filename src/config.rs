//! Driver configuration parameters
//!
//! UART framing, transaction deadlines, and RX pump tuning for one Grove
//! Wi-Fi module. Values can be loaded from JSON (e.g. a provisioning blob)
//! and must pass [`DriverConfig::validate`] before use.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::at::classify::WakePolicy;
use crate::error::Error;

/// UART parity setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Serial line settings applied when the port is opened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baud_rate: u32,
    /// Data bits per character (5-8)
    pub data_bits: u8,
    pub parity: Parity,
    /// Stop bits (1 or 2)
    pub stop_bits: u8,
    /// Hardware RTS/CTS flow control
    pub flow_control: bool,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            data_bits: 8,
            parity: Parity::None,
            stop_bits: 1,
            flow_control: false,
        }
    }
}

/// Core driver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverConfig {
    pub uart: UartConfig,

    // --- Transaction deadlines ---
    /// Upper bound for a single command write (milliseconds)
    pub write_timeout_ms: u32,
    /// Upper bound for waiting on a terminal marker (milliseconds)
    pub response_timeout_ms: u32,
    /// Which markers complete a transaction early
    pub wake_policy: WakePolicy,

    // --- RX pump ---
    /// Idle poll interval of the receive pump (milliseconds)
    pub rx_poll_interval_ms: u32,
    /// Bytes read from the port per poll
    pub rx_chunk_size: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            uart: UartConfig::default(),

            write_timeout_ms: 3_000,     // 3 s
            response_timeout_ms: 10_000, // 10 s
            wake_policy: WakePolicy::AnyTerminal,

            rx_poll_interval_ms: 1,
            rx_chunk_size: 64,
        }
    }
}

impl DriverConfig {
    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.write_timeout_ms))
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.response_timeout_ms))
    }

    pub fn rx_poll_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.rx_poll_interval_ms))
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("malformed JSON"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Range-check every field. Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), Error> {
        let u = &self.uart;
        if !(1_200..=4_000_000).contains(&u.baud_rate) {
            return Err(Error::Config("uart.baud_rate must be 1200–4000000"));
        }
        if !(5..=8).contains(&u.data_bits) {
            return Err(Error::Config("uart.data_bits must be 5–8"));
        }
        if !(1..=2).contains(&u.stop_bits) {
            return Err(Error::Config("uart.stop_bits must be 1 or 2"));
        }
        if self.write_timeout_ms == 0 {
            return Err(Error::Config("write_timeout_ms must be > 0"));
        }
        if !(10..=120_000).contains(&self.response_timeout_ms) {
            return Err(Error::Config("response_timeout_ms must be 10–120000"));
        }
        if !(1..=1_000).contains(&self.rx_poll_interval_ms) {
            return Err(Error::Config("rx_poll_interval_ms must be 1–1000"));
        }
        if !(1..=1_024).contains(&self.rx_chunk_size) {
            return Err(Error::Config("rx_chunk_size must be 1–1024"));
        }
        Ok(())
    }
}
