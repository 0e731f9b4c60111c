//! Adapters: concrete implementations of the serial port traits.
//!
//! | Adapter     | Implements              | Connects to               |
//! |-------------|-------------------------|---------------------------|
//! | `uart`      | SerialWrite, SerialRead | ESP-IDF UART driver       |
//! | `sim_modem` | SerialWrite, SerialRead | in-process ESP-AT stand-in|

pub mod sim_modem;
#[cfg(target_os = "espidf")]
pub mod uart;
