//! Simulated ESP-AT module.
//!
//! Host stand-in for the Grove Wi-Fi board behind [`SerialWrite`] /
//! [`SerialRead`]. Commands written to the TX half are answered on the RX
//! half with canned ESP-AT replies, so the whole driver (session, RX pump,
//! bring-up, admin entries) runs unmodified on x86_64.
//!
//! Behaviour knobs:
//! - **echo**: on at power-up, off after `ATE0`, like real firmware.
//! - **silent**: swallow commands without answering (response timeouts).
//! - **overrides**: per-command canned replies (failure injection).
//! - **rx chunk**: cap on bytes returned per read, to split replies.

use core::time::Duration;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::debug;

use crate::link::transport::{SerialRead, SerialWrite};

pub const REPLY_OK: &[u8] = b"\r\nOK\r\n";
pub const REPLY_ERROR: &[u8] = b"\r\nERROR\r\n";

const VERSION_REPLY: &[u8] =
    b"AT version:2.2.0.0(sim)\r\nSDK version:v4.4\r\nBin version:2.2.0(grove)\r\n\r\nOK\r\n";

/// Commands the simulated firmware accepts with a plain `OK`.
const ACCEPTED: [&str; 6] = [
    "AT",
    "ATE0",
    "ATE1",
    "AT+SLEEP=0",
    "AT+UART_CUR=115200,8,1,0,0",
    "AT+CWMODE=1",
];

#[derive(Default)]
struct ModemState {
    /// Bytes waiting for the host to read.
    outbound: VecDeque<u8>,
    /// Every command line received, framing stripped.
    received: Vec<String>,
    overrides: HashMap<String, Vec<u8>>,
    echo_off: bool,
    silent: bool,
    rx_chunk: Option<usize>,
}

/// Shared handle to one simulated module. Cheap to clone.
#[derive(Clone, Default)]
pub struct SimModem {
    inner: Arc<Mutex<ModemState>>,
}

impl SimModem {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, ModemState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// TX half, to be owned by the session.
    pub fn tx(&self) -> SimTx {
        SimTx(self.clone())
    }

    /// RX half, to be owned by the RX pump.
    pub fn rx(&self) -> SimRx {
        SimRx(self.clone())
    }

    /// Stop (or resume) answering commands.
    pub fn set_silent(&self, silent: bool) {
        self.state().silent = silent;
    }

    /// Answer `command` with `reply` instead of the built-in table.
    pub fn respond_with(&self, command: &str, reply: &[u8]) {
        self.state().overrides.insert(command.to_owned(), reply.to_vec());
    }

    /// Return at most `n` bytes per read call.
    pub fn set_rx_chunk(&self, n: usize) {
        self.state().rx_chunk = Some(n.max(1));
    }

    /// Queue unsolicited output (URCs, boot banner, line noise).
    pub fn emit(&self, bytes: &[u8]) {
        self.state().outbound.extend(bytes);
    }

    /// Command lines received so far, oldest first.
    pub fn received(&self) -> Vec<String> {
        self.state().received.clone()
    }

    fn on_command(&self, wire: &[u8]) {
        let line = String::from_utf8_lossy(wire).trim().to_owned();
        let mut st = self.state();
        st.received.push(line.clone());
        debug!("sim-modem: <- '{}'", line);

        if st.silent {
            return;
        }

        if !st.echo_off {
            let echo = format!("{line}\r\r\n");
            st.outbound.extend(echo.as_bytes());
        }

        let reply: Vec<u8> = if let Some(r) = st.overrides.get(&line) {
            r.clone()
        } else if line == "AT+GMR" {
            VERSION_REPLY.to_vec()
        } else if ACCEPTED.contains(&line.as_str()) {
            REPLY_OK.to_vec()
        } else {
            REPLY_ERROR.to_vec()
        };

        match line.as_str() {
            "ATE0" => st.echo_off = true,
            "ATE1" => st.echo_off = false,
            _ => {}
        }

        st.outbound.extend(reply);
    }
}

/// Write half of a [`SimModem`].
pub struct SimTx(SimModem);

impl SerialWrite for SimTx {
    type Error = ();

    fn write(&mut self, data: &[u8], _timeout: Duration) -> Result<usize, ()> {
        self.0.on_command(data);
        Ok(data.len())
    }
}

/// Read half of a [`SimModem`].
pub struct SimRx(SimModem);

impl SerialRead for SimRx {
    type Error = ();

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
        let mut st = self.0.state();
        let cap = st.rx_chunk.unwrap_or(buf.len()).min(buf.len());
        let n = cap.min(st.outbound.len());
        for (slot, byte) in buf.iter_mut().zip(st.outbound.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}
