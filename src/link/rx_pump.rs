//! RX pump: bridges a poll-style serial port to the session's
//! byte-arrival callback.
//!
//! Runs in a dedicated thread, driving a single read future with
//! `futures_lite::future::block_on`. When the port is idle the future
//! parks on an `embassy_time::Timer` instead of spinning; when data is
//! flowing it drains the port back-to-back.
//!
//! ```text
//!  ┌──────────────────────────────────────────────┐
//!  │  RX thread (grove-rx)                        │
//!  │                                              │
//!  │   port.read(buf) ── n>0 ──▶ session.receive  │
//!  │        │                                     │
//!  │        └── n==0 ──▶ Timer::after(poll) ──┐   │
//!  │                                          │   │
//!  │   stop / detach? ◀───────────────────────┘   │
//!  └──────────────────────────────────────────────┘
//! ```
//!
//! The pump stops cooperatively: on [`RxPump::stop`], on drop, or once the
//! session is detached.

use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;
use std::sync::Arc;
use std::thread::JoinHandle;

use embassy_time::Timer;
use log::{info, warn};

use super::transport::{SerialRead, SerialWrite};
use crate::at::session::DeviceSession;
use crate::config::DriverConfig;
use crate::drivers::task_pin::{Core, spawn_on_core};
use crate::error::Error;

const READ_BUF_SIZE: usize = 1024;

/// RX thread priority (above the application task on target).
const RX_PRIORITY: u8 = 12;

/// RX thread stack in KiB.
const RX_STACK_KB: usize = 8;

/// Handle to a running RX pump thread.
pub struct RxPump {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl RxPump {
    /// Start pumping `port` into `session`.
    pub fn spawn<R, W>(
        port: R,
        session: Arc<DeviceSession<W>>,
        config: &DriverConfig,
    ) -> Result<Self, Error>
    where
        R: SerialRead + 'static,
        W: SerialWrite + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let poll = config.rx_poll_interval();
        let chunk = config.rx_chunk_size.clamp(1, READ_BUF_SIZE);

        let thread_stop = Arc::clone(&stop);
        let handle = spawn_on_core(Core::Pro, RX_PRIORITY, RX_STACK_KB, "grove-rx\0", move || {
            futures_lite::future::block_on(read_loop(port, session, thread_stop, poll, chunk));
        })
        .map_err(|_| Error::Transport("failed to spawn RX thread"))?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Ask the pump to stop and wait for the thread to exit.
    pub fn stop(mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(h) = self.handle.take() {
            if h.join().is_err() {
                warn!("RX: pump thread panicked");
            }
        }
    }
}

impl Drop for RxPump {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
    }
}

async fn read_loop<R, W>(
    mut port: R,
    session: Arc<DeviceSession<W>>,
    stop: Arc<AtomicBool>,
    poll: Duration,
    chunk: usize,
) where
    R: SerialRead,
    W: SerialWrite,
{
    let mut buf = [0u8; READ_BUF_SIZE];
    let idle = embassy_time::Duration::from_micros(poll.as_micros() as u64);
    let mut failing = false;

    info!("RX: pump started (chunk={}B, poll={}ms)", chunk, poll.as_millis());

    while !stop.load(Ordering::Acquire) && !session.is_detached() {
        match port.read(&mut buf[..chunk]) {
            Ok(0) => Timer::after(idle).await,
            Ok(n) => {
                failing = false;
                session.receive(&buf[..n]);
            }
            Err(e) => {
                if !failing {
                    warn!("RX: read error: {:?}", e);
                    failing = true;
                }
                Timer::after(idle).await;
            }
        }
    }

    info!("RX: pump stopped");
}

// ── Tests ────────────────────────────────────────────────────
