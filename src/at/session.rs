//! Device session and command transaction engine.
//!
//! One [`DeviceSession`] exists per attached module. It couples two
//! contexts that never otherwise meet:
//!
//! ```text
//!  RX context (pump thread / UART callback)      caller (attach, operator)
//!  ────────────────────────────────────────      ────────────────────────
//!  receive(bytes)                                 run_command(cmd)
//!    lock state                                     acquire in-flight guard
//!    frame.append(bytes)                            lock state: reset frame,
//!    classify(frame)                                  re-arm signal, phase=Sent
//!    phase==Sent && terminal? ──signal(Response)──▶ port.write(cmd, write_to)
//!    unlock                                         wait(signal, response_to)
//!                                                   lock state: verdict | timeout
//! ```
//!
//! Transaction phases: `Idle → Sent → {Completed | TimedOut}`. The arrival
//! side only signals while the phase is `Sent`, and the caller re-arms the
//! signal under the same lock when it leaves `Sent`, so a response that
//! lands after a timeout can never complete the *next* transaction.
//!
//! Exactly one transaction may be in flight; a concurrent caller gets
//! [`TransactionError::Busy`] instead of sharing the frame.

use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;
use std::sync::{Mutex, MutexGuard, PoisonError};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use log::{debug, error, info, warn};

use super::classify::{Verdict, WakePolicy, classify};
use super::command::Command;
use super::frame::{RESPONSE_CAPACITY, ResponseFrame};
use crate::config::DriverConfig;
use crate::error::TransactionError;
use crate::link::transport::SerialWrite;

/// Why the caller's wait ended early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wake {
    /// A terminal marker was classified for the in-flight transaction.
    Response,
    /// The device is being detached.
    Detached,
}

/// Per-transaction state machine position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Sent,
    Completed,
    TimedOut,
}

/// Everything the RX context and callers share. Guarded by one lock.
struct SessionState {
    frame: ResponseFrame,
    phase: Phase,
    /// Verdict of the current transaction; frozen once terminal.
    verdict: Verdict,
    /// Last outcome as reported to the administrative boundary.
    outcome: Verdict,
    /// Operator command currently in flight, `None` when idle.
    injected: Option<Command>,
    /// Operator-assigned correlation tag.
    tag: u32,
}

/// Default write/response deadlines for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub write: Duration,
    pub response: Duration,
}

impl From<&DriverConfig> for Timeouts {
    fn from(cfg: &DriverConfig) -> Self {
        Self {
            write: cfg.write_timeout(),
            response: cfg.response_timeout(),
        }
    }
}

/// State of one attached Grove Wi-Fi module.
pub struct DeviceSession<W: SerialWrite> {
    port: Mutex<W>,
    state: Mutex<SessionState>,
    done: Signal<CriticalSectionRawMutex, Wake>,
    in_flight: AtomicBool,
    detached: AtomicBool,
    wake_policy: WakePolicy,
    timeouts: Timeouts,
}

/// Holds the in-flight flag for the whole write + wait.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<W: SerialWrite> DeviceSession<W> {
    pub fn new(port: W, config: &DriverConfig) -> Self {
        Self {
            port: Mutex::new(port),
            state: Mutex::new(SessionState {
                frame: ResponseFrame::new(),
                phase: Phase::Idle,
                verdict: Verdict::Pending,
                outcome: Verdict::Pending,
                injected: None,
                tag: 0,
            }),
            done: Signal::new(),
            in_flight: AtomicBool::new(false),
            detached: AtomicBool::new(false),
            wake_policy: config.wake_policy,
            timeouts: Timeouts::from(config),
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── RX context ────────────────────────────────────────────

    /// Byte-arrival callback. Safe to call from any thread, with chunks of
    /// any size; always reports the whole chunk as consumed.
    pub fn receive(&self, bytes: &[u8]) -> usize {
        let mut st = self.state();

        let stored = st.frame.append(bytes);
        if stored < bytes.len() {
            warn!(
                "grovewifi: response frame full, dropped {} byte(s)",
                bytes.len() - stored
            );
        }

        if st.phase == Phase::Sent {
            let verdict = classify(st.frame.as_bytes());
            if self.wake_policy.wakes_on(verdict) {
                debug!("grovewifi: terminal marker seen ({:?})", verdict);
                st.verdict = verdict;
                st.phase = Phase::Completed;
                self.done.signal(Wake::Response);
            }
        }

        bytes.len()
    }

    // ── Transactions ──────────────────────────────────────────

    /// Run `command` with the session's configured deadlines.
    pub fn run(&self, command: &Command) -> Result<(), TransactionError> {
        self.run_command(command, self.timeouts.write, self.timeouts.response)
    }

    /// Write `command` and block until the module answers or
    /// `response_timeout` elapses.
    pub fn run_command(
        &self,
        command: &Command,
        write_timeout: Duration,
        response_timeout: Duration,
    ) -> Result<(), TransactionError> {
        let _guard = InFlight::acquire(&self.in_flight).ok_or(TransactionError::Busy)?;
        self.transact(command, write_timeout, response_timeout)
    }

    /// Like [`run`](Self::run), but publishes `command` as the in-flight
    /// operator command for the duration of the transaction. The slot is
    /// back to idle when this returns, whatever the outcome.
    pub(crate) fn run_injected(&self, command: Command) -> Result<(), TransactionError> {
        let _guard = InFlight::acquire(&self.in_flight).ok_or(TransactionError::Busy)?;

        self.state().injected = Some(command.clone());
        let result = self.transact(&command, self.timeouts.write, self.timeouts.response);
        self.state().injected = None;

        result
    }

    /// Body of a transaction. Caller holds the in-flight guard.
    fn transact(
        &self,
        command: &Command,
        write_timeout: Duration,
        response_timeout: Duration,
    ) -> Result<(), TransactionError> {
        if self.is_detached() {
            return Err(TransactionError::Detached);
        }

        // Idle → Sent. Phase flips before the write so a reply racing the
        // tail of the write is still classified.
        {
            let mut st = self.state();
            st.frame.reset();
            st.verdict = Verdict::Pending;
            st.outcome = Verdict::Pending;
            st.phase = Phase::Sent;
            self.done.reset();
        }

        let wire = command.wire();
        let written = {
            let mut port = self.port.lock().unwrap_or_else(PoisonError::into_inner);
            port.write(wire, write_timeout)
        };
        let write_fault = match written {
            Ok(n) if n >= wire.len() => None,
            Ok(n) => Some(TransactionError::ShortWrite {
                written: n,
                expected: wire.len(),
            }),
            Err(e) => {
                warn!("grovewifi: write of '{}' failed: {:?}", command, e);
                Some(TransactionError::TransportWrite)
            }
        };
        if let Some(err) = write_fault {
            let mut st = self.state();
            st.phase = Phase::Idle;
            st.outcome = Verdict::Failure;
            self.done.reset();
            warn!("grovewifi: '{}' not sent: {}", command, err);
            return Err(err);
        }

        // Detach may have landed between the check above and the re-arm.
        let woke = if self.is_detached() {
            Ok(Wake::Detached)
        } else {
            futures_lite::future::block_on(embassy_time::with_timeout(
                to_embassy(response_timeout),
                self.done.wait(),
            ))
        };

        let mut st = self.state();
        self.done.reset();

        if st.phase == Phase::Completed {
            // A verdict wins over a deadline or detach that raced it.
            st.outcome = st.verdict;
            return match st.verdict {
                Verdict::Success => {
                    info!("grovewifi: '{}' OK", command);
                    Ok(())
                }
                _ => {
                    warn!("grovewifi: '{}' answered with failure marker", command);
                    Err(TransactionError::ProtocolFailure)
                }
            };
        }

        st.outcome = Verdict::Failure;
        if matches!(woke, Ok(Wake::Detached)) {
            st.phase = Phase::Idle;
            info!("grovewifi: '{}' cancelled by detach", command);
            Err(TransactionError::Detached)
        } else {
            st.phase = Phase::TimedOut;
            error!(
                "grovewifi: timeout waiting for response to '{}' ({} ms)",
                command,
                response_timeout.as_millis()
            );
            Err(TransactionError::Timeout)
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Mark the session detached and wake any waiting caller. Permanent:
    /// every later transaction fails with [`TransactionError::Detached`].
    pub fn detach(&self) {
        if !self.detached.swap(true, Ordering::AcqRel) {
            info!("grovewifi: session detached");
        }
        self.done.signal(Wake::Detached);
    }

    pub fn is_detached(&self) -> bool {
        self.detached.load(Ordering::Acquire)
    }

    // ── Queries ───────────────────────────────────────────────

    /// Outcome of the most recent transaction, `Pending` while one is in
    /// flight or before the first one.
    pub fn outcome(&self) -> Verdict {
        self.state().outcome
    }

    pub fn phase(&self) -> Phase {
        self.state().phase
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Copy of the bytes received since the last transaction started.
    pub fn last_response(&self) -> heapless::Vec<u8, RESPONSE_CAPACITY> {
        let st = self.state();
        let mut out = heapless::Vec::new();
        // Cannot fail: the frame holds at most RESPONSE_CAPACITY - 1 bytes.
        let _ = out.extend_from_slice(st.frame.as_bytes());
        out
    }

    /// Operator command currently in flight, `None` when the slot is idle.
    pub fn injected_command(&self) -> Option<Command> {
        self.state().injected.clone()
    }

    pub fn set_session_tag(&self, tag: u32) {
        self.state().tag = tag;
    }

    pub fn session_tag(&self) -> u32 {
        self.state().tag
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }
}

fn to_embassy(d: Duration) -> embassy_time::Duration {
    embassy_time::Duration::from_micros(u64::try_from(d.as_micros()).unwrap_or(u64::MAX / 2))
}

// ── Tests ────────────────────────────────────────────────────
