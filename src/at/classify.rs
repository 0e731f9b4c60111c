//! Response classification.
//!
//! A frame is scanned as raw bytes (it may legally contain NULs or
//! non-UTF-8 noise from the module's boot banner) for the ESP-AT terminal
//! markers.  `OK` anywhere wins; otherwise `ERROR` or `FAIL` anywhere is a
//! failure; otherwise the response is still pending.

use serde::{Deserialize, Serialize};

pub const RESPONSE_OK: &[u8] = b"OK";
pub const RESPONSE_ERROR: &[u8] = b"ERROR";
pub const RESPONSE_FAIL: &[u8] = b"FAIL";

/// Tri-state verdict over a response frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verdict {
    /// No terminal marker yet. The only non-terminal state.
    #[default]
    Pending,
    Success,
    Failure,
}

impl Verdict {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Which verdicts complete a transaction early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WakePolicy {
    /// Wake on `OK`, `ERROR` or `FAIL`.
    #[default]
    AnyTerminal,
    /// Wake on `OK` only; an error reply runs into the response timeout.
    SuccessOnly,
}

impl WakePolicy {
    pub const fn wakes_on(self, verdict: Verdict) -> bool {
        match (self, verdict) {
            (_, Verdict::Pending) => false,
            (Self::AnyTerminal, _) => true,
            (Self::SuccessOnly, v) => matches!(v, Verdict::Success),
        }
    }
}

/// Classify the bytes received so far. Pure; never mutates.
pub fn classify(frame: &[u8]) -> Verdict {
    if contains(frame, RESPONSE_OK) {
        Verdict::Success
    } else if contains(frame, RESPONSE_ERROR) || contains(frame, RESPONSE_FAIL) {
        Verdict::Failure
    } else {
        Verdict::Pending
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
