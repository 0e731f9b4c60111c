//! Unified error types for the Grove Wi-Fi driver.
//!
//! Every subsystem error is a small `Copy` enum so it can be handed across
//! the RX pump / caller boundary and stored without allocation.  The
//! top-level [`Error`] wraps them for callers (attach path, binary) that
//! just need "did it work".

use core::fmt;

use crate::at::command::Builtin;

// ---------------------------------------------------------------------------
// Top-level driver error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A command/response transaction failed.
    Transaction(TransactionError),
    /// The attach-time initialization sequence aborted.
    Init(InitError),
    /// A command could not be formatted for the wire.
    Command(CommandError),
    /// Configuration is invalid.
    Config(&'static str),
    /// The serial transport could not be opened or configured.
    Transport(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transaction(e) => write!(f, "transaction: {e}"),
            Self::Init(e) => write!(f, "init: {e}"),
            Self::Command(e) => write!(f, "command: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Transport(msg) => write!(f, "transport: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Transaction errors
// ---------------------------------------------------------------------------

/// Why a single command/response transaction did not succeed.
///
/// None of these are retried by the engine; retry policy belongs to the
/// caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionError {
    /// The transport accepted fewer bytes than the command length.
    ShortWrite { written: usize, expected: usize },
    /// The transport reported an error while writing.
    TransportWrite,
    /// No terminal marker arrived before the response deadline.
    Timeout,
    /// The module answered with a failure marker (`ERROR` / `FAIL`).
    ProtocolFailure,
    /// Another transaction is already in flight on this session.
    Busy,
    /// The device was detached before or during the transaction.
    Detached,
}

impl TransactionError {
    /// `true` for the two write-side failures. The response deadline never
    /// produces one of these.
    pub const fn is_write_error(self) -> bool {
        matches!(self, Self::ShortWrite { .. } | Self::TransportWrite)
    }
}

impl fmt::Display for TransactionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShortWrite { written, expected } => {
                write!(f, "short write ({written}/{expected} bytes)")
            }
            Self::TransportWrite => write!(f, "transport write failed"),
            Self::Timeout => write!(f, "timed out waiting for response"),
            Self::ProtocolFailure => write!(f, "module reported failure"),
            Self::Busy => write!(f, "another command is in flight"),
            Self::Detached => write!(f, "device detached"),
        }
    }
}

impl std::error::Error for TransactionError {}

impl From<TransactionError> for Error {
    fn from(e: TransactionError) -> Self {
        Self::Transaction(e)
    }
}

// ---------------------------------------------------------------------------
// Initialization errors
// ---------------------------------------------------------------------------

/// The setup sequence stopped at `step` (zero-based) because `command` did
/// not succeed.  Commands before `step` were applied and are not rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitError {
    pub step: usize,
    pub command: Builtin,
    pub cause: TransactionError,
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step {} ({}) failed: {}",
            self.step,
            self.command.name(),
            self.cause
        )
    }
}

impl std::error::Error for InitError {}

impl From<InitError> for Error {
    fn from(e: InitError) -> Self {
        Self::Init(e)
    }
}

// ---------------------------------------------------------------------------
// Command formatting errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// The framed command does not fit the command capacity.
    TooLong { len: usize, max: usize },
    /// The command text is empty after trimming.
    Empty,
    /// The command text contains a CR/LF or other control byte.
    ControlByte(u8),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLong { len, max } => write!(f, "command too long ({len} > {max} bytes)"),
            Self::Empty => write!(f, "empty command"),
            Self::ControlByte(b) => write!(f, "control byte 0x{b:02x} in command"),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Driver-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
