//! Administrative attribute directory.
//!
//! Exposes a session to operators as three named entries, in the shape of
//! a sysfs-style kobject directory:
//!
//! | Entry          | Access     | Behaviour                                  |
//! |----------------|------------|--------------------------------------------|
//! | `cmd_cli`      | write-only | runs the written line as an AT command     |
//! | `response_cli` | read-only  | human-readable outcome of the last command |
//! | `cli_id`       | write-only | stores a numeric session tag               |
//!
//! Errors are reported as negative errno values so a thin platform shim
//! (console, VFS, RPC) can pass them straight through.
//!
//! The directory holds its session by `Arc`, handed in at construction;
//! there is no process-wide session pointer.

use std::sync::Arc;

use log::warn;

use crate::admin::inject::submit;
use crate::at::classify::Verdict;
use crate::at::session::DeviceSession;
use crate::error::{Error, TransactionError};
use crate::link::transport::SerialWrite;

/// Directory name the entries are published under.
pub const DIR_NAME: &str = "grovewifiv2";

pub const MSG_SUCCESS: &str = "Successful operation";
pub const MSG_FAILURE: &str = "Unsuccessful Operation";
pub const MSG_PENDING: &str = "Waiting for response";

const EPERM: i32 = 1;
const ENOENT: i32 = 2;
const EIO: i32 = 5;
const EBUSY: i32 = 16;
const EINVAL: i32 = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrError {
    /// Read of a write-only entry or write of a read-only one.
    PermissionDenied,
    /// No entry with that name.
    NotFound,
    /// The command transaction failed.
    Io,
    /// Another command is in flight.
    Busy,
    /// Input could not be parsed or formatted.
    Invalid,
}

impl AttrError {
    /// Negative errno, kernel style.
    pub const fn errno(self) -> i32 {
        -match self {
            Self::PermissionDenied => EPERM,
            Self::NotFound => ENOENT,
            Self::Io => EIO,
            Self::Busy => EBUSY,
            Self::Invalid => EINVAL,
        }
    }
}

impl core::fmt::Display for AttrError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "operation not permitted"),
            Self::NotFound => write!(f, "no such entry"),
            Self::Io => write!(f, "I/O error"),
            Self::Busy => write!(f, "device busy"),
            Self::Invalid => write!(f, "invalid argument"),
        }
    }
}

impl std::error::Error for AttrError {}

impl From<Error> for AttrError {
    fn from(e: Error) -> Self {
        match e {
            Error::Transaction(TransactionError::Busy) => Self::Busy,
            Error::Command(_) => Self::Invalid,
            _ => Self::Io,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadOnly,
    WriteOnly,
}

/// The three published entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Command,
    Response,
    SessionId,
}

impl Attribute {
    pub const ALL: [Self; 3] = [Self::Command, Self::Response, Self::SessionId];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Command => "cmd_cli",
            Self::Response => "response_cli",
            Self::SessionId => "cli_id",
        }
    }

    pub const fn access(self) -> Access {
        match self {
            Self::Response => Access::ReadOnly,
            Self::Command | Self::SessionId => Access::WriteOnly,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }
}

/// Human-readable text for an outcome, as shown by `response_cli`.
pub const fn outcome_text(outcome: Verdict) -> &'static str {
    match outcome {
        Verdict::Success => MSG_SUCCESS,
        Verdict::Failure => MSG_FAILURE,
        Verdict::Pending => MSG_PENDING,
    }
}

/// Operator-facing view of one session.
pub struct AdminDirectory<W: SerialWrite> {
    session: Arc<DeviceSession<W>>,
}

impl<W: SerialWrite> AdminDirectory<W> {
    pub fn new(session: Arc<DeviceSession<W>>) -> Self {
        Self { session }
    }

    pub const fn name(&self) -> &'static str {
        DIR_NAME
    }

    pub fn session(&self) -> &Arc<DeviceSession<W>> {
        &self.session
    }

    /// Read entry `name` into `buf`. Returns the number of bytes written;
    /// output longer than `buf` is truncated.
    pub fn show(&self, name: &str, buf: &mut [u8]) -> Result<usize, AttrError> {
        let attr = Attribute::from_name(name).ok_or(AttrError::NotFound)?;
        if attr.access() == Access::WriteOnly {
            warn!("grovewifi: read of write-only entry '{}' refused", name);
            return Err(AttrError::PermissionDenied);
        }

        let text = outcome_text(self.session.outcome()).as_bytes();
        let n = text.len().min(buf.len());
        buf[..n].copy_from_slice(&text[..n]);
        Ok(n)
    }

    /// Write `input` to entry `name`. Returns the number of bytes consumed
    /// (always all of them on success).
    pub fn store(&self, name: &str, input: &[u8]) -> Result<usize, AttrError> {
        let attr = Attribute::from_name(name).ok_or(AttrError::NotFound)?;
        if attr.access() == Access::ReadOnly {
            warn!("grovewifi: write to read-only entry '{}' refused", name);
            return Err(AttrError::PermissionDenied);
        }

        let text = core::str::from_utf8(input).map_err(|_| AttrError::Invalid)?;
        match attr {
            Attribute::Command => submit(self.session.as_ref(), text)?,
            Attribute::SessionId => {
                let tag = text.trim().parse::<u32>().map_err(|_| AttrError::Invalid)?;
                self.session.set_session_tag(tag);
            }
            Attribute::Response => return Err(AttrError::PermissionDenied),
        }
        Ok(input.len())
    }

    /// Convenience read of a whole entry as a `String`.
    pub fn read(&self, name: &str) -> Result<String, AttrError> {
        let mut buf = [0u8; 64];
        let n = self.show(name, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf[..n]).into_owned())
    }
}
