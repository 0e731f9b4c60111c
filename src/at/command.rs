//! Command descriptors.
//!
//! Built-in setup commands carry static wire text; operator-injected
//! commands own their formatted bytes, so no shared table entry is ever
//! rewritten while a transaction is using it.

use core::fmt;

use heapless::Vec;

use crate::error::CommandError;

/// Maximum framed command length on the wire (CR-LF wrapping included).
pub const COMMAND_CAPACITY: usize = 60;

/// Line terminator wrapped around every command.
pub const CRLF: &[u8] = b"\r\n";

/// The fixed setup vocabulary of the Grove module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// `AT`: liveness probe.
    Test,
    /// `ATE0`: disable command echo.
    NoEcho,
    /// `AT+SLEEP=0`: disable modem sleep.
    DisableSleep,
    /// `AT+UART_CUR=115200,8,1,0,0`: 115200 8N1, no flow control.
    SetUart,
    /// `AT+CWMODE=1`: station mode.
    StationMode,
}

impl Builtin {
    /// Framed wire text.
    pub const fn wire(self) -> &'static [u8] {
        match self {
            Self::Test => b"\r\nAT\r\n",
            Self::NoEcho => b"\r\nATE0\r\n",
            Self::DisableSleep => b"\r\nAT+SLEEP=0\r\n",
            Self::SetUart => b"\r\nAT+UART_CUR=115200,8,1,0,0\r\n",
            Self::StationMode => b"\r\nAT+CWMODE=1\r\n",
        }
    }

    /// The bare AT command, for logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Test => "AT",
            Self::NoEcho => "ATE0",
            Self::DisableSleep => "AT+SLEEP=0",
            Self::SetUart => "AT+UART_CUR=115200,8,1,0,0",
            Self::StationMode => "AT+CWMODE=1",
        }
    }
}

/// One command as handed to the transaction engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Builtin(Builtin),
    /// Operator-supplied text, already framed as `\r\n<text>\r\n`.
    Raw(Vec<u8, COMMAND_CAPACITY>),
}

impl Command {
    /// Frame operator text for the wire.
    ///
    /// A single trailing newline (as written by `echo`) is stripped first.
    /// Embedded control bytes are rejected: they would split the line into
    /// several commands on the module side.
    pub fn raw(text: &str) -> Result<Self, CommandError> {
        let text = text
            .strip_suffix("\r\n")
            .or_else(|| text.strip_suffix('\n'))
            .unwrap_or(text);
        if text.is_empty() {
            return Err(CommandError::Empty);
        }
        if let Some(b) = text.bytes().find(u8::is_ascii_control) {
            return Err(CommandError::ControlByte(b));
        }

        let len = text.len() + 2 * CRLF.len();
        if len > COMMAND_CAPACITY {
            return Err(CommandError::TooLong {
                len,
                max: COMMAND_CAPACITY,
            });
        }

        let mut buf = Vec::new();
        // Cannot fail: length checked above.
        let _ = buf.extend_from_slice(CRLF);
        let _ = buf.extend_from_slice(text.as_bytes());
        let _ = buf.extend_from_slice(CRLF);
        Ok(Self::Raw(buf))
    }

    /// Bytes to put on the wire.
    pub fn wire(&self) -> &[u8] {
        match self {
            Self::Builtin(b) => b.wire(),
            Self::Raw(buf) => buf,
        }
    }

    /// Wire text without the CR-LF framing.
    pub fn text(&self) -> &[u8] {
        let w = self.wire();
        let w = w.strip_prefix(CRLF).unwrap_or(w);
        w.strip_suffix(CRLF).unwrap_or(w)
    }
}

impl From<Builtin> for Command {
    fn from(b: Builtin) -> Self {
        Self::Builtin(b)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(b) => f.write_str(b.name()),
            Self::Raw(_) => write!(f, "{}", String::from_utf8_lossy(self.text())),
        }
    }
}
