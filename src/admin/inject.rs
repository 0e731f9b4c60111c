//! Operator command injection.
//!
//! Frames free-form operator text into a per-call command and routes it
//! through the session's transaction engine. The session's injected-command
//! slot shows the command while it is in flight and is idle again before
//! this returns.

use log::info;

use crate::at::command::Command;
use crate::at::session::DeviceSession;
use crate::error::Error;
use crate::link::transport::SerialWrite;

/// Send `raw_text` to the module and wait for its verdict.
///
/// Formatting problems surface as [`Error::Command`] without touching the
/// session; transaction failures as [`Error::Transaction`]. Either way the
/// session's last outcome reflects what happened on the wire.
pub fn submit<W: SerialWrite>(session: &DeviceSession<W>, raw_text: &str) -> Result<(), Error> {
    let command = Command::raw(raw_text)?;
    info!("grovewifi: operator command '{}'", command);
    session.run_injected(command)?;
    Ok(())
}
