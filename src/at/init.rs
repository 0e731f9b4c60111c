//! Attach-time initialization sequence.
//!
//! Provisions the module with a fixed, ordered list of setup commands.
//! Each later command only makes sense if the earlier ones took effect, so
//! the first failure aborts the whole attach. Nothing is rolled back: the
//! module keeps whatever the successful prefix configured.

use log::{error, info};

use super::command::{Builtin, Command};
use super::session::DeviceSession;
use crate::error::InitError;
use crate::link::transport::SerialWrite;

/// Setup commands in the order they are sent.
pub const INIT_SEQUENCE: [Builtin; 5] = [
    Builtin::Test,
    Builtin::NoEcho,
    Builtin::DisableSleep,
    Builtin::SetUart,
    Builtin::StationMode,
];

/// Run [`INIT_SEQUENCE`] against `session`.
pub fn initialize<W: SerialWrite>(session: &DeviceSession<W>) -> Result<(), InitError> {
    initialize_with(session, &INIT_SEQUENCE)
}

/// Run `steps` in order, stopping at the first one that does not succeed.
pub fn initialize_with<W: SerialWrite>(
    session: &DeviceSession<W>,
    steps: &[Builtin],
) -> Result<(), InitError> {
    for (step, &builtin) in steps.iter().enumerate() {
        if let Err(cause) = session.run(&Command::Builtin(builtin)) {
            error!(
                "grovewifi: init step {} ({}) failed: {}",
                step,
                builtin.name(),
                cause
            );
            return Err(InitError {
                step,
                command: builtin,
                cause,
            });
        }
        info!("grovewifi: init {}/{} {} OK", step + 1, steps.len(), builtin.name());
    }

    info!("grovewifi: module configured");
    Ok(())
}
