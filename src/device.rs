//! Device lifecycle: attach, operate, detach.
//!
//! ```text
//!  attach(config, tx, rx)
//!    ├─ validate config
//!    ├─ DeviceSession::new(tx)            (Arc, shared with pump + admin)
//!    ├─ RxPump::spawn(rx, session)
//!    └─ at::init::initialize(session)     (any failure aborts the attach)
//!
//!  detach()
//!    ├─ session.detach()                  (wakes a blocked caller)
//!    └─ pump.stop()                       (joins the RX thread)
//! ```

use std::sync::Arc;

use log::{error, info};

use crate::admin::attrs::AdminDirectory;
use crate::at::init::initialize;
use crate::at::session::DeviceSession;
use crate::config::DriverConfig;
use crate::error::Error;
use crate::link::rx_pump::RxPump;
use crate::link::transport::{SerialRead, SerialWrite};

/// Board identifiers this driver binds to.
pub const COMPATIBLE: [&str; 2] = ["seeedstudio,grovewifiv1", "seeedstudio,grovewifiv2"];

pub fn is_compatible(name: &str) -> bool {
    COMPATIBLE.contains(&name)
}

/// One attached Grove Wi-Fi module.
pub struct GroveWifi<W: SerialWrite + 'static> {
    session: Arc<DeviceSession<W>>,
    pump: Option<RxPump>,
}

impl<W: SerialWrite + 'static> GroveWifi<W> {
    /// Bring the module up over an already-opened serial port.
    ///
    /// On error nothing is left running: the session is detached and the
    /// RX pump joined before returning.
    pub fn attach<R>(config: &DriverConfig, tx: W, rx: R) -> Result<Self, Error>
    where
        R: SerialRead + 'static,
    {
        config.validate()?;

        let session = Arc::new(DeviceSession::new(tx, config));
        let pump = RxPump::spawn(rx, Arc::clone(&session), config)?;
        let mut dev = Self {
            session,
            pump: Some(pump),
        };

        if let Err(e) = initialize(dev.session.as_ref()) {
            error!("grovewifi: attach failed: {}", e);
            dev.shutdown();
            return Err(e.into());
        }

        info!("grovewifi: attached");
        Ok(dev)
    }

    pub fn session(&self) -> &Arc<DeviceSession<W>> {
        &self.session
    }

    /// Operator directory bound to this device's session.
    pub fn admin(&self) -> AdminDirectory<W> {
        AdminDirectory::new(Arc::clone(&self.session))
    }

    /// Cancel any pending wait and stop the RX pump.
    pub fn detach(mut self) {
        self.shutdown();
        info!("grovewifi: detached");
    }

    fn shutdown(&mut self) {
        self.session.detach();
        if let Some(pump) = self.pump.take() {
            pump.stop();
        }
    }
}

impl<W: SerialWrite + 'static> Drop for GroveWifi<W> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
