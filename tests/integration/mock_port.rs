//! Mock serial port with a scripted responder.
//!
//! Every write is recorded and forwarded to a responder thread, which asks
//! the test's script for a reply and, after the scripted delay, delivers it
//! through `DeviceSession::receive`, the way the RX pump would.

use grovewifi::at::session::DeviceSession;
use grovewifi::config::DriverConfig;
use grovewifi::link::transport::SerialWrite;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the responder does with one command line.
pub type Script = Box<dyn Fn(&str) -> Option<(Duration, &'static [u8])> + Send>;

// ── MockPort ──────────────────────────────────────────────────

pub struct MockPort {
    sent: Arc<Mutex<Vec<String>>>,
    to_responder: Sender<String>,
}

impl SerialWrite for MockPort {
    type Error = ();

    fn write(&mut self, data: &[u8], _timeout: Duration) -> Result<usize, ()> {
        let line = String::from_utf8_lossy(data).trim().to_owned();
        self.sent.lock().unwrap().push(line.clone());
        // Responder gone means the session is being torn down.
        let _ = self.to_responder.send(line);
        Ok(data.len())
    }
}

// ── Rig ───────────────────────────────────────────────────────

pub struct Rig {
    pub session: Arc<DeviceSession<MockPort>>,
    sent: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl Rig {
    pub fn new(config: &DriverConfig, script: Script) -> Self {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let (tx, rx) = mpsc::channel::<String>();
        let port = MockPort {
            sent: Arc::clone(&sent),
            to_responder: tx,
        };
        let session = Arc::new(DeviceSession::new(port, config));
        let weak = Arc::downgrade(&session);

        std::thread::spawn(move || {
            for line in rx {
                let Some((delay, reply)) = script(&line) else {
                    continue;
                };
                std::thread::sleep(delay);
                match weak.upgrade() {
                    Some(session) => {
                        session.receive(reply);
                    }
                    None => return,
                }
            }
        });

        Self { session, sent }
    }

    /// Commands written so far, CR-LF framing stripped.
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

// ── Canned scripts ────────────────────────────────────────────

pub const OK: &[u8] = b"\r\nOK\r\n";
pub const ERROR: &[u8] = b"\r\nERROR\r\n";

#[allow(dead_code)]
pub fn answer_all(reply: &'static [u8]) -> Script {
    Box::new(move |_: &str| Some((Duration::ZERO, reply)))
}

#[allow(dead_code)]
pub fn answer_after(delay: Duration, reply: &'static [u8]) -> Script {
    Box::new(move |_: &str| Some((delay, reply)))
}

#[allow(dead_code)]
pub fn silent() -> Script {
    Box::new(|_: &str| None)
}

#[allow(dead_code)]
pub fn config_with_timeout(ms: u32) -> DriverConfig {
    DriverConfig {
        response_timeout_ms: ms,
        ..DriverConfig::default()
    }
}
