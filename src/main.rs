//! Grove Wi-Fi: Main Entry Point
//!
//! Brings up the Grove UART Wi-Fi module on UART1 and serves its
//! attribute directory on the serial console.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  console (stdin)                                             │
//! │    "cmd_cli AT+GMR" ──▶ AdminDirectory::store ──┐            │
//! │    "response_cli"   ──▶ AdminDirectory::show    │            │
//! │                                                 ▼            │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │ GroveWifi                                              │  │
//! │  │   DeviceSession ◀── RxPump (grove-rx) ◀── UART1 RX     │  │
//! │  │        └──────────────────────────────▶ UART1 TX       │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Console syntax: `<entry>` reads an entry, `<entry> <value>` writes it.
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use std::io::BufRead;

use anyhow::Result;
use esp_idf_hal::peripherals::Peripherals;
use log::{info, warn};

use grovewifi::adapters::uart;
use grovewifi::admin::attrs::AdminDirectory;
use grovewifi::config::DriverConfig;
use grovewifi::device::{COMPATIBLE, GroveWifi};
use grovewifi::link::transport::SerialWrite;

// ── Console ───────────────────────────────────────────────────

fn handle_line<W: SerialWrite>(dir: &AdminDirectory<W>, line: &str) {
    let line = line.trim_end_matches(['\r', '\n']);
    let (entry, value) = match line.split_once(' ') {
        Some((e, v)) => (e, Some(v)),
        None => (line, None),
    };
    if entry.is_empty() {
        return;
    }

    match value {
        None => match dir.read(entry) {
            Ok(text) => println!("{text}"),
            Err(e) => println!("{entry}: {e} ({})", e.errno()),
        },
        Some(v) => match dir.store(entry, v.as_bytes()) {
            Ok(n) => println!("{entry}: wrote {n} byte(s)"),
            Err(e) => println!("{entry}: {e} ({})", e.errno()),
        },
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  GroveWifi v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Config ─────────────────────────────────────────────
    let config = DriverConfig::default();
    config.validate()?;

    // ── 3. UART + attach ──────────────────────────────────────
    let p = Peripherals::take()?;
    let (tx, rx) = uart::open(p.uart1, p.pins.gpio17, p.pins.gpio16, &config.uart)?;

    info!("Binding {}", COMPATIBLE[1]);
    let device = GroveWifi::attach(&config, tx, rx)?;
    let dir = device.admin();
    info!("Entries published under '{}'", dir.name());

    // ── 4. Console loop ───────────────────────────────────────
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        match line {
            Ok(l) => handle_line(&dir, &l),
            Err(e) => {
                warn!("console read failed: {}", e);
                break;
            }
        }
    }

    device.detach();
    Ok(())
}
