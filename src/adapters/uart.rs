//! ESP-IDF UART adapter.
//!
//! Opens the UART the Grove Wi-Fi module hangs off and splits it into a
//! TX half for the session and an RX half for the RX pump. Line settings
//! come from [`UartConfig`]; the module expects 115200 8N1 with no flow
//! control.

use core::time::Duration;

use esp_idf_hal::delay::{NON_BLOCK, TickType};
use esp_idf_hal::gpio::{AnyIOPin, InputPin, OutputPin};
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::uart::config::{Config, DataBits, FlowControl, StopBits};
use esp_idf_hal::uart::{Uart, UartDriver, UartRxDriver, UartTxDriver};
use esp_idf_hal::units::Hertz;
use esp_idf_sys::EspError;
use log::info;

use crate::config::{Parity, UartConfig};
use crate::error::Error;
use crate::link::transport::{SerialRead, SerialWrite};

pub struct UartTx(UartTxDriver<'static>);
pub struct UartRx(UartRxDriver<'static>);

/// Install the UART driver and return its two halves.
pub fn open<U: Uart>(
    uart: impl Peripheral<P = U> + 'static,
    tx: impl Peripheral<P = impl OutputPin> + 'static,
    rx: impl Peripheral<P = impl InputPin> + 'static,
    cfg: &UartConfig,
) -> Result<(UartTx, UartRx), Error> {
    let data_bits = match cfg.data_bits {
        5 => DataBits::DataBits5,
        6 => DataBits::DataBits6,
        7 => DataBits::DataBits7,
        _ => DataBits::DataBits8,
    };
    let stop_bits = if cfg.stop_bits == 2 {
        StopBits::STOP2
    } else {
        StopBits::STOP1
    };
    let flow = if cfg.flow_control {
        FlowControl::RTSCTS
    } else {
        FlowControl::None
    };

    let base = Config::default()
        .baudrate(Hertz(cfg.baud_rate))
        .data_bits(data_bits)
        .stop_bits(stop_bits)
        .flow_control(flow);
    let line = match cfg.parity {
        Parity::None => base.parity_none(),
        Parity::Even => base.parity_even(),
        Parity::Odd => base.parity_odd(),
    };

    let driver = UartDriver::new(
        uart,
        tx,
        rx,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &line,
    )
    .map_err(|_| Error::Transport("UART driver install failed"))?;

    info!(
        "UART: {} baud, {} data bits, parity {:?}, {} stop bit(s)",
        cfg.baud_rate, cfg.data_bits, cfg.parity, cfg.stop_bits
    );

    let (tx, rx) = driver.into_split();
    Ok((UartTx(tx), UartRx(rx)))
}

impl SerialWrite for UartTx {
    type Error = EspError;

    fn write(&mut self, data: &[u8], timeout: Duration) -> Result<usize, EspError> {
        let n = self.0.write(data)?;
        self.0.wait_done(TickType::from(timeout).ticks())?;
        Ok(n)
    }
}

impl SerialRead for UartRx {
    type Error = EspError;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, EspError> {
        self.0.read(buf, NON_BLOCK)
    }
}
