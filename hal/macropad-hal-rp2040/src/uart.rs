//! UART support
//!
//! RP2040 has two UART peripherals (UART0 and UART1), each available on a
//! fixed set of pins. The receive path wraps embassy's interrupt-driven
//! buffered UART so the poll loop can drain it without waiting.

use embedded_io::{Read, ReadReady, Write};
use macropad_hal::{UartConfig, UartRx, UartTx};

/// UART peripheral identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartId {
    Uart0,
    Uart1,
}

/// Determine which UART can use a given GPIO pin
pub fn gpio_to_uart(gpio: u8) -> Option<UartId> {
    // UART0: GPIO 0/1, 12/13, 16/17, 28/29
    // UART1: GPIO 4/5, 8/9, 20/21, 24/25
    match gpio {
        0 | 1 | 12 | 13 | 16 | 17 | 28 | 29 => Some(UartId::Uart0),
        4 | 5 | 8 | 9 | 20 | 21 | 24 | 25 => Some(UartId::Uart1),
        _ => None,
    }
}

/// Whether `tx` and `rx` form a TX/RX pair on one UART
pub fn is_uart_pair(tx: u8, rx: u8) -> bool {
    // TX sits on the even pin of each pair
    tx % 2 == 0 && rx == tx + 1 && gpio_to_uart(tx).is_some()
}

/// Translate the board-agnostic line settings into embassy's
pub fn to_embassy_config(config: &UartConfig) -> embassy_rp::uart::Config {
    use embassy_rp::uart;
    use macropad_hal::uart::{DataBits, Parity, StopBits};

    let mut cfg = uart::Config::default();
    cfg.baudrate = config.baudrate;
    cfg.data_bits = match config.data_bits {
        DataBits::Seven => uart::DataBits::DataBits7,
        DataBits::Eight => uart::DataBits::DataBits8,
    };
    cfg.parity = match config.parity {
        Parity::None => uart::Parity::ParityNone,
        Parity::Even => uart::Parity::ParityEven,
        Parity::Odd => uart::Parity::ParityOdd,
    };
    cfg.stop_bits = match config.stop_bits {
        StopBits::One => uart::StopBits::STOP1,
        StopBits::Two => uart::StopBits::STOP2,
    };
    cfg
}

/// Non-blocking serial port over a buffered embedded-io driver
///
/// Reads only take what the interrupt handler has already buffered.
/// Writes go into the transmit buffer and wait only when it is full.
pub struct BufferedSerial<T> {
    inner: T,
}

impl<T> BufferedSerial<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Give the driver back
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read + ReadReady> UartRx for BufferedSerial<T> {
    type Error = T::Error;

    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, T::Error> {
        if buf.is_empty() || !self.inner.read_ready()? {
            return Ok(0);
        }
        self.inner.read(buf)
    }
}

impl<T: Write> UartTx for BufferedSerial<T> {
    type Error = T::Error;

    fn write_all(&mut self, data: &[u8]) -> Result<(), T::Error> {
        Write::write_all(&mut self.inner, data)
    }

    fn flush(&mut self) -> Result<(), T::Error> {
        Write::flush(&mut self.inner)
    }
}
