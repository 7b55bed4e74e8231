//! Adafruit MacroPad RP2040 pin map
//!
//! Board wiring:
//!
//! | Function            | GPIO        |
//! |---------------------|-------------|
//! | Encoder push button | 0           |
//! | KEY1..KEY12         | 1..12       |
//! | Encoder phase A/B   | 17 / 18     |
//! | UART1 TX/RX         | 20 / 21     |

use embassy_rp::gpio::AnyPin;
use embassy_rp::peripherals::{PIN_20, PIN_21, UART1};
use embassy_rp::{Peri, Peripherals};

/// Number of key switches
pub const KEY_COUNT: usize = 12;

/// GPIO number of each key, KEY1 first
pub const KEY_GPIOS: [u8; KEY_COUNT] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];

pub const ENCODER_BUTTON_GPIO: u8 = 0;
pub const ENCODER_A_GPIO: u8 = 17;
pub const ENCODER_B_GPIO: u8 = 18;
pub const UART_TX_GPIO: u8 = 20;
pub const UART_RX_GPIO: u8 = 21;

/// Peripherals the input firmware needs, split out of [`Peripherals`]
pub struct MacropadPins {
    /// Key switches, KEY1 first
    pub keys: [Peri<'static, AnyPin>; KEY_COUNT],
    pub encoder_button: Peri<'static, AnyPin>,
    pub encoder_a: Peri<'static, AnyPin>,
    pub encoder_b: Peri<'static, AnyPin>,
    pub uart: Peri<'static, UART1>,
    pub uart_tx: Peri<'static, PIN_20>,
    pub uart_rx: Peri<'static, PIN_21>,
}

impl MacropadPins {
    /// Take the board's input and serial pins
    pub fn take(p: Peripherals) -> Self {
        Self {
            keys: [
                p.PIN_1.into(),
                p.PIN_2.into(),
                p.PIN_3.into(),
                p.PIN_4.into(),
                p.PIN_5.into(),
                p.PIN_6.into(),
                p.PIN_7.into(),
                p.PIN_8.into(),
                p.PIN_9.into(),
                p.PIN_10.into(),
                p.PIN_11.into(),
                p.PIN_12.into(),
            ],
            encoder_button: p.PIN_0.into(),
            encoder_a: p.PIN_17.into(),
            encoder_b: p.PIN_18.into(),
            uart: p.UART1,
            uart_tx: p.PIN_20,
            uart_rx: p.PIN_21,
        }
    }
}
