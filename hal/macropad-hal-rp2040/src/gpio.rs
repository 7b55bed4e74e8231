//! Digital inputs
//!
//! Every switch on the MacroPad (keys, encoder push button, encoder phase
//! lines) pulls to ground, so inputs are configured with the internal
//! pull-up and read active-low.

use embassy_rp::gpio::{AnyPin, Input, Pull};
use embassy_rp::Peri;
use macropad_hal::InputPin;

/// Maximum number of GPIO pins on RP2040
pub const GPIO_COUNT: u8 = 30;

/// A GPIO input usable by the input core
pub struct PadInput<'d> {
    input: Input<'d>,
}

impl<'d> PadInput<'d> {
    /// Configure a pin as input with the internal pull-up
    pub fn pull_up(pin: Peri<'d, AnyPin>) -> Self {
        Self {
            input: Input::new(pin, Pull::Up),
        }
    }

    /// Configure a pin as input with an explicit pull
    pub fn new(pin: Peri<'d, AnyPin>, pull: Pull) -> Self {
        Self {
            input: Input::new(pin, pull),
        }
    }
}

impl InputPin for PadInput<'_> {
    fn is_high(&self) -> bool {
        self.input.is_high()
    }
}
