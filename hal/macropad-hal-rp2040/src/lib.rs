//! RP2040-specific HAL for the Macropad firmware
//!
//! This crate provides RP2040 implementations of the shared
//! `macropad-hal` traits, plus the board pin map:
//!
//! - Pulled-up digital inputs for keys and the encoder
//! - Non-blocking UART over embassy's buffered driver
//! - Millisecond clock backed by the embassy time driver
//! - Adafruit MacroPad RP2040 pin assignment

#![no_std]

pub mod clock;
pub mod gpio;
pub mod pins;
pub mod uart;

pub use clock::EmbassyClock;
pub use gpio::PadInput;
pub use pins::MacropadPins;
pub use uart::BufferedSerial;

// Re-export shared traits from macropad-hal for convenience
pub use macropad_hal::{Clock, InputPin, UartRx, UartTx};
