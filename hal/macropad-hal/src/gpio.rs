//! GPIO pin abstractions
//!
//! Provides the digital input trait implemented by chip-specific HALs,
//! plus the electrical convention used to turn a line level into a
//! logical "pressed" state.

/// Digital input pin
///
/// Implementations should handle the actual hardware register reading
/// for the specific chip.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

impl<T: InputPin + ?Sized> InputPin for &T {
    fn is_high(&self) -> bool {
        (**self).is_high()
    }
}

/// Line level that means "active" (switch closed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActiveLevel {
    /// Switch pulls the line to ground, pull-up holds it high when idle
    #[default]
    Low,
    /// Switch pulls the line high, pull-down holds it low when idle
    High,
}

impl ActiveLevel {
    /// Translate a raw line level into a logical active state
    pub fn is_active(self, line_high: bool) -> bool {
        match self {
            ActiveLevel::Low => !line_high,
            ActiveLevel::High => line_high,
        }
    }

    /// Sample a pin and return its logical active state
    pub fn sample<P: InputPin + ?Sized>(self, pin: &P) -> bool {
        self.is_active(pin.is_high())
    }
}
