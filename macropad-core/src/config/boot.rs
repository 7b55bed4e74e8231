//! Boot mode selection
//!
//! Holding KEY1 while the board resets selects development mode.

/// Grace delay before starting in development mode (ms)
pub const DEV_MODE_DELAY_MS: u64 = 5000;

/// How the firmware starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootMode {
    /// Console enabled, start delayed by [`DEV_MODE_DELAY_MS`]
    Development,
    Normal,
}

impl BootMode {
    /// Pick the mode from the boot key's state at reset
    pub fn from_key_held(held: bool) -> Self {
        if held {
            BootMode::Development
        } else {
            BootMode::Normal
        }
    }

    pub fn is_development(self) -> bool {
        self == BootMode::Development
    }

    /// Delay to wait before entering the main loop
    pub fn startup_delay_ms(self) -> u64 {
        match self {
            BootMode::Development => DEV_MODE_DELAY_MS,
            BootMode::Normal => 0,
        }
    }
}
