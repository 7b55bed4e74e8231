//! Rotary position and key scanner traits

/// A single raw key press or release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyTransition {
    /// Key number, 0-based
    pub key_index: u8,
    /// True for press, false for release
    pub pressed: bool,
}

impl KeyTransition {
    pub const fn pressed(key_index: u8) -> Self {
        Self {
            key_index,
            pressed: true,
        }
    }

    pub const fn released(key_index: u8) -> Self {
        Self {
            key_index,
            pressed: false,
        }
    }
}

/// Incremental rotary position source
///
/// Reading is split in two phases: `refresh` lets software decoders
/// sample their phase lines, `position` returns a side-effect free
/// snapshot. Counters maintained by a driver or peripheral can leave
/// `refresh` as the default no-op.
pub trait PositionCounter {
    /// Sample the underlying hardware
    fn refresh(&mut self) {}

    /// Net detent count since construction
    ///
    /// Unbounded: callers must treat it as a free integer.
    fn position(&self) -> i32;
}

/// Source of key press/release transitions
///
/// Implementations must deliver transitions oldest first and must never
/// block.
pub trait KeyScanner {
    /// Sample the key hardware and queue any new transitions
    ///
    /// Scanners fed by an external driver can leave this as the default
    /// no-op.
    fn scan(&mut self, _now_ms: u64) {}

    /// Pop the oldest transition not yet reported
    fn poll_one(&mut self) -> Option<KeyTransition>;
}
