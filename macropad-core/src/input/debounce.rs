//! Time-based switch debouncing
//!
//! A raw change is only reported once the line has held the new level for
//! the whole debounce window. Any sample back at the reported level
//! restarts the wait, so chatter shorter than the window never surfaces.

use macropad_hal::{ActiveLevel, InputPin};

/// Debounce progress for a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Filter {
    /// Raw level matches the reported state
    Stable,
    /// Raw level differs; payload is when it first differed
    Settling { since_ms: u64 },
}

/// A digital input with a debounce filter
///
/// Sampling and reading are separate: [`refresh`](Self::refresh) samples
/// the pin and advances the filter, [`read`](Self::read) only returns the
/// current debounced state.
///
/// Until the first debounced change, the reported state is the level
/// sampled at construction. With the usual pull-up wiring that is
/// "not pressed" for an idle switch.
#[derive(Debug)]
pub struct DebouncedInput<P> {
    pin: P,
    level: ActiveLevel,
    window_ms: u32,
    state: bool,
    filter: Filter,
}

impl<P: InputPin> DebouncedInput<P> {
    /// Wrap a pin, taking its current level as the initial state
    pub fn new(pin: P, level: ActiveLevel, window_ms: u32) -> Self {
        let state = level.sample(&pin);
        Self {
            pin,
            level,
            window_ms,
            state,
            filter: Filter::Stable,
        }
    }

    /// Sample the pin and advance the filter
    ///
    /// Returns the new state when the debounced state flips.
    pub fn refresh(&mut self, now_ms: u64) -> Option<bool> {
        let raw = self.level.sample(&self.pin);

        if raw == self.state {
            self.filter = Filter::Stable;
            return None;
        }

        let since_ms = match self.filter {
            Filter::Stable => {
                self.filter = Filter::Settling { since_ms: now_ms };
                now_ms
            }
            Filter::Settling { since_ms } => since_ms,
        };

        if now_ms.saturating_sub(since_ms) >= u64::from(self.window_ms) {
            self.state = raw;
            self.filter = Filter::Stable;
            Some(raw)
        } else {
            None
        }
    }

    /// Current debounced state (true = active)
    pub fn read(&self) -> bool {
        self.state
    }

    /// Refresh, then read
    pub fn update(&mut self, now_ms: u64) -> bool {
        self.refresh(now_ms);
        self.state
    }

    /// Whether a raw change is waiting out the window
    pub fn is_settling(&self) -> bool {
        matches!(self.filter, Filter::Settling { .. })
    }

    /// Debounce window in milliseconds
    pub fn window_ms(&self) -> u32 {
        self.window_ms
    }

    /// Give the pin back
    pub fn release(self) -> P {
        self.pin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    struct FakePin {
        high: Cell<bool>,
    }

    impl FakePin {
        fn new(high: bool) -> Self {
            Self {
                high: Cell::new(high),
            }
        }

        fn set(&self, high: bool) {
            self.high.set(high);
        }
    }

    impl InputPin for FakePin {
        fn is_high(&self) -> bool {
            self.high.get()
        }
    }

    #[test]
    fn test_initial_state_idle_pullup() {
        let pin = FakePin::new(true);
        let input = DebouncedInput::new(&pin, ActiveLevel::Low, 10);
        assert!(!input.read());
    }

    #[test]
    fn test_initial_state_held() {
        let pin = FakePin::new(false);
        let input = DebouncedInput::new(&pin, ActiveLevel::Low, 10);
        assert!(input.read());
    }

    #[test]
    fn test_stable_change_reported_once() {
        let pin = FakePin::new(true);
        let mut input = DebouncedInput::new(&pin, ActiveLevel::Low, 10);

        pin.set(false);
        assert_eq!(input.refresh(0), None);
        assert!(input.is_settling());
        assert_eq!(input.refresh(5), None);
        assert_eq!(input.refresh(10), Some(true));
        assert!(input.read());

        // Held: no further transitions
        assert_eq!(input.refresh(20), None);
        assert_eq!(input.refresh(100), None);
        assert!(input.read());
    }

    #[test]
    fn test_flicker_rejected() {
        let pin = FakePin::new(true);
        let mut input = DebouncedInput::new(&pin, ActiveLevel::Low, 10);

        for t in 0..50u64 {
            pin.set(t % 4 < 2);
            assert_eq!(input.refresh(t), None);
        }
        pin.set(true);
        input.refresh(50);
        assert!(!input.read());
        assert!(!input.is_settling());
    }

    #[test]
    fn test_bounce_restarts_window() {
        let pin = FakePin::new(true);
        let mut input = DebouncedInput::new(&pin, ActiveLevel::Low, 10);

        pin.set(false);
        input.refresh(0);
        pin.set(true);
        input.refresh(6);
        pin.set(false);
        input.refresh(8);

        // 10ms after the first edge, but only 2ms after the restart
        assert_eq!(input.refresh(10), None);
        assert_eq!(input.refresh(18), Some(true));
    }

    #[test]
    fn test_release() {
        let pin = FakePin::new(false);
        let mut input = DebouncedInput::new(&pin, ActiveLevel::Low, 5);
        assert!(input.read());

        pin.set(true);
        assert_eq!(input.refresh(100), None);
        assert_eq!(input.refresh(105), Some(false));
        assert!(!input.update(110));
    }

    #[test]
    fn test_zero_window() {
        let pin = FakePin::new(false);
        let mut input = DebouncedInput::new(&pin, ActiveLevel::High, 0);

        pin.set(true);
        assert_eq!(input.refresh(3), Some(true));
    }
}
