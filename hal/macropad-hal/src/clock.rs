//! Monotonic time source
//!
//! Debounce windows and timer due times are measured in milliseconds
//! since an arbitrary epoch (normally boot).

/// Monotonic millisecond clock
pub trait Clock {
    /// Milliseconds elapsed since the clock's epoch
    ///
    /// Must never go backwards.
    fn now_ms(&self) -> u64;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}
