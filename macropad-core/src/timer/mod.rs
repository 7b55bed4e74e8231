//! One-shot timers
//!
//! Timers are plain values held by a bounded registry and fired from the
//! poll loop. There is no timer interrupt or thread: a timer runs during
//! the first [`TimerRegistry::run_due`] call at or after its due time.

pub mod registry;

pub use registry::{
    NoTimer, TimerCallback, TimerContext, TimerError, TimerHandle, TimerRegistry, MAX_TIMERS,
};
