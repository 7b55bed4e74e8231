//! Timer registry
//!
//! Holds pending one-shot callbacks with their due times and fires the
//! ones that have come due. Each timer is removed before it runs, so a
//! callback may reschedule itself (or anything else) without the new
//! timer firing in the same pass.

use core::convert::Infallible;

use heapless::Vec;

use crate::event::{Event, EventBatch};

/// Maximum pending timers
pub const MAX_TIMERS: usize = 16;

/// Identifies a scheduled timer for cancellation
///
/// Handles are never reused, so a stale handle cannot cancel a newer timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerHandle(u64);

/// Errors from scheduling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerError {
    /// All `MAX_TIMERS` slots are taken
    RegistryFull,
}

/// Work performed when a timer fires
///
/// Implemented by the application's timer type, typically an enum of the
/// things it schedules. A returned error aborts the current
/// [`TimerRegistry::run_due`] pass and is handed to the caller unchanged;
/// timers that had not run yet stay pending.
pub trait TimerCallback: Sized {
    /// Failure reported by a callback
    type Error;

    /// Run the callback
    fn fire(self, ctx: &mut TimerContext<'_, Self>) -> Result<(), Self::Error>;
}

/// Timer type for applications that never schedule anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NoTimer {}

impl TimerCallback for NoTimer {
    type Error = Infallible;

    fn fire(self, _ctx: &mut TimerContext<'_, Self>) -> Result<(), Infallible> {
        match self {}
    }
}

/// What a firing callback can see and do
pub struct TimerContext<'a, C> {
    now_ms: u64,
    handle: TimerHandle,
    registry: &'a mut TimerRegistry<C>,
    events: &'a mut EventBatch,
}

impl<C> TimerContext<'_, C> {
    /// Time of the current `run_due` pass
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Handle of the timer being fired
    pub fn handle(&self) -> TimerHandle {
        self.handle
    }

    /// Append an event after those already emitted this poll
    ///
    /// Hands the event back if the poll's batch is full.
    pub fn emit(&mut self, event: Event) -> Result<(), Event> {
        self.events.push(event)
    }

    /// Schedule a timer relative to the current pass
    ///
    /// The new timer does not fire during this pass, even with zero delay.
    pub fn schedule(&mut self, delay_ms: u64, callback: C) -> Result<TimerHandle, TimerError> {
        self.registry.schedule(self.now_ms, delay_ms, callback)
    }

    /// Cancel a pending timer
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.registry.cancel(handle)
    }
}

struct Entry<C> {
    handle: TimerHandle,
    due_ms: u64,
    callback: C,
}

/// Bounded set of pending timers
pub struct TimerRegistry<C> {
    entries: Vec<Entry<C>, MAX_TIMERS>,
    next_id: u64,
}

impl<C> Default for TimerRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> TimerRegistry<C> {
    /// Create an empty registry
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Schedule `callback` to run no earlier than `delay_ms` after `now_ms`
    pub fn schedule(
        &mut self,
        now_ms: u64,
        delay_ms: u64,
        callback: C,
    ) -> Result<TimerHandle, TimerError> {
        self.schedule_at(now_ms.saturating_add(delay_ms), callback)
    }

    /// Schedule `callback` to run no earlier than `due_ms`
    pub fn schedule_at(&mut self, due_ms: u64, callback: C) -> Result<TimerHandle, TimerError> {
        if self.entries.is_full() {
            return Err(TimerError::RegistryFull);
        }

        let handle = TimerHandle(self.next_id);
        self.entries
            .push(Entry {
                handle,
                due_ms,
                callback,
            })
            .map_err(|_| TimerError::RegistryFull)?;
        self.next_id += 1;

        Ok(handle)
    }

    /// Remove a pending timer
    ///
    /// Returns false if it already fired, was cancelled, or never existed.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.entries.iter().position(|e| e.handle == handle) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Check if a timer is still waiting to fire
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    /// Due time of the earliest pending timer
    pub fn next_due_ms(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.due_ms).min()
    }

    /// Number of pending timers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every pending timer without running it
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Earliest timer due at `now_ms` that was registered before `horizon`
    ///
    /// Ordered by due time, then registration order.
    fn next_ready(&self, now_ms: u64, horizon: u64) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due_ms <= now_ms && e.handle.0 < horizon)
            .min_by_key(|(_, e)| (e.due_ms, e.handle))
            .map(|(index, _)| index)
    }
}

impl<C: TimerCallback> TimerRegistry<C> {
    /// Fire every timer due at `now_ms`, earliest first
    ///
    /// Events emitted by callbacks are appended to `events`. Timers
    /// scheduled by the callbacks themselves wait for a later pass.
    /// Returns the number of timers fired.
    pub fn run_due(&mut self, now_ms: u64, events: &mut EventBatch) -> Result<usize, C::Error> {
        let horizon = self.next_id;
        let mut fired = 0;

        while let Some(index) = self.next_ready(now_ms, horizon) {
            let entry = self.entries.swap_remove(index);
            let mut ctx = TimerContext {
                now_ms,
                handle: entry.handle,
                registry: &mut *self,
                events: &mut *events,
            };
            entry.callback.fire(&mut ctx)?;
            fired += 1;
        }

        Ok(fired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestError {
        Boom,
    }

    /// Marker events use `KeyChanged` with the key index as a timer tag
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestTimer {
        Mark(u8),
        Fail,
        Repeat { tag: u8, period_ms: u64 },
        CancelOther(TimerHandle),
    }

    fn mark(tag: u8) -> Event {
        Event::KeyChanged {
            key_index: tag,
            pressed: true,
        }
    }

    impl TimerCallback for TestTimer {
        type Error = TestError;

        fn fire(self, ctx: &mut TimerContext<'_, Self>) -> Result<(), TestError> {
            match self {
                TestTimer::Mark(tag) => {
                    let _ = ctx.emit(mark(tag));
                }
                TestTimer::Fail => return Err(TestError::Boom),
                TestTimer::Repeat { tag, period_ms } => {
                    let _ = ctx.emit(mark(tag));
                    let _ = ctx.schedule(period_ms, self);
                }
                TestTimer::CancelOther(handle) => {
                    ctx.cancel(handle);
                }
            }
            Ok(())
        }
    }

    fn tags(events: &EventBatch) -> heapless::Vec<u8, 16> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::KeyChanged { key_index, .. } => Some(*key_index),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_fires_in_due_order() {
        let mut timers = TimerRegistry::new();
        timers.schedule(0, 10, TestTimer::Mark(b'A')).unwrap();
        timers.schedule(0, 5, TestTimer::Mark(b'B')).unwrap();

        let mut events = EventBatch::new();
        assert_eq!(timers.run_due(20, &mut events), Ok(2));
        assert_eq!(tags(&events).as_slice(), &[b'B', b'A']);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_ties_use_registration_order() {
        let mut timers = TimerRegistry::new();
        timers.schedule(0, 5, TestTimer::Mark(1)).unwrap();
        timers.schedule(0, 5, TestTimer::Mark(2)).unwrap();
        timers.schedule(2, 3, TestTimer::Mark(3)).unwrap();

        let mut events = EventBatch::new();
        timers.run_due(5, &mut events).unwrap();
        assert_eq!(tags(&events).as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_not_fired_before_due() {
        let mut timers = TimerRegistry::new();
        let handle = timers.schedule(100, 50, TestTimer::Mark(1)).unwrap();

        let mut events = EventBatch::new();
        assert_eq!(timers.run_due(149, &mut events), Ok(0));
        assert!(events.is_empty());
        assert!(timers.is_pending(handle));
        assert_eq!(timers.next_due_ms(), Some(150));

        assert_eq!(timers.run_due(150, &mut events), Ok(1));
        assert!(!timers.is_pending(handle));
    }

    #[test]
    fn test_cancel_before_due() {
        let mut timers = TimerRegistry::new();
        let handle = timers.schedule(0, 10, TestTimer::Mark(1)).unwrap();
        timers.schedule(0, 10, TestTimer::Mark(2)).unwrap();

        assert!(timers.cancel(handle));
        assert!(!timers.cancel(handle));

        let mut events = EventBatch::new();
        timers.run_due(10, &mut events).unwrap();
        assert_eq!(tags(&events).as_slice(), &[2]);
    }

    #[test]
    fn test_cancel_after_fire_is_noop() {
        let mut timers = TimerRegistry::new();
        let handle = timers.schedule(0, 0, TestTimer::Mark(1)).unwrap();

        let mut events = EventBatch::new();
        timers.run_due(0, &mut events).unwrap();
        assert!(!timers.cancel(handle));
    }

    #[test]
    fn test_reschedule_waits_for_next_pass() {
        let mut timers = TimerRegistry::new();
        timers
            .schedule(0, 0, TestTimer::Repeat { tag: 7, period_ms: 0 })
            .unwrap();

        let mut events = EventBatch::new();
        assert_eq!(timers.run_due(0, &mut events), Ok(1));
        assert_eq!(timers.len(), 1);

        let mut events = EventBatch::new();
        assert_eq!(timers.run_due(0, &mut events), Ok(1));
        assert_eq!(tags(&events).as_slice(), &[7]);
    }

    #[test]
    fn test_periodic_timer() {
        let mut timers = TimerRegistry::new();
        timers
            .schedule(0, 10, TestTimer::Repeat { tag: 1, period_ms: 10 })
            .unwrap();

        let mut fired = 0;
        for now in 0..=35 {
            let mut events = EventBatch::new();
            fired += timers.run_due(now, &mut events).unwrap();
        }
        assert_eq!(fired, 3);
        assert_eq!(timers.next_due_ms(), Some(40));
    }

    #[test]
    fn test_failure_propagates_and_keeps_rest() {
        let mut timers = TimerRegistry::new();
        timers.schedule(0, 1, TestTimer::Mark(1)).unwrap();
        timers.schedule(0, 2, TestTimer::Fail).unwrap();
        let later = timers.schedule(0, 3, TestTimer::Mark(3)).unwrap();

        let mut events = EventBatch::new();
        assert_eq!(timers.run_due(10, &mut events), Err(TestError::Boom));
        assert_eq!(tags(&events).as_slice(), &[1]);
        assert!(timers.is_pending(later));
    }

    #[test]
    fn test_callback_cancels_due_timer() {
        let mut timers = TimerRegistry::new();
        let victim = timers.schedule(0, 5, TestTimer::Mark(9)).unwrap();
        timers
            .schedule_at(1, TestTimer::CancelOther(victim))
            .unwrap();

        let mut events = EventBatch::new();
        assert_eq!(timers.run_due(10, &mut events), Ok(1));
        assert!(events.is_empty());
    }

    #[test]
    fn test_registry_full() {
        let mut timers = TimerRegistry::new();
        for i in 0..MAX_TIMERS {
            timers.schedule(0, i as u64, TestTimer::Mark(i as u8)).unwrap();
        }
        assert_eq!(
            timers.schedule(0, 1, TestTimer::Mark(0)),
            Err(TimerError::RegistryFull)
        );

        timers.clear();
        assert!(timers.is_empty());
        assert!(timers.schedule(0, 1, TestTimer::Mark(0)).is_ok());
    }

    #[test]
    fn test_no_timer_registry() {
        let mut timers: TimerRegistry<NoTimer> = TimerRegistry::new();
        let mut events = EventBatch::new();
        assert_eq!(timers.run_due(u64::MAX, &mut events), Ok(0));
    }
}
