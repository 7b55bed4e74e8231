//! Event multiplexer
//!
//! Polls every input source once per tick and merges what changed into a
//! single ordered batch:
//!
//! 1. encoder rotation (fresh position plus the previously reported one)
//! 2. encoder button change (debounced)
//! 3. at most one key transition
//! 4. events emitted by timers that came due
//!
//! The multiplexer caches the last reported position and button state and
//! only it writes that cache, so a source never reports the same state
//! twice in a row.

use macropad_hal::{Clock, InputPin};

use crate::event::{Event, EventBatch};
use crate::input::DebouncedInput;
use crate::timer::{NoTimer, TimerCallback, TimerError, TimerHandle, TimerRegistry};
use crate::traits::{KeyScanner, PositionCounter};

/// Last state reported for each encoder source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderSnapshot {
    pub position: i32,
    pub button: bool,
}

/// A poll cycle cut short by a failing timer callback
///
/// `events` holds everything gathered before the failure: the input
/// events of the cycle and whatever earlier timers emitted. The input
/// cache already reflects them, so they are not reported again.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollError<E> {
    pub events: EventBatch,
    /// Error returned by the callback, unchanged
    pub source: E,
}

/// Merges encoder, button, keys and timers into one event stream
///
/// Must be driven from a single loop; every operation takes `&mut self`.
pub struct EventMultiplexer<E, B, K, T, C = NoTimer> {
    encoder: E,
    button: DebouncedInput<B>,
    keys: K,
    clock: T,
    timers: TimerRegistry<C>,
    cache: EncoderSnapshot,
}

impl<E, B, K, T, C> EventMultiplexer<E, B, K, T, C>
where
    E: PositionCounter,
    B: InputPin,
    K: KeyScanner,
    T: Clock,
    C: TimerCallback,
{
    /// Build the multiplexer from its sources
    ///
    /// The cache is seeded from a first live read of the encoder and the
    /// button, so construction never produces events.
    pub fn new(mut encoder: E, mut button: DebouncedInput<B>, keys: K, clock: T) -> Self {
        let now_ms = clock.now_ms();
        encoder.refresh();
        let cache = EncoderSnapshot {
            position: encoder.position(),
            button: button.update(now_ms),
        };

        Self {
            encoder,
            button,
            keys,
            clock,
            timers: TimerRegistry::new(),
            cache,
        }
    }

    /// Run one poll cycle
    ///
    /// Returns the events of this cycle in their fixed order. If a timer
    /// callback fails, the error comes back with the events collected up
    /// to that point. Never blocks.
    pub fn poll(&mut self) -> Result<EventBatch, PollError<C::Error>> {
        let now_ms = self.clock.now_ms();
        let mut events = EventBatch::new();

        // The batch always has room for the three input events,
        // so the pushes below cannot fail.
        self.encoder.refresh();
        let position = self.encoder.position();
        if position != self.cache.position {
            let _ = events.push(Event::EncoderRotated {
                position,
                previous_position: self.cache.position,
            });
            self.cache.position = position;
        }

        let pressed = self.button.update(now_ms);
        if pressed != self.cache.button {
            let _ = events.push(Event::EncoderButton { pressed });
            self.cache.button = pressed;
        }

        self.keys.scan(now_ms);
        if let Some(key) = self.keys.poll_one() {
            let _ = events.push(Event::KeyChanged {
                key_index: key.key_index,
                pressed: key.pressed,
            });
        }

        match self.timers.run_due(now_ms, &mut events) {
            Ok(_) => Ok(events),
            Err(source) => Err(PollError { events, source }),
        }
    }

    /// Endless stream of poll cycles
    ///
    /// Each `next()` runs exactly one [`poll`](Self::poll) and yields its
    /// batch, empty or not, so the caller's loop keeps bounded latency for
    /// whatever else it services. The iterator never ends.
    pub fn events(&mut self) -> Events<'_, E, B, K, T, C> {
        Events { mux: self }
    }

    /// Schedule a timer `delay_ms` from now
    pub fn schedule(&mut self, delay_ms: u64, callback: C) -> Result<TimerHandle, TimerError> {
        let now_ms = self.clock.now_ms();
        self.timers.schedule(now_ms, delay_ms, callback)
    }

    /// Cancel a pending timer; false if it already fired or is unknown
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.timers.cancel(handle)
    }
}

impl<E, B, K, T, C> EventMultiplexer<E, B, K, T, C> {
    /// Last reported encoder position and button state
    pub fn snapshot(&self) -> EncoderSnapshot {
        self.cache
    }

    /// Pending timers
    pub fn timers(&self) -> &TimerRegistry<C> {
        &self.timers
    }

    /// Key source, e.g. to feed a queue from an external driver
    pub fn keys_mut(&mut self) -> &mut K {
        &mut self.keys
    }
}

/// Iterator returned by [`EventMultiplexer::events`]
pub struct Events<'a, E, B, K, T, C> {
    mux: &'a mut EventMultiplexer<E, B, K, T, C>,
}

impl<E, B, K, T, C> Iterator for Events<'_, E, B, K, T, C>
where
    E: PositionCounter,
    B: InputPin,
    K: KeyScanner,
    T: Clock,
    C: TimerCallback,
{
    type Item = Result<EventBatch, PollError<C::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.mux.poll())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}
