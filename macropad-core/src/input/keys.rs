//! Key transition queue and direct-pin key scanner
//!
//! Transitions are queued oldest first and handed out one at a time. The
//! scanner compares each key's debounced state against the last state it
//! *queued*, not the last state it saw, so when the queue is full a change
//! simply stays pending until there is room. Nothing is dropped and
//! nothing is reordered.

use heapless::Deque;
use macropad_hal::{ActiveLevel, InputPin};

use crate::input::debounce::DebouncedInput;
use crate::traits::{KeyScanner, KeyTransition};

/// Maximum queued key transitions
pub const KEY_QUEUE_CAPACITY: usize = 32;

/// FIFO of pending key transitions
#[derive(Debug, Default)]
pub struct KeyQueue {
    pending: Deque<KeyTransition, KEY_QUEUE_CAPACITY>,
}

impl KeyQueue {
    /// Create an empty queue
    pub const fn new() -> Self {
        Self {
            pending: Deque::new(),
        }
    }

    /// Append a transition
    ///
    /// Hands the transition back if the queue is full.
    pub fn push(&mut self, transition: KeyTransition) -> Result<(), KeyTransition> {
        self.pending.push_back(transition)
    }

    /// Number of queued transitions
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.pending.is_full()
    }

    /// Oldest queued transition, without removing it
    pub fn peek(&self) -> Option<&KeyTransition> {
        self.pending.front()
    }
}

impl KeyScanner for KeyQueue {
    fn poll_one(&mut self) -> Option<KeyTransition> {
        self.pending.pop_front()
    }
}

/// Scanner for keys wired one switch per GPIO
///
/// Each key gets its own debounce filter. `N` is the number of keys; key
/// indices follow the order of the pin array.
pub struct DirectPinScanner<P, const N: usize> {
    keys: [DebouncedInput<P>; N],
    queued: [bool; N],
    queue: KeyQueue,
}

impl<P: InputPin, const N: usize> DirectPinScanner<P, N> {
    /// Create a scanner, taking each key's current level as its idle state
    ///
    /// Keys held at construction do not produce a press transition.
    pub fn new(pins: [P; N], level: ActiveLevel, window_ms: u32) -> Self {
        let keys = pins.map(|pin| DebouncedInput::new(pin, level, window_ms));
        let mut queued = [false; N];
        for (slot, key) in queued.iter_mut().zip(keys.iter()) {
            *slot = key.read();
        }
        Self {
            keys,
            queued,
            queue: KeyQueue::new(),
        }
    }

    /// Sample every key and queue debounced changes in key order
    ///
    /// Returns how many transitions were queued.
    pub fn scan_keys(&mut self, now_ms: u64) -> usize {
        let mut queued = 0;
        for (index, key) in self.keys.iter_mut().enumerate() {
            let state = key.update(now_ms);
            if state == self.queued[index] {
                continue;
            }
            let transition = KeyTransition {
                key_index: index as u8,
                pressed: state,
            };
            if self.queue.push(transition).is_err() {
                // Full: this key and any later ones are retried on the next scan
                break;
            }
            self.queued[index] = state;
            queued += 1;
        }
        queued
    }

    /// Debounced state of one key
    pub fn is_pressed(&self, key_index: usize) -> bool {
        self.keys.get(key_index).map_or(false, |key| key.read())
    }

    /// Number of transitions waiting to be polled
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl<P: InputPin, const N: usize> KeyScanner for DirectPinScanner<P, N> {
    fn scan(&mut self, now_ms: u64) {
        self.scan_keys(now_ms);
    }

    fn poll_one(&mut self) -> Option<KeyTransition> {
        self.queue.poll_one()
    }
}
