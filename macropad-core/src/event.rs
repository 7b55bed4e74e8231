//! Events produced by the input core

use heapless::Vec;

/// Maximum events a single poll cycle can produce
///
/// One rotation, one button change and one key transition, plus room for
/// whatever the due timers emit.
pub const MAX_POLL_EVENTS: usize = 32;

/// Ordered events from one poll cycle
pub type EventBatch = Vec<Event, MAX_POLL_EVENTS>;

/// Input events, in the order a poll cycle emits them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Encoder moved since the previous poll
    EncoderRotated {
        /// Fresh position
        position: i32,
        /// Position reported by the previous rotation event (or at startup)
        previous_position: i32,
    },
    /// Encoder push button pressed or released (debounced)
    EncoderButton { pressed: bool },
    /// Key matrix transition
    KeyChanged { key_index: u8, pressed: bool },
}

impl Event {
    /// Returns true if this event came from the encoder or its button
    pub fn is_encoder(&self) -> bool {
        matches!(
            self,
            Event::EncoderRotated { .. } | Event::EncoderButton { .. }
        )
    }

    /// Returns true if this is a key matrix event
    pub fn is_key(&self) -> bool {
        matches!(self, Event::KeyChanged { .. })
    }

    /// Net detents moved by a rotation event (positive = clockwise)
    pub fn rotation_delta(&self) -> i32 {
        match *self {
            Event::EncoderRotated {
                position,
                previous_position,
            } => position.wrapping_sub(previous_position),
            _ => 0,
        }
    }

    /// Press state carried by button and key events
    pub fn pressed(&self) -> Option<bool> {
        match *self {
            Event::EncoderButton { pressed } | Event::KeyChanged { pressed, .. } => Some(pressed),
            Event::EncoderRotated { .. } => None,
        }
    }
}
