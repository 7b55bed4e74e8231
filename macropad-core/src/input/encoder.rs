//! Software quadrature decoding
//!
//! Counts detents from the two phase lines of a mechanical rotary encoder.
//!
//! With pull-ups, a detent rests at A=1, B=1. One detent clockwise walks
//! (1,1) → (0,1) → (0,0) → (1,0) → (1,1), counter-clockwise walks the
//! mirror image. A detent only counts when the full cycle completes in one
//! direction. Backing out at any point, from either side of the bottom,
//! drops the partial step, which rejects contact bounce and half turns.

use macropad_hal::InputPin;

use crate::traits::PositionCounter;

/// Rotation direction of a completed detent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    /// Position change for one detent in this direction
    pub fn delta(self) -> i32 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }

    /// (A, B) on the way down from rest
    fn leaving(self) -> (bool, bool) {
        match self {
            Direction::Clockwise => (false, true),
            Direction::CounterClockwise => (true, false),
        }
    }

    /// (A, B) on the way back up to rest
    fn arriving(self) -> (bool, bool) {
        let (a, b) = self.leaving();
        (b, a)
    }
}

/// Decoder progress through one detent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Rest,
    Leaving(Direction),
    Bottom(Direction),
    Arriving(Direction),
}

impl Phase {
    /// Advance on a new (A, B) sample; yields a direction when a detent completes
    fn step(self, a: bool, b: bool) -> (Phase, Option<Direction>) {
        let lines = (a, b);
        match (self, a, b) {
            (Phase::Rest, _, _) if lines == Direction::Clockwise.leaving() => {
                (Phase::Leaving(Direction::Clockwise), None)
            }
            (Phase::Rest, _, _) if lines == Direction::CounterClockwise.leaving() => {
                (Phase::Leaving(Direction::CounterClockwise), None)
            }
            (Phase::Rest, _, _) => (Phase::Rest, None),

            (Phase::Leaving(dir), false, false) => (Phase::Bottom(dir), None),
            (Phase::Leaving(_), true, true) => (Phase::Rest, None),
            (Phase::Leaving(dir), _, _) => (Phase::Leaving(dir), None),

            (Phase::Bottom(dir), _, _) if lines == dir.arriving() => (Phase::Arriving(dir), None),
            (Phase::Bottom(dir), _, _) if lines == dir.leaving() => (Phase::Leaving(dir), None),
            // Both lines jumped at once: direction unknown
            (Phase::Bottom(_), true, true) => (Phase::Rest, None),
            (Phase::Bottom(dir), _, _) => (Phase::Bottom(dir), None),

            (Phase::Arriving(dir), true, true) => (Phase::Rest, Some(dir)),
            (Phase::Arriving(dir), false, false) => (Phase::Bottom(dir), None),
            (Phase::Arriving(dir), _, _) => (Phase::Arriving(dir), None),
        }
    }
}

/// Quadrature decoder over two phase pins
pub struct QuadratureDecoder<A, B> {
    a: A,
    b: B,
    phase: Phase,
    last: (bool, bool),
    position: i32,
}

impl<A: InputPin, B: InputPin> QuadratureDecoder<A, B> {
    /// Create a decoder starting at position 0
    pub fn new(a: A, b: B) -> Self {
        let last = (a.is_high(), b.is_high());
        Self {
            a,
            b,
            phase: Phase::Rest,
            last,
            position: 0,
        }
    }

    /// Sample both lines; returns the direction of a completed detent
    ///
    /// Should be called every 1-2 ms while the knob can turn.
    pub fn sample(&mut self) -> Option<Direction> {
        let now = (self.a.is_high(), self.b.is_high());
        if now == self.last {
            return None;
        }
        self.last = now;

        let (phase, detent) = self.phase.step(now.0, now.1);
        self.phase = phase;

        if let Some(dir) = detent {
            self.position = self.position.wrapping_add(dir.delta());
        }
        detent
    }

    /// Net detents since construction
    pub fn position(&self) -> i32 {
        self.position
    }
}

impl<A: InputPin, B: InputPin> PositionCounter for QuadratureDecoder<A, B> {
    fn refresh(&mut self) {
        self.sample();
    }

    fn position(&self) -> i32 {
        self.position
    }
}
