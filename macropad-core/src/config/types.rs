//! Configuration type definitions

use macropad_hal::UartConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of keys on the pad
pub const NUM_KEYS: usize = 12;

/// Display orientation in degrees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }
}

/// MIDI channels used by the pad (1-16)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MidiConfig {
    pub in_channel: u8,
    pub out_channel: u8,
}

impl Default for MidiConfig {
    fn default() -> Self {
        Self {
            in_channel: 1,
            out_channel: 1,
        }
    }
}

/// Serial link settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SerialConfig {
    /// Line settings
    pub uart: UartConfig,
    /// Bytes requested per read step
    pub read_chunk: usize,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            uart: UartConfig::default(),
            read_chunk: 32,
        }
    }
}

/// Pad configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PadConfig {
    /// Debounce window for keys and the encoder button (ms)
    pub debounce_ms: u32,
    /// Delay between poll cycles (ms)
    pub poll_interval_ms: u32,
    pub serial: SerialConfig,
    /// Display rotation, not used by the input core
    pub rotation: Rotation,
    /// MIDI channels, not used by the input core
    pub midi: MidiConfig,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 5,
            poll_interval_ms: 1,
            serial: SerialConfig::default(),
            rotation: Rotation::Deg0,
            midi: MidiConfig::default(),
        }
    }
}

impl PadConfig {
    /// Check ranges that the hardware cannot honor
    pub fn is_valid(&self) -> bool {
        let midi_ok = |ch: u8| (1..=16).contains(&ch);
        self.poll_interval_ms > 0
            && self.serial.uart.baudrate > 0
            && self.serial.read_chunk > 0
            && self.serial.read_chunk <= crate::serial::MAX_CHUNK_SIZE
            && midi_ok(self.midi.in_channel)
            && midi_ok(self.midi.out_channel)
    }
}
