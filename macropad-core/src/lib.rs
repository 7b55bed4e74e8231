//! Board-agnostic input core for the Macropad firmware
//!
//! This crate turns raw, noisy input hardware into a clean, ordered
//! stream of typed events. It contains no chip-specific code:
//!
//! - Input source traits (position counter, key scanner)
//! - Debounced digital inputs
//! - Software quadrature decoding
//! - Key transition queue and direct-pin key scanner
//! - One-shot timer registry
//! - Event multiplexer (the per-tick poll step)
//! - Serial byte channel
//! - Configuration type definitions
//!
//! # Execution model
//!
//! Everything here is driven from a single cooperative loop. No function
//! blocks, nothing is shared between tasks, and all mutation goes through
//! `&mut self`. Calling into the same multiplexer from two execution
//! contexts is not supported.

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod event;
pub mod input;
pub mod mux;
pub mod serial;
pub mod timer;
pub mod traits;

pub use event::{Event, EventBatch, MAX_POLL_EVENTS};
pub use mux::{EventMultiplexer, Events, PollError};
