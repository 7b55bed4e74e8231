//! Input source traits
//!
//! These traits define the interface between the event multiplexer and
//! the leaf input components, whether implemented in software here or by
//! an external driver.

pub mod input;

pub use input::{KeyScanner, KeyTransition, PositionCounter};
