//! Leaf input components
//!
//! Software implementations of the input sources the multiplexer polls.

pub mod debounce;
pub mod encoder;
pub mod keys;

pub use debounce::DebouncedInput;
pub use encoder::{Direction, QuadratureDecoder};
pub use keys::{DirectPinScanner, KeyQueue, KEY_QUEUE_CAPACITY};
