//! Embassy async tasks

pub mod pad;

pub use pad::{pad_task, PadMux, PadSerial};
