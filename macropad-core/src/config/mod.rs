//! Configuration types
//!
//! Board-level settings with compiled-in defaults, plus the boot mode
//! decision.

pub mod boot;
pub mod types;

pub use boot::*;
pub use types::*;
