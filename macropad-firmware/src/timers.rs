//! Firmware timers
//!
//! Callbacks the poll loop fires through the core's timer registry.

use defmt::*;
use macropad_core::timer::{TimerCallback, TimerContext, TimerError};

/// Interval between heartbeat log lines
pub const HEARTBEAT_INTERVAL_MS: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum FirmwareTimer {
    /// Periodic liveness log, rearms itself
    Heartbeat { count: u32 },
}

impl TimerCallback for FirmwareTimer {
    type Error = TimerError;

    fn fire(self, ctx: &mut TimerContext<'_, Self>) -> Result<(), TimerError> {
        match self {
            FirmwareTimer::Heartbeat { count } => {
                debug!("Heartbeat #{} at {} ms", count, ctx.now_ms());
                ctx.schedule(
                    HEARTBEAT_INTERVAL_MS,
                    FirmwareTimer::Heartbeat {
                        count: count.wrapping_add(1),
                    },
                )?;
            }
        }
        Ok(())
    }
}
