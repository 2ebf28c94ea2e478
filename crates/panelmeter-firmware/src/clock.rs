//! Embassy-backed implementation of the core clock trait.

use embassy_time::{block_for, Duration, Instant};
use panelmeter_core::ui::Clock;

/// Millisecond clock over the embassy time driver. The blocking delay is
/// deliberate: widget poll loops own the single thread of control while
/// they run, matching the display bus timing they were written for.
#[derive(Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u32 {
        Instant::now().as_millis() as u32
    }

    fn delay_ms(&self, ms: u32) {
        block_for(Duration::from_millis(ms as u64));
    }
}
