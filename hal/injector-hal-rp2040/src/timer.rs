//! Microsecond timebase on the embassy time driver

use embassy_time::{block_for, Duration, Instant};
use injector_hal::timer::Timebase;

/// Timebase backed by the RP2040 64-bit timer
///
/// The timer itself never wraps; the low 32 bits handed out by `now_us`
/// wrap every ~71.6 minutes like any other microsecond counter.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyTimebase;

impl EmbassyTimebase {
    pub fn new() -> Self {
        Self
    }
}

impl Timebase for EmbassyTimebase {
    const MAX_DELAY_US: u32 = u32::MAX;

    fn now_us(&self) -> u32 {
        Instant::now().as_micros() as u32
    }

    fn delay_us(&mut self, us: u32) {
        block_for(Duration::from_micros(u64::from(us)));
    }
}
