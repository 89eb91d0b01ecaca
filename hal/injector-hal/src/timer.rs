//! Microsecond timebase
//!
//! The tester runs a single blocking control loop, so all timing goes
//! through one shared clock and one blocking wait primitive.

/// Free-running microsecond clock with a bounded blocking delay
pub trait Timebase {
    /// Longest single wait `delay_us` accepts
    ///
    /// Platforms whose busy-wait primitive has a short ceiling set this to
    /// that ceiling; [`Timebase::sleep_us`] loops in chunks no longer than
    /// this value. Must be at least 1.
    const MAX_DELAY_US: u32;

    /// Current value of the microsecond counter
    ///
    /// The counter wraps at `u32::MAX`. Compare timestamps with
    /// `wrapping_sub`, never with plain `<`/`>`.
    fn now_us(&self) -> u32;

    /// Block for `us` microseconds (`us <= MAX_DELAY_US`)
    fn delay_us(&mut self, us: u32);

    /// Block for an arbitrary number of microseconds
    fn sleep_us(&mut self, us: u64) {
        let chunk_max = u64::from(Self::MAX_DELAY_US.max(1));
        let mut remaining = us;
        while remaining > 0 {
            let chunk = remaining.min(chunk_max);
            self.delay_us(chunk as u32);
            remaining -= chunk;
        }
    }

    /// Block for an arbitrary number of milliseconds
    fn sleep_ms(&mut self, ms: u32) {
        self.sleep_us(u64::from(ms) * 1000);
    }
}
