//! Wrap-safe deadlines over the `u32` microsecond counter
//!
//! Elapsed time is `now.wrapping_sub(start)`, which stays exact across a
//! counter wrap as long as the interval is shorter than 2^32 µs.
//! Durations are capped at `i32::MAX` µs (about 35 minutes).

/// Longest duration a deadline accepts
pub const MAX_DURATION_US: u32 = i32::MAX as u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Deadline {
    start: u32,
    duration_us: u32,
}

impl Deadline {
    /// Deadline `duration_us` after `now_us`
    pub fn new(now_us: u32, duration_us: u32) -> Self {
        Self {
            start: now_us,
            duration_us: duration_us.min(MAX_DURATION_US),
        }
    }

    pub fn duration_us(&self) -> u32 {
        self.duration_us
    }

    /// Time since the deadline was started
    pub fn elapsed_us(&self, now_us: u32) -> u32 {
        now_us.wrapping_sub(self.start)
    }

    pub fn is_expired(&self, now_us: u32) -> bool {
        self.elapsed_us(now_us) >= self.duration_us
    }

    /// Time left, zero once expired
    pub fn remaining_us(&self, now_us: u32) -> u32 {
        self.duration_us.saturating_sub(self.elapsed_us(now_us))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_expiry() {
        let d = Deadline::new(1_000, 500);
        assert!(!d.is_expired(1_000));
        assert!(!d.is_expired(1_499));
        assert!(d.is_expired(1_500));
        assert_eq!(d.remaining_us(1_200), 300);
        assert_eq!(d.remaining_us(9_000), 0);
    }

    #[test]
    fn test_expiry_across_counter_wrap() {
        let start = u32::MAX - 100;
        let d = Deadline::new(start, 1_000);

        // 50 µs after wrap: 151 µs elapsed
        assert!(!d.is_expired(50));
        assert_eq!(d.elapsed_us(50), 151);
        assert_eq!(d.remaining_us(50), 849);
        assert!(d.is_expired(899));
        assert!(!d.is_expired(898));
    }

    #[test]
    fn test_zero_duration_is_already_expired() {
        assert!(Deadline::new(42, 0).is_expired(42));
    }

    #[test]
    fn test_duration_capped() {
        let d = Deadline::new(0, u32::MAX);
        assert_eq!(d.duration_us(), MAX_DURATION_US);
    }
}
