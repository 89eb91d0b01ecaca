//! Cycle and pulse time calculations
//!
//! One four-stroke cycle spans 720° (two crankshaft revolutions), so at
//! `rpm` it lasts `60 / (rpm / 2)` seconds.

/// Microseconds in a 720° cycle at 1 RPM (60 s × 2 revolutions)
const CYCLE_US_AT_1_RPM: u32 = 120_000_000;

/// Duration of one 720° cycle in microseconds
///
/// Returns 0 for `rpm == 0`.
pub fn cycle_duration_us(rpm: u32) -> u32 {
    CYCLE_US_AT_1_RPM.checked_div(rpm).unwrap_or(0)
}

/// Injector open time for `duty_percent` of a cycle, truncated toward zero
///
/// Duty above 100% is treated as 100%.
pub fn injector_open_us(rpm: u32, duty_percent: u32) -> u32 {
    let cycle = u64::from(cycle_duration_us(rpm));
    let duty = u64::from(duty_percent.min(100));
    // cycle * duty / 100 <= cycle, which fits in u32
    (cycle * duty / 100) as u32
}

/// Open/close split of one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseTiming {
    pub cycle_us: u32,
    pub open_us: u32,
    pub close_us: u32,
}

impl PulseTiming {
    /// Compute the split for a speed and duty cycle
    pub fn for_rpm(rpm: u32, duty_percent: u32) -> Self {
        let cycle_us = cycle_duration_us(rpm);
        let open_us = injector_open_us(rpm, duty_percent);
        Self {
            cycle_us,
            open_us,
            close_us: cycle_us.saturating_sub(open_us),
        }
    }
}
