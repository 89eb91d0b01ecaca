//! Configuration type definitions

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Longest delay any timing field may hold (one minute)
pub const MAX_DELAY_MS: u32 = 60_000;

/// Timing of the test procedures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RunTimings {
    /// Pump-only pressure build-up before injectors fire (ms)
    pub stabilize_ms: u32,
    /// Pause between PWM pulses (ms)
    pub pulse_gap_ms: u32,
    /// Status line refresh interval while a timed run is active (ms)
    pub status_poll_ms: u32,
}

impl Default for RunTimings {
    fn default() -> Self {
        Self {
            stabilize_ms: 2_000,
            pulse_gap_ms: 500,
            status_poll_ms: 100,
        }
    }
}

/// Button hold timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UiTimings {
    /// Auto-repeat interval for held Up/Down (µs)
    pub repeat_us: u32,
    /// Auto-repeat interval on fast-moving fields (µs)
    pub fast_repeat_us: u32,
    /// How long Select must be held to save (µs)
    pub save_hold_us: u32,
}

impl Default for UiTimings {
    fn default() -> Self {
        Self {
            repeat_us: 300_000,
            fast_repeat_us: 100_000,
            save_hold_us: 1_000_000,
        }
    }
}

/// How long each full-screen notice stays up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NoticeTimings {
    /// "Saving settings" (ms)
    pub saving_ms: u32,
    /// "Loading settings" (ms)
    pub loading_ms: u32,
    /// "RESETTING" (ms)
    pub resetting_ms: u32,
}

impl Default for NoticeTimings {
    fn default() -> Self {
        Self {
            saving_ms: 5_000,
            loading_ms: 1_000,
            resetting_ms: 3_000,
        }
    }
}

/// Complete tester configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TesterConfig {
    pub run: RunTimings,
    pub ui: UiTimings,
    pub notice: NoticeTimings,
}

/// Reasons a configuration is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Status poll interval is zero
    ZeroPollInterval,
    /// Auto-repeat interval is zero
    ZeroRepeatInterval,
    /// Fast auto-repeat is not faster than the normal one
    FastRepeatNotFaster,
    /// A delay exceeds [`MAX_DELAY_MS`]
    DelayTooLong(&'static str),
}

impl TesterConfig {
    /// Check the configuration for values the tester cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.run.status_poll_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.ui.fast_repeat_us == 0 {
            return Err(ConfigError::ZeroRepeatInterval);
        }
        if self.ui.fast_repeat_us >= self.ui.repeat_us {
            return Err(ConfigError::FastRepeatNotFaster);
        }

        let ms_fields = [
            ("run.stabilize_ms", self.run.stabilize_ms),
            ("run.pulse_gap_ms", self.run.pulse_gap_ms),
            ("run.status_poll_ms", self.run.status_poll_ms),
            ("notice.saving_ms", self.notice.saving_ms),
            ("notice.loading_ms", self.notice.loading_ms),
            ("notice.resetting_ms", self.notice.resetting_ms),
        ];
        for (name, ms) in ms_fields {
            if ms > MAX_DELAY_MS {
                return Err(ConfigError::DelayTooLong(name));
            }
        }

        let us_fields = [
            ("ui.repeat_us", self.ui.repeat_us),
            ("ui.fast_repeat_us", self.ui.fast_repeat_us),
            ("ui.save_hold_us", self.ui.save_hold_us),
        ];
        for (name, us) in us_fields {
            if u64::from(us) > u64::from(MAX_DELAY_MS) * 1000 {
                return Err(ConfigError::DelayTooLong(name));
            }
        }

        Ok(())
    }
}
