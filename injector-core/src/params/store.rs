//! Typed parameter records and the store that owns them

use super::field::FieldId;
use super::{Mode, StepDirection};

/// Leak test parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LeakTestParams {
    pub(crate) seconds: i32,
}

impl LeakTestParams {
    /// Pump run time
    pub fn seconds(&self) -> i32 {
        self.seconds
    }
}

/// Constant-RPM parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RpmParams {
    pub(crate) seconds: i32,
    pub(crate) rpm: i32,
    pub(crate) duty: i16,
}

impl RpmParams {
    /// Pulsing time, excluding pump stabilization
    pub fn seconds(&self) -> i32 {
        self.seconds
    }

    /// Simulated engine speed
    pub fn rpm(&self) -> i32 {
        self.rpm
    }

    /// Injector duty cycle (%) of a 720° cycle
    pub fn duty(&self) -> i16 {
        self.duty
    }
}

/// Full-flow parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FullFlowParams {
    pub(crate) seconds: i32,
}

impl FullFlowParams {
    /// Time injectors are held open
    pub fn seconds(&self) -> i32 {
        self.seconds
    }
}

/// Discrete pulse parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmParams {
    pub(crate) pulses: i32,
    pub(crate) pulse_width_us: i64,
}

impl PwmParams {
    /// Number of pulses fired
    pub fn pulses(&self) -> i32 {
        self.pulses
    }

    /// Open time of each pulse
    pub fn pulse_width_us(&self) -> i64 {
        self.pulse_width_us
    }
}

/// All parameter records
///
/// Every field is kept inside its declared range: edits saturate, and
/// images loaded from storage are clamped on the way in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParameterStore {
    pub(crate) leak: LeakTestParams,
    pub(crate) rpm: RpmParams,
    pub(crate) full_flow: FullFlowParams,
    pub(crate) pwm: PwmParams,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::factory()
    }
}

impl ParameterStore {
    /// Store holding every field's factory default
    pub fn factory() -> Self {
        let mut store = Self {
            leak: LeakTestParams { seconds: 0 },
            rpm: RpmParams {
                seconds: 0,
                rpm: 0,
                duty: 0,
            },
            full_flow: FullFlowParams { seconds: 0 },
            pwm: PwmParams {
                pulses: 0,
                pulse_width_us: 0,
            },
        };
        store.reset_to_defaults();
        store
    }

    /// Re-initialize every record to its factory defaults
    pub fn reset_to_defaults(&mut self) {
        for id in FieldId::ALL {
            let descriptor = id.descriptor();
            descriptor.set(self, descriptor.range.default);
        }
    }

    pub fn leak_test(&self) -> &LeakTestParams {
        &self.leak
    }

    pub fn rpm(&self) -> &RpmParams {
        &self.rpm
    }

    pub fn full_flow(&self) -> &FullFlowParams {
        &self.full_flow
    }

    pub fn pwm(&self) -> &PwmParams {
        &self.pwm
    }

    /// Number of editable fields in `mode`
    pub fn field_count(mode: Mode) -> usize {
        mode.field_count()
    }

    /// Value of the `index`th field of `mode`
    ///
    /// Returns `None` if the mode has no such field.
    pub fn get(&self, mode: Mode, index: usize) -> Option<i64> {
        mode.fields().get(index).map(|d| d.get(self))
    }

    /// Step the `index`th field of `mode` by one step and return the new value
    ///
    /// The result saturates at the field's bounds. Returns `None` if the
    /// mode has no such field.
    pub fn step(&mut self, mode: Mode, index: usize, direction: StepDirection) -> Option<i64> {
        let descriptor = mode.fields().get(index)?;
        let current = descriptor.get(self);
        let target = current.saturating_add(direction.delta(descriptor.range.step));
        Some(descriptor.set(self, target))
    }

    /// Value of a field
    pub fn value(&self, field: FieldId) -> i64 {
        field.descriptor().get(self)
    }

    /// Set a field, saturating into its range, and return what was stored
    pub fn set(&mut self, field: FieldId, value: i64) -> i64 {
        field.descriptor().set(self, value)
    }

    /// Clamp every field into its range
    ///
    /// Returns `true` if any field had to be changed.
    pub fn sanitize(&mut self) -> bool {
        let mut changed = false;
        for id in FieldId::ALL {
            let raw = self.value(id);
            if self.set(id, raw) != raw {
                warn!("clamped out-of-range field {}", id.descriptor().label);
                changed = true;
            }
        }
        changed
    }

    /// Check that every field lies in its range
    pub fn is_valid(&self) -> bool {
        FieldId::ALL
            .into_iter()
            .all(|id| id.range().contains(self.value(id)))
    }
}
