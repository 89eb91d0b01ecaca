//! Field descriptor tables

use super::store::ParameterStore;
use super::Mode;

/// Declared value range of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FieldRange {
    /// Factory default
    pub default: i64,
    pub min: i64,
    pub max: i64,
    /// Change applied by one Up/Down press
    pub step: i64,
}

impl FieldRange {
    /// Saturate `value` into `[min, max]`
    pub const fn clamp(&self, value: i64) -> i64 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Check whether `value` lies inside the range
    pub const fn contains(&self, value: i64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Identity of every editable field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldId {
    LeakSeconds,
    RpmSeconds,
    RpmSpeed,
    RpmDuty,
    FullFlowSeconds,
    PwmPulses,
    PwmPulseWidth,
}

impl FieldId {
    /// Every field, grouped by mode in selection order
    pub const ALL: [FieldId; 7] = [
        FieldId::LeakSeconds,
        FieldId::RpmSeconds,
        FieldId::RpmSpeed,
        FieldId::RpmDuty,
        FieldId::FullFlowSeconds,
        FieldId::PwmPulses,
        FieldId::PwmPulseWidth,
    ];

    /// Mode this field belongs to
    pub fn mode(self) -> Mode {
        match self {
            FieldId::LeakSeconds => Mode::LeakTest,
            FieldId::RpmSeconds | FieldId::RpmSpeed | FieldId::RpmDuty => Mode::Rpm,
            FieldId::FullFlowSeconds => Mode::FullFlow,
            FieldId::PwmPulses | FieldId::PwmPulseWidth => Mode::Pwm,
        }
    }

    /// Descriptor for this field
    pub fn descriptor(self) -> &'static FieldDescriptor {
        let table = fields_of(self.mode());
        let index = match self {
            FieldId::LeakSeconds
            | FieldId::RpmSeconds
            | FieldId::FullFlowSeconds
            | FieldId::PwmPulses => 0,
            FieldId::RpmSpeed | FieldId::PwmPulseWidth => 1,
            FieldId::RpmDuty => 2,
        };
        &table[index]
    }

    /// Declared range of this field
    pub fn range(self) -> FieldRange {
        self.descriptor().range
    }
}

/// Uniform access to one field of the parameter store
pub struct FieldDescriptor {
    pub id: FieldId,
    /// Short name for logs
    pub label: &'static str,
    pub range: FieldRange,
    /// Held Up/Down repeats at the fast interval
    pub fast_repeat: bool,
    get: fn(&ParameterStore) -> i64,
    put: fn(&mut ParameterStore, i64),
}

impl FieldDescriptor {
    /// Current value of the field
    pub fn get(&self, store: &ParameterStore) -> i64 {
        (self.get)(store)
    }

    /// Store `value` saturated into the declared range, returning what was stored
    pub fn set(&self, store: &mut ParameterStore, value: i64) -> i64 {
        let clamped = self.range.clamp(value);
        (self.put)(store, clamped);
        clamped
    }
}

impl core::fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("id", &self.id)
            .field("range", &self.range)
            .field("fast_repeat", &self.fast_repeat)
            .finish()
    }
}

// `put` only ever receives values already clamped into the field's range,
// and every range fits the record's storage type.

static LEAK_FIELDS: [FieldDescriptor; 1] = [FieldDescriptor {
    id: FieldId::LeakSeconds,
    label: "leak.seconds",
    range: FieldRange {
        default: 60,
        min: 10,
        max: 300,
        step: 10,
    },
    fast_repeat: false,
    get: |s| i64::from(s.leak.seconds),
    put: |s, v| s.leak.seconds = v as i32,
}];

static RPM_FIELDS: [FieldDescriptor; 3] = [
    FieldDescriptor {
        id: FieldId::RpmSeconds,
        label: "rpm.seconds",
        range: FieldRange {
            default: 15,
            min: 5,
            max: 60,
            step: 1,
        },
        fast_repeat: false,
        get: |s| i64::from(s.rpm.seconds),
        put: |s, v| s.rpm.seconds = v as i32,
    },
    FieldDescriptor {
        id: FieldId::RpmSpeed,
        label: "rpm.rpm",
        range: FieldRange {
            default: 1000,
            min: 600,
            max: 6000,
            step: 200,
        },
        fast_repeat: false,
        get: |s| i64::from(s.rpm.rpm),
        put: |s, v| s.rpm.rpm = v as i32,
    },
    FieldDescriptor {
        id: FieldId::RpmDuty,
        label: "rpm.duty",
        range: FieldRange {
            default: 50,
            min: 1,
            max: 99,
            step: 1,
        },
        fast_repeat: true,
        get: |s| i64::from(s.rpm.duty),
        put: |s, v| s.rpm.duty = v as i16,
    },
];

static FULL_FLOW_FIELDS: [FieldDescriptor; 1] = [FieldDescriptor {
    id: FieldId::FullFlowSeconds,
    label: "fullflow.seconds",
    range: FieldRange {
        default: 10,
        min: 1,
        max: 30,
        step: 1,
    },
    fast_repeat: false,
    get: |s| i64::from(s.full_flow.seconds),
    put: |s, v| s.full_flow.seconds = v as i32,
}];

static PWM_FIELDS: [FieldDescriptor; 2] = [
    FieldDescriptor {
        id: FieldId::PwmPulses,
        label: "pwm.pulses",
        range: FieldRange {
            default: 30,
            min: 1,
            max: 100,
            step: 1,
        },
        fast_repeat: false,
        get: |s| i64::from(s.pwm.pulses),
        put: |s, v| s.pwm.pulses = v as i32,
    },
    FieldDescriptor {
        id: FieldId::PwmPulseWidth,
        label: "pwm.pulse_width_us",
        range: FieldRange {
            default: 1000,
            min: 100,
            max: 1_000_000,
            step: 10,
        },
        fast_repeat: true,
        get: |s| s.pwm.pulse_width_us,
        put: |s, v| s.pwm.pulse_width_us = v,
    },
];

pub(crate) fn fields_of(mode: Mode) -> &'static [FieldDescriptor] {
    match mode {
        Mode::LeakTest => &LEAK_FIELDS,
        Mode::Rpm => &RPM_FIELDS,
        Mode::FullFlow => &FULL_FLOW_FIELDS,
        Mode::Pwm => &PWM_FIELDS,
    }
}
