//! Parameter model
//!
//! One typed record per test mode. Every field carries a declared
//! `[min, max]` range and step; all mutations saturate into the range.
//! Field access from the UI goes through a per-mode descriptor table
//! indexed by the selected field.

pub mod field;
pub mod store;

pub use field::{FieldDescriptor, FieldId, FieldRange};
pub use store::{FullFlowParams, LeakTestParams, ParameterStore, PwmParams, RpmParams};

/// Test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Pump only, injectors closed
    #[default]
    LeakTest,
    /// Injectors pulsed at a simulated engine speed and duty cycle
    Rpm,
    /// Injectors held fully open
    FullFlow,
    /// Fixed number of discrete pulses
    Pwm,
}

impl Mode {
    /// All modes in selection order
    pub const ALL: [Mode; 4] = [Mode::LeakTest, Mode::Rpm, Mode::FullFlow, Mode::Pwm];

    /// Cyclic successor (Leak → Rpm → FullFlow → Pwm → Leak)
    pub fn next(self) -> Mode {
        match self {
            Mode::LeakTest => Mode::Rpm,
            Mode::Rpm => Mode::FullFlow,
            Mode::FullFlow => Mode::Pwm,
            Mode::Pwm => Mode::LeakTest,
        }
    }

    /// Title shown on the top display line
    pub fn title(self) -> &'static str {
        match self {
            Mode::LeakTest => "Leak Test Mode",
            Mode::Rpm => "RPM Mode",
            Mode::FullFlow => "Full Flow Mode",
            Mode::Pwm => "PWM Mode",
        }
    }

    /// Editable fields of this mode, in selection order
    pub fn fields(self) -> &'static [FieldDescriptor] {
        field::fields_of(self)
    }

    /// Number of editable fields
    pub fn field_count(self) -> usize {
        self.fields().len()
    }
}

/// Direction of a parameter step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepDirection {
    Increase,
    Decrease,
}

impl StepDirection {
    fn sign(self) -> i64 {
        match self {
            StepDirection::Increase => 1,
            StepDirection::Decrease => -1,
        }
    }

    /// Signed change for a field with the given step size
    pub fn delta(self, step: i64) -> i64 {
        self.sign().saturating_mul(step)
    }
}
