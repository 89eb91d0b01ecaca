//! Injector timing
//!
//! Pure conversions from engine speed and duty cycle to open/close times,
//! a wrap-safe deadline over the microsecond counter, and the blocking
//! test procedures that drive the actuators.

pub mod calc;
pub mod deadline;
pub mod engine;

pub use calc::{cycle_duration_us, injector_open_us, PulseTiming};
pub use deadline::Deadline;
pub use engine::{Bench, RunReport, TimingEngine};
