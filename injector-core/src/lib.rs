//! Board-agnostic core logic for the fuel injector bench tester
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Typed, self-clamping parameter records for each test mode
//! - Fixed-layout persistence of the parameter set
//! - Injector timing calculations and the blocking test procedures
//! - The button-driven UI state machine and 16x2 line rendering
//! - Collaborator traits (actuators, display, keypad)
//! - The controller tying it all together
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod log;

pub mod config;
pub mod controller;
pub mod params;
pub mod persist;
pub mod timing;
pub mod traits;
pub mod ui;

#[cfg(test)]
extern crate std;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::Controller;
pub use params::{Mode, ParameterStore, StepDirection};
pub use timing::{Bench, TimingEngine};
pub use ui::{Button, UiAction, UiState};
