//! Collaborator traits
//!
//! These traits define the interface between the tester logic and the
//! concrete relay, display and keypad drivers.

pub mod actuator;
pub mod display;
pub mod input;

pub use actuator::ActuatorBus;
pub use display::{Display, DisplayError, Row, LINE_WIDTH};
pub use input::ButtonSource;
