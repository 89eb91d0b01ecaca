//! Keypad input drivers

pub mod analog;

pub use analog::AnalogKeypad;
