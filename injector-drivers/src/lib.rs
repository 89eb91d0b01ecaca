//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the collaborator traits
//! defined in injector-core:
//!
//! - Actuator bus (pump relay + injector output bank)
//! - Analog resistor-ladder keypad
//! - HD44780 16x2 character LCD (4-bit bus)

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod actuator;
pub mod keypad;
pub mod lcd;
