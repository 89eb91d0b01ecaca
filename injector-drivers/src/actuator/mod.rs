//! Pump and injector actuators

pub mod gpio;

pub use gpio::{GpioActuatorBus, Polarity};
