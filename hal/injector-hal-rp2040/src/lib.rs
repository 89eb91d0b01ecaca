//! RP2040-specific HAL for the injector tester
//!
//! Implements the `injector-hal` traits on top of `embassy-rp`:
//!
//! - GPIO allocation by pin number for board-file driven wiring
//! - Output pins and a bank of injector outputs that switch together
//! - Blocking ADC sampling for the keypad ladder
//! - Microsecond timebase on the embassy time driver
//! - Settings storage in the last flash sector

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod flash;
pub mod gpio;
pub mod pins;
pub mod timer;

pub use adc::KeypadAdc;
pub use flash::Rp2040FlashStorage;
pub use gpio::{RpOutput, RpOutputBank};
pub use pins::{PinBank, PinBankPeripherals, PinError, RemainingPeripherals};
pub use timer::EmbassyTimebase;
