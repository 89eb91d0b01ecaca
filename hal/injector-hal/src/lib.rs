//! Injector tester Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits that chip-specific
//! HALs implement. The tester logic in `injector-core` and the drivers in
//! `injector-drivers` only ever talk to these traits, so the whole control
//! stack can be exercised on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  injector-firmware / injector-drivers   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  injector-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!           ┌───────────────────┐
//!           │ injector-hal-     │
//!           │    rp2040         │
//!           └───────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::OutputBank`] - Digital outputs
//! - [`adc::AnalogInput`] - Single-channel analog sampling
//! - [`timer::Timebase`] - Microsecond clock and bounded blocking delay
//! - [`storage::NvStorage`] - Flat non-volatile byte region

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod gpio;
pub mod storage;
pub mod timer;

// Re-export key traits at crate root for convenience
pub use adc::{AdcError, AnalogInput};
pub use gpio::{OutputBank, OutputPin};
pub use storage::{NvStorage, RamStorage, StorageError};
pub use timer::Timebase;
