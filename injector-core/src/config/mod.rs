//! Configuration types
//!
//! Board-agnostic timing configuration. The firmware fills these in at
//! build time from `board.toml`; host code uses the defaults.

pub mod types;

pub use types::*;
