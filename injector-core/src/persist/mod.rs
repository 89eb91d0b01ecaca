//! Settings persistence
//!
//! The parameter set is stored as a fixed 30-byte little-endian image at
//! offset 0 of a non-volatile region. There is no version tag, checksum or
//! length prefix; [`Persistence`] is the only code that knows the layout.

pub mod codec;
pub mod image;

pub use codec::{LoadOutcome, Persistence};
pub use image::{PersistedImage, IMAGE_LEN};
