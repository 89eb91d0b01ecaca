//! GPIO output abstractions
//!
//! Provides traits for digital outputs that can be implemented by
//! chip-specific HALs.

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// A group of outputs that always switch together
///
/// Used for the injector drivers: every channel in the bank changes level
/// in a single operation, with no observable intermediate state between
/// channels.
pub trait OutputBank {
    /// Number of outputs in the bank
    fn len(&self) -> usize;

    /// Check if the bank has no outputs
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drive every output in the bank to the same level
    fn write_all(&mut self, high: bool);

    /// Check whether every output in the bank is currently set high
    fn all_set_high(&self) -> bool;
}
