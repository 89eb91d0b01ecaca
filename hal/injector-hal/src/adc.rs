//! Analog input abstraction

/// Errors that can occur while sampling an analog input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcError {
    /// Conversion did not complete or reported an error
    Conversion,
}

/// Single analog channel
pub trait AnalogInput {
    /// Resolution of a raw sample in bits (10 for AVR, 12 for RP2040)
    fn resolution_bits(&self) -> u8;

    /// Take one blocking sample
    ///
    /// Returns the raw conversion result in `0..2^resolution_bits`.
    fn read_raw(&mut self) -> Result<u16, AdcError>;
}
