//! Blocking ADC sampling for the keypad ladder

use embassy_rp::adc::{Adc, Blocking, Channel, Config};
use embassy_rp::peripherals::ADC;
use embassy_rp::Peri;
use injector_hal::adc::{AdcError, AnalogInput};

/// RP2040 SAR ADC resolution
const RESOLUTION_BITS: u8 = 12;

/// One ADC channel with the converter it samples on
pub struct KeypadAdc<'d> {
    adc: Adc<'d, Blocking>,
    channel: Channel<'d>,
}

impl<'d> KeypadAdc<'d> {
    pub fn new(adc: Peri<'d, ADC>, channel: Channel<'d>) -> Self {
        Self {
            adc: Adc::new_blocking(adc, Config::default()),
            channel,
        }
    }
}

impl AnalogInput for KeypadAdc<'_> {
    fn resolution_bits(&self) -> u8 {
        RESOLUTION_BITS
    }

    fn read_raw(&mut self) -> Result<u16, AdcError> {
        self.adc
            .blocking_read(&mut self.channel)
            .map_err(|_| AdcError::Conversion)
    }
}
