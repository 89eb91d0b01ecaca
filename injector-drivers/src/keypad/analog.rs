//! Analog resistor-ladder keypad
//!
//! Five buttons share one ADC input through a resistor ladder. Readings of
//! any ADC resolution are rescaled to 10 bits, the scale the button bands
//! are defined on.

use injector_core::traits::ButtonSource;
use injector_core::ui::Button;
use injector_hal::adc::AnalogInput;

/// Resolution the button bands are defined at
const LADDER_BITS: u8 = 10;

pub struct AnalogKeypad<A> {
    adc: A,
}

impl<A: AnalogInput> AnalogKeypad<A> {
    pub fn new(adc: A) -> Self {
        Self { adc }
    }

    /// Rescale a raw reading to the 10-bit ladder scale
    fn to_ladder_scale(raw: u16, bits: u8) -> u16 {
        if bits >= LADDER_BITS {
            raw.checked_shr(u32::from(bits - LADDER_BITS)).unwrap_or(0)
        } else {
            raw.checked_shl(u32::from(LADDER_BITS - bits)).unwrap_or(0)
        }
    }
}

impl<A: AnalogInput> ButtonSource for AnalogKeypad<A> {
    fn read_button(&mut self) -> Button {
        match self.adc.read_raw() {
            Ok(raw) => Button::from_analog(Self::to_ladder_scale(raw, self.adc.resolution_bits())),
            Err(_) => Button::None,
        }
    }
}
