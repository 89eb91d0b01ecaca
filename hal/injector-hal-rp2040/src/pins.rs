//! GPIO allocation by pin number
//!
//! Board wiring comes from `board.toml` as plain pin numbers, so pins are
//! handed out at runtime from a bank that owns every GPIO. GPIO 26..=29
//! stay typed until taken so they can still become ADC channels.

use embassy_rp::adc::Channel;
use embassy_rp::gpio::{AnyPin, Pull};
use embassy_rp::peripherals::{ADC, FLASH, PIN_26, PIN_27, PIN_28, PIN_29};
use embassy_rp::{Peri, Peripherals};

/// First GPIO with an ADC input
pub const FIRST_ADC_PIN: u8 = 26;

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin,
    /// Pin already taken
    AlreadyTaken,
    /// Pin has no ADC input (only 26-29 do)
    NotAdcCapable,
}

/// Every GPIO, split out of [`Peripherals`]
pub struct PinBankPeripherals {
    pin0: Peri<'static, AnyPin>,
    pin1: Peri<'static, AnyPin>,
    pin2: Peri<'static, AnyPin>,
    pin3: Peri<'static, AnyPin>,
    pin4: Peri<'static, AnyPin>,
    pin5: Peri<'static, AnyPin>,
    pin6: Peri<'static, AnyPin>,
    pin7: Peri<'static, AnyPin>,
    pin8: Peri<'static, AnyPin>,
    pin9: Peri<'static, AnyPin>,
    pin10: Peri<'static, AnyPin>,
    pin11: Peri<'static, AnyPin>,
    pin12: Peri<'static, AnyPin>,
    pin13: Peri<'static, AnyPin>,
    pin14: Peri<'static, AnyPin>,
    pin15: Peri<'static, AnyPin>,
    pin16: Peri<'static, AnyPin>,
    pin17: Peri<'static, AnyPin>,
    pin18: Peri<'static, AnyPin>,
    pin19: Peri<'static, AnyPin>,
    pin20: Peri<'static, AnyPin>,
    pin21: Peri<'static, AnyPin>,
    pin22: Peri<'static, AnyPin>,
    pin23: Peri<'static, AnyPin>,
    pin24: Peri<'static, AnyPin>,
    pin25: Peri<'static, AnyPin>,
    pin26: Peri<'static, PIN_26>,
    pin27: Peri<'static, PIN_27>,
    pin28: Peri<'static, PIN_28>,
    pin29: Peri<'static, PIN_29>,
}

/// Peripherals left after the GPIOs are split out
pub struct RemainingPeripherals {
    pub flash: Peri<'static, FLASH>,
    pub adc: Peri<'static, ADC>,
}

impl PinBankPeripherals {
    /// Split the GPIOs from the peripherals the tester uses
    pub fn from_peripherals(p: Peripherals) -> (Self, RemainingPeripherals) {
        let pins = Self {
            pin0: p.PIN_0.into(),
            pin1: p.PIN_1.into(),
            pin2: p.PIN_2.into(),
            pin3: p.PIN_3.into(),
            pin4: p.PIN_4.into(),
            pin5: p.PIN_5.into(),
            pin6: p.PIN_6.into(),
            pin7: p.PIN_7.into(),
            pin8: p.PIN_8.into(),
            pin9: p.PIN_9.into(),
            pin10: p.PIN_10.into(),
            pin11: p.PIN_11.into(),
            pin12: p.PIN_12.into(),
            pin13: p.PIN_13.into(),
            pin14: p.PIN_14.into(),
            pin15: p.PIN_15.into(),
            pin16: p.PIN_16.into(),
            pin17: p.PIN_17.into(),
            pin18: p.PIN_18.into(),
            pin19: p.PIN_19.into(),
            pin20: p.PIN_20.into(),
            pin21: p.PIN_21.into(),
            pin22: p.PIN_22.into(),
            pin23: p.PIN_23.into(),
            pin24: p.PIN_24.into(),
            pin25: p.PIN_25.into(),
            pin26: p.PIN_26,
            pin27: p.PIN_27,
            pin28: p.PIN_28,
            pin29: p.PIN_29,
        };
        let remaining = RemainingPeripherals {
            flash: p.FLASH,
            adc: p.ADC,
        };
        (pins, remaining)
    }
}

/// Pin bank that holds all GPIO pins and allows taking them by number
pub struct PinBank {
    digital: [Option<Peri<'static, AnyPin>>; FIRST_ADC_PIN as usize],
    pin26: Option<Peri<'static, PIN_26>>,
    pin27: Option<Peri<'static, PIN_27>>,
    pin28: Option<Peri<'static, PIN_28>>,
    pin29: Option<Peri<'static, PIN_29>>,
}

impl PinBank {
    pub fn new(p: PinBankPeripherals) -> Self {
        Self {
            digital: [
                Some(p.pin0),
                Some(p.pin1),
                Some(p.pin2),
                Some(p.pin3),
                Some(p.pin4),
                Some(p.pin5),
                Some(p.pin6),
                Some(p.pin7),
                Some(p.pin8),
                Some(p.pin9),
                Some(p.pin10),
                Some(p.pin11),
                Some(p.pin12),
                Some(p.pin13),
                Some(p.pin14),
                Some(p.pin15),
                Some(p.pin16),
                Some(p.pin17),
                Some(p.pin18),
                Some(p.pin19),
                Some(p.pin20),
                Some(p.pin21),
                Some(p.pin22),
                Some(p.pin23),
                Some(p.pin24),
                Some(p.pin25),
            ],
            pin26: Some(p.pin26),
            pin27: Some(p.pin27),
            pin28: Some(p.pin28),
            pin29: Some(p.pin29),
        }
    }

    /// Take a pin by number for digital use
    pub fn take(&mut self, pin_num: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        let pin = match pin_num {
            26 => self.pin26.take().map(Into::into),
            27 => self.pin27.take().map(Into::into),
            28 => self.pin28.take().map(Into::into),
            29 => self.pin29.take().map(Into::into),
            n if n < FIRST_ADC_PIN => self.digital[usize::from(n)].take(),
            _ => return Err(PinError::InvalidPin),
        };
        pin.ok_or(PinError::AlreadyTaken)
    }

    /// Take a pin by number as a floating ADC channel
    pub fn take_adc_channel(&mut self, pin_num: u8) -> Result<Channel<'static>, PinError> {
        let channel = match pin_num {
            26 => self.pin26.take().map(|p| Channel::new_pin(p, Pull::None)),
            27 => self.pin27.take().map(|p| Channel::new_pin(p, Pull::None)),
            28 => self.pin28.take().map(|p| Channel::new_pin(p, Pull::None)),
            29 => self.pin29.take().map(|p| Channel::new_pin(p, Pull::None)),
            n if n < FIRST_ADC_PIN => return Err(PinError::NotAdcCapable),
            _ => return Err(PinError::InvalidPin),
        };
        channel.ok_or(PinError::AlreadyTaken)
    }
}
