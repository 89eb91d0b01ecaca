//! GPIO outputs on embassy-rp

use embassy_rp::gpio::{Level, Output};
use injector_hal::gpio::{OutputBank, OutputPin};

/// Single push-pull output
pub struct RpOutput<'d> {
    pin: Output<'d>,
}

impl<'d> RpOutput<'d> {
    pub fn new(pin: Output<'d>) -> Self {
        Self { pin }
    }
}

impl OutputPin for RpOutput<'_> {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}

/// Outputs that switch inside one critical section
///
/// No interrupt can observe the bank half-switched. The SIO writes for the
/// individual pins land a few cycles apart.
pub struct RpOutputBank<'d, const N: usize> {
    pins: [Output<'d>; N],
}

impl<'d, const N: usize> RpOutputBank<'d, N> {
    pub fn new(pins: [Output<'d>; N]) -> Self {
        Self { pins }
    }
}

impl<const N: usize> OutputBank for RpOutputBank<'_, N> {
    fn len(&self) -> usize {
        N
    }

    fn write_all(&mut self, high: bool) {
        let level = Level::from(high);
        critical_section::with(|_| {
            for pin in self.pins.iter_mut() {
                pin.set_level(level);
            }
        });
    }

    fn all_set_high(&self) -> bool {
        self.pins.iter().all(|pin| pin.is_set_high())
    }
}
