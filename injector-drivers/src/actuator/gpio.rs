//! GPIO actuator bus
//!
//! Pump relay on a single output, injectors on an output bank that switches
//! every channel together. Either side can be wired active-low.

use injector_core::traits::ActuatorBus;
use injector_hal::gpio::{OutputBank, OutputPin};

/// Electrical sense of an output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Logical on drives the pin high
    #[default]
    ActiveHigh,
    /// Logical on drives the pin low
    ActiveLow,
}

impl Polarity {
    pub fn from_active_low(active_low: bool) -> Self {
        if active_low {
            Polarity::ActiveLow
        } else {
            Polarity::ActiveHigh
        }
    }

    /// Pin level for a logical state
    fn level(self, on: bool) -> bool {
        match self {
            Polarity::ActiveHigh => on,
            Polarity::ActiveLow => !on,
        }
    }
}

/// Actuator bus on plain GPIO
pub struct GpioActuatorBus<P, B> {
    pump: P,
    pump_polarity: Polarity,
    injectors: B,
    injector_polarity: Polarity,
    pump_on: bool,
    injectors_open: bool,
}

impl<P: OutputPin, B: OutputBank> GpioActuatorBus<P, B> {
    /// Create the bus and drive it to the safe state (pump off, injectors closed)
    pub fn new(pump: P, pump_polarity: Polarity, injectors: B, injector_polarity: Polarity) -> Self {
        let mut bus = Self {
            pump,
            pump_polarity,
            injectors,
            injector_polarity,
            pump_on: false,
            injectors_open: false,
        };
        bus.all_off();
        bus
    }

    pub fn is_pump_enabled(&self) -> bool {
        self.pump_on
    }

    pub fn are_injectors_open(&self) -> bool {
        self.injectors_open
    }

    /// Number of injector channels
    pub fn injector_count(&self) -> usize {
        self.injectors.len()
    }
}

impl<P: OutputPin, B: OutputBank> ActuatorBus for GpioActuatorBus<P, B> {
    fn set_pump_enabled(&mut self, enabled: bool) {
        self.pump_on = enabled;
        self.pump.set_state(self.pump_polarity.level(enabled));
    }

    fn set_injectors_open(&mut self, open: bool) {
        self.injectors_open = open;
        self.injectors.write_all(self.injector_polarity.level(open));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock GPIO pin for testing
    struct MockPin {
        high: bool,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    /// Mock bank that counts writes
    struct MockBank {
        levels: [bool; 4],
        writes: u32,
    }

    impl MockBank {
        fn new() -> Self {
            Self {
                levels: [true; 4],
                writes: 0,
            }
        }
    }

    impl OutputBank for MockBank {
        fn len(&self) -> usize {
            self.levels.len()
        }

        fn write_all(&mut self, high: bool) {
            self.levels = [high; 4];
            self.writes += 1;
        }

        fn all_set_high(&self) -> bool {
            self.levels.iter().all(|&l| l)
        }
    }

    fn bank_all_low(bank: &MockBank) -> bool {
        bank.levels.iter().all(|&l| !l)
    }

    #[test]
    fn test_construction_drives_safe_state() {
        // Pump pin starts low: with an active-low relay that would be ON
        let bus = GpioActuatorBus::new(
            MockPin { high: false },
            Polarity::ActiveLow,
            MockBank::new(),
            Polarity::ActiveHigh,
        );

        assert!(!bus.is_pump_enabled());
        assert!(bus.pump.is_set_high());
        assert!(!bus.are_injectors_open());
        assert!(bank_all_low(&bus.injectors));
        assert_eq!(bus.injector_count(), 4);
    }

    #[test]
    fn test_active_low_pump() {
        let mut bus = GpioActuatorBus::new(
            MockPin { high: false },
            Polarity::ActiveLow,
            MockBank::new(),
            Polarity::ActiveHigh,
        );

        bus.set_pump_enabled(true);
        assert!(bus.is_pump_enabled());
        assert!(bus.pump.is_set_low());

        bus.set_pump_enabled(false);
        assert!(bus.pump.is_set_high());
    }

    #[test]
    fn test_injectors_switch_together() {
        let mut bus = GpioActuatorBus::new(
            MockPin { high: false },
            Polarity::ActiveLow,
            MockBank::new(),
            Polarity::ActiveHigh,
        );
        let writes = bus.injectors.writes;

        bus.set_injectors_open(true);
        assert!(bus.injectors.all_set_high());
        assert_eq!(bus.injectors.writes, writes + 1);

        bus.set_injectors_open(false);
        assert!(bank_all_low(&bus.injectors));
    }

    #[test]
    fn test_active_low_injectors() {
        let mut bus = GpioActuatorBus::new(
            MockPin { high: false },
            Polarity::ActiveHigh,
            MockBank::new(),
            Polarity::ActiveLow,
        );
        assert!(bus.injectors.all_set_high());

        bus.set_injectors_open(true);
        assert!(bank_all_low(&bus.injectors));
    }

    #[test]
    fn test_all_off() {
        let mut bus = GpioActuatorBus::new(
            MockPin { high: false },
            Polarity::from_active_low(true),
            MockBank::new(),
            Polarity::from_active_low(false),
        );
        bus.set_pump_enabled(true);
        bus.set_injectors_open(true);

        bus.all_off();
        assert!(!bus.is_pump_enabled());
        assert!(!bus.are_injectors_open());
        assert!(bus.pump.is_set_high());
    }
}
