//! Pump and injector outputs

/// The outputs a test procedure drives
///
/// Implementations translate logical state to pin levels (the pump relay
/// is usually active-low). All injector channels switch together.
pub trait ActuatorBus {
    /// Switch the fuel pump relay
    fn set_pump_enabled(&mut self, enabled: bool);

    /// Open or close every injector at once
    fn set_injectors_open(&mut self, open: bool);

    /// Drive the safe idle state: injectors closed, pump off
    fn all_off(&mut self) {
        self.set_injectors_open(false);
        self.set_pump_enabled(false);
    }
}
