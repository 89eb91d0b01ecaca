//! UI state machine
//!
//! Called once per poll with the sampled button. Only edges (the sampled
//! button differs from the last one) act; holds are turned into edges by
//! the auto-repeat rule:
//!
//! ```text
//!   held Up/Down longer than the repeat interval
//!       -> treat as released, then handle as a fresh press
//!   held Select longer than the save hold
//!       -> save, once per hold
//!
//!   edge Select -> next mode, field 0
//!   edge Left   -> next field (mod field count)
//!   edge Up     -> step field up   (saturating)
//!   edge Down   -> step field down (saturating)
//!   edge Right  -> run the current mode
//!   edge None   -> redraw
//! ```

use super::button::Button;
use crate::config::UiTimings;
use crate::params::{FieldDescriptor, Mode, ParameterStore, StepDirection};

/// What the caller must do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UiAction {
    /// Nothing changed
    Idle,
    /// Re-render the idle screen
    Redraw,
    /// Execute the procedure for this mode, then re-render
    Run(Mode),
    /// Persist the parameters, then re-render
    Save,
}

/// Navigation state and button hold bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UiState {
    mode: Mode,
    param_index: usize,
    last_button: Button,
    last_change_us: u32,
    save_latched: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

impl UiState {
    /// Initial state: leak test, first field, no button
    pub const fn new() -> Self {
        Self {
            mode: Mode::LeakTest,
            param_index: 0,
            last_button: Button::None,
            last_change_us: 0,
            save_latched: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Index of the selected field within the current mode
    pub fn param_index(&self) -> usize {
        self.param_index
    }

    pub fn last_button(&self) -> Button {
        self.last_button
    }

    /// Descriptor of the selected field
    pub fn selected_field(&self) -> &'static FieldDescriptor {
        &self.mode.fields()[self.param_index]
    }

    /// Adopt a button that is already held without acting on it
    ///
    /// Used at boot so a key still held from the reset gesture does not
    /// switch modes or save when the loop starts.
    pub fn prime(&mut self, button: Button, now_us: u32) {
        self.last_button = button;
        self.last_change_us = now_us;
        self.save_latched = button == Button::Select;
    }

    /// Process one sampled button
    pub fn handle(
        &mut self,
        button: Button,
        now_us: u32,
        store: &mut ParameterStore,
        timings: &UiTimings,
    ) -> UiAction {
        if button == self.last_button {
            let held_us = now_us.wrapping_sub(self.last_change_us);
            match button {
                Button::Up | Button::Down => {
                    let repeat_us = if self.selected_field().fast_repeat {
                        timings.fast_repeat_us
                    } else {
                        timings.repeat_us
                    };
                    if held_us <= repeat_us {
                        return UiAction::Idle;
                    }
                    // Synthesized release: fall through and handle as a new press
                    self.last_button = Button::None;
                }
                Button::Select => {
                    if !self.save_latched && held_us > timings.save_hold_us {
                        self.save_latched = true;
                        return UiAction::Save;
                    }
                    return UiAction::Idle;
                }
                _ => return UiAction::Idle,
            }
        }

        self.last_button = button;
        self.last_change_us = now_us;
        self.save_latched = false;

        match button {
            Button::Select => {
                self.mode = self.mode.next();
                self.param_index = 0;
                UiAction::Redraw
            }
            Button::Left => {
                let count = ParameterStore::field_count(self.mode);
                self.param_index = (self.param_index + 1) % count;
                UiAction::Redraw
            }
            Button::Up | Button::Down => {
                let direction = if button == Button::Up {
                    StepDirection::Increase
                } else {
                    StepDirection::Decrease
                };
                store.step(self.mode, self.param_index, direction);
                UiAction::Redraw
            }
            Button::Right => UiAction::Run(self.mode),
            Button::None => UiAction::Redraw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::FieldId;

    struct Harness {
        ui: UiState,
        store: ParameterStore,
        timings: UiTimings,
        now: u32,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                ui: UiState::new(),
                store: ParameterStore::factory(),
                timings: UiTimings::default(),
                now: 0,
            }
        }

        fn at(&mut self, now: u32, button: Button) -> UiAction {
            self.now = now;
            self.ui.handle(button, now, &mut self.store, &self.timings)
        }

        /// Press and release
        fn tap(&mut self, button: Button) -> UiAction {
            let now = self.now + 10_000;
            let action = self.at(now, button);
            self.at(now + 10_000, Button::None);
            action
        }
    }

    #[test]
    fn test_initial_state() {
        let ui = UiState::new();
        assert_eq!(ui.mode(), Mode::LeakTest);
        assert_eq!(ui.param_index(), 0);
        assert_eq!(ui.last_button(), Button::None);
    }

    #[test]
    fn test_four_selects_cycle_modes() {
        let mut h = Harness::new();
        let expected = [Mode::Rpm, Mode::FullFlow, Mode::Pwm, Mode::LeakTest];
        for mode in expected {
            assert_eq!(h.tap(Button::Select), UiAction::Redraw);
            assert_eq!(h.ui.mode(), mode);
            assert_eq!(h.ui.param_index(), 0);
        }
    }

    #[test]
    fn test_mode_change_resets_field() {
        let mut h = Harness::new();
        h.tap(Button::Select);
        h.tap(Button::Left);
        h.tap(Button::Left);
        assert_eq!(h.ui.param_index(), 2);

        h.tap(Button::Select);
        assert_eq!(h.ui.mode(), Mode::FullFlow);
        assert_eq!(h.ui.param_index(), 0);
    }

    #[test]
    fn test_field_cycling() {
        let mut h = Harness::new();
        h.tap(Button::Select);
        for expected in [1, 2, 0] {
            h.tap(Button::Left);
            assert_eq!(h.ui.param_index(), expected);
        }

        h.tap(Button::Select);
        h.tap(Button::Select);
        assert_eq!(h.ui.mode(), Mode::Pwm);
        for expected in [1, 0] {
            h.tap(Button::Left);
            assert_eq!(h.ui.param_index(), expected);
        }

        h.tap(Button::Select);
        h.tap(Button::Left);
        assert_eq!(h.ui.param_index(), 0);
    }

    #[test]
    fn test_up_down_step_selected_field() {
        let mut h = Harness::new();
        h.tap(Button::Select);
        h.tap(Button::Left);
        h.tap(Button::Up);
        h.tap(Button::Up);
        assert_eq!(h.store.rpm().rpm(), 1400);
        h.tap(Button::Down);
        assert_eq!(h.store.rpm().rpm(), 1200);
        assert_eq!(h.store.rpm().seconds(), 15);
    }

    #[test]
    fn test_right_requests_run() {
        let mut h = Harness::new();
        h.tap(Button::Select);
        assert_eq!(h.tap(Button::Right), UiAction::Run(Mode::Rpm));
    }

    #[test]
    fn test_held_right_runs_once() {
        let mut h = Harness::new();
        assert_eq!(h.at(0, Button::Right), UiAction::Run(Mode::LeakTest));
        assert_eq!(h.at(5_000_000, Button::Right), UiAction::Idle);
    }

    #[test]
    fn test_slow_auto_repeat() {
        let mut h = Harness::new();
        assert_eq!(h.at(1_000, Button::Up), UiAction::Redraw);
        assert_eq!(h.store.leak_test().seconds(), 70);

        // Exactly at the threshold is still a hold
        assert_eq!(h.at(301_000, Button::Up), UiAction::Idle);
        assert_eq!(h.store.leak_test().seconds(), 70);

        assert_eq!(h.at(301_001, Button::Up), UiAction::Redraw);
        assert_eq!(h.store.leak_test().seconds(), 80);

        // The repeat restarts the hold timer
        assert_eq!(h.at(500_000, Button::Up), UiAction::Idle);
        assert_eq!(h.at(601_002, Button::Up), UiAction::Redraw);
        assert_eq!(h.store.leak_test().seconds(), 90);
    }

    #[test]
    fn test_fast_repeat_on_pulse_width() {
        let mut h = Harness::new();
        for _ in 0..3 {
            h.tap(Button::Select);
        }
        h.tap(Button::Left);
        assert_eq!(h.ui.selected_field().id, FieldId::PwmPulseWidth);

        let t0 = h.now + 1;
        h.at(t0, Button::Up);
        assert_eq!(h.store.pwm().pulse_width_us(), 1010);
        assert_eq!(h.at(t0 + 100_000, Button::Up), UiAction::Idle);
        assert_eq!(h.at(t0 + 100_001, Button::Up), UiAction::Redraw);
        assert_eq!(h.store.pwm().pulse_width_us(), 1020);
    }

    #[test]
    fn test_pulse_count_uses_slow_repeat() {
        let mut h = Harness::new();
        for _ in 0..3 {
            h.tap(Button::Select);
        }
        let t0 = h.now + 1;
        h.at(t0, Button::Down);
        assert_eq!(h.at(t0 + 200_000, Button::Down), UiAction::Idle);
        assert_eq!(h.store.pwm().pulses(), 29);
    }

    #[test]
    fn test_fast_repeat_on_duty() {
        let mut h = Harness::new();
        h.tap(Button::Select);
        h.tap(Button::Left);
        h.tap(Button::Left);
        assert!(h.ui.selected_field().fast_repeat);

        let t0 = h.now + 1;
        h.at(t0, Button::Down);
        h.at(t0 + 100_001, Button::Down);
        assert_eq!(h.store.rpm().duty(), 48);
    }

    #[test]
    fn test_repeat_across_counter_wrap() {
        let mut h = Harness::new();
        let t0 = u32::MAX - 50_000;
        h.at(t0, Button::Up);
        assert_eq!(h.at(200_000, Button::Up), UiAction::Idle);
        assert_eq!(h.at(250_001, Button::Up), UiAction::Redraw);
        assert_eq!(h.store.leak_test().seconds(), 80);
    }

    #[test]
    fn test_select_hold_saves_once() {
        let mut h = Harness::new();
        assert_eq!(h.at(0, Button::Select), UiAction::Redraw);
        assert_eq!(h.ui.mode(), Mode::Rpm);
        assert_eq!(h.at(1_000_000, Button::Select), UiAction::Idle);
        assert_eq!(h.at(1_000_001, Button::Select), UiAction::Save);
        assert_eq!(h.at(9_000_000, Button::Select), UiAction::Idle);

        // A new hold saves again
        h.at(9_100_000, Button::None);
        h.at(9_200_000, Button::Select);
        assert_eq!(h.at(10_300_000, Button::Select), UiAction::Save);
    }

    #[test]
    fn test_primed_select_does_not_act() {
        let mut h = Harness::new();
        h.ui.prime(Button::Select, 0);
        assert_eq!(h.at(5_000_000, Button::Select), UiAction::Idle);
        assert_eq!(h.ui.mode(), Mode::LeakTest);

        assert_eq!(h.at(5_100_000, Button::None), UiAction::Redraw);
    }

    #[test]
    fn test_release_redraws() {
        let mut h = Harness::new();
        h.at(0, Button::Left);
        assert_eq!(h.at(1, Button::None), UiAction::Redraw);
        assert_eq!(h.at(2, Button::None), UiAction::Idle);
    }
}
