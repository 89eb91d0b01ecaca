//! Tester controller
//!
//! Owns every collaborator and all mutable state. The firmware calls
//! [`Controller::boot`] once and then [`Controller::tick`] forever.

use injector_hal::storage::NvStorage;
use injector_hal::timer::Timebase;

use crate::config::TesterConfig;
use crate::params::ParameterStore;
use crate::persist::{LoadOutcome, Persistence};
use crate::timing::{Bench, RunReport, TimingEngine};
use crate::traits::{ActuatorBus, ButtonSource, Display, Row};
use crate::ui::render::{self, Line};
use crate::ui::{Button, UiAction, UiState};

/// How the parameters were obtained at boot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootSource {
    /// Select was held at power-up; defaults were restored and written
    FactoryReset,
    /// Stored image was valid
    Restored,
    /// Stored image had out-of-range fields that were clamped
    Repaired,
    /// Region was blank; defaults were written
    FirstBoot,
    /// Storage could not be read; running on defaults
    StorageFault,
}

pub struct Controller<A, T, D, K, S> {
    bench: Bench<A, T, D>,
    keypad: K,
    persistence: Persistence<S>,
    engine: TimingEngine,
    ui: UiState,
    store: ParameterStore,
    config: TesterConfig,
    last_run: Option<RunReport>,
}

impl<A, T, D, K, S> Controller<A, T, D, K, S>
where
    A: ActuatorBus,
    T: Timebase,
    D: Display,
    K: ButtonSource,
    S: NvStorage,
{
    pub fn new(bench: Bench<A, T, D>, keypad: K, storage: S, config: TesterConfig) -> Self {
        Self {
            bench,
            keypad,
            persistence: Persistence::new(storage),
            engine: TimingEngine::new(config.run),
            ui: UiState::new(),
            store: ParameterStore::factory(),
            config,
            last_run: None,
        }
    }

    /// Power-up sequence
    ///
    /// Drives the outputs safe, honours the factory-reset gesture, loads the
    /// stored parameters and draws the idle screen.
    pub fn boot(&mut self) -> BootSource {
        self.bench.actuators.all_off();

        let held = self.keypad.read_button();
        let source = if held == Button::Select {
            self.factory_reset()
        } else {
            self.load_store()
        };

        self.ui.prime(held, self.bench.timer.now_us());
        self.render();
        source
    }

    /// Reset gesture: defaults stand for this session even if the write fails
    fn factory_reset(&mut self) -> BootSource {
        info!("select held at power-up: restoring factory defaults");
        self.notice("RESETTING", self.config.notice.resetting_ms);
        self.store.reset_to_defaults();
        if !self.write_store() {
            self.notice("Save failed", self.config.notice.saving_ms);
        }
        BootSource::FactoryReset
    }

    fn load_store(&mut self) -> BootSource {
        self.notice("Loading settings", self.config.notice.loading_ms);
        match self.persistence.load() {
            Ok(LoadOutcome::Restored(store)) => {
                self.store = store;
                BootSource::Restored
            }
            Ok(LoadOutcome::Repaired(store)) => {
                warn!("stored settings out of range, clamped");
                self.store = store;
                BootSource::Repaired
            }
            Ok(LoadOutcome::Blank) => {
                info!("settings region blank, writing defaults");
                self.store = ParameterStore::factory();
                self.write_store();
                BootSource::FirstBoot
            }
            Err(_) => {
                error!("settings read failed, using defaults");
                self.store = ParameterStore::factory();
                BootSource::StorageFault
            }
        }
    }

    /// One pass of the polling loop
    pub fn tick(&mut self) -> UiAction {
        let button = self.keypad.read_button();
        let now = self.bench.timer.now_us();
        let action = self.ui.handle(button, now, &mut self.store, &self.config.ui);

        match action {
            UiAction::Idle => {}
            UiAction::Redraw => self.render(),
            UiAction::Run(mode) => {
                let report = self.engine.run(&mut self.bench, mode, &self.store);
                self.last_run = Some(report);
                self.render();
            }
            UiAction::Save => {
                self.save();
                self.render();
            }
        }
        action
    }

    /// Draw the idle screen for the current mode
    pub fn render(&mut self) {
        let mode = self.ui.mode();
        let top = render::title_line(mode, false);
        let bottom = render::params_line(mode, self.ui.param_index(), &self.store);
        render::show(&mut self.bench.display, Row::Top, &top);
        render::show(&mut self.bench.display, Row::Bottom, &bottom);
    }

    /// Save gesture: confirmation notice, then write
    fn save(&mut self) {
        info!("saving settings");
        self.notice("Saving settings", self.config.notice.saving_ms);
        if !self.write_store() {
            self.notice("Save failed", self.config.notice.saving_ms);
        }
    }

    fn write_store(&mut self) -> bool {
        match self.persistence.save(&self.store) {
            Ok(()) => true,
            Err(_) => {
                error!("settings write failed");
                false
            }
        }
    }

    /// Full-screen message on the top row, bottom row cleared, held for `ms`
    fn notice(&mut self, text: &str, ms: u32) {
        render::show(&mut self.bench.display, Row::Top, &Line::text(text));
        render::show(&mut self.bench.display, Row::Bottom, &Line::blank());
        self.bench.timer.sleep_ms(ms);
    }

    pub fn store(&self) -> &ParameterStore {
        &self.store
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn bench(&self) -> &Bench<A, T, D> {
        &self.bench
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    /// Report of the most recent test run
    pub fn last_run(&self) -> Option<RunReport> {
        self.last_run
    }
}
