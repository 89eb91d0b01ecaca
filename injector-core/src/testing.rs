//! Host-side mocks shared by the unit tests
//!
//! All mocks that care about time share one [`SimClock`], so actuations and
//! display writes are stamped with the simulated microsecond counter that
//! the timer advances.

use core::cell::Cell;
use std::rc::Rc;
use std::string::String;
use std::vec::Vec;

use injector_hal::storage::{NvStorage, StorageError};
use injector_hal::timer::Timebase;

use crate::traits::{ActuatorBus, ButtonSource, Display, DisplayError, Row, LINE_WIDTH};
use crate::ui::Button;

/// Shared wrapping microsecond counter
#[derive(Debug, Clone, Default)]
pub struct SimClock(Rc<Cell<u32>>);

impl SimClock {
    pub fn starting_at(us: u32) -> Self {
        Self(Rc::new(Cell::new(us)))
    }

    pub fn now(&self) -> u32 {
        self.0.get()
    }

    pub fn advance(&self, us: u32) {
        self.0.set(self.0.get().wrapping_add(us));
    }
}

/// Timebase whose delays advance the simulated clock
///
/// Uses a short maximum delay so long waits go through the chunking loop.
pub struct MockTimer {
    clock: SimClock,
    pub delay_calls: u32,
}

impl MockTimer {
    pub fn new(clock: SimClock) -> Self {
        Self {
            clock,
            delay_calls: 0,
        }
    }
}

impl Timebase for MockTimer {
    const MAX_DELAY_US: u32 = 16_383;

    fn now_us(&self) -> u32 {
        self.clock.now()
    }

    fn delay_us(&mut self, us: u32) {
        assert!(us <= Self::MAX_DELAY_US, "delay chunk {} too long", us);
        self.delay_calls += 1;
        self.clock.advance(us);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actuation {
    Pump(bool),
    Injectors(bool),
}

/// Actuator bus that records every change with its timestamp
pub struct MockActuators {
    clock: SimClock,
    pub events: Vec<(u32, Actuation)>,
    pub pump_on: bool,
    pub injectors_open: bool,
}

impl MockActuators {
    pub fn new(clock: SimClock) -> Self {
        Self {
            clock,
            events: Vec::new(),
            pump_on: false,
            injectors_open: false,
        }
    }

    /// Timestamps at which injectors were opened
    pub fn injector_opens(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter(|(_, a)| *a == Actuation::Injectors(true))
            .map(|(t, _)| *t)
            .collect()
    }

    /// Timestamps at which injectors were closed
    pub fn injector_closes(&self) -> Vec<u32> {
        self.events
            .iter()
            .filter(|(_, a)| *a == Actuation::Injectors(false))
            .map(|(t, _)| *t)
            .collect()
    }

    /// Timestamp of the first event matching `action`
    pub fn first(&self, action: Actuation) -> Option<u32> {
        self.events
            .iter()
            .find(|(_, a)| *a == action)
            .map(|(t, _)| *t)
    }

    /// Timestamp of the last event matching `action`
    pub fn last(&self, action: Actuation) -> Option<u32> {
        self.events
            .iter()
            .rev()
            .find(|(_, a)| *a == action)
            .map(|(t, _)| *t)
    }
}

impl ActuatorBus for MockActuators {
    fn set_pump_enabled(&mut self, enabled: bool) {
        self.pump_on = enabled;
        self.events.push((self.clock.now(), Actuation::Pump(enabled)));
    }

    fn set_injectors_open(&mut self, open: bool) {
        self.injectors_open = open;
        self.events.push((self.clock.now(), Actuation::Injectors(open)));
    }
}

/// Display that records every line written
#[derive(Default)]
pub struct MockDisplay {
    pub writes: Vec<(Row, String)>,
    pub fail: bool,
}

impl MockDisplay {
    /// Text most recently written to `row`
    pub fn current(&self, row: Row) -> &str {
        self.writes
            .iter()
            .rev()
            .find(|(r, _)| *r == row)
            .map_or("", |(_, text)| text.as_str())
    }

    /// Every line written to `row`, oldest first
    pub fn history(&self, row: Row) -> Vec<&str> {
        self.writes
            .iter()
            .filter(|(r, _)| *r == row)
            .map(|(_, text)| text.as_str())
            .collect()
    }

    /// Whether `text` (trimmed) was ever written to `row`
    pub fn showed(&self, row: Row, text: &str) -> bool {
        self.history(row).iter().any(|line| line.trim_end() == text)
    }
}

impl Display for MockDisplay {
    fn set_line(&mut self, row: Row, text: &str) -> Result<(), DisplayError> {
        assert_eq!(text.len(), LINE_WIDTH, "line {:?} not full width", text);
        if self.fail {
            return Err(DisplayError::Bus);
        }
        self.writes.push((row, String::from(text)));
        Ok(())
    }
}

/// Keypad reporting whichever button the test is holding
#[derive(Debug, Clone, Default)]
pub struct MockKeypad(Rc<Cell<Button>>);

impl MockKeypad {
    pub fn hold(&self, button: Button) {
        self.0.set(button);
    }
}

impl ButtonSource for MockKeypad {
    fn read_button(&mut self) -> Button {
        self.0.get()
    }
}

/// Storage whose operations fail on demand
pub struct FlakyStorage<S> {
    pub inner: S,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl<S: NvStorage> NvStorage for FlakyStorage<S> {
    fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    fn read(&mut self, offset: u32, buffer: &mut [u8]) -> Result<(), StorageError> {
        if self.fail_reads {
            return Err(StorageError::Flash);
        }
        self.inner.read(offset, buffer)
    }

    fn write(&mut self, offset: u32, data: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Flash);
        }
        self.inner.write(offset, data)
    }
}
