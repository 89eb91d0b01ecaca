//! Display line rendering
//!
//! Every line is exactly [`LINE_WIDTH`] characters: longer text is
//! truncated, shorter text is padded with spaces.

use core::fmt::{self, Write};

use heapless::String;

use crate::params::{Mode, ParameterStore};
use crate::traits::display::{Display, Row, LINE_WIDTH};

/// Column of the running marker on the top line
const RUNNING_MARKER_COL: usize = LINE_WIDTH - 1;

/// One fixed-width display line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    text: String<LINE_WIDTH>,
}

impl Line {
    /// All spaces
    pub fn blank() -> Self {
        Self::text("")
    }

    /// Literal text, truncated/padded to width
    pub fn text(s: &str) -> Self {
        Self::format(format_args!("{}", s))
    }

    /// Formatted text, truncated/padded to width
    pub fn format(args: fmt::Arguments<'_>) -> Self {
        let mut line = Self {
            text: String::new(),
        };
        // Writing into a Line never fails; overflow is truncated
        let _ = line.write_fmt(args);
        line.pad_to(LINE_WIDTH);
        line
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    fn pad_to(&mut self, width: usize) {
        while self.text.len() < width {
            if self.text.push(' ').is_err() {
                break;
            }
        }
    }
}

impl Write for Line {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.text.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Top line: mode title, with `*` in the last column while running
pub fn title_line(mode: Mode, running: bool) -> Line {
    let mut line = Line {
        text: String::new(),
    };
    let _ = line.write_str(mode.title());
    line.text.truncate(RUNNING_MARKER_COL);
    line.pad_to(RUNNING_MARKER_COL);
    let _ = line.text.push(if running { '*' } else { ' ' });
    line
}

/// Bottom line: the mode's parameters, `>` before the selected field
pub fn params_line(mode: Mode, selected: usize, store: &ParameterStore) -> Line {
    let marker = |index: usize| if index == selected { ">" } else { " " };
    match mode {
        Mode::LeakTest => Line::format(format_args!(">{} seconds", store.leak_test().seconds())),
        Mode::FullFlow => Line::format(format_args!(">{} seconds", store.full_flow().seconds())),
        Mode::Rpm => {
            let p = store.rpm();
            Line::format(format_args!(
                "{}{}s{}{}rpm{}{}%",
                marker(0),
                p.seconds(),
                marker(1),
                p.rpm(),
                marker(2),
                p.duty()
            ))
        }
        Mode::Pwm => {
            let p = store.pwm();
            let width = p.pulse_width_us();
            Line::format(format_args!(
                "{}{}p {}{}.{:02}ms",
                marker(0),
                p.pulses(),
                marker(1),
                width / 1000,
                (width % 1000) / 10
            ))
        }
    }
}

/// Countdown for leak and full-flow runs, whole seconds rounded up
pub fn seconds_left_line(remaining_us: u32) -> Line {
    Line::format(format_args!("{}s left", remaining_us.div_ceil(1_000_000)))
}

/// Injector pulse width of an RPM run
pub fn pulse_width_line(open_us: u32) -> Line {
    Line::format(format_args!(
        "IPW: {}.{:03}ms",
        open_us / 1000,
        open_us % 1000
    ))
}

/// PWM progress
pub fn pulses_left_line(pulses_left: u32) -> Line {
    Line::format(format_args!("pulses left {}", pulses_left))
}

/// Write a line, logging rather than propagating display failures
///
/// The next render rewrites both rows in full, so a dropped write only
/// leaves stale text until then.
pub fn show<D: Display>(display: &mut D, row: Row, line: &Line) {
    if display.set_line(row, line.as_str()).is_err() {
        warn!("display write failed on row {}", row.index());
    }
}
