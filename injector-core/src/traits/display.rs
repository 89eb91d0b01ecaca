//! Two-line character display

/// Characters per display line
pub const LINE_WIDTH: usize = 16;

/// Errors that can occur writing to the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// The display bus rejected a write
    Bus,
}

/// Display row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Row {
    Top,
    Bottom,
}

impl Row {
    /// Zero-based row number
    pub fn index(self) -> u8 {
        match self {
            Row::Top => 0,
            Row::Bottom => 1,
        }
    }
}

/// 16x2 character display
pub trait Display {
    /// Overwrite a whole row
    ///
    /// `text` is always exactly [`LINE_WIDTH`] ASCII characters; callers
    /// pad with spaces so no stale characters survive.
    fn set_line(&mut self, row: Row, text: &str) -> Result<(), DisplayError>;
}
