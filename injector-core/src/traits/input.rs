//! Button input

use crate::ui::Button;

/// Source of the instantaneous button state
pub trait ButtonSource {
    /// Sample the buttons
    ///
    /// Pure poll: no queueing or debouncing. Read failures report
    /// [`Button::None`].
    fn read_button(&mut self) -> Button;
}
