//! Keypad buttons

/// Instantaneous keypad state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    #[default]
    None,
    Left,
    Right,
    Up,
    Down,
    Select,
}

/// Upper bounds (exclusive) of each band on the 10-bit keypad ladder
const BANDS: [(u16, Button); 5] = [
    (60, Button::Right),
    (200, Button::Up),
    (400, Button::Down),
    (600, Button::Left),
    (800, Button::Select),
];

impl Button {
    /// Map a 10-bit resistor-ladder reading (0..=1023) to a button
    pub fn from_analog(reading: u16) -> Button {
        BANDS
            .iter()
            .find(|(upper, _)| reading < *upper)
            .map_or(Button::None, |&(_, button)| button)
    }
}
