//! Button-driven user interface
//!
//! A flat state machine over (mode, selected field) plus hold bookkeeping
//! for auto-repeat and the save gesture. Rendering produces fixed-width
//! 16-character lines for the two-row display.

pub mod button;
pub mod machine;
pub mod render;

pub use button::Button;
pub use machine::{UiAction, UiState};
pub use render::Line;
