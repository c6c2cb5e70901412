//! Front Panel
//!
//! The interaction state machine that turns select-button presses, encoder
//! detents and encoder-button presses into edits of the waveform, output
//! level and frequency, and the capabilities it commands.

mod io;
mod machine;
mod mode;

pub use io::{Beeper, Generator, Instrument, PanelDisplay, PanelInput};
pub use machine::FrontPanel;
pub use mode::PanelMode;
