// UI module - control surface abstraction and the terminal front end

pub mod surface;
pub mod terminal;

pub use surface::{ControlState, ControlSurface, LogSurface, NullSurface};
pub use terminal::{TerminalGuard, TerminalSurface, map_key, spawn_input_thread};
