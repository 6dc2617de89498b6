// Terminal front end state: screens, selections and queued commands.

pub mod input;
pub mod state;

pub use input::handle_input;
pub use state::{App, AppScreen, Command, InputMode};
