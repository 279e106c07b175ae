//! Terminal front end: feed surfaces, input commands and the client runner.

mod command;
mod formatter;
mod prompt;
mod runner;
mod surface;
mod terminal;

pub use command::Command;
pub use formatter::ViewFormatter;
pub use runner::run_client;
pub use surface::{DEFAULT_LINE_HEIGHT_PX, MemoryFeedSurface};
pub use terminal::{TerminalFeedView, TerminalStatus, TerminalThemeIndicator};
