// Terminal widget
pub mod keys;
pub mod terminal;

pub use terminal::{CrosstermTerminal, DecoratedTerminal, TerminalEvent, TerminalFactory, TerminalIo};
