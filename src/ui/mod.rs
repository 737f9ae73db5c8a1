//! Terminal prompt host built on ratatui and crossterm.

pub mod events;
pub mod host;
pub mod prompt;
pub mod render;
pub mod terminal_guard;

pub use host::TerminalPromptHost;
pub use terminal_guard::{install_panic_hook, TerminalGuard};
