//! Raw-mode / alternate-screen guard for the prompt terminal.

use anyhow::Result;
use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

/// Puts the terminal into prompt mode and restores it when dropped.
///
/// Restoration runs on normal scope exit, on early `?` returns, and (through
/// [`install_panic_hook`]) before a panic message is printed.
pub struct TerminalGuard {
    active: AtomicBool,
}

impl TerminalGuard {
    /// Enable raw mode and switch to the alternate screen
    pub fn enter() -> Result<Self> {
        enable_raw_mode()?;
        if let Err(err) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }
        Ok(Self {
            active: AtomicBool::new(true),
        })
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Restore the terminal now instead of waiting for drop
    pub fn release(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            Self::restore();
        }
    }

    /// Best-effort restore, safe to call when the terminal was never entered
    pub fn restore() {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
        let _ = io::stdout().flush();
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        self.release();
    }
}

/// Install a panic hook that restores the terminal before printing the panic.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        TerminalGuard::restore();
        original_hook(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_only_restores_once() {
        let guard = TerminalGuard {
            active: AtomicBool::new(true),
        };
        guard.release();
        assert!(!guard.is_active());
        // second release and the drop are no-ops
        guard.release();
        drop(guard);
    }

    #[test]
    fn test_inactive_guard_drops_quietly() {
        let guard = TerminalGuard {
            active: AtomicBool::new(false),
        };
        assert!(!guard.is_active());
        drop(guard);
    }

    #[test]
    fn test_restore_is_callable_without_terminal() {
        TerminalGuard::restore();
    }
}
