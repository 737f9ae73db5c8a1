//! History of visited steps with a cursor marking the active one.
//!
//! The cursor is 1-based: `0` means nothing has run yet, otherwise it points
//! at the step about to run (or that ran last). Navigating back and forward
//! only moves the cursor; pushing while the cursor sits before the end forks
//! history by discarding everything after the cursor.

use super::signal::NavigationError;

#[derive(Debug, Clone)]
pub struct StepStack<T> {
    entries: Vec<T>,
    cursor: usize,
}

impl<T> Default for StepStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> StepStack<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
        }
    }

    /// Truncate entries past the cursor, append `step` and move onto it
    pub fn push(&mut self, step: T) {
        self.entries.truncate(self.cursor);
        self.entries.push(step);
        self.cursor += 1;
    }

    /// Step at the cursor, or `None` before the first push or after a clear
    pub fn current(&self) -> Option<&T> {
        if self.cursor == 0 {
            return None;
        }
        self.entries.get(self.cursor - 1)
    }

    pub fn step_back(&mut self) -> Result<(), NavigationError> {
        if self.cursor <= 1 {
            return Err(NavigationError::NoPrevious {
                cursor: self.cursor,
            });
        }
        self.cursor -= 1;
        Ok(())
    }

    pub fn step_forward(&mut self) -> Result<(), NavigationError> {
        if self.cursor >= self.entries.len() {
            return Err(NavigationError::NoNext {
                cursor: self.cursor,
                depth: self.entries.len(),
            });
        }
        self.cursor += 1;
        Ok(())
    }

    /// Remove the entry at the cursor and move the cursor back onto its
    /// predecessor. Entries after the cursor shift down by one.
    pub fn drop_unsaved(&mut self) -> Result<T, NavigationError> {
        if self.cursor == 0 || self.cursor > self.entries.len() {
            return Err(NavigationError::NothingToDrop);
        }
        let dropped = self.entries.remove(self.cursor - 1);
        self.cursor -= 1;
        Ok(dropped)
    }

    /// Number of recorded entries
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether a back control should be offered
    pub fn can_go_back(&self) -> bool {
        self.entries.len() > 1
    }

    /// Whether a forward control should be offered
    pub fn can_go_forward(&self) -> bool {
        self.cursor < self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }
}
