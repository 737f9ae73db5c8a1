use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

/// What the user asked to do with a program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramAction {
    Play,
    AddToQueue,
    Comments,
    CopyLink,
}

impl ProgramAction {
    pub const ALL: [ProgramAction; 4] = [
        ProgramAction::Play,
        ProgramAction::AddToQueue,
        ProgramAction::Comments,
        ProgramAction::CopyLink,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ProgramAction::Play => "Play",
            ProgramAction::AddToQueue => "Add to queue",
            ProgramAction::Comments => "Comments",
            ProgramAction::CopyLink => "Copy program link",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub radio: Option<String>,
    pub program: Option<String>,
    pub action: Option<ProgramAction>,
    pub search: Option<String>,
    /// Links copied along the way, oldest first
    pub links: Vec<String>,
}

/// Results the wizard's steps collect. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct RadioSelection {
    inner: Arc<Mutex<SelectionState>>,
}

impl RadioSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SelectionState {
        self.lock().clone()
    }

    pub fn set_radio(&self, name: &str) {
        let mut state = self.lock();
        state.radio = Some(name.to_string());
        state.program = None;
        state.action = None;
    }

    pub fn set_program(&self, name: &str, action: ProgramAction) {
        let mut state = self.lock();
        state.program = Some(name.to_string());
        state.action = Some(action);
    }

    pub fn set_search(&self, query: &str) {
        self.lock().search = Some(query.to_string());
    }

    pub fn copy_link(&self, link: String) {
        self.lock().links.push(link);
    }

    fn lock(&self) -> MutexGuard<'_, SelectionState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl fmt::Display for SelectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "radio:   {}", self.radio.as_deref().unwrap_or("-"))?;
        writeln!(f, "program: {}", self.program.as_deref().unwrap_or("-"))?;
        writeln!(
            f,
            "action:  {}",
            self.action.map(|a| a.label()).unwrap_or("-")
        )?;
        if let Some(search) = &self.search {
            writeln!(f, "search:  {}", search)?;
        }
        for link in &self.links {
            writeln!(f, "copied:  {}", link)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_radio_clears_program() {
        let selection = RadioSelection::new();
        selection.set_radio("Story Hour");
        selection.set_program("The Lighthouse, Part 1", ProgramAction::Play);
        selection.set_radio("Tech Talk Weekly");

        let state = selection.snapshot();
        assert_eq!(state.radio.as_deref(), Some("Tech Talk Weekly"));
        assert_eq!(state.program, None);
        assert_eq!(state.action, None);
    }

    #[test]
    fn test_clones_share_state() {
        let selection = RadioSelection::new();
        selection.clone().copy_link("https://example.invalid/1".to_string());
        assert_eq!(selection.snapshot().links.len(), 1);
    }

    #[test]
    fn test_display_lists_links() {
        let selection = RadioSelection::new();
        selection.set_radio("Story Hour");
        selection.copy_link("link-a".to_string());
        let text = selection.snapshot().to_string();
        assert!(text.contains("radio:   Story Hour"));
        assert!(text.contains("program: -"));
        assert!(text.contains("copied:  link-a"));
    }
}
