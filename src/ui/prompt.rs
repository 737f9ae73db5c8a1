//! Widget state for the two prompt kinds and their key handling.
//!
//! Key handling is pure: a key updates the state and may produce the
//! [`PromptEvent`] the flow kernel consumes. Drawing lives in `render.rs`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::Style;
use tui_textarea::{CursorMove, TextArea};

use crate::flow::{InputBoxSpec, NavButton, PickEntry, PromptButton, PromptEvent, QuickPickSpec};

/// Choice list with a type-to-filter query
pub struct PickState {
    pub entries: Vec<PickEntry>,
    pub filter: String,
    /// Indices into `entries` that match `filter`, in display order
    pub visible: Vec<usize>,
    /// Position within `visible`
    pub selected: usize,
    pub placeholder: Option<String>,
}

impl PickState {
    fn new(entries: Vec<PickEntry>, active: &[usize], placeholder: Option<String>) -> Self {
        let visible: Vec<usize> = (0..entries.len()).collect();
        let selected = active
            .first()
            .and_then(|a| visible.iter().position(|v| v == a))
            .unwrap_or(0);
        Self {
            entries,
            filter: String::new(),
            visible,
            selected,
            placeholder,
        }
    }

    /// Index into `entries` of the highlighted row
    pub fn highlighted(&self) -> Option<usize> {
        self.visible.get(self.selected).copied()
    }

    fn refilter(&mut self) {
        let query = self.filter.to_lowercase();
        self.visible = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| query.is_empty() || e.label.to_lowercase().contains(&query))
            .map(|(i, _)| i)
            .collect();
        self.selected = 0;
    }

    fn select_next(&mut self) {
        if !self.visible.is_empty() {
            self.selected = (self.selected + 1) % self.visible.len();
        }
    }

    fn select_prev(&mut self) {
        if !self.visible.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.visible.len() - 1);
        }
    }
}

/// Single-line text entry
pub struct EntryState {
    pub textarea: TextArea<'static>,
    pub prompt: Option<String>,
    pub password: bool,
}

impl EntryState {
    fn new(value: String, prompt: Option<String>, password: bool, mask_char: char) -> Self {
        let mut textarea = TextArea::new(vec![value]);
        textarea.move_cursor(CursorMove::End);
        textarea.set_cursor_line_style(Style::default());
        if password {
            textarea.set_mask_char(mask_char);
        }
        Self {
            textarea,
            prompt,
            password,
        }
    }

    pub fn value(&self) -> String {
        self.textarea.lines().concat()
    }
}

pub enum PromptBody {
    Pick(PickState),
    Entry(EntryState),
}

/// Everything the terminal shows for one live prompt
pub struct PromptState {
    pub title: String,
    pub step: usize,
    pub total_steps: usize,
    pub body: PromptBody,
    pub buttons: Vec<PromptButton>,
    pub busy: bool,
    pub enabled: bool,
    pub validation: Option<String>,
}

impl PromptState {
    pub fn quick_pick(spec: QuickPickSpec) -> Self {
        Self {
            title: spec.title,
            step: spec.step,
            total_steps: spec.total_steps,
            body: PromptBody::Pick(PickState::new(spec.items, &spec.active, spec.placeholder)),
            buttons: spec.buttons,
            busy: false,
            enabled: true,
            validation: None,
        }
    }

    pub fn input_box(spec: InputBoxSpec, mask_char: char) -> Self {
        Self {
            title: spec.title.unwrap_or_default(),
            step: spec.step,
            total_steps: spec.total_steps,
            body: PromptBody::Entry(EntryState::new(
                spec.value,
                spec.prompt,
                spec.password,
                mask_char,
            )),
            buttons: spec.buttons,
            busy: false,
            enabled: true,
            validation: None,
        }
    }

    /// Title with the step counter, e.g. `Pick a radio (1/3)`
    pub fn heading(&self) -> String {
        if self.total_steps == 0 {
            return self.title.clone();
        }
        if self.title.is_empty() {
            format!("({}/{})", self.step, self.total_steps)
        } else {
            format!("{} ({}/{})", self.title, self.step, self.total_steps)
        }
    }

    pub fn has_button(&self, kind: NavButton) -> bool {
        self.buttons.iter().any(|b| b.kind == kind)
    }

    pub fn accepts_input(&self) -> bool {
        self.enabled && !self.busy
    }

    /// Apply a key press. Returns the event to report to the kernel, if any.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<PromptEvent> {
        if !self.accepts_input() {
            return None;
        }

        if let Some(button) = nav_button(&key) {
            return self
                .has_button(button)
                .then_some(PromptEvent::Triggered(button));
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if key.code == KeyCode::Esc || (ctrl && key.code == KeyCode::Char('c')) {
            return Some(PromptEvent::Hidden);
        }

        match &mut self.body {
            PromptBody::Pick(pick) => match key.code {
                KeyCode::Enter => pick.highlighted().map(PromptEvent::Selected),
                KeyCode::Down => {
                    pick.select_next();
                    None
                }
                KeyCode::Up => {
                    pick.select_prev();
                    None
                }
                KeyCode::Char('n') if ctrl => {
                    pick.select_next();
                    None
                }
                KeyCode::Char('p') if ctrl => {
                    pick.select_prev();
                    None
                }
                KeyCode::Backspace => {
                    if pick.filter.pop().is_some() {
                        pick.refilter();
                    }
                    None
                }
                KeyCode::Char(c) if !ctrl => {
                    pick.filter.push(c);
                    pick.refilter();
                    None
                }
                _ => None,
            },
            PromptBody::Entry(entry) => match key.code {
                KeyCode::Enter => Some(PromptEvent::Accepted(entry.value())),
                // the textarea would break the line on these; the entry is one row
                KeyCode::Char('m' | 'j') if ctrl => Some(PromptEvent::Accepted(entry.value())),
                _ => {
                    let before = entry.value();
                    entry.textarea.input(key);
                    let after = entry.value();
                    (after != before).then_some(PromptEvent::ValueChanged(after))
                }
            },
        }
    }
}

/// Alt-Left / Ctrl-B go back, Alt-Right / Ctrl-F go forward
fn nav_button(key: &KeyEvent) -> Option<NavButton> {
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Left if alt => Some(NavButton::Back),
        KeyCode::Right if alt => Some(NavButton::Forward),
        KeyCode::Char('b') if ctrl => Some(NavButton::Back),
        KeyCode::Char('f') if ctrl => Some(NavButton::Forward),
        _ => None,
    }
}
