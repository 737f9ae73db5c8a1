//! Scripted prompt host for tests.
//!
//! Every prompt the kernel creates takes the next script queued with
//! [`MockPromptHost::script`] and replays it as UI events. Everything the
//! kernel does to the prompts (specs, buttons, busy marks, validation
//! messages, disposal) is recorded for assertions. Clones share state.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use super::host::{
    InputBoxSpec, NavButton, PromptError, PromptEvent, PromptHandle, PromptHost, QuickPickSpec,
};

/// One scripted user action
#[derive(Debug, Clone, PartialEq)]
pub enum MockEvent {
    /// Select the item at this index
    Select(usize),
    /// Select the first item with this label
    Pick(String),
    /// Edit the text entry to this value
    Type(String),
    /// Submit the text entry with this value
    Accept(String),
    Back,
    Forward,
    /// Dismiss the prompt (escape)
    Hide,
    /// Wait before delivering the next event
    Pause(Duration),
}

impl MockEvent {
    pub fn pick(label: impl Into<String>) -> Self {
        MockEvent::Pick(label.into())
    }

    pub fn typed(value: impl Into<String>) -> Self {
        MockEvent::Type(value.into())
    }

    pub fn accept(value: impl Into<String>) -> Self {
        MockEvent::Accept(value.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockPromptKind {
    QuickPick,
    InputBox,
}

/// Record of one prompt created through the mock host
#[derive(Debug, Clone)]
pub struct MockPrompt {
    pub kind: MockPromptKind,
    pub title: String,
    pub step: usize,
    pub total_steps: usize,
    pub items: Vec<String>,
    pub active: Vec<usize>,
    pub value: String,
    pub password: bool,
    pub buttons: Vec<NavButton>,
    pub shown: bool,
    pub disposed: bool,
    pub dispose_calls: usize,
    pub busy: bool,
    /// Every `set_busy` call in order
    pub busy_marks: Vec<bool>,
    pub enabled: bool,
    pub validation_messages: Vec<Option<String>>,
}

impl MockPrompt {
    pub fn has_button(&self, button: NavButton) -> bool {
        self.buttons.contains(&button)
    }

    pub fn is_live(&self) -> bool {
        self.shown && !self.disposed
    }
}

#[derive(Default)]
struct MockState {
    scripts: VecDeque<Vec<MockEvent>>,
    prompts: Vec<MockPrompt>,
}

#[derive(Clone, Default)]
pub struct MockPromptHost {
    state: Arc<Mutex<MockState>>,
}

impl MockPromptHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the events the next created prompt will report
    pub fn script(self, events: Vec<MockEvent>) -> Self {
        self.lock().scripts.push_back(events);
        self
    }

    /// Every prompt created so far, in creation order
    pub fn prompts(&self) -> Vec<MockPrompt> {
        self.lock().prompts.clone()
    }

    pub fn prompt_count(&self) -> usize {
        self.lock().prompts.len()
    }

    /// Prompts shown and not yet disposed
    pub fn live_prompts(&self) -> usize {
        self.lock().prompts.iter().filter(|p| p.is_live()).count()
    }

    /// Scripts queued but never consumed
    pub fn unused_scripts(&self) -> usize {
        self.lock().scripts.len()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fails with [`PromptError::PromptStillLive`] if an earlier prompt is
    /// still shown, since the kernel must dispose it first
    fn open(&mut self, record: MockPrompt) -> Result<Box<dyn PromptHandle>, PromptError> {
        let mut state = self.lock();
        if state.prompts.iter().any(MockPrompt::is_live) {
            return Err(PromptError::PromptStillLive(record.title));
        }

        let events = state.scripts.pop_front().unwrap_or_default();
        let labels = record.items.clone();
        let title = record.title.clone();
        state.prompts.push(record);
        let id = state.prompts.len() - 1;

        Ok(Box::new(MockPromptHandle {
            id,
            title,
            labels,
            events: events.into(),
            pause_until: None,
            state: Arc::clone(&self.state),
        }))
    }
}

impl PromptHost for MockPromptHost {
    fn create_quick_pick(
        &mut self,
        spec: QuickPickSpec,
    ) -> Result<Box<dyn PromptHandle>, PromptError> {
        self.open(MockPrompt {
            kind: MockPromptKind::QuickPick,
            title: spec.title,
            step: spec.step,
            total_steps: spec.total_steps,
            items: spec.items.into_iter().map(|e| e.label).collect(),
            active: spec.active,
            value: String::new(),
            password: false,
            buttons: spec.buttons.iter().map(|b| b.kind).collect(),
            shown: false,
            disposed: false,
            dispose_calls: 0,
            busy: false,
            busy_marks: Vec::new(),
            enabled: true,
            validation_messages: Vec::new(),
        })
    }

    fn create_input_box(
        &mut self,
        spec: InputBoxSpec,
    ) -> Result<Box<dyn PromptHandle>, PromptError> {
        self.open(MockPrompt {
            kind: MockPromptKind::InputBox,
            title: spec.title.unwrap_or_default(),
            step: spec.step,
            total_steps: spec.total_steps,
            items: Vec::new(),
            active: Vec::new(),
            value: spec.value,
            password: spec.password,
            buttons: spec.buttons.iter().map(|b| b.kind).collect(),
            shown: false,
            disposed: false,
            dispose_calls: 0,
            busy: false,
            busy_marks: Vec::new(),
            enabled: true,
            validation_messages: Vec::new(),
        })
    }
}

struct MockPromptHandle {
    id: usize,
    title: String,
    labels: Vec<String>,
    events: VecDeque<MockEvent>,
    /// Survives a cancelled `next_event` so pauses are not cut short
    pause_until: Option<Instant>,
    state: Arc<Mutex<MockState>>,
}

impl MockPromptHandle {
    fn update(&self, f: impl FnOnce(&mut MockPrompt)) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(prompt) = state.prompts.get_mut(self.id) {
            f(prompt);
        }
    }

    fn is_disposed(&self) -> bool {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.prompts.get(self.id).map(|p| p.disposed).unwrap_or(true)
    }
}

#[async_trait]
impl PromptHandle for MockPromptHandle {
    fn show(&mut self) -> Result<(), PromptError> {
        self.update(|p| p.shown = true);
        Ok(())
    }

    async fn next_event(&mut self) -> Result<PromptEvent, PromptError> {
        loop {
            if self.is_disposed() {
                return Err(PromptError::Disposed);
            }
            if let Some(deadline) = self.pause_until {
                tokio::time::sleep_until(deadline).await;
                self.pause_until = None;
            }
            let Some(event) = self.events.pop_front() else {
                return Err(PromptError::ScriptExhausted(self.title.clone()));
            };
            let event = match event {
                MockEvent::Pause(duration) => {
                    self.pause_until = Some(Instant::now() + duration);
                    continue;
                }
                MockEvent::Select(index) => PromptEvent::Selected(index),
                MockEvent::Pick(label) => {
                    let index = self.labels.iter().position(|l| *l == label).ok_or(
                        PromptError::InvalidSelection {
                            index: usize::MAX,
                            len: self.labels.len(),
                        },
                    )?;
                    PromptEvent::Selected(index)
                }
                MockEvent::Type(value) => {
                    self.update(|p| p.value = value.clone());
                    PromptEvent::ValueChanged(value)
                }
                MockEvent::Accept(value) => PromptEvent::Accepted(value),
                MockEvent::Back => PromptEvent::Triggered(NavButton::Back),
                MockEvent::Forward => PromptEvent::Triggered(NavButton::Forward),
                MockEvent::Hide => PromptEvent::Hidden,
            };
            return Ok(event);
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.update(|p| p.enabled = enabled);
    }

    fn set_busy(&mut self, busy: bool) {
        self.update(|p| {
            p.busy = busy;
            p.busy_marks.push(busy);
        });
    }

    fn set_validation_message(&mut self, message: Option<String>) {
        self.update(|p| p.validation_messages.push(message));
    }

    fn dispose(&mut self) {
        self.update(|p| {
            p.disposed = true;
            p.dispose_calls += 1;
        });
    }
}
