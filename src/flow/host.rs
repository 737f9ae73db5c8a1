//! Prompt host abstraction layer.
//!
//! The flow kernel never draws anything. It asks a [`PromptHost`] to create a
//! prompt from a plain description, then consumes the raw UI events the
//! prompt reports. Implementations exist for the terminal
//! ([`crate::ui::TerminalPromptHost`]) and for tests
//! ([`super::mock::MockPromptHost`]).

use std::ops::{Deref, DerefMut};

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a prompt host while creating or driving a prompt
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("prompt was disposed before it produced an event")]
    Disposed,

    #[error("prompt host input closed")]
    InputClosed,

    #[error("selection index {index} is out of range for {len} item(s)")]
    InvalidSelection { index: usize, len: usize },

    #[error("terminal error: {0}")]
    Terminal(String),

    #[error("no scripted events left for prompt '{0}'")]
    ScriptExhausted(String),

    #[error("prompt '{0}' was created while another prompt was still live")]
    PromptStillLive(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Navigation control shown next to a prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavButton {
    Back,
    Forward,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptButton {
    pub kind: NavButton,
    pub tooltip: String,
}

/// One row of a choice list as the host sees it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PickEntry {
    pub label: String,
    pub description: Option<String>,
    pub detail: Option<String>,
}

/// Everything a host needs to present a choice list
#[derive(Debug, Clone, Default)]
pub struct QuickPickSpec {
    pub title: String,
    pub step: usize,
    pub total_steps: usize,
    pub items: Vec<PickEntry>,
    /// Indices into `items` that start highlighted
    pub active: Vec<usize>,
    pub placeholder: Option<String>,
    pub buttons: Vec<PromptButton>,
}

/// Everything a host needs to present a text entry
#[derive(Debug, Clone, Default)]
pub struct InputBoxSpec {
    pub title: Option<String>,
    pub step: usize,
    pub total_steps: usize,
    pub value: String,
    pub prompt: Option<String>,
    pub password: bool,
    pub buttons: Vec<PromptButton>,
}

/// Raw event reported by a live prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptEvent {
    /// Choice list: the item at this index was picked
    Selected(usize),
    /// Text entry: the value was submitted
    Accepted(String),
    /// Text entry: the value changed (one event per edit)
    ValueChanged(String),
    /// A navigation button was triggered
    Triggered(NavButton),
    /// The prompt was dismissed without a selection or submission
    Hidden,
}

/// Creates prompts. Only one prompt created by a host is ever live at a time.
pub trait PromptHost: Send {
    fn create_quick_pick(
        &mut self,
        spec: QuickPickSpec,
    ) -> Result<Box<dyn PromptHandle>, PromptError>;

    fn create_input_box(&mut self, spec: InputBoxSpec)
        -> Result<Box<dyn PromptHandle>, PromptError>;
}

/// A live prompt created by a [`PromptHost`]
#[async_trait]
pub trait PromptHandle: Send {
    /// Make the prompt visible
    fn show(&mut self) -> Result<(), PromptError>;

    /// Wait for the next UI event. Must be cancel safe: dropping the future
    /// before it completes must not lose an event.
    async fn next_event(&mut self) -> Result<PromptEvent, PromptError>;

    fn set_enabled(&mut self, enabled: bool);

    fn set_busy(&mut self, busy: bool);

    fn set_validation_message(&mut self, message: Option<String>);

    /// Tear the prompt down. Calling this more than once is a no-op.
    fn dispose(&mut self);
}

/// Owns a live prompt and disposes it when dropped, so every exit path out of
/// a step (value, signal, error, panic unwinding) releases the prompt.
pub struct PromptGuard {
    handle: Box<dyn PromptHandle>,
}

impl PromptGuard {
    pub fn new(handle: Box<dyn PromptHandle>) -> Self {
        Self { handle }
    }

    /// Mark the prompt inactive while the next step works
    pub fn mark_busy(&mut self) {
        self.handle.set_enabled(false);
        self.handle.set_busy(true);
    }
}

impl Deref for PromptGuard {
    type Target = dyn PromptHandle;

    fn deref(&self) -> &Self::Target {
        self.handle.as_ref()
    }
}

impl DerefMut for PromptGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.handle.as_mut()
    }
}

impl Drop for PromptGuard {
    fn drop(&mut self) {
        self.handle.dispose();
    }
}
