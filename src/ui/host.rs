//! Terminal implementation of the prompt host.

use std::io::{self, Stdout};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::debug;

use super::events::{EventReader, TermEvent};
use super::prompt::PromptState;
use super::render;
use crate::config::UiConfig;
use crate::flow::{InputBoxSpec, PromptError, PromptEvent, PromptHandle, PromptHost, QuickPickSpec};

struct Shared<B: Backend> {
    terminal: Mutex<Terminal<B>>,
    events: tokio::sync::Mutex<EventReader>,
    ui: UiConfig,
}

/// Draws prompts with ratatui and reads keys with crossterm.
///
/// The terminal must already be in raw mode (see
/// [`super::TerminalGuard::enter`]). Every handle shares the one terminal and
/// the one input channel; the kernel keeps at most one handle live.
pub struct TerminalPromptHost<B: Backend = CrosstermBackend<Stdout>> {
    shared: Arc<Shared<B>>,
}

impl TerminalPromptHost {
    pub fn new(ui: UiConfig) -> Result<Self, PromptError> {
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        terminal.clear()?;
        let events = EventReader::spawn(Duration::from_millis(ui.tick_rate_ms));
        Ok(Self::with_parts(terminal, events, ui))
    }
}

impl<B: Backend + Send + 'static> TerminalPromptHost<B> {
    /// Host over an existing terminal and input source
    pub fn with_parts(terminal: Terminal<B>, events: EventReader, ui: UiConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                terminal: Mutex::new(terminal),
                events: tokio::sync::Mutex::new(events),
                ui,
            }),
        }
    }

    fn open(&self, state: PromptState) -> Box<dyn PromptHandle> {
        Box::new(TerminalPromptHandle {
            shared: Arc::clone(&self.shared),
            state,
            shown: false,
            disposed: false,
        })
    }
}

impl<B: Backend + Send + 'static> PromptHost for TerminalPromptHost<B> {
    fn create_quick_pick(
        &mut self,
        spec: QuickPickSpec,
    ) -> Result<Box<dyn PromptHandle>, PromptError> {
        Ok(self.open(PromptState::quick_pick(spec)))
    }

    fn create_input_box(
        &mut self,
        spec: InputBoxSpec,
    ) -> Result<Box<dyn PromptHandle>, PromptError> {
        let mask_char = self.shared.ui.mask_char;
        Ok(self.open(PromptState::input_box(spec, mask_char)))
    }
}

struct TerminalPromptHandle<B: Backend> {
    shared: Arc<Shared<B>>,
    state: PromptState,
    shown: bool,
    disposed: bool,
}

impl<B: Backend> TerminalPromptHandle<B> {
    fn redraw(&self) -> Result<(), PromptError> {
        if !self.shown || self.disposed {
            return Ok(());
        }
        let mut terminal = self
            .shared
            .terminal
            .lock()
            .map_err(|_| PromptError::Terminal("terminal lock poisoned".to_string()))?;
        terminal.draw(|frame| render::draw(frame, &self.state, &self.shared.ui))?;
        Ok(())
    }

    /// Redraw after a state change the kernel made; failures only get logged
    fn refresh(&self) {
        if let Err(err) = self.redraw() {
            debug!(error = %err, "prompt redraw failed");
        }
    }
}

#[async_trait]
impl<B: Backend + Send + 'static> PromptHandle for TerminalPromptHandle<B> {
    fn show(&mut self) -> Result<(), PromptError> {
        self.shown = true;
        self.redraw()
    }

    async fn next_event(&mut self) -> Result<PromptEvent, PromptError> {
        loop {
            if self.disposed {
                return Err(PromptError::Disposed);
            }
            let next = {
                let mut events = self.shared.events.lock().await;
                events.next().await
            };
            match next {
                Some(TermEvent::Key(key)) => {
                    let event = self.state.handle_key(key);
                    self.redraw()?;
                    if let Some(event) = event {
                        return Ok(event);
                    }
                }
                Some(TermEvent::Resize) | Some(TermEvent::Tick) => self.redraw()?,
                None => return Err(PromptError::InputClosed),
            }
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.state.enabled = enabled;
        self.refresh();
    }

    fn set_busy(&mut self, busy: bool) {
        self.state.busy = busy;
        self.refresh();
    }

    fn set_validation_message(&mut self, message: Option<String>) {
        self.state.validation = message;
        self.refresh();
    }

    fn dispose(&mut self) {
        if !self.disposed {
            self.disposed = true;
            debug!(title = %self.state.title, "prompt disposed");
        }
    }
}
