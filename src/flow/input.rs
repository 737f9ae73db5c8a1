//! The handle a running step uses to show its prompt.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use tracing::debug;

use super::host::{
    InputBoxSpec, NavButton, PromptButton, PromptError, PromptEvent, PromptGuard, PromptHandle,
    PromptHost, QuickPickSpec,
};
use super::params::{InputBoxParams, PickItem, QuickPickParams, ShouldResume};
use super::signal::PromptOutcome;
use super::stack::StepStack;
use super::step::StepRef;
use crate::config::FlowConfig;

/// Live-validation run started for one edit of a text entry
struct PendingCheck<'f> {
    seq: u64,
    value: String,
    future: BoxFuture<'f, Option<String>>,
}

enum Wake {
    Checked(Option<String>),
    Event(Result<PromptEvent, PromptError>),
}

/// Passed to [`super::Step::run`]. Owns the single live prompt of the flow:
/// opening a prompt always disposes the previous one first.
pub struct MultiStepInput<'a> {
    host: &'a mut dyn PromptHost,
    stack: &'a StepStack<StepRef>,
    current: &'a mut Option<PromptGuard>,
    config: &'a FlowConfig,
    unsave_requested: bool,
    prompts_shown: usize,
}

impl<'a> MultiStepInput<'a> {
    pub(crate) fn new(
        host: &'a mut dyn PromptHost,
        stack: &'a StepStack<StepRef>,
        current: &'a mut Option<PromptGuard>,
        config: &'a FlowConfig,
    ) -> Self {
        Self {
            host,
            stack,
            current,
            config,
            unsave_requested: false,
            prompts_shown: 0,
        }
    }

    /// 1-based position of the running step in the history
    pub fn position(&self) -> usize {
        self.stack.cursor()
    }

    /// Number of steps recorded so far
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    pub(crate) fn unsave_requested(&self) -> bool {
        self.unsave_requested
    }

    pub(crate) fn prompts_shown(&self) -> usize {
        self.prompts_shown
    }

    /// Present a choice list and wait for a selection or a navigation signal
    pub async fn show_quick_pick<T: PickItem>(
        &mut self,
        params: QuickPickParams<T>,
    ) -> Result<PromptOutcome<T>, PromptError> {
        let spec = QuickPickSpec {
            title: params.title.clone(),
            step: params.step,
            total_steps: params.total_steps,
            items: params.items.iter().map(PickItem::to_entry).collect(),
            active: params.active_indices(),
            placeholder: params.placeholder.clone(),
            buttons: self.buttons(),
        };

        self.dispose_current();
        let handle = self.host.create_quick_pick(spec)?;
        self.install(handle)?;
        debug!(title = %params.title, step = params.step, "showing choice list");

        loop {
            let event = self.live()?.next_event().await?;
            match event {
                PromptEvent::Selected(index) => {
                    let item = params.items.get(index).cloned().ok_or(
                        PromptError::InvalidSelection {
                            index,
                            len: params.items.len(),
                        },
                    )?;
                    if params.unsave {
                        self.unsave_requested = true;
                    }
                    return Ok(PromptOutcome::Resolved(item));
                }
                PromptEvent::Triggered(NavButton::Back) => return Ok(PromptOutcome::Back),
                PromptEvent::Triggered(NavButton::Forward) => return Ok(PromptOutcome::Forward),
                PromptEvent::Hidden => {
                    return Ok(dismissed(params.should_resume.clone()).await);
                }
                PromptEvent::Accepted(_) | PromptEvent::ValueChanged(_) => {
                    debug!("ignoring text event on a choice list");
                }
            }
        }
    }

    /// Present a text entry and wait for a submitted value or a navigation
    /// signal. With an `on_change` observer, every edit starts a check; a
    /// newer edit abandons the check in flight and only the latest check's
    /// message ever reaches the prompt.
    pub async fn show_input_box(
        &mut self,
        params: InputBoxParams,
    ) -> Result<PromptOutcome<String>, PromptError> {
        let spec = InputBoxSpec {
            title: params.title.clone(),
            step: params.step,
            total_steps: params.total_steps,
            value: params.value.clone(),
            prompt: params.prompt.clone(),
            password: params.password,
            buttons: self.buttons(),
        };

        self.dispose_current();
        let handle = self.host.create_input_box(spec)?;
        self.install(handle)?;
        debug!(title = ?params.title, step = params.step, "showing text entry");

        let observer = params.on_change.clone();
        let mut latest_seq: u64 = 0;
        let mut pending: Option<PendingCheck<'_>> = None;

        loop {
            let wake = {
                let handle = self.live()?;
                match pending.as_mut() {
                    Some(check) => tokio::select! {
                        message = &mut check.future => Wake::Checked(message),
                        event = handle.next_event() => Wake::Event(event),
                    },
                    None => Wake::Event(handle.next_event().await),
                }
            };

            let event = match wake {
                Wake::Checked(message) => {
                    if let Some(check) = pending.take() {
                        if check.seq == latest_seq {
                            self.live()?.set_validation_message(message);
                        } else {
                            debug!(seq = check.seq, latest_seq, "discarding stale check");
                        }
                    }
                    continue;
                }
                Wake::Event(event) => event?,
            };

            match event {
                PromptEvent::ValueChanged(value) => {
                    latest_seq += 1;
                    if let Some(observer) = observer.as_ref() {
                        if let Some(stale) = pending.take() {
                            debug!(seq = stale.seq, "abandoning check for an older edit");
                        }
                        pending = Some(PendingCheck {
                            seq: latest_seq,
                            value: value.clone(),
                            future: observer.on_change(value),
                        });
                    }
                }
                PromptEvent::Accepted(value) => {
                    if let Some(check) = pending.take() {
                        if check.seq == latest_seq && check.value == value {
                            let handle = self.live()?;
                            handle.set_enabled(false);
                            handle.set_busy(true);
                            let message = check.future.await;
                            let handle = self.live()?;
                            handle.set_validation_message(message);
                            handle.set_busy(false);
                            handle.set_enabled(true);
                        } else {
                            debug!(seq = check.seq, "abandoning check on submit");
                        }
                    }
                    if params.unsave {
                        self.unsave_requested = true;
                    }
                    return Ok(PromptOutcome::Resolved(value));
                }
                PromptEvent::Triggered(NavButton::Back) => return Ok(PromptOutcome::Back),
                PromptEvent::Triggered(NavButton::Forward) => return Ok(PromptOutcome::Forward),
                PromptEvent::Hidden => {
                    return Ok(dismissed(params.should_resume.clone()).await);
                }
                PromptEvent::Selected(_) => {
                    debug!("ignoring selection event on a text entry");
                }
            }
        }
    }

    fn buttons(&self) -> Vec<PromptButton> {
        let mut buttons = Vec::new();
        if self.stack.can_go_back() {
            buttons.push(PromptButton {
                kind: NavButton::Back,
                tooltip: self.config.back_tooltip.clone(),
            });
        }
        if self.stack.can_go_forward() {
            buttons.push(PromptButton {
                kind: NavButton::Forward,
                tooltip: self.config.forward_tooltip.clone(),
            });
        }
        buttons
    }

    fn dispose_current(&mut self) {
        if self.current.take().is_some() {
            debug!("disposed previous prompt");
        }
    }

    fn install(&mut self, handle: Box<dyn PromptHandle>) -> Result<(), PromptError> {
        let mut guard = PromptGuard::new(handle);
        guard.show()?;
        *self.current = Some(guard);
        self.prompts_shown += 1;
        Ok(())
    }

    fn live(&mut self) -> Result<&mut PromptGuard, PromptError> {
        self.current.as_mut().ok_or(PromptError::Disposed)
    }
}

async fn dismissed<T>(policy: Option<Arc<dyn ShouldResume>>) -> PromptOutcome<T> {
    match policy {
        Some(policy) if policy.should_resume().await => PromptOutcome::Resume,
        _ => PromptOutcome::Cancel,
    }
}
