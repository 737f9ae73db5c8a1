//! Driver loop for multi-step flows.

use thiserror::Error;
use tracing::{debug, info, warn};

use super::host::{PromptGuard, PromptHost};
use super::input::MultiStepInput;
use super::signal::{FlowSignal, NavigationError};
use super::stack::StepStack;
use super::step::{StepOutcome, StepRef};
use crate::config::{BackAtRoot, FlowConfig};

/// Errors that end a flow abnormally
#[derive(Error, Debug)]
pub enum FlowError {
    /// The host asked to navigate somewhere the history does not reach
    #[error(transparent)]
    Navigation(#[from] NavigationError),

    /// A step failed. The step's error is passed through untouched, including
    /// prompt host failures the step propagated with `?`.
    #[error(transparent)]
    Step(anyhow::Error),
}

/// How a flow ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    /// The last step returned no continuation
    Completed,
    /// The user cancelled; nothing was collected
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowReport {
    pub outcome: FlowOutcome,
    /// Step invocations, counting reruns after back/forward/resume
    pub steps_run: usize,
    pub prompts_shown: usize,
    /// Names of the steps left in the history when the flow ended
    pub history: Vec<String>,
}

impl FlowReport {
    pub fn is_completed(&self) -> bool {
        self.outcome == FlowOutcome::Completed
    }

    pub fn is_cancelled(&self) -> bool {
        self.outcome == FlowOutcome::Cancelled
    }
}

/// Runs one flow at a time against a prompt host.
///
/// Each call to [`FlowController::run`] starts from a fresh history. The
/// `&mut self` receiver keeps a controller from driving two flows at once.
pub struct FlowController {
    host: Box<dyn PromptHost>,
    config: FlowConfig,
}

impl FlowController {
    pub fn new(host: Box<dyn PromptHost>, config: FlowConfig) -> Self {
        Self { host, config }
    }

    /// Controller with default navigation settings
    pub fn with_host(host: impl PromptHost + 'static) -> Self {
        Self::new(Box::new(host), FlowConfig::default())
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    pub async fn run(&mut self, start: StepRef) -> Result<FlowReport, FlowError> {
        let mut stack: StepStack<StepRef> = StepStack::new();
        let mut current: Option<PromptGuard> = None;
        let mut steps_run = 0usize;
        let mut prompts_shown = 0usize;

        debug!(step = start.name(), "starting flow");
        stack.push(start);

        let outcome = loop {
            let Some(step) = stack.current().cloned() else {
                break FlowOutcome::Completed;
            };

            let (result, unsave) = {
                let mut input =
                    MultiStepInput::new(self.host.as_mut(), &stack, &mut current, &self.config);
                let result = step.run(&mut input).await;
                prompts_shown += input.prompts_shown();
                (result, input.unsave_requested())
            };
            steps_run += 1;

            // A prompt never outlives the step that opened it, so `current` is
            // empty again whenever the next step starts
            if let Some(mut prompt) = current.take() {
                prompt.mark_busy();
            }

            let outcome = result.map_err(|err| {
                debug!(step = step.name(), error = %err, "step failed");
                FlowError::Step(err)
            })?;

            match outcome {
                StepOutcome::Next(next) => {
                    if unsave {
                        stack.drop_unsaved()?;
                        debug!(step = step.name(), "dropped unsave step from history");
                    }
                    debug!(from = step.name(), to = next.name(), "advancing");
                    stack.push(next);
                }
                StepOutcome::Finish => {
                    if unsave {
                        stack.drop_unsaved()?;
                    }
                    break FlowOutcome::Completed;
                }
                StepOutcome::Signal(FlowSignal::Back) => match stack.step_back() {
                    Ok(()) => debug!(cursor = stack.cursor(), "stepped back"),
                    Err(err) => {
                        warn!(error = %err, "back requested with nothing behind");
                        match self.config.back_at_root {
                            BackAtRoot::Cancel => {
                                stack.clear();
                                break FlowOutcome::Cancelled;
                            }
                            BackAtRoot::Error => return Err(err.into()),
                        }
                    }
                },
                StepOutcome::Signal(FlowSignal::Forward) => {
                    if let Err(err) = stack.step_forward() {
                        warn!(error = %err, "forward requested with nothing ahead");
                        return Err(err.into());
                    }
                    debug!(cursor = stack.cursor(), "stepped forward");
                }
                StepOutcome::Signal(FlowSignal::Cancel) => {
                    stack.clear();
                    break FlowOutcome::Cancelled;
                }
                StepOutcome::Signal(FlowSignal::Resume) => {
                    debug!(step = step.name(), "resuming step");
                }
            }
        };

        let history = stack.iter().map(|s| s.name().to_string()).collect();
        info!(?outcome, steps_run, prompts_shown, "flow finished");

        Ok(FlowReport {
            outcome,
            steps_run,
            prompts_shown,
            history,
        })
    }
}

/// Run a single flow with default settings
pub async fn run_flow(
    host: impl PromptHost + 'static,
    start: StepRef,
) -> Result<FlowReport, FlowError> {
    FlowController::with_host(host).run(start).await
}
