//! Steps: the units a flow is made of.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use futures_util::future::BoxFuture;

use super::input::MultiStepInput;
use super::signal::FlowSignal;

/// Shared handle to a step. The stack compares entries by pointer identity.
pub type StepRef = Arc<dyn Step>;

/// What a step decided after its prompt finished
pub enum StepOutcome {
    /// Continue with this step
    Next(StepRef),
    /// The flow is complete
    Finish,
    /// The prompt raised a navigation signal instead of a value
    Signal(FlowSignal),
}

impl StepOutcome {
    pub fn next(step: impl Step + 'static) -> Self {
        StepOutcome::Next(Arc::new(step))
    }
}

impl From<FlowSignal> for StepOutcome {
    fn from(signal: FlowSignal) -> Self {
        StepOutcome::Signal(signal)
    }
}

impl fmt::Debug for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Next(step) => f.debug_tuple("Next").field(&step.name()).finish(),
            StepOutcome::Finish => write!(f, "Finish"),
            StepOutcome::Signal(signal) => f.debug_tuple("Signal").field(signal).finish(),
        }
    }
}

/// A unit of a multi-step flow: presents exactly one prompt through the
/// [`MultiStepInput`] handle and decides what runs next.
///
/// Steps are never mutated by the engine. Any state a step needs lives in
/// the step value itself, and a step may run more than once when the user
/// navigates back or forward onto it, so `run` should not assume it is
/// called only once.
#[async_trait]
pub trait Step: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str {
        "step"
    }

    async fn run(&self, input: &mut MultiStepInput<'_>) -> Result<StepOutcome>;
}

/// Step backed by a closure, see [`step_fn`]
pub struct FnStep<F> {
    name: String,
    f: F,
}

#[async_trait]
impl<F> Step for FnStep<F>
where
    F: for<'a, 'b> Fn(&'a mut MultiStepInput<'b>) -> BoxFuture<'a, Result<StepOutcome>>
        + Send
        + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, input: &mut MultiStepInput<'_>) -> Result<StepOutcome> {
        (self.f)(input).await
    }
}

/// Build a step from a closure returning a boxed future.
///
/// ```ignore
/// let step = step_fn("confirm", |input| {
///     Box::pin(async move {
///         let params = QuickPickParams::new("Delete?", 1, 1, vec!["yes", "no"]);
///         match input.show_quick_pick(params).await?.into_result() {
///             Ok(_) => Ok(StepOutcome::Finish),
///             Err(signal) => Ok(signal.into()),
///         }
///     })
/// });
/// ```
pub fn step_fn<F>(name: impl Into<String>, f: F) -> StepRef
where
    F: for<'a, 'b> Fn(&'a mut MultiStepInput<'b>) -> BoxFuture<'a, Result<StepOutcome>>
        + Send
        + Sync
        + 'static,
{
    Arc::new(FnStep {
        name: name.into(),
        f,
    })
}
