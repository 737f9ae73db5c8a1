//! Multi-step input flows.
//!
//! A flow is a chain of [`Step`]s. Each step shows one prompt through the
//! [`MultiStepInput`] handle and returns the step to run next. The
//! [`FlowController`] records visited steps in a [`StepStack`] so the user can
//! go back, go forward onto steps already answered, change an earlier answer
//! (which forks the history), or cancel the whole flow.

pub mod controller;
pub mod host;
pub mod input;
pub mod mock;
pub mod params;
pub mod signal;
pub mod stack;
pub mod step;

pub use controller::{run_flow, FlowController, FlowError, FlowOutcome, FlowReport};
pub use host::{
    InputBoxSpec, NavButton, PickEntry, PromptButton, PromptError, PromptEvent, PromptGuard,
    PromptHandle, PromptHost, QuickPickSpec,
};
pub use input::MultiStepInput;
pub use params::{InputBoxParams, PickItem, QuickPickParams, ShouldResume, ValueObserver};
pub use signal::{FlowSignal, NavigationError, PromptOutcome};
pub use stack::StepStack;
pub use step::{step_fn, FnStep, Step, StepOutcome, StepRef};
