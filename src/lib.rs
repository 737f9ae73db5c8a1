//! quickstep - multi-step interactive input flows
//!
//! The [`flow`] module is the engine: steps, history navigation and the
//! prompt host contract. [`ui`] hosts prompts in a terminal, and [`demo`]
//! is the radio browsing wizard the binary runs.

pub mod config;
pub mod demo;
pub mod flow;
pub mod logging;
pub mod ui;

pub use flow::{
    run_flow, FlowController, FlowError, FlowOutcome, FlowReport, FlowSignal, InputBoxParams,
    MultiStepInput, PickItem, PromptHost, PromptOutcome, QuickPickParams, Step, StepOutcome,
    StepRef,
};
