//! Navigation signals and prompt outcomes.

use std::fmt;

use thiserror::Error;

/// Out-of-band navigation instruction raised by a prompt instead of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowSignal {
    Back,
    Forward,
    Cancel,
    Resume,
}

impl fmt::Display for FlowSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowSignal::Back => write!(f, "back"),
            FlowSignal::Forward => write!(f, "forward"),
            FlowSignal::Cancel => write!(f, "cancel"),
            FlowSignal::Resume => write!(f, "resume"),
        }
    }
}

/// What a single prompt produced: the user's value or a navigation signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome<T> {
    Resolved(T),
    Back,
    Forward,
    Cancel,
    Resume,
}

impl<T> PromptOutcome<T> {
    /// The signal carried by this outcome, if it is not a resolved value
    pub fn signal(&self) -> Option<FlowSignal> {
        match self {
            PromptOutcome::Resolved(_) => None,
            PromptOutcome::Back => Some(FlowSignal::Back),
            PromptOutcome::Forward => Some(FlowSignal::Forward),
            PromptOutcome::Cancel => Some(FlowSignal::Cancel),
            PromptOutcome::Resume => Some(FlowSignal::Resume),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, PromptOutcome::Resolved(_))
    }

    /// Split into the value or the signal that replaced it.
    ///
    /// Steps usually match on this and return the signal to the driver:
    ///
    /// ```ignore
    /// let item = match input.show_quick_pick(params).await?.into_result() {
    ///     Ok(item) => item,
    ///     Err(signal) => return Ok(signal.into()),
    /// };
    /// ```
    pub fn into_result(self) -> Result<T, FlowSignal> {
        match self {
            PromptOutcome::Resolved(value) => Ok(value),
            PromptOutcome::Back => Err(FlowSignal::Back),
            PromptOutcome::Forward => Err(FlowSignal::Forward),
            PromptOutcome::Cancel => Err(FlowSignal::Cancel),
            PromptOutcome::Resume => Err(FlowSignal::Resume),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> PromptOutcome<U> {
        match self {
            PromptOutcome::Resolved(value) => PromptOutcome::Resolved(f(value)),
            PromptOutcome::Back => PromptOutcome::Back,
            PromptOutcome::Forward => PromptOutcome::Forward,
            PromptOutcome::Cancel => PromptOutcome::Cancel,
            PromptOutcome::Resume => PromptOutcome::Resume,
        }
    }
}

impl<T> From<FlowSignal> for PromptOutcome<T> {
    fn from(signal: FlowSignal) -> Self {
        match signal {
            FlowSignal::Back => PromptOutcome::Back,
            FlowSignal::Forward => PromptOutcome::Forward,
            FlowSignal::Cancel => PromptOutcome::Cancel,
            FlowSignal::Resume => PromptOutcome::Resume,
        }
    }
}

/// Back/forward requested with no entry to move to
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationError {
    #[error("cannot step back from position {cursor}: no earlier step recorded")]
    NoPrevious { cursor: usize },

    #[error("cannot step forward from position {cursor}: only {depth} step(s) recorded")]
    NoNext { cursor: usize, depth: usize },

    #[error("no step at the cursor to drop")]
    NothingToDrop,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_has_no_signal() {
        let outcome = PromptOutcome::Resolved(7);
        assert_eq!(outcome.signal(), None);
        assert!(outcome.is_resolved());
        assert_eq!(outcome.into_result(), Ok(7));
    }

    #[test]
    fn test_signal_outcomes_round_through_flow_signal() {
        for signal in [
            FlowSignal::Back,
            FlowSignal::Forward,
            FlowSignal::Cancel,
            FlowSignal::Resume,
        ] {
            let outcome: PromptOutcome<String> = signal.into();
            assert_eq!(outcome.signal(), Some(signal));
            assert_eq!(outcome.into_result(), Err(signal));
        }
    }

    #[test]
    fn test_map_keeps_signals() {
        let outcome: PromptOutcome<u8> = PromptOutcome::Back;
        assert_eq!(outcome.map(|v| v * 2), PromptOutcome::Back);
        assert_eq!(
            PromptOutcome::Resolved(2).map(|v| v * 2),
            PromptOutcome::Resolved(4)
        );
    }

    #[test]
    fn test_navigation_error_messages() {
        let err = NavigationError::NoNext {
            cursor: 2,
            depth: 2,
        };
        assert_eq!(
            err.to_string(),
            "cannot step forward from position 2: only 2 step(s) recorded"
        );
        assert!(NavigationError::NoPrevious { cursor: 1 }
            .to_string()
            .contains("no earlier step"));
    }
}
