//! Submission state machine

use std::fmt;

use crate::error::TransitionError;

/// Where a form is in its submit lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    /// Editable; errors from the last validation pass may be present.
    #[default]
    Idle,
    /// Running the full rule set before sending.
    Validating,
    /// Request in flight.
    Submitting,
    /// The backend accepted the submission. Only a reset leaves this state.
    Success,
    /// The request failed; the reason is ready for display.
    Failed(String),
}

impl SubmissionState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Submitting => "submitting",
            Self::Success => "success",
            Self::Failed(_) => "failed",
        }
    }

    /// Returns `true` while a submit call owns the form.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Validating | Self::Submitting)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(reason) => write!(f, "failed ({reason})"),
            other => f.write_str(other.name()),
        }
    }
}

/// Inputs that drive [`SubmissionState`] transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionEvent {
    Submit,
    ValidationPassed,
    ValidationFailed,
    Succeeded,
    Failed(String),
    Reset,
}

/// Computes the state after `event`, or rejects the event.
///
/// `Submitting` is only reachable from `Validating` via `ValidationPassed`,
/// and `Reset` is accepted from every state.
pub fn next_state(
    state: &SubmissionState,
    event: SubmissionEvent,
) -> Result<SubmissionState, TransitionError> {
    use SubmissionEvent as E;
    use SubmissionState as S;

    match (state, event) {
        (_, E::Reset) => Ok(S::Idle),
        (S::Idle | S::Failed(_), E::Submit) => Ok(S::Validating),
        (S::Validating, E::ValidationPassed) => Ok(S::Submitting),
        (S::Validating, E::ValidationFailed) => Ok(S::Idle),
        (S::Submitting, E::Succeeded) => Ok(S::Success),
        (S::Submitting, E::Failed(reason)) => Ok(S::Failed(reason)),
        (from, event) => Err(TransitionError {
            from: from.clone(),
            event,
        }),
    }
}

/// Holds the current state and applies events to it.
#[derive(Debug, Clone, Default)]
pub struct SubmissionMachine {
    state: SubmissionState,
}

impl SubmissionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Applies `event`. On rejection the state is left untouched.
    pub fn apply(&mut self, event: SubmissionEvent) -> Result<&SubmissionState, TransitionError> {
        let next = next_state(&self.state, event)?;
        log::debug!("[submission] {} -> {}", self.state, next);
        self.state = next;
        Ok(&self.state)
    }
}
