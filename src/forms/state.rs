use crate::executors::{ErrorOrigin, ExecutorError, FieldErrors, UNKNOWN_ERROR_MESSAGE};

/// Why a submission failed, as far as the page cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The provider said no.
    Rejected,
    /// The provider said yes in a way we could not read.
    Protocol,
    /// The provider could not be reached.
    Transport,
    /// Our own session store failed.
    Infrastructure,
}

/// The single error slot of a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormError {
    pub origin: ErrorOrigin,
    pub kind: FailureKind,
    pub message: String,
}

impl FormError {
    pub fn from_executor(origin: ErrorOrigin, error: &ExecutorError) -> Self {
        let kind = match error {
            ExecutorError::Validation(_) | ExecutorError::Rejected { .. } => FailureKind::Rejected,
            ExecutorError::Protocol(_) => FailureKind::Protocol,
            ExecutorError::Transport(_) => FailureKind::Transport,
        };
        FormError {
            origin,
            kind,
            message: error.user_message(),
        }
    }

    pub fn infrastructure(origin: ErrorOrigin) -> Self {
        FormError {
            origin,
            kind: FailureKind::Infrastructure,
            message: UNKNOWN_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Lifecycle of one form instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed(FormError),
}

/// What a call to `FormMachine::submit` came to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Invalid(FieldErrors),
    /// Another submission of the same form is still in flight.
    Ignored,
    /// The executor succeeded and the post-success action ran.
    Succeeded { redirect_to: String },
    Failed(FormError),
}

impl SubmitOutcome {
    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            SubmitOutcome::Invalid(_) => "invalid",
            SubmitOutcome::Ignored => "ignored",
            SubmitOutcome::Succeeded { .. } => "succeeded",
            SubmitOutcome::Failed(_) => "failed",
        }
    }
}
