use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::state::{FormError, FormState, SubmitOutcome};
use crate::executors::{Executor, FieldErrors};
use crate::session::SessionStore;
use crate::utils::log_throttle::LogThrottle;

const IGNORED_LOG_WINDOW: Duration = Duration::from_secs(30);

struct Slots {
    state: FormState,
    error: Option<FormError>,
    field_errors: FieldErrors,
}

/// Clears the in-flight flag when dropped, so every exit from `submitting`
/// (including a panic in the executor) accepts the next submit.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Submission state machine for one form instance.
///
/// `idle -> validating -> submitting -> succeeded | failed`, re-entered on the
/// next submit. At most one executor call is outstanding; a submit arriving
/// while one is in flight is ignored.
pub struct FormMachine<E: Executor> {
    executor: Arc<E>,
    success_path: String,
    slots: Mutex<Slots>,
    in_flight: AtomicBool,
    ignored_log: LogThrottle,
}

impl<E: Executor> FormMachine<E> {
    pub fn new(executor: Arc<E>, success_path: impl Into<String>) -> Self {
        FormMachine {
            executor,
            success_path: success_path.into(),
            slots: Mutex::new(Slots {
                state: FormState::Idle,
                error: None,
                field_errors: FieldErrors::new(),
            }),
            in_flight: AtomicBool::new(false),
            ignored_log: LogThrottle::new(IGNORED_LOG_WINDOW),
        }
    }

    pub fn state(&self) -> FormState {
        self.slots().state.clone()
    }

    /// Error of the most recent completed attempt, if it failed.
    pub fn error(&self) -> Option<FormError> {
        self.slots().error.clone()
    }

    pub fn field_errors(&self) -> FieldErrors {
        self.slots().field_errors.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Returns the form to `idle` with no errors, unless a call is in flight.
    pub fn reset(&self) {
        if self.is_submitting() {
            return;
        }
        let mut slots = self.slots();
        slots.state = FormState::Idle;
        slots.error = None;
        slots.field_errors = FieldErrors::new();
    }

    /// Runs one submission through validation, the executor and the
    /// post-success action.
    ///
    /// The executor call runs on its own task and settles the machine even if
    /// the caller stops waiting.
    pub async fn submit(
        self: &Arc<Self>,
        input: E::Input,
        session: Arc<dyn SessionStore>,
    ) -> SubmitOutcome {
        let origin = self.executor.origin();
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            if let Some(suppressed_count) = self.ignored_log.should_emit() {
                info!(
                    event_name = "forms.submit.ignored",
                    event_domain = "forms",
                    form = origin.as_str(),
                    suppressed_count,
                    "submission ignored while another is in flight"
                );
            }
            return SubmitOutcome::Ignored;
        }

        self.slots().state = FormState::Validating;
        if let Err(errors) = self.executor.validate(&input) {
            {
                let mut slots = self.slots();
                slots.state = FormState::Idle;
                slots.field_errors = errors.clone();
            }
            self.in_flight.store(false, Ordering::Release);
            debug!(form = origin.as_str(), "validation failed: {}", errors);
            return SubmitOutcome::Invalid(errors);
        }

        {
            let mut slots = self.slots();
            slots.state = FormState::Submitting;
            slots.error = None;
            slots.field_errors = FieldErrors::new();
        }

        let machine = Arc::clone(self);
        let task = tokio::spawn(async move {
            let _in_flight = InFlight(&machine.in_flight);
            machine.settle(input, session).await
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(form = origin.as_str(), "submission task failed: {}", e);
                let err = FormError::infrastructure(origin);
                self.record_failure(&err);
                SubmitOutcome::Failed(err)
            }
        }
    }

    async fn settle(&self, input: E::Input, session: Arc<dyn SessionStore>) -> SubmitOutcome {
        let origin = self.executor.origin();
        match self.executor.call(&input).await {
            Ok(output) => match self.executor.on_success(output, session.as_ref()) {
                Ok(()) => {
                    self.slots().state = FormState::Succeeded;
                    SubmitOutcome::Succeeded {
                        redirect_to: self.success_path.clone(),
                    }
                }
                Err(e) => {
                    error!(form = origin.as_str(), "post-success action failed: {}", e);
                    let err = FormError::infrastructure(origin);
                    self.record_failure(&err);
                    SubmitOutcome::Failed(err)
                }
            },
            Err(e) => {
                warn!(form = origin.as_str(), "submission failed: {}", e);
                let err = FormError::from_executor(origin, &e);
                self.record_failure(&err);
                SubmitOutcome::Failed(err)
            }
        }
    }

    fn record_failure(&self, err: &FormError) {
        let mut slots = self.slots();
        slots.state = FormState::Failed(err.clone());
        slots.error = Some(err.clone());
    }

    fn slots(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
