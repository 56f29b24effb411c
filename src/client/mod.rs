//! Browser-side half of the contact pipeline.
//!
//! [`SubmissionController`] owns one form's submission lifecycle:
//! validation, a busy guard, the minimum interval between sends, the
//! transport readiness wait, and the mapping of failures to what the visitor
//! sees. Anything that touches a document goes through [`FormSurface`].

pub mod readiness;
pub mod status;
pub mod transport;

use crate::submission::{
    validate, ErrorCategory, SanitizedSubmission, SubmissionInput, SubmissionOutcome,
    ValidationError,
};
use readiness::{initialize, Readiness, ReadinessPolicy};
use status::StatusBanner;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};
use transport::{classify, RelayTransport, TransportError};

pub const THROTTLE_INTERVAL: Duration = Duration::from_millis(10_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    /// Set and left within one lock acquisition, so callers never observe it.
    Validating,
    Sending,
    Succeeded,
    Failed,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Please wait a few seconds before sending another message.")]
    Throttled { retry_after: Duration },
    #[error("Your message is already being sent.")]
    Busy,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl SubmitError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SubmitError::Validation(_) => ErrorCategory::Validation,
            SubmitError::Throttled { .. } | SubmitError::Busy => ErrorCategory::RateLimited,
            SubmitError::Transport(e) => classify(e),
        }
    }

    /// Text safe to show the visitor; transport failures never expose their details.
    pub fn user_message(&self) -> String {
        let message = match self {
            SubmitError::Validation(_) | SubmitError::Throttled { .. } | SubmitError::Busy => {
                return self.to_string();
            }
            SubmitError::Transport(TransportError::NotReady { .. }) => {
                "The contact form failed to load. Please refresh the page."
            }
            SubmitError::Transport(_) => match self.category() {
                ErrorCategory::Network => {
                    "Network error. Please check your connection and try again."
                }
                ErrorCategory::RateLimited => "Too many requests. Please wait a moment and try again.",
                ErrorCategory::ServerMisconfigured => {
                    "The contact form is temporarily unavailable. Please try again later."
                }
                ErrorCategory::Validation | ErrorCategory::Unknown => {
                    "Failed to send message. Please try again."
                }
            },
        };
        message.to_string()
    }
}

impl From<&Result<(), SubmitError>> for SubmissionOutcome {
    fn from(result: &Result<(), SubmitError>) -> Self {
        match result {
            Ok(()) => SubmissionOutcome::success(),
            Err(e) => SubmissionOutcome::failure(e.category()),
        }
    }
}

/// Rejects a send that comes less than [`THROTTLE_INTERVAL`] after the last successful one.
pub fn throttle(last_sent: Option<Instant>, now: Instant) -> Result<(), SubmitError> {
    let Some(last_sent) = last_sent else {
        return Ok(());
    };
    let elapsed = now.saturating_duration_since(last_sent);
    if elapsed < THROTTLE_INTERVAL {
        return Err(SubmitError::Throttled {
            retry_after: THROTTLE_INTERVAL - elapsed,
        });
    }
    Ok(())
}

/// The page the controller drives: form fields, submit button and status banner.
pub trait FormSurface {
    fn read(&self) -> SubmissionInput;
    fn set_submit_enabled(&mut self, enabled: bool);
    fn reset(&mut self);
    fn show_status(&mut self, banner: StatusBanner);
}

#[derive(Debug)]
struct Inner {
    state: FormState,
    readiness: Readiness,
    last_sent: Option<Instant>,
}

/// Falls back to `Failed` if a submit future is dropped while sending.
struct InFlight<'a> {
    inner: &'a Mutex<Inner>,
    armed: bool,
}

impl InFlight<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.state == FormState::Sending {
            inner.state = FormState::Failed;
            warn!("contact submission dropped while sending");
        }
    }
}

/// Re-enables the submit button when dropped.
struct SubmitButton<'a, F: FormSurface>(&'a mut F);

impl<F: FormSurface> Drop for SubmitButton<'_, F> {
    fn drop(&mut self) {
        self.0.set_submit_enabled(true);
    }
}

#[derive(Debug)]
pub struct SubmissionController<T> {
    transport: T,
    policy: ReadinessPolicy,
    inner: Mutex<Inner>,
}

impl<T: RelayTransport> SubmissionController<T> {
    pub fn new(transport: T) -> Self {
        Self::with_policy(transport, ReadinessPolicy::default())
    }

    pub fn with_policy(transport: T, policy: ReadinessPolicy) -> Self {
        Self {
            transport,
            policy,
            inner: Mutex::new(Inner {
                state: FormState::Idle,
                readiness: Readiness::Pending,
                last_sent: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> FormState {
        self.lock().state
    }

    pub fn readiness(&self) -> Readiness {
        self.lock().readiness
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Runs the readiness routine once; later calls return immediately.
    pub async fn ensure_ready(&self) -> Result<(), TransportError> {
        if self.readiness() == Readiness::Ready {
            return Ok(());
        }
        initialize(&self.transport, self.policy).await?;
        self.lock().readiness = Readiness::Ready;
        Ok(())
    }

    fn begin(
        &self,
        input: &SubmissionInput,
        now: Instant,
    ) -> Result<SanitizedSubmission, SubmitError> {
        let mut inner = self.lock();
        if inner.state == FormState::Sending {
            return Err(SubmitError::Busy);
        }
        inner.state = FormState::Validating;
        let last_sent = inner.last_sent;
        let checked = validate(input)
            .map_err(SubmitError::from)
            .and_then(|submission| throttle(last_sent, now).map(|_| submission));
        inner.state = match &checked {
            Ok(_) => FormState::Sending,
            Err(_) => FormState::Failed,
        };
        checked
    }

    /// Validates, throttles and sends one submission. Only a successful send
    /// counts towards the throttle.
    pub async fn submit(&self, input: &SubmissionInput, now: Instant) -> Result<(), SubmitError> {
        let submission = self.begin(input, now)?;
        let in_flight = InFlight {
            inner: &self.inner,
            armed: true,
        };
        let result = match self.ensure_ready().await {
            Ok(()) => self.transport.send(&submission).await,
            Err(e) => Err(e),
        };
        in_flight.disarm();
        let mut inner = self.lock();
        match result {
            Ok(()) => {
                inner.state = FormState::Succeeded;
                inner.last_sent = Some(now);
                info!("contact message sent");
                Ok(())
            }
            Err(e) => {
                inner.state = FormState::Failed;
                warn!(error = %e, category = ?classify(&e), "contact message failed");
                Err(SubmitError::Transport(e))
            }
        }
    }

    /// Submit-button handler: the button is disabled while sending and always
    /// re-enabled afterwards, even if this future is dropped. The form is
    /// cleared only on success.
    pub async fn handle_submit<F: FormSurface>(&self, surface: &mut F) -> SubmissionOutcome {
        let input = surface.read();
        surface.set_submit_enabled(false);
        let mut button = SubmitButton(surface);
        let result = self.submit(&input, Instant::now()).await;
        if result.is_ok() {
            button.0.reset();
        }
        button.0.show_status(StatusBanner::for_result(&result));
        drop(button);
        {
            let mut inner = self.lock();
            if inner.state != FormState::Sending {
                inner.state = FormState::Idle;
            }
        }
        SubmissionOutcome::from(&result)
    }
}
