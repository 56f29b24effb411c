use crate::app_state::AppState;
use crate::configuration::MailCredentials;
use crate::errors::AppErrors;
use crate::mail::{ContactMails, MailError};
use crate::submission::{SanitizedSubmission, SubmissionInput};
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

pub async fn relay(state: &AppState, input: SubmissionInput) -> Result<(), AppErrors> {
    let span = info_span!("relay", submission_id = %Uuid::new_v4());
    async move {
        let submission = input.sanitized();
        if !submission.is_complete() {
            return Err(AppErrors::MissingFields);
        }
        let Some(credentials) = state.credentials.as_ref() else {
            error!("MAIL_FROM or MAIL_PASS is not set, refusing contact request");
            return Err(AppErrors::NotConfigured);
        };
        deliver(state, credentials, &submission)
            .await
            .map_err(|e| {
                error!(error = %e, "failed to send contact email");
                AppErrors::SendFailed(e)
            })
    }
    .instrument(span)
    .await
}

/// Sends the owner notification, then the auto-reply. A failed second send does not
/// take back the first.
async fn deliver(
    state: &AppState,
    credentials: &MailCredentials,
    submission: &SanitizedSubmission,
) -> Result<(), MailError> {
    let mailer = state.mailer.connect(credentials)?;
    let mails = ContactMails::compose(submission, credentials, &state.mail)?;
    mailer.send(mails.owner_notification).await?;
    info!("owner notification sent");
    mailer.send(mails.auto_reply).await?;
    info!("auto-reply sent");
    Ok(())
}
