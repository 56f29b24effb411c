use crate::configuration::{MailCredentials, MailSettings};
use crate::mail::MailError;
use crate::submission::SanitizedSubmission;
use lettre::message::{Mailbox, MultiPart};
use lettre::{Address, Message};

pub const AUTO_REPLY_SUBJECT: &str = "Thanks for contacting me!";

/// The two messages sent for every accepted submission.
#[derive(Debug, Clone)]
pub struct ContactMails {
    pub owner_notification: Message,
    pub auto_reply: Message,
}

impl ContactMails {
    pub fn compose(
        submission: &SanitizedSubmission,
        credentials: &MailCredentials,
        settings: &MailSettings,
    ) -> Result<Self, MailError> {
        Ok(Self {
            owner_notification: owner_notification(submission, credentials, settings)?,
            auto_reply: auto_reply(submission, credentials, settings)?,
        })
    }
}

fn address(value: &str) -> Result<Address, MailError> {
    value
        .parse::<Address>()
        .map_err(|e| MailError::InvalidAddress(value.to_string(), e))
}

pub fn owner_notification(
    submission: &SanitizedSubmission,
    credentials: &MailCredentials,
    settings: &MailSettings,
) -> Result<Message, MailError> {
    let SanitizedSubmission {
        name,
        email,
        subject,
        message,
    } = submission;
    let text = format!("New message from {name} <{email}>\n\n{message}");
    let html = format!(
        "<p><strong>From:</strong> {name} &lt;{email}&gt;</p>\
         <p><strong>Subject:</strong> {subject}</p>\
         <p>{}</p>",
        message.replace('\n', "<br>")
    );
    let mail = Message::builder()
        .from(Mailbox::new(None, address(&credentials.from)?))
        .to(Mailbox::new(None, address(&credentials.to)?))
        .reply_to(Mailbox::new(Some(name.clone()), address(email)?))
        .subject(format!("{} {subject}", settings.subject_prefix))
        .multipart(MultiPart::alternative_plain_html(text, html))?;
    Ok(mail)
}

pub fn auto_reply(
    submission: &SanitizedSubmission,
    credentials: &MailCredentials,
    settings: &MailSettings,
) -> Result<Message, MailError> {
    let signature = &settings.signature;
    let text =
        format!("Thanks for contacting me! I will get back to you soon!\n\nBest,\n{signature}");
    let html = format!(
        "<p>Thanks for contacting me! I will get back to you soon!</p><p>Best,<br>{signature}</p>"
    );
    let message = Message::builder()
        .from(Mailbox::new(None, address(&credentials.from)?))
        .to(Mailbox::new(
            Some(submission.name.clone()),
            address(&submission.email)?,
        ))
        .subject(AUTO_REPLY_SUBJECT)
        .multipart(MultiPart::alternative_plain_html(text, html))?;
    Ok(message)
}
