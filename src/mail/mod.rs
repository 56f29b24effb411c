//! Outbound email for the contact relay.
//!
//! Messages are built with [lettre](https://lettre.rs) and handed to a [`Mailer`].
//! A [`MailerFactory`] opens one authenticated mailer per request, so tests can
//! swap the SMTP transport for a recording one.

mod compose;
mod smtp;

pub use compose::{auto_reply, owner_notification, ContactMails, AUTO_REPLY_SUBJECT};
pub use smtp::{SmtpMailer, SmtpMailerFactory};

use crate::configuration::MailCredentials;
use async_trait::async_trait;
use lettre::Message;
use std::fmt::Debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid email address {0}: {1}")]
    InvalidAddress(String, #[source] lettre::address::AddressError),

    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(String),

    #[error("timed out while sending")]
    Timeout,
}

impl From<lettre::transport::smtp::Error> for MailError {
    fn from(error: lettre::transport::smtp::Error) -> Self {
        MailError::Smtp(error.to_string())
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: Message) -> Result<(), MailError>;
}

pub trait MailerFactory: Debug + Send + Sync {
    fn connect(&self, credentials: &MailCredentials) -> Result<Box<dyn Mailer>, MailError>;
}
