use crate::configuration::{MailCredentials, MailSettings};
use crate::mail::{MailError, Mailer, MailerFactory};
use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Opens an implicit-TLS SMTP transport per request. Nothing is pooled.
#[derive(Debug, Clone)]
pub struct SmtpMailerFactory {
    settings: MailSettings,
}

impl SmtpMailerFactory {
    pub fn new(settings: MailSettings) -> Self {
        Self { settings }
    }
}

impl MailerFactory for SmtpMailerFactory {
    fn connect(&self, credentials: &MailCredentials) -> Result<Box<dyn Mailer>, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.settings.smtp_host)?
            .port(self.settings.smtp_port)
            .credentials(Credentials::new(
                credentials.from.clone(),
                credentials.password.clone(),
            ))
            .timeout(Some(self.settings.send_timeout))
            .build();
        Ok(Box::new(SmtpMailer {
            transport,
            send_timeout: self.settings.send_timeout,
        }))
    }
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    send_timeout: Duration,
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: Message) -> Result<(), MailError> {
        let response = timeout(self.send_timeout, self.transport.send(message))
            .await
            .map_err(|_| MailError::Timeout)??;
        debug!(code = %response.code(), "smtp server accepted message");
        Ok(())
    }
}
