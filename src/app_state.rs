use crate::configuration::{MailCredentials, MailSettings, Settings};
use crate::mail::{MailerFactory, SmtpMailerFactory};
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppState {
    pub mail: MailSettings,
    pub credentials: Option<MailCredentials>,
    pub mailer: Arc<dyn MailerFactory>,
}

impl AppState {
    pub fn new(
        mail: MailSettings,
        credentials: Option<MailCredentials>,
        mailer: Arc<dyn MailerFactory>,
    ) -> Self {
        Self {
            mail,
            credentials,
            mailer,
        }
    }

    /// Missing credentials are not fatal here; the contact endpoint reports them per request.
    pub fn init(settings: &Settings) -> Self {
        let credentials = MailCredentials::from_env()
            .map_err(|e| warn!(error = %e, "contact email is not configured"))
            .ok();
        Self::new(
            settings.mail.clone(),
            credentials,
            Arc::new(SmtpMailerFactory::new(settings.mail.clone())),
        )
    }
}
