use crate::errors::ContactResponse;
use crate::submission::{ErrorCategory, SanitizedSubmission};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const EMAILJS_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("relay transport not ready after {attempts} attempts")]
    NotReady { attempts: u32 },
    #[error("relay transport is not configured: {0}")]
    Unconfigured(&'static str),
    #[error("invalid relay endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("relay responded with {status}: {body}")]
    Status { status: u16, body: String },
}

/// Maps a failed relay call onto what the visitor is told.
pub fn classify(error: &TransportError) -> ErrorCategory {
    match error {
        TransportError::Network(_) => ErrorCategory::Network,
        TransportError::Unconfigured(_) | TransportError::InvalidEndpoint(_) => {
            ErrorCategory::ServerMisconfigured
        }
        TransportError::NotReady { .. } => ErrorCategory::Unknown,
        TransportError::Status { status, body } => {
            let body = body.to_lowercase();
            if *status == 429 || body.contains("rate limit") || body.contains("too many") {
                ErrorCategory::RateLimited
            } else if matches!(status, 401 | 403)
                || body.contains("not configured")
                || body.contains("public key")
                || body.contains("service id")
                || body.contains("template id")
            {
                ErrorCategory::ServerMisconfigured
            } else {
                ErrorCategory::Unknown
            }
        }
    }
}

#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn init(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn send(&self, submission: &SanitizedSubmission) -> Result<(), TransportError>;
}

async fn check_status(response: Response) -> Result<(), TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let text = response.text().await.unwrap_or_default();
    let body = serde_json::from_str::<ContactResponse>(&text)
        .ok()
        .and_then(|reply| reply.error)
        .unwrap_or(text);
    Err(TransportError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Posts submissions to this site's own `/api/contact` endpoint.
#[derive(Debug, Clone)]
pub struct HttpRelay {
    endpoint: Url,
    client: Client,
}

impl HttpRelay {
    pub fn new(base: &Url) -> Result<Self, TransportError> {
        let endpoint = base.join("/api/contact")?;
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl RelayTransport for HttpRelay {
    async fn send(&self, submission: &SanitizedSubmission) -> Result<(), TransportError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(submission)
            .send()
            .await?;
        check_status(response).await
    }
}

fn default_emailjs_endpoint() -> String {
    EMAILJS_ENDPOINT.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailJsSettings {
    #[serde(default = "default_emailjs_endpoint")]
    pub endpoint: String,
    pub service_id: String,
    pub template_id: String,
    #[serde(default)]
    pub auto_reply_template_id: Option<String>,
    pub public_key: String,
    pub to_email: String,
}

#[derive(Debug, Serialize)]
struct TemplateParams<'a> {
    from_name: &'a str,
    reply_to: &'a str,
    subject: &'a str,
    message: &'a str,
    to_email: &'a str,
}

#[derive(Debug, Serialize)]
struct EmailJsRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: TemplateParams<'a>,
}

/// Sends through the EmailJS REST API, without a backend of our own.
#[derive(Debug, Clone)]
pub struct EmailJsRelay {
    settings: EmailJsSettings,
    endpoint: Url,
    client: Client,
}

impl EmailJsRelay {
    pub fn new(settings: EmailJsSettings) -> Result<Self, TransportError> {
        let endpoint = Url::parse(&settings.endpoint)?;
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            settings,
            endpoint,
            client,
        })
    }

    async fn send_template(
        &self,
        template_id: &str,
        submission: &SanitizedSubmission,
    ) -> Result<(), TransportError> {
        let request = EmailJsRequest {
            service_id: &self.settings.service_id,
            template_id,
            user_id: &self.settings.public_key,
            template_params: TemplateParams {
                from_name: &submission.name,
                reply_to: &submission.email,
                subject: &submission.subject,
                message: &submission.message,
                to_email: &self.settings.to_email,
            },
        };
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;
        check_status(response).await
    }
}

#[async_trait]
impl RelayTransport for EmailJsRelay {
    async fn init(&self) -> Result<(), TransportError> {
        if self.settings.service_id.trim().is_empty() {
            return Err(TransportError::Unconfigured("service id"));
        }
        if self.settings.template_id.trim().is_empty() {
            return Err(TransportError::Unconfigured("template id"));
        }
        if self.settings.public_key.trim().is_empty() {
            return Err(TransportError::Unconfigured("public key"));
        }
        Ok(())
    }

    async fn send(&self, submission: &SanitizedSubmission) -> Result<(), TransportError> {
        self.send_template(&self.settings.template_id, submission)
            .await?;
        if let Some(template_id) = &self.settings.auto_reply_template_id {
            self.send_template(template_id, submission).await?;
        }
        Ok(())
    }
}
