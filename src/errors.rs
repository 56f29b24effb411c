use crate::mail::MailError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read configuration: {0}")]
    ConfigError(#[from] config::ConfigError),
    #[error("socket address parsing error: {0}")]
    SocketAddressParsingError(#[from] std::net::AddrParseError),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    ConfigurationError(#[from] ConfigurationError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("environment variable {0} is not set")]
    MissingVariable(&'static str),
    #[error("{0} is not a supported environment, use either `dev` or `prod`")]
    UnknownEnvironment(String),
}

/// Request-level failures of `POST /api/contact`. Display text is what the caller sees.
#[derive(Error, Debug)]
pub enum AppErrors {
    #[error("Missing required fields")]
    MissingFields,
    #[error("Email is not configured on server")]
    NotConfigured,
    #[error("Failed to send email")]
    SendFailed(#[from] MailError),
}

impl AppErrors {
    pub fn status(&self) -> StatusCode {
        match self {
            AppErrors::MissingFields => StatusCode::BAD_REQUEST,
            AppErrors::NotConfigured | AppErrors::SendFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ContactResponse {
    pub fn ok() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }
}

impl IntoResponse for AppErrors {
    fn into_response(self) -> Response {
        let body = ContactResponse {
            ok: false,
            error: Some(self.to_string()),
        };
        (self.status(), Json(body)).into_response()
    }
}
