use crate::errors::AppErrors;
use crate::submission::SubmissionInput;
use async_trait::async_trait;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::{Form, Json};
use tracing::warn;

/// Contact form body, accepted as JSON or `application/x-www-form-urlencoded`.
#[derive(Debug)]
pub struct ContactPayload(pub SubmissionInput);

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"))
}

#[async_trait]
impl<S> FromRequest<S> for ContactPayload
where
    S: Send + Sync,
{
    type Rejection = AppErrors;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let input = if is_form(&req) {
            Form::<SubmissionInput>::from_request(req, state)
                .await
                .map(|Form(input)| input)
                .map_err(|e| warn!(error = %e, "unreadable form body"))
        } else {
            Json::<SubmissionInput>::from_request(req, state)
                .await
                .map(|Json(input)| input)
                .map_err(|e| warn!(error = %e, "unreadable json body"))
        };
        input.map(ContactPayload).map_err(|_| AppErrors::MissingFields)
    }
}
