mod payload;

pub use payload::ContactPayload;

use crate::app_state::AppState;
use crate::errors::{AppErrors, ContactResponse};
use crate::relay::relay;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Result};

pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

pub async fn contact(
    State(state): State<AppState>,
    ContactPayload(input): ContactPayload,
) -> Result<Json<ContactResponse>, AppErrors> {
    relay(&state, input).await?;
    Ok(Json(ContactResponse::ok()))
}
