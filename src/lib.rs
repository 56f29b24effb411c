pub mod app_state;
pub mod client;
pub mod configuration;
pub mod errors;
pub mod mail;
pub mod relay;
mod routes;
pub mod submission;

use crate::app_state::AppState;
use crate::configuration::Application;
use axum::routing::{get, post};
use axum::Router;
use std::path::Path;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

pub fn create_app(application: &Application, app_state: AppState) -> Router {
    let static_dir = Path::new(&application.static_dir);
    let pages = ServeDir::new(static_dir)
        .not_found_service(ServeFile::new(static_dir.join("404.html")));
    Router::new()
        .route("/health_check", get(routes::health_check))
        .route("/api/contact", post(routes::contact))
        .fallback_service(pages)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
