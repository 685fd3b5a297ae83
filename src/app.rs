use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/tabs/:name", get(handlers::tab))
        .route("/login", post(handlers::login))
        .route("/register", post(handlers::register))
        .route("/logout", post(handlers::logout))
        .route("/book", post(handlers::book))
        .route("/refresh", post(handlers::refresh))
        .route("/services/:id/cancel", post(handlers::cancel))
        .route("/services/:id/reschedule", post(handlers::reschedule))
        .route("/api/panel", get(handlers::panel_snapshot))
        .route("/api/refresh", post(handlers::api_refresh))
        .with_state(state)
}
