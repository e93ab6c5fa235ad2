use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{any, get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/script.js", get(handlers::script))
        .route("/theme", post(handlers::toggle_theme))
        .route("/api/week", get(handlers::get_week))
        .route("/api/signup", any(handlers::signup))
        .route("/.netlify/functions/signup", any(handlers::signup))
        .with_state(state)
}
