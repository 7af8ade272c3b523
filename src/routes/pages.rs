//! Page shell and pages API routes.

use crate::handlers::{home, init_data, list_pages};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

pub fn page_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/init-data", post(init_data))
        .route("/api/pages", get(list_pages))
        .with_state(state)
}
