//! Router assembly.

mod common;
mod pages;

pub use common::{common_routes, SERVICE_NAME};
pub use pages::page_routes;

use crate::state::AppState;
use axum::Router;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

/// All routes plus the static mount (unless disabled), CORS that mirrors any origin with credentials and request tracing.
pub fn build_router(state: AppState) -> Router {
    let settings = state.settings.clone();
    let mut app = Router::new()
        .merge(common_routes(state.clone()))
        .merge(page_routes(state));

    if settings.serve_static {
        tracing::debug!(dir = %settings.static_dir.display(), "mounting static assets at /static");
        app = app.nest_service("/static", ServeDir::new(&settings.static_dir));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
}
