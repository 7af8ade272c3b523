//! Server-rendered page shell backed by a single PostgreSQL `pages` table.

pub mod config;
pub mod error;
pub mod handlers;
pub mod manifest;
pub mod model;
pub mod render;
pub mod routes;
pub mod state;
pub mod store;

pub use config::Settings;
pub use error::{AppError, ConfigError, HttpError};
pub use manifest::{Manifest, ManifestChunk};
pub use model::{NewPage, Page};
pub use routes::{build_router, common_routes, page_routes};
pub use state::AppState;
pub use store::{InitOutcome, MemoryPageStore, PageStore, PgPageStore};
