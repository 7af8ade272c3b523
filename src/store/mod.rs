//! Persistence seam for the `pages` table.
//!
//! Handlers only see [`PageStore`]. [`PgPageStore`] is the production backend; [`MemoryPageStore`]
//! keeps rows in process and is what the HTTP tests run against.

mod memory;
mod postgres;

pub use memory::MemoryPageStore;
pub use postgres::PgPageStore;

use crate::error::AppError;
use crate::model::{NewPage, Page};
use async_trait::async_trait;

/// Result of a lookup-or-create.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InitOutcome {
    Created(Page),
    Existing(Page),
}

impl InitOutcome {
    pub fn page(&self) -> &Page {
        match self {
            InitOutcome::Created(p) | InitOutcome::Existing(p) => p,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, InitOutcome::Created(_))
    }
}

#[async_trait]
pub trait PageStore: Send + Sync {
    /// Create the table and its index if missing. Idempotent.
    async fn ensure_schema(&self) -> Result<(), AppError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Page>, AppError>;

    /// All rows ordered by id.
    async fn list(&self) -> Result<Vec<Page>, AppError>;

    /// Insert one row. A duplicate name is [`AppError::Conflict`].
    async fn insert(&self, page: &NewPage) -> Result<Page, AppError>;

    /// Insert `page` unless a row with the same name exists, in one unit of work.
    async fn create_if_absent(&self, page: &NewPage) -> Result<InitOutcome, AppError>;

    /// Round-trip to the backend.
    async fn ping(&self) -> Result<(), AppError>;
}
