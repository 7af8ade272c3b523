use super::{InitOutcome, PageStore};
use crate::error::AppError;
use crate::model::{NewPage, Page};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Rows held in process, ordered by id. Enforces name uniqueness like the table does.
#[derive(Default)]
pub struct MemoryPageStore {
    rows: RwLock<Vec<Page>>,
}

impl MemoryPageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn push(rows: &mut Vec<Page>, page: &NewPage) -> Page {
    let id = rows.last().map(|p| p.id + 1).unwrap_or(1);
    let created = Page {
        id,
        name: page.name.clone(),
        title: page.title.clone(),
    };
    rows.push(created.clone());
    created
}

#[async_trait]
impl PageStore for MemoryPageStore {
    async fn ensure_schema(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Page>, AppError> {
        Ok(self.rows.read().await.iter().find(|p| p.name == name).cloned())
    }

    async fn list(&self) -> Result<Vec<Page>, AppError> {
        Ok(self.rows.read().await.clone())
    }

    async fn insert(&self, page: &NewPage) -> Result<Page, AppError> {
        page.validate()?;
        let mut rows = self.rows.write().await;
        if rows.iter().any(|p| p.name == page.name) {
            return Err(AppError::Conflict(format!(
                "page '{}' already exists",
                page.name
            )));
        }
        Ok(push(&mut rows, page))
    }

    async fn create_if_absent(&self, page: &NewPage) -> Result<InitOutcome, AppError> {
        page.validate()?;
        let mut rows = self.rows.write().await;
        if let Some(existing) = rows.iter().find(|p| p.name == page.name) {
            return Ok(InitOutcome::Existing(existing.clone()));
        }
        Ok(InitOutcome::Created(push(&mut rows, page)))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
