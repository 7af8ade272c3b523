//! The `pages` entity.

use crate::error::AppError;
use serde::{Deserialize, Serialize};

pub const TABLE: &str = "pages";
pub const NAME_MAX_LEN: usize = 50;
pub const TITLE_MAX_LEN: usize = 255;

/// Name of the page rendered at `/`.
pub const INDEX_PAGE: &str = "index";
pub const INDEX_PAGE_TITLE: &str = "Welcome to FastAPI + Svelte + Neon!";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: i32,
    pub name: String,
    pub title: Option<String>,
}

impl From<(i32, String, Option<String>)> for Page {
    fn from((id, name, title): (i32, String, Option<String>)) -> Self {
        Page { id, name, title }
    }
}

/// A page before the store has assigned its id.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct NewPage {
    pub name: String,
    pub title: Option<String>,
}

impl NewPage {
    pub fn new(name: impl Into<String>, title: Option<&str>) -> Self {
        NewPage {
            name: name.into(),
            title: title.map(String::from),
        }
    }

    /// The sample row created by `POST /init-data`.
    pub fn index() -> Self {
        Self::new(INDEX_PAGE, Some(INDEX_PAGE_TITLE))
    }

    /// Enforce the column limits of the `pages` table.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name is required".into()));
        }
        if self.name.chars().count() > NAME_MAX_LEN {
            return Err(AppError::Validation(format!(
                "name longer than {NAME_MAX_LEN} characters"
            )));
        }
        if let Some(ref title) = self.title {
            if title.chars().count() > TITLE_MAX_LEN {
                return Err(AppError::Validation(format!(
                    "title longer than {TITLE_MAX_LEN} characters"
                )));
            }
        }
        Ok(())
    }
}
