//! `POST /init-data` and `GET /api/pages`.

use crate::error::HttpError;
use crate::model::{NewPage, Page};
use crate::state::AppState;
use crate::store::InitOutcome;
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct MessageBody {
    pub message: &'static str,
}

/// Create the `index` page unless it exists.
pub async fn init_data(State(state): State<AppState>) -> Result<Json<MessageBody>, HttpError> {
    match state.store.create_if_absent(&NewPage::index()).await {
        Ok(InitOutcome::Created(page)) => {
            tracing::info!(id = page.id, name = %page.name, "created index page");
            Ok(Json(MessageBody {
                message: "Index page created successfully",
            }))
        }
        Ok(InitOutcome::Existing(_)) => Ok(Json(MessageBody {
            message: "Index page already exists",
        })),
        Err(e) => {
            tracing::error!(error = %e, "failed to initialize data");
            Err(HttpError::internal(format!("Failed to initialize data: {}", e)))
        }
    }
}

pub async fn list_pages(State(state): State<AppState>) -> Result<Json<Vec<Page>>, HttpError> {
    state.store.list().await.map(Json).map_err(|e| {
        tracing::error!(error = %e, "error fetching pages");
        HttpError::internal("Failed to fetch pages")
    })
}
