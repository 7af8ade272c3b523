//! `GET /`: the server-rendered page shell.

use crate::error::AppError;
use crate::manifest::{Manifest, ManifestChunk, INDEX_ENTRY};
use crate::model::INDEX_PAGE;
use crate::render::{render_index, IndexContext, PageProps, DEFAULT_HEADING, FALLBACK_HEADING};
use crate::state::AppState;
use axum::{extract::State, response::Html};

/// Render the index page with the stored heading. Any failure renders the fallback heading
/// instead of an error status.
pub async fn home(State(state): State<AppState>) -> Html<String> {
    match render_home(&state).await {
        Ok(html) => Html(html),
        Err(e) => {
            tracing::error!(error = %e, "error in home route");
            Html(render_fallback(&state).await)
        }
    }
}

async fn render_home(state: &AppState) -> Result<String, AppError> {
    let heading = state
        .store
        .find_by_name(INDEX_PAGE)
        .await?
        .and_then(|page| page.title)
        .unwrap_or_else(|| DEFAULT_HEADING.to_string());

    let manifest = Manifest::load(&state.settings.manifest_path).await?;
    let bundle = manifest.entry(INDEX_ENTRY)?;
    Ok(page_html(heading, bundle))
}

async fn render_fallback(state: &AppState) -> String {
    let bundle = match Manifest::load(&state.settings.manifest_path).await {
        Ok(manifest) => manifest
            .entry(INDEX_ENTRY)
            .cloned()
            .unwrap_or_else(|_| ManifestChunk::fallback()),
        Err(_) => ManifestChunk::fallback(),
    };
    page_html(FALLBACK_HEADING.to_string(), &bundle)
}

fn page_html(heading: String, bundle: &ManifestChunk) -> String {
    let props = PageProps { heading };
    render_index(&IndexContext {
        title: &props.heading,
        props: &props,
        bundle,
    })
}
