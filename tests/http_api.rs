//! HTTP tests for the page shell and pages API.
//!
//! Requests go through the full router with `tower::ServiceExt::oneshot`; storage is the
//! in-memory store, or a store whose every call fails.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use pages_web::model::INDEX_PAGE;
use pages_web::render::{DEFAULT_HEADING, FALLBACK_HEADING};
use pages_web::{
    build_router, AppError, AppState, InitOutcome, MemoryPageStore, NewPage, Page, PageStore,
    Settings,
};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

struct FailingStore;

fn down() -> AppError {
    AppError::Db(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl PageStore for FailingStore {
    async fn ensure_schema(&self) -> Result<(), AppError> {
        Err(down())
    }
    async fn find_by_name(&self, _name: &str) -> Result<Option<Page>, AppError> {
        Err(down())
    }
    async fn list(&self) -> Result<Vec<Page>, AppError> {
        Err(down())
    }
    async fn insert(&self, _page: &NewPage) -> Result<Page, AppError> {
        Err(down())
    }
    async fn create_if_absent(&self, _page: &NewPage) -> Result<InitOutcome, AppError> {
        Err(down())
    }
    async fn ping(&self) -> Result<(), AppError> {
        Err(down())
    }
}

fn settings_with_manifest(manifest_path: &Path) -> Settings {
    let mut settings = Settings::with_database_url("postgres://unused/pages");
    settings.manifest_path = manifest_path.to_path_buf();
    settings.serve_static = false;
    settings
}

/// Router over `store`; the manifest path does not exist so the fallback bundle is used.
fn app_with(store: Arc<dyn PageStore>) -> Router {
    let settings = settings_with_manifest(Path::new("/nonexistent/.vite/manifest.json"));
    build_router(AppState::new(store, settings))
}

async fn send(app: &Router, method: &str, path: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(path)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: &str, path: &str) -> (StatusCode, Value) {
    let (status, body) = send(app, method, path).await;
    (status, serde_json::from_slice(&body).unwrap_or(json!(null)))
}

async fn get_html(app: &Router) -> (StatusCode, String) {
    let (status, body) = send(app, "GET", "/").await;
    (status, String::from_utf8(body).unwrap())
}

fn title_of(html: &str) -> &str {
    let start = html.find("<title>").unwrap() + "<title>".len();
    let end = html.find("</title>").unwrap();
    &html[start..end]
}

// ---------------------------------------------------------------------------
// POST /init-data
// ---------------------------------------------------------------------------

#[tokio::test]
async fn init_data_twice_leaves_one_index_row() {
    let store = Arc::new(MemoryPageStore::new());
    let app = app_with(store.clone());

    let (status, body) = send_json(&app, "POST", "/init-data").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Index page created successfully"}));

    let (status, body) = send_json(&app, "POST", "/init-data").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Index page already exists"}));

    let rows = store.list().await.unwrap();
    assert_eq!(rows.iter().filter(|p| p.name == INDEX_PAGE).count(), 1);
    assert_eq!(
        rows[0].title.as_deref(),
        Some("Welcome to FastAPI + Svelte + Neon!")
    );
}

#[tokio::test]
async fn init_data_keeps_existing_index_row() {
    let store = Arc::new(MemoryPageStore::new());
    store
        .insert(&NewPage::new(INDEX_PAGE, Some("Custom")))
        .await
        .unwrap();
    let app = app_with(store.clone());

    let (_, body) = send_json(&app, "POST", "/init-data").await;
    assert_eq!(body["message"], "Index page already exists");
    let index = store.find_by_name(INDEX_PAGE).await.unwrap().unwrap();
    assert_eq!(index.title.as_deref(), Some("Custom"));
}

#[tokio::test]
async fn init_data_failure_is_500_with_detail() {
    let app = app_with(Arc::new(FailingStore));
    let (status, body) = send_json(&app, "POST", "/init-data").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Failed to initialize data: "), "{detail}");
}

#[tokio::test]
async fn init_data_is_post_only() {
    let app = app_with(Arc::new(MemoryPageStore::new()));
    let (status, _) = send(&app, "GET", "/init-data").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

// ---------------------------------------------------------------------------
// GET /api/pages
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_pages_returns_exactly_the_inserted_rows() {
    let store = Arc::new(MemoryPageStore::new());
    let app = app_with(store.clone());

    let (status, body) = send_json(&app, "GET", "/api/pages").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    store.insert(&NewPage::new("about", Some("About us"))).await.unwrap();
    store.insert(&NewPage::new("contact", None)).await.unwrap();
    send(&app, "POST", "/init-data").await;

    let (status, body) = send_json(&app, "GET", "/api/pages").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"id": 1, "name": "about", "title": "About us"},
            {"id": 2, "name": "contact", "title": null},
            {"id": 3, "name": "index", "title": "Welcome to FastAPI + Svelte + Neon!"},
        ])
    );
}

#[tokio::test]
async fn list_pages_failure_is_500() {
    let app = app_with(Arc::new(FailingStore));
    let (status, body) = send_json(&app, "GET", "/api/pages").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"detail": "Failed to fetch pages"}));
}

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

#[tokio::test]
async fn home_uses_default_heading_without_index_row() {
    let app = app_with(Arc::new(MemoryPageStore::new()));
    let (status, html) = get_html(&app).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(title_of(&html), DEFAULT_HEADING);
    assert!(html.contains(r#"src="/static/index.js""#));
}

#[tokio::test]
async fn home_reflects_stored_title() {
    let store = Arc::new(MemoryPageStore::new());
    let app = app_with(store.clone());
    send(&app, "POST", "/init-data").await;

    let (_, html) = get_html(&app).await;
    assert_eq!(title_of(&html), "Welcome to FastAPI + Svelte + Neon!");
    assert!(html.contains(r#"{"heading":"Welcome to FastAPI + Svelte + Neon!"}"#));
}

#[tokio::test]
async fn home_uses_default_heading_when_stored_title_is_null() {
    let store = Arc::new(MemoryPageStore::new());
    store.insert(&NewPage::new(INDEX_PAGE, None)).await.unwrap();
    let (_, html) = get_html(&app_with(store)).await;
    assert_eq!(title_of(&html), DEFAULT_HEADING);
}

#[tokio::test]
async fn home_shows_stored_title_containing_template_markers() {
    let store = Arc::new(MemoryPageStore::new());
    let title = "Docs for {{script}} and {{props}}";
    store.insert(&NewPage::new(INDEX_PAGE, Some(title))).await.unwrap();

    let (status, html) = get_html(&app_with(store)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(title_of(&html), title);
}

#[tokio::test]
async fn home_renders_fallback_heading_when_store_fails() {
    let app = app_with(Arc::new(FailingStore));
    let (status, html) = get_html(&app).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(title_of(&html), FALLBACK_HEADING);
}

#[tokio::test]
async fn home_uses_built_manifest_entry() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("manifest.json");
    std::fs::write(
        &manifest,
        r#"{"src/index.js": {"file": "assets/index.abc123.js", "css": ["assets/index.def456.css"], "isEntry": true}}"#,
    )
    .unwrap();
    let app = build_router(AppState::new(
        Arc::new(MemoryPageStore::new()),
        settings_with_manifest(&manifest),
    ));

    let (_, html) = get_html(&app).await;
    assert!(html.contains(r#"src="/static/assets/index.abc123.js""#));
    assert!(html.contains(r#"href="/static/assets/index.def456.css""#));
}

#[tokio::test]
async fn home_falls_back_when_manifest_is_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("manifest.json");
    std::fs::write(&manifest, "{ truncated").unwrap();
    let app = build_router(AppState::new(
        Arc::new(MemoryPageStore::new()),
        settings_with_manifest(&manifest),
    ));

    let (status, html) = get_html(&app).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(title_of(&html), FALLBACK_HEADING);
    assert!(html.contains(r#"src="/static/index.js""#));
}

// ---------------------------------------------------------------------------
// GET /health, GET /ready
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_is_healthy_regardless_of_store() {
    let stores: [Arc<dyn PageStore>; 2] = [Arc::new(MemoryPageStore::new()), Arc::new(FailingStore)];
    for store in stores {
        let (status, body) = send_json(&app_with(store), "GET", "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "pages-web");
    }
}

#[tokio::test]
async fn ready_reports_store_state() {
    let (status, body) = send_json(&app_with(Arc::new(MemoryPageStore::new())), "GET", "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "database": "ok"}));

    let (status, body) = send_json(&app_with(Arc::new(FailingStore)), "GET", "/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({"status": "degraded", "database": "unavailable"}));
}

// ---------------------------------------------------------------------------
// Static assets and CORS
// ---------------------------------------------------------------------------

#[tokio::test]
async fn serves_static_assets_when_enabled() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.js"), "console.log('hi');").unwrap();
    let mut settings = settings_with_manifest(&dir.path().join("missing.json"));
    settings.serve_static = true;
    settings.static_dir = dir.path().to_path_buf();
    let app = build_router(AppState::new(Arc::new(MemoryPageStore::new()), settings.clone()));

    let (status, body) = send(&app, "GET", "/static/index.js").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"console.log('hi');");

    settings.serve_static = false;
    let app = build_router(AppState::new(Arc::new(MemoryPageStore::new()), settings));
    let (status, _) = send(&app, "GET", "/static/index.js").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let app = app_with(Arc::new(MemoryPageStore::new()));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("origin", "https://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("https://example.com")
    );
}
