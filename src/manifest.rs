//! Vite build manifest: maps a source entry to its hashed output files.

use crate::error::AppError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Entry point the page template mounts.
pub const INDEX_ENTRY: &str = "src/index.js";

/// URL prefix the bundle files are served under.
pub const STATIC_PREFIX: &str = "/static/";

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestChunk {
    pub file: String,
    #[serde(default)]
    pub css: Vec<String>,
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_entry: bool,
    #[serde(default)]
    pub imports: Vec<String>,
}

impl ManifestChunk {
    /// Used when no build output exists yet.
    pub fn fallback() -> Self {
        ManifestChunk {
            file: "index.js".into(),
            ..Default::default()
        }
    }

    pub fn script_url(&self) -> String {
        asset_url(&self.file)
    }

    pub fn css_urls(&self) -> Vec<String> {
        self.css.iter().map(|f| asset_url(f)).collect()
    }
}

fn asset_url(file: &str) -> String {
    format!("{}{}", STATIC_PREFIX, file.trim_start_matches('/'))
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    chunks: HashMap<String, ManifestChunk>,
}

impl Manifest {
    /// Manifest with only the fallback index entry.
    pub fn fallback() -> Self {
        let mut chunks = HashMap::new();
        chunks.insert(INDEX_ENTRY.to_string(), ManifestChunk::fallback());
        Manifest { chunks }
    }

    pub fn parse(json: &str) -> Result<Self, AppError> {
        serde_json::from_str(json).map_err(|e| AppError::Manifest(format!("invalid JSON: {}", e)))
    }

    /// Read the manifest at `path`. A missing file yields [`Manifest::fallback`]; a file that
    /// exists but cannot be read or parsed is an error.
    pub async fn load(path: &Path) -> Result<Self, AppError> {
        match tokio::fs::read_to_string(path).await {
            Ok(text) => Self::parse(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "manifest not found, using fallback entry");
                Ok(Self::fallback())
            }
            Err(e) => Err(AppError::Manifest(format!("{}: {}", path.display(), e))),
        }
    }

    pub fn entry(&self, name: &str) -> Result<&ManifestChunk, AppError> {
        self.chunks
            .get(name)
            .ok_or_else(|| AppError::Manifest(format!("no entry '{}'", name)))
    }
}
