//! Process settings read from the environment.

use crate::error::ConfigError;
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_STATIC_DIR: &str = "svelte/dist";
pub const DEFAULT_MANIFEST_PATH: &str = "svelte/dist/.vite/manifest.json";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    /// Enables SQL statement logging and debug-level default log filter.
    pub debug: bool,
    /// Mount `static_dir` under `/static`. Off when running on Vercel.
    pub serve_static: bool,
    pub static_dir: PathBuf,
    pub manifest_path: PathBuf,
    pub bind_addr: String,
    pub max_connections: u32,
}

impl Settings {
    /// Read settings from the process environment. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get("POSTGRES_URL")
            .or_else(|| get("DATABASE_URL"))
            .ok_or(ConfigError::Missing("POSTGRES_URL"))?;

        let max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(v) => match v.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "DB_MAX_CONNECTIONS",
                        value: v,
                    })
                }
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Settings {
            database_url,
            debug: get("DEBUG").as_deref().map(parse_flag).unwrap_or(false),
            serve_static: get("VERCEL").as_deref() != Some("1"),
            static_dir: get("STATIC_DIR")
                .unwrap_or_else(|| DEFAULT_STATIC_DIR.into())
                .into(),
            manifest_path: get("MANIFEST_PATH")
                .unwrap_or_else(|| DEFAULT_MANIFEST_PATH.into())
                .into(),
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            max_connections,
        })
    }

    /// Settings for tests: no database URL checks, defaults everywhere.
    pub fn with_database_url(database_url: impl Into<String>) -> Self {
        Settings {
            database_url: database_url.into(),
            debug: false,
            serve_static: true,
            static_dir: DEFAULT_STATIC_DIR.into(),
            manifest_path: DEFAULT_MANIFEST_PATH.into(),
            bind_addr: DEFAULT_BIND_ADDR.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Default `EnvFilter` directives when `RUST_LOG` is unset.
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "pages_web=debug,tower_http=debug,sqlx=debug"
        } else {
            "pages_web=info,tower_http=info"
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
