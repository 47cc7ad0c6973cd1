//! Runtime configuration from the environment.

use std::path::PathBuf;
use std::time::Duration;

use crate::application::autosave::DEFAULT_AUTOSAVE_DELAY;
use crate::infrastructure::storage::{DEFAULT_TABLE, DEFAULT_TIMEOUT_SECS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// Records live in the local key/value store.
    Local,
    /// Records live in the hosted table.
    Rest { url: String, api_key: String },
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Rest { .. } => "rest",
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown backend {0:?} (expected \"local\" or \"rest\")")]
    UnknownBackend(String),

    #[error("{0} must be set for the rest backend")]
    Missing(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetConfig {
    pub backend: Backend,
    pub table: String,
    pub autosave_delay: Duration,
    pub storage_path: Option<PathBuf>,
    pub http_timeout_secs: u64,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Local,
            table: DEFAULT_TABLE.to_string(),
            autosave_delay: DEFAULT_AUTOSAVE_DELAY,
            storage_path: None,
            http_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl SheetConfig {
    /// Reads `SHEETKEEP_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let backend = match var("SHEETKEEP_BACKEND").as_deref() {
            None | Some("local") => Backend::Local,
            Some("rest") => Backend::Rest {
                url: var("SHEETKEEP_REST_URL").ok_or(ConfigError::Missing("SHEETKEEP_REST_URL"))?,
                api_key: var("SHEETKEEP_REST_KEY")
                    .ok_or(ConfigError::Missing("SHEETKEEP_REST_KEY"))?,
            },
            Some(other) => return Err(ConfigError::UnknownBackend(other.to_string())),
        };

        let autosave_delay = parse_number(var("SHEETKEEP_AUTOSAVE_MS"), "SHEETKEEP_AUTOSAVE_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.autosave_delay);
        let http_timeout_secs = parse_number(
            var("SHEETKEEP_HTTP_TIMEOUT_SECS"),
            "SHEETKEEP_HTTP_TIMEOUT_SECS",
        )
        .unwrap_or(defaults.http_timeout_secs);

        Ok(Self {
            backend,
            table: var("SHEETKEEP_TABLE").unwrap_or(defaults.table),
            autosave_delay,
            storage_path: var("SHEETKEEP_STORAGE_PATH").map(PathBuf::from),
            http_timeout_secs,
        })
    }
}

fn parse_number(raw: Option<String>, key: &str) -> Option<u64> {
    let raw = raw?;
    match raw.parse() {
        Ok(n) => Some(n),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring invalid number, using default");
            None
        }
    }
}

/// Loads `.env.local` then `.env` from the workspace root; earlier files win.
pub fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<SheetConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SheetConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(config(&[]).unwrap(), SheetConfig::default());
    }

    #[test]
    fn rest_backend_requires_url_and_key() {
        assert_eq!(
            config(&[("SHEETKEEP_BACKEND", "rest")]).unwrap_err(),
            ConfigError::Missing("SHEETKEEP_REST_URL")
        );

        let cfg = config(&[
            ("SHEETKEEP_BACKEND", "rest"),
            ("SHEETKEEP_REST_URL", "https://db.example.test"),
            ("SHEETKEEP_REST_KEY", "anon"),
            ("SHEETKEEP_TABLE", "sheets"),
        ])
        .unwrap();
        assert_eq!(
            cfg.backend,
            Backend::Rest {
                url: "https://db.example.test".into(),
                api_key: "anon".into()
            }
        );
        assert_eq!(cfg.table, "sheets");
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(matches!(
            config(&[("SHEETKEEP_BACKEND", "cloud")]),
            Err(ConfigError::UnknownBackend(_))
        ));
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let cfg = config(&[
            ("SHEETKEEP_AUTOSAVE_MS", "soon"),
            ("SHEETKEEP_HTTP_TIMEOUT_SECS", "5"),
        ])
        .unwrap();
        assert_eq!(cfg.autosave_delay, Duration::from_millis(1500));
        assert_eq!(cfg.http_timeout_secs, 5);
    }
}
