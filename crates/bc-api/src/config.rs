// config.rs - Console configuration.
//
// ConsoleConfig decides which backend the console talks to and where it
// keeps local state. `for_project()` generates the standard layout under
// a `.basecamp/` directory in the project root; `load_for_project()`
// overlays `.basecamp/console.toml` when it exists.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Which collaborator implementation to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// The REST API.
    #[default]
    Http,
    /// JSON files under `store_dir`.
    File,
}

/// REST backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL including the version prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Environment variable holding the bearer token.
    #[serde(default = "default_token_env")]
    pub token_env: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token_env: default_token_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000/api/v1".to_string()
}

fn default_token_env() -> String {
    "BASECAMP_API_TOKEN".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> u32 {
    20
}

/// Fully resolved console configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Root directory of the project.
    pub project_root: PathBuf,

    pub backend: BackendKind,

    pub api: ApiConfig,

    /// Record directory for the file backend.
    pub store_dir: PathBuf,

    /// Append-only lifecycle event log.
    pub events_log: PathBuf,

    /// Default page size for list commands.
    pub page_size: u32,
}

/// The optional on-disk overrides, `.basecamp/console.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConsoleFile {
    #[serde(default)]
    backend: Option<BackendKind>,
    #[serde(default)]
    api: Option<ApiConfig>,
    #[serde(default)]
    store_dir: Option<PathBuf>,
    #[serde(default)]
    events_log: Option<PathBuf>,
    #[serde(default)]
    page_size: Option<u32>,
}

impl ConsoleConfig {
    /// Create a config with the standard `.basecamp/` layout for a project.
    pub fn for_project(project_root: impl AsRef<Path>) -> Self {
        let root = project_root.as_ref().to_path_buf();
        let dir = root.join(".basecamp");
        Self {
            project_root: root,
            backend: BackendKind::default(),
            api: ApiConfig::default(),
            store_dir: dir.join("store"),
            events_log: dir.join("events.jsonl"),
            page_size: default_page_size(),
        }
    }

    /// Path of the optional override file.
    pub fn config_file(&self) -> PathBuf {
        self.project_root.join(".basecamp").join("console.toml")
    }

    /// Standard layout, overlaid with `.basecamp/console.toml` if present.
    ///
    /// Relative paths in the file are resolved against the project root.
    pub fn load_for_project(project_root: impl AsRef<Path>) -> Result<Self, ApiError> {
        let mut config = Self::for_project(project_root);
        let path = config.config_file();
        if !path.exists() {
            return Ok(config);
        }

        let content = std::fs::read_to_string(&path).map_err(|e| ApiError::io(&path, e))?;
        let file: ConsoleFile = toml::from_str(&content).map_err(|source| ApiError::ConfigError {
            path: path.display().to_string(),
            source,
        })?;
        config.apply(file);
        tracing::debug!(path = %path.display(), "loaded console config");
        Ok(config)
    }

    fn apply(&mut self, file: ConsoleFile) {
        if let Some(backend) = file.backend {
            self.backend = backend;
        }
        if let Some(api) = file.api {
            self.api = api;
        }
        if let Some(dir) = file.store_dir {
            self.store_dir = self.project_root.join(dir);
        }
        if let Some(log) = file.events_log {
            self.events_log = self.project_root.join(log);
        }
        if let Some(size) = file.page_size {
            self.page_size = size;
        }
    }
}
