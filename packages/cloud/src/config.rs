use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use taskdeck_config::constants::{
    TASKDECK_API_URL, TASKDECK_CONFIG_PATH, TASKDECK_HTTP_CONNECT_TIMEOUT_SECS,
    TASKDECK_HTTP_REQUEST_TIMEOUT_SECS, TASKDECK_PROJECT_ID, TASKDECK_PUBLIC_KEY,
};
use taskdeck_config::{lookup, lookup_parsed, process_env};

use crate::error::{CloudError, CloudResult};

/// Default remote store endpoint
pub const DEFAULT_API_URL: &str = "https://api.taskdeck.app";

/// Default whole-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default TCP connect timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Credentials and endpoint settings for the remote table store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    /// Project identifier issued by the backend service
    pub project_id: String,

    /// Public (browser-safe) API key
    pub public_key: String,

    /// Base URL of the remote store
    pub api_url: String,

    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            public_key: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl CloudConfig {
    /// Initialize with credentials and default endpoint settings
    pub fn with_credentials(project_id: impl Into<String>, public_key: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            public_key: public_key.into(),
            ..Self::default()
        }
    }

    /// Build configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(process_env)
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(source: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.merge_lookup(source);
        config
    }

    /// Overlay any variables present in `source` onto this configuration
    pub fn merge_lookup<F>(&mut self, source: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(project_id) = lookup(&source, TASKDECK_PROJECT_ID) {
            self.project_id = project_id;
        }
        if let Some(public_key) = lookup(&source, TASKDECK_PUBLIC_KEY) {
            self.public_key = public_key;
        }
        if let Some(api_url) = lookup(&source, TASKDECK_API_URL) {
            self.api_url = api_url;
        }
        if let Some(secs) = lookup_parsed::<_, u64>(&source, TASKDECK_HTTP_REQUEST_TIMEOUT_SECS) {
            self.request_timeout_secs = secs;
        }
        if let Some(secs) = lookup_parsed::<_, u64>(&source, TASKDECK_HTTP_CONNECT_TIMEOUT_SECS) {
            self.connect_timeout_secs = secs;
        }
    }

    /// Config file location, honouring `TASKDECK_CONFIG_PATH`
    pub fn config_path() -> PathBuf {
        lookup(process_env, TASKDECK_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(taskdeck_core::default_config_file)
    }

    /// Load configuration from disk, falling back to defaults when the file is absent
    pub async fn load(path: &Path) -> CloudResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .await
            .map_err(|e| CloudError::Configuration(format!("Failed to read config: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| CloudError::Configuration(format!("Invalid config format: {}", e)))
    }

    /// Load the default config file, then apply environment overrides
    pub async fn load_default() -> CloudResult<Self> {
        let mut config = Self::load(&Self::config_path()).await?;
        config.merge_lookup(process_env);
        Ok(config)
    }

    /// Save configuration to disk
    pub async fn save(&self, path: &Path) -> CloudResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                CloudError::Configuration(format!("Failed to create config dir: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| CloudError::Configuration(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .await
            .map_err(|e| CloudError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Whether both credentials are present
    pub fn has_credentials(&self) -> bool {
        !self.project_id.is_empty() && !self.public_key.is_empty()
    }

    /// Validate configuration eagerly.
    ///
    /// The HTTP store does not call this; missing credentials only surface
    /// once a request is attempted.
    pub fn validate(&self) -> CloudResult<()> {
        if self.project_id.is_empty() {
            return Err(CloudError::config("Project ID is required"));
        }
        if self.public_key.is_empty() {
            return Err(CloudError::config("Public key is required"));
        }
        if !(self.api_url.starts_with("https://") || self.api_url.starts_with("http://")) {
            return Err(CloudError::config("API URL must start with http:// or https://"));
        }
        if self.request_timeout_secs == 0 {
            return Err(CloudError::config("Request timeout must be greater than zero"));
        }
        Ok(())
    }
}

/// Configuration builder for programmatic setup
#[derive(Debug, Default)]
pub struct CloudConfigBuilder {
    config: CloudConfig,
}

impl CloudConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project_id(mut self, project_id: impl Into<String>) -> Self {
        self.config.project_id = project_id.into();
        self
    }

    pub fn public_key(mut self, public_key: impl Into<String>) -> Self {
        self.config.public_key = public_key.into();
        self
    }

    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.config.api_url = api_url.into();
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    pub fn connect_timeout_secs(mut self, secs: u64) -> Self {
        self.config.connect_timeout_secs = secs;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> CloudResult<CloudConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
