//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and `BIOBLOOD_*` environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::gateway::routes::{DEFAULT_LOCAL_URL, DEFAULT_REMOTE_URL};
use crate::gateway::{ApiRoutes, GatewayMode};
use crate::model::BloodGroup;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Client-side backend selection
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub mode: GatewayMode,

    /// Host the client pretends to run on; picks local vs remote data URLs
    #[serde(default = "default_api_host")]
    pub host: String,

    #[serde(default = "default_local_url")]
    pub local_url: String,

    #[serde(default = "default_remote_url")]
    pub remote_url: String,

    #[serde(default = "default_remote_url")]
    pub prediction_url: String,

    #[serde(default = "default_stub_delay")]
    pub stub_delay_ms: u64,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_api_host() -> String {
    "localhost".to_string()
}

fn default_local_url() -> String {
    DEFAULT_LOCAL_URL.to_string()
}

fn default_remote_url() -> String {
    DEFAULT_REMOTE_URL.to_string()
}

fn default_stub_delay() -> u64 {
    500
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            mode: GatewayMode::default(),
            host: default_api_host(),
            local_url: default_local_url(),
            remote_url: default_remote_url(),
            prediction_url: default_remote_url(),
            stub_delay_ms: default_stub_delay(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn routes(&self) -> ApiRoutes {
        ApiRoutes {
            local_url: self.local_url.clone(),
            remote_url: self.remote_url.clone(),
            prediction_url: self.prediction_url.clone(),
            host: self.host.clone(),
        }
    }

    pub fn stub_delay(&self) -> Duration {
        Duration::from_millis(self.stub_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Where the CLI keeps its session
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_state_dir")]
    pub state_dir: String,
}

fn default_state_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("bioblood").to_string_lossy().to_string())
        .unwrap_or_else(|| "./bioblood_data".to_string())
}

/// Replace a leading `~` with the home directory
fn expand_home(path: &str) -> String {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') => rest,
        _ => return path.to_string(),
    };
    match dirs::home_dir() {
        Some(home) => format!("{}{}", home.to_string_lossy(), rest),
        None => path.to_string(),
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
        }
    }
}

/// Local development backend
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,

    #[serde(default = "default_server_port")]
    pub port: u16,

    #[serde(default = "default_database_path")]
    pub database_path: String,

    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,

    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Upload size limit in bytes
    #[serde(default = "default_max_upload")]
    pub max_upload_bytes: usize,

    /// Group answered by the bundled classifiers
    #[serde(default = "default_blood_group")]
    pub default_blood_group: BloodGroup,
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    5000
}

fn default_database_path() -> String {
    "bloodgroup.db".to_string()
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:8080".to_string(),
        "http://127.0.0.1:8080".to_string(),
    ]
}

fn default_max_upload() -> usize {
    16 * 1024 * 1024 // 16 MB
}

fn default_blood_group() -> BloodGroup {
    BloodGroup::APositive
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            database_path: default_database_path(),
            upload_dir: default_upload_dir(),
            cors_origins: default_cors_origins(),
            max_upload_bytes: default_max_upload(),
            default_blood_group: default_blood_group(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        let mut config: Config = toml::from_str(content).map_err(|e| e.to_string())?;
        config.session.state_dir = expand_home(&config.session.state_dir);
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("bioblood").join("config.toml")),
            Some(PathBuf::from("/etc/bioblood/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `BIOBLOOD_*` overrides read through `lookup`
    ///
    /// Values that fail to parse are ignored with a warning.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // API overrides
        if let Some(mode) = lookup("BIOBLOOD_API_MODE") {
            match mode.parse() {
                Ok(mode) => self.api.mode = mode,
                Err(e) => tracing::warn!("Ignoring BIOBLOOD_API_MODE: {}", e),
            }
        }
        if let Some(host) = lookup("BIOBLOOD_API_HOST") {
            self.api.host = host;
        }
        if let Some(url) = lookup("BIOBLOOD_LOCAL_URL") {
            self.api.local_url = url;
        }
        if let Some(url) = lookup("BIOBLOOD_REMOTE_URL") {
            self.api.remote_url = url;
        }
        if let Some(url) = lookup("BIOBLOOD_PREDICTION_URL") {
            self.api.prediction_url = url;
        }

        // Session overrides
        if let Some(dir) = lookup("BIOBLOOD_STATE_DIR") {
            self.session.state_dir = expand_home(&dir);
        }

        // Server overrides
        if let Some(host) = lookup("BIOBLOOD_SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("BIOBLOOD_SERVER_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Some(path) = lookup("BIOBLOOD_DATABASE") {
            self.server.database_path = path;
        }
        if let Some(dir) = lookup("BIOBLOOD_UPLOAD_DIR") {
            self.server.upload_dir = dir;
        }

        // Logging overrides
        if let Some(level) = lookup("BIOBLOOD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("BIOBLOOD_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    format!(
        r#"# BioBlood Configuration
#
# Environment variables override these settings:
# - BIOBLOOD_API_MODE
# - BIOBLOOD_API_HOST
# - BIOBLOOD_LOCAL_URL
# - BIOBLOOD_REMOTE_URL
# - BIOBLOOD_PREDICTION_URL
# - BIOBLOOD_STATE_DIR
# - BIOBLOOD_SERVER_HOST
# - BIOBLOOD_SERVER_PORT
# - BIOBLOOD_DATABASE
# - BIOBLOOD_UPLOAD_DIR
# - BIOBLOOD_LOG_LEVEL
# - BIOBLOOD_LOG_FORMAT

[api]
# demo: canned data endpoints, live prediction service
# live: everything over HTTP
# offline: everything canned
mode = "demo"

# Data endpoints go to local_url when host is localhost or 127.0.0.1
host = "localhost"
local_url = "{local}"
remote_url = "{remote}"

# Prediction requests always go here
prediction_url = "{remote}"

# Artificial latency of canned responses (ms)
stub_delay_ms = 500

# Request timeout in seconds
request_timeout_secs = 30

[session]
# Directory holding session.json
state_dir = {state_dir:?}

[server]
host = "0.0.0.0"
port = 5000
database_path = "bloodgroup.db"
upload_dir = "uploads"
cors_origins = ["http://localhost:8080", "http://127.0.0.1:8080"]
max_upload_bytes = 16777216

# Group answered by the bundled classifiers
default_blood_group = "A+"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#,
        local = DEFAULT_LOCAL_URL,
        remote = DEFAULT_REMOTE_URL,
        state_dir = default_state_dir(),
    )
}
