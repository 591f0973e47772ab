use crate::error::StudyCardsError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default chat completions endpoint
pub const DEFAULT_API_URL: &str = "https://api.deepseek.com/chat/completions";

/// Default model name
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Sampling temperature sent with every generation request
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Cap on generated tokens per request
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 5000;

/// StudyCards application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Chat completions endpoint URL
    pub api_url: String,

    /// Bearer credential for the generation service
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Model name
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum output tokens
    pub max_output_tokens: u32,

    /// HTTP timeout for generation calls, in seconds
    pub request_timeout_secs: u64,

    /// Directory holding the library JSON files
    pub data_dir: PathBuf,

    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            request_timeout_secs: 120,
            data_dir: PathBuf::from("./data"),
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            log_dir: PathBuf::from("./data/log"),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, StudyCardsError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        let defaults = Self::default();

        let config = Self {
            api_url: std::env::var("STUDYCARDS_API_URL").unwrap_or(defaults.api_url),
            api_key: Self::get_env_non_empty("STUDYCARDS_API_KEY")
                .or_else(|| Self::get_env_non_empty("DEEPSEEK_API_KEY")),
            model: std::env::var("STUDYCARDS_MODEL").unwrap_or(defaults.model),
            temperature: Self::get_env_parsed("STUDYCARDS_TEMPERATURE")
                .unwrap_or(defaults.temperature),
            max_output_tokens: Self::get_env_parsed("STUDYCARDS_MAX_TOKENS")
                .unwrap_or(defaults.max_output_tokens),
            request_timeout_secs: Self::get_env_parsed("STUDYCARDS_REQUEST_TIMEOUT")
                .unwrap_or(defaults.request_timeout_secs),
            data_dir: Self::get_env_path("STUDYCARDS_DATA_DIR").unwrap_or(defaults.data_dir),
            server_host: std::env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: Self::get_env_parsed("SERVER_PORT").unwrap_or(defaults.server_port),
            log_dir: Self::get_env_path("LOG_DIR").unwrap_or(defaults.log_dir),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
        };

        config.validate()?;
        config.ensure_directories()?;

        Ok(config)
    }

    fn get_env_path(key: &str) -> Option<PathBuf> {
        std::env::var(key).ok().map(PathBuf::from)
    }

    fn get_env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
        std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
    }

    fn get_env_non_empty(key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Ensure required directories exist, create if not
    pub fn ensure_directories(&self) -> Result<(), StudyCardsError> {
        for dir in [&self.data_dir, &self.log_dir] {
            if !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    StudyCardsError::config(format!(
                        "Failed to create directory {}: {}",
                        dir.display(),
                        e
                    ))
                })?;
            }
        }

        Ok(())
    }

    /// Whether a credential for the generation service is present
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_deref()
            .map(|key| !key.trim().is_empty())
            .unwrap_or(false)
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Validate configuration.
    ///
    /// A missing API key is accepted here; it is reported when a generation
    /// is attempted so the library endpoints stay usable without one.
    pub fn validate(&self) -> Result<(), StudyCardsError> {
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(StudyCardsError::config(
                "API URL must start with http:// or https://",
            ));
        }

        if self.model.trim().is_empty() {
            return Err(StudyCardsError::config("Model name cannot be empty"));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(StudyCardsError::config(format!(
                "Temperature must be between 0 and 2, got {}",
                self.temperature
            )));
        }

        if self.max_output_tokens == 0 {
            return Err(StudyCardsError::config("Max output tokens cannot be 0"));
        }

        if self.server_port == 0 {
            return Err(StudyCardsError::config("Server port cannot be 0"));
        }

        Ok(())
    }
}
