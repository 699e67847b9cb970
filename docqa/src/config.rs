use crate::error::ConfigError;
use crate::prompt::DEFAULT_MAX_DOCUMENT_CHARS;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";
pub const DEFAULT_SITE_URL: &str = "http://localhost:5173";
pub const DEFAULT_APP_NAME: &str = "Educational Content RAG";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Runtime settings, read once from the environment at startup.
#[derive(Clone)]
pub struct Settings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    /// Sent upstream as `HTTP-Referer`.
    pub site_url: String,
    /// Sent upstream as `X-Title`.
    pub app_name: String,
    pub max_document_chars: usize,
    pub completion_timeout: Duration,
    pub bind_addr: String,
    pub cors_allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
}

// Hand-written so the API key never ends up in logs.
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("site_url", &self.site_url)
            .field("app_name", &self.app_name)
            .field("max_document_chars", &self.max_document_chars)
            .field("completion_timeout", &self.completion_timeout)
            .field("bind_addr", &self.bind_addr)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = get("OPENROUTER_API_KEY")
            .ok_or_else(|| ConfigError::MissingVariable("OPENROUTER_API_KEY".to_string()))?;

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_SITE_URL.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            api_key,
            base_url: get("OPENROUTER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: get("OPENROUTER_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            site_url: get("SITE_URL").unwrap_or_else(|| DEFAULT_SITE_URL.to_string()),
            app_name: get("APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            max_document_chars: parse_or(
                "MAX_DOCUMENT_CHARS",
                get("MAX_DOCUMENT_CHARS"),
                DEFAULT_MAX_DOCUMENT_CHARS,
            )?,
            completion_timeout: Duration::from_secs(parse_or(
                "COMPLETION_TIMEOUT_SECS",
                get("COMPLETION_TIMEOUT_SECS"),
                DEFAULT_TIMEOUT_SECS,
            )?),
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            cors_allowed_origins,
            max_upload_bytes: parse_or(
                "MAX_UPLOAD_BYTES",
                get("MAX_UPLOAD_BYTES"),
                DEFAULT_MAX_UPLOAD_BYTES,
            )?,
        })
    }
}

fn parse_or<T: FromStr>(key: &str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    match value {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
        }),
        None => Ok(default),
    }
}
