// src/config.rs

use std::env;
use dotenvy::dotenv;
use url::Url;

/// Question count the generation prompt asks for. Not enforced on the result.
pub const TARGET_QUESTION_RANGE: (usize, usize) = (3, 5);

/// Study material beyond this many characters is cut before prompting.
pub const MAX_MATERIAL_CHARS: usize = 12_000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub rust_log: String,
    /// Base URL of an OpenAI-compatible chat completions API.
    pub generator_api_url: Url,
    pub generator_api_key: Option<String>,
    pub generator_model: String,
    pub generator_timeout_secs: u64,
    pub max_upload_bytes: usize,
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::Missing(key))
}

fn parsed_or<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url = required("DATABASE_URL")?;

        let jwt_secret = required("JWT_SECRET")?;

        let jwt_expiration = parsed_or("JWT_EXPIRATION", 86_400)?;

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let generator_api_url = env::var("GENERATOR_API_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let generator_api_url = Url::parse(&generator_api_url).map_err(|e| ConfigError::Invalid {
            key: "GENERATOR_API_URL",
            reason: e.to_string(),
        })?;

        let generator_api_key = env::var("GENERATOR_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let generator_model = env::var("GENERATOR_MODEL")
            .unwrap_or_else(|_| "gpt-4o-mini".to_string());

        let generator_timeout_secs = parsed_or("GENERATOR_TIMEOUT_SECS", 60)?;

        let max_upload_bytes = parsed_or("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?;

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            generator_api_url,
            generator_api_key,
            generator_model,
            generator_timeout_secs,
            max_upload_bytes,
        })
    }
}
