//! Application configuration module
//!
//! `AppConfig` is loaded once at startup and never mutated afterwards, so it
//! is shared behind an `Arc` without any locking.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use thiserror::Error;

pub const DEFAULT_APP_NAME: &str = "ScrapyFlow";

/// Used when `SECRET_KEY` is unset. Only suitable for local development.
pub const DEV_SECRET_KEY: &str = "change-me-to-a-very-strong-random-string-in-production";

/// One week
pub const DEFAULT_TOKEN_TTL_MINUTES: u64 = 60 * 24 * 7;

pub const DEFAULT_SERVER_PORT: u16 = 8000;

#[derive(Clone)]
pub struct AppConfig {
    pub app_name: String,
    pub secret_key: String,
    pub algorithm: Algorithm,
    pub access_token_ttl: Duration,
    pub database_url: Option<String>,
    pub server_port: u16,
    pub bcrypt_cost: u32,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("app_name", &self.app_name)
            .field("secret_key", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("access_token_ttl", &self.access_token_ttl)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("server_port", &self.server_port)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            secret_key: DEV_SECRET_KEY.to_string(),
            algorithm: Algorithm::HS256,
            access_token_ttl: Duration::from_secs(DEFAULT_TOKEN_TTL_MINUTES * 60),
            database_url: None,
            server_port: DEFAULT_SERVER_PORT,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl AppConfig {
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load configuration from the process environment
    ///
    /// Call `dotenv::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// # Arguments
    ///
    /// * `lookup` - Returns the raw value for a key, or `None` if unset
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` naming the first key whose value cannot be used.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();

        if let Some(name) = lookup("APP_NAME") {
            builder = builder.app_name(name);
        }
        match lookup("SECRET_KEY") {
            Some(secret) => builder = builder.secret_key(secret),
            None => tracing::warn!("SECRET_KEY not set, using the development default"),
        }
        if let Some(alg) = lookup("ALGORITHM") {
            builder = builder.algorithm(parse_algorithm(&alg)?);
        }
        if let Some(minutes) = lookup("ACCESS_TOKEN_EXPIRE_MINUTES") {
            let minutes: u64 = parse_var("ACCESS_TOKEN_EXPIRE_MINUTES", &minutes)?;
            builder = builder.access_token_ttl(Duration::from_secs(minutes.saturating_mul(60)));
        }
        if let Some(url) = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()) {
            builder = builder.database_url(url);
        }
        if let Some(port) = lookup("SERVER_PORT") {
            builder = builder.server_port(parse_var("SERVER_PORT", &port)?);
        }
        if let Some(cost) = lookup("BCRYPT_COST") {
            builder = builder.bcrypt_cost(parse_var("BCRYPT_COST", &cost)?);
        }

        builder.build()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret_key.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "SECRET_KEY",
                message: "must not be empty".to_string(),
            });
        }
        if !is_hmac(self.algorithm) {
            return Err(ConfigError::UnsupportedAlgorithm(format!("{:?}", self.algorithm)));
        }
        if self.access_token_ttl.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: "ACCESS_TOKEN_EXPIRE_MINUTES",
                message: "must be greater than zero".to_string(),
            });
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                key: "BCRYPT_COST",
                message: format!("{} is outside 4..=31", self.bcrypt_cost),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    app_name: Option<String>,
    secret_key: Option<String>,
    algorithm: Option<Algorithm>,
    access_token_ttl: Option<Duration>,
    database_url: Option<String>,
    server_port: Option<u16>,
    bcrypt_cost: Option<u32>,
}

impl AppConfigBuilder {
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    pub fn secret_key(mut self, secret: impl Into<String>) -> Self {
        self.secret_key = Some(secret.into());
        self
    }

    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = Some(algorithm);
        self
    }

    pub fn access_token_ttl(mut self, ttl: Duration) -> Self {
        self.access_token_ttl = Some(ttl);
        self
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn server_port(mut self, port: u16) -> Self {
        self.server_port = Some(port);
        self
    }

    pub fn bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = Some(cost);
        self
    }

    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            app_name: self.app_name.unwrap_or(defaults.app_name),
            secret_key: self.secret_key.unwrap_or(defaults.secret_key),
            algorithm: self.algorithm.unwrap_or(defaults.algorithm),
            access_token_ttl: self.access_token_ttl.unwrap_or(defaults.access_token_ttl),
            database_url: self.database_url,
            server_port: self.server_port.unwrap_or(defaults.server_port),
            bcrypt_cost: self.bcrypt_cost.unwrap_or(defaults.bcrypt_cost),
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
    #[error("unsupported signing algorithm: {0} (expected HS256, HS384 or HS512)")]
    UnsupportedAlgorithm(String),
}

fn is_hmac(algorithm: Algorithm) -> bool {
    matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)
}

fn parse_algorithm(raw: &str) -> Result<Algorithm, ConfigError> {
    let algorithm = Algorithm::from_str(raw.trim())
        .map_err(|_| ConfigError::UnsupportedAlgorithm(raw.to_string()))?;
    if !is_hmac(algorithm) {
        return Err(ConfigError::UnsupportedAlgorithm(raw.to_string()));
    }
    Ok(algorithm)
}

fn parse_var<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
        key,
        message: e.to_string(),
    })
}
