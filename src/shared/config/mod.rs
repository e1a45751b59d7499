//! Application configuration module
//!
//! Server settings are assembled from three layers, lowest precedence
//! first: built-in defaults, an optional TOML file, and environment
//! variables. The builder validates the final result.
//!
//! ```toml
//! bind_addr = "127.0.0.1:3000"
//! database_url = "sqlite://chatline.db"
//! jwt_secret = "a long random string"
//! session_ttl_hours = 720
//! cors_origins = ["http://localhost:5173"]
//! room_capacity = 256
//! cleanup_interval_secs = 300
//! password_cost = 12
//! ```

use std::net::SocketAddr;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Default listen address
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
/// Default database location (created on first start)
pub const DEFAULT_DATABASE_URL: &str = "sqlite://chatline.db";
/// Development-only signing secret
pub const DEFAULT_JWT_SECRET: &str = "your-secret-key-change-in-production";

const DEFAULT_SESSION_TTL_HOURS: u64 = 30 * 24;
/// One year
pub const MAX_SESSION_TTL_HOURS: u64 = 365 * 24;
const DEFAULT_ROOM_CAPACITY: usize = 256;
const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 300;
/// bcrypt work factor
pub const DEFAULT_PASSWORD_COST: u32 = 12;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Address the HTTP server listens on
    pub bind_addr: SocketAddr,
    /// sqlx SQLite connection URL
    pub database_url: String,
    /// HMAC secret used to sign bearer tokens
    pub jwt_secret: String,
    /// Lifetime of a login session
    pub session_ttl_hours: u64,
    /// Allowed CORS origins; empty allows any origin
    pub cors_origins: Vec<String>,
    /// Buffered events per user room before slow receivers lag
    pub room_capacity: usize,
    /// How often rooms without receivers are dropped
    pub cleanup_interval_secs: u64,
    /// bcrypt cost for password hashes (4-31)
    pub password_cost: u32,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load configuration from `CHATLINE_CONFIG` (if set) and the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = AppConfig::builder();
        if let Ok(path) = std::env::var("CHATLINE_CONFIG") {
            builder = builder.merge_file(FileConfig::load(&path)?);
        }
        builder.merge_env(|key| std::env::var(key).ok())?.build()
    }

    /// Whether the signing secret is still the development default
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }

    /// Whether the database lives only in memory
    pub fn is_memory_database(&self) -> bool {
        self.database_url.contains(":memory:")
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.database_url.starts_with("sqlite:") {
            return Err(ConfigError::InvalidValue {
                key: "database_url",
                message: format!("expected a sqlite: URL, got '{}'", self.database_url),
            });
        }
        if self.jwt_secret.len() < 16 {
            return Err(ConfigError::InvalidValue {
                key: "jwt_secret",
                message: "must be at least 16 characters".to_string(),
            });
        }
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&self.session_ttl_hours) {
            return Err(ConfigError::InvalidValue {
                key: "session_ttl_hours",
                message: format!("must be between 1 and {}, got {}", MAX_SESSION_TTL_HOURS, self.session_ttl_hours),
            });
        }
        if self.room_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "room_capacity",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.cleanup_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "cleanup_interval_secs",
                message: "must be greater than zero".to_string(),
            });
        }
        if !(4..=31).contains(&self.password_cost) {
            return Err(ConfigError::InvalidValue {
                key: "password_cost",
                message: format!("must be between 4 and 31, got {}", self.password_cost),
            });
        }
        Ok(())
    }
}

/// Optional settings read from a TOML file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub bind_addr: Option<String>,
    pub database_url: Option<String>,
    pub jwt_secret: Option<String>,
    pub session_ttl_hours: Option<u64>,
    pub cors_origins: Option<Vec<String>>,
    pub room_capacity: Option<usize>,
    pub cleanup_interval_secs: Option<u64>,
    pub password_cost: Option<u32>,
}

impl FileConfig {
    /// Parse TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    bind_addr: Option<String>,
    database_url: Option<String>,
    jwt_secret: Option<String>,
    session_ttl_hours: Option<u64>,
    cors_origins: Option<Vec<String>>,
    room_capacity: Option<usize>,
    cleanup_interval_secs: Option<u64>,
    password_cost: Option<u32>,
}

impl AppConfigBuilder {
    pub fn bind_addr(mut self, addr: impl Into<String>) -> Self {
        self.bind_addr = Some(addr.into());
        self
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = Some(secret.into());
        self
    }

    pub fn session_ttl_hours(mut self, hours: u64) -> Self {
        self.session_ttl_hours = Some(hours);
        self
    }

    pub fn cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    pub fn room_capacity(mut self, capacity: usize) -> Self {
        self.room_capacity = Some(capacity);
        self
    }

    pub fn cleanup_interval_secs(mut self, secs: u64) -> Self {
        self.cleanup_interval_secs = Some(secs);
        self
    }

    pub fn password_cost(mut self, cost: u32) -> Self {
        self.password_cost = Some(cost);
        self
    }

    /// Overlay values present in a config file
    pub fn merge_file(mut self, file: FileConfig) -> Self {
        if file.bind_addr.is_some() {
            self.bind_addr = file.bind_addr;
        }
        if file.database_url.is_some() {
            self.database_url = file.database_url;
        }
        if file.jwt_secret.is_some() {
            self.jwt_secret = file.jwt_secret;
        }
        if file.session_ttl_hours.is_some() {
            self.session_ttl_hours = file.session_ttl_hours;
        }
        if file.cors_origins.is_some() {
            self.cors_origins = file.cors_origins;
        }
        if file.room_capacity.is_some() {
            self.room_capacity = file.room_capacity;
        }
        if file.cleanup_interval_secs.is_some() {
            self.cleanup_interval_secs = file.cleanup_interval_secs;
        }
        if file.password_cost.is_some() {
            self.password_cost = file.password_cost;
        }
        self
    }

    /// Overlay values from environment variables
    ///
    /// `lookup` is `std::env::var` in production; tests pass a map.
    /// `SERVER_PORT` only replaces the port of the bind address.
    pub fn merge_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("CHATLINE_BIND_ADDR") {
            self.bind_addr = Some(addr);
        }
        if let Some(port) = lookup("SERVER_PORT") {
            let port: u16 = parse_number("SERVER_PORT", &port)?;
            let base = self.bind_addr.clone().unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
            let mut addr = parse_addr(&base)?;
            addr.set_port(port);
            self.bind_addr = Some(addr.to_string());
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database_url = Some(url);
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.jwt_secret = Some(secret);
        }
        if let Some(hours) = lookup("SESSION_TTL_HOURS") {
            self.session_ttl_hours = Some(parse_number("SESSION_TTL_HOURS", &hours)?);
        }
        if let Some(origins) = lookup("CORS_ORIGINS") {
            self.cors_origins = Some(
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(str::to_string)
                    .collect(),
            );
        }
        if let Some(capacity) = lookup("ROOM_CAPACITY") {
            self.room_capacity = Some(parse_number("ROOM_CAPACITY", &capacity)?);
        }
        if let Some(secs) = lookup("ROOM_CLEANUP_SECS") {
            self.cleanup_interval_secs = Some(parse_number("ROOM_CLEANUP_SECS", &secs)?);
        }
        if let Some(cost) = lookup("BCRYPT_COST") {
            self.password_cost = Some(parse_number("BCRYPT_COST", &cost)?);
        }
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let bind_addr = parse_addr(self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR))?;
        let config = AppConfig {
            bind_addr,
            database_url: self.database_url.unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            jwt_secret: self.jwt_secret.unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string()),
            session_ttl_hours: self.session_ttl_hours.unwrap_or(DEFAULT_SESSION_TTL_HOURS),
            cors_origins: self.cors_origins.unwrap_or_default(),
            room_capacity: self.room_capacity.unwrap_or(DEFAULT_ROOM_CAPACITY),
            cleanup_interval_secs: self.cleanup_interval_secs.unwrap_or(DEFAULT_CLEANUP_INTERVAL_SECS),
            password_cost: self.password_cost.unwrap_or(DEFAULT_PASSWORD_COST),
        };
        config.validate()?;
        Ok(config)
    }
}

fn parse_addr(value: &str) -> Result<SocketAddr, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: "bind_addr",
        message: format!("'{}' is not a socket address", value),
    })
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        message: format!("'{}' is not a valid number", value),
    })
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
