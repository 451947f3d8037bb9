// Configuration management

use crate::core::errors::AdminError;
use std::env;
use std::fmt;

/// Application configuration loaded from environment variables
///
/// Loaded once at start-up and validated with clear error messages.
#[derive(Clone)]
pub struct Config {
    // Server configuration
    pub bind_address: String,
    pub port: u16,

    // Supabase project
    pub supabase_url: String,
    pub service_role_key: String,

    // Direct Postgres access for profiles (optional)
    pub database_url: Option<String>,

    // Upstream and middleware configuration
    pub upstream_timeout_secs: u64,
    pub body_size_limit_bytes: usize,

    // Logging configuration
    pub log_level: String,
    pub log_format: String, // "json" or "text"
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("port", &self.port)
            .field("supabase_url", &self.supabase_url)
            .field("service_role_key", &"<REDACTED>")
            .field("database_url", &self.database_url.as_ref().map(|_| "<REDACTED>"))
            .field("upstream_timeout_secs", &self.upstream_timeout_secs)
            .field("body_size_limit_bytes", &self.body_size_limit_bytes)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Supports `.env` file loading in development (via dotenv crate).
    pub fn from_env() -> Result<Self, AdminError> {
        // Load .env file if present (development)
        #[cfg(not(test))]
        {
            dotenv::dotenv().ok(); // Ignore errors (file may not exist)
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AdminError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let config = Self {
            bind_address: get("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: Self::parse_port(get("PORT").as_deref())?,
            supabase_url: Self::required(get("SUPABASE_URL"), "SUPABASE_URL")?
                .trim_end_matches('/')
                .to_string(),
            service_role_key: Self::required(
                get("SUPABASE_SERVICE_ROLE_KEY"),
                "SUPABASE_SERVICE_ROLE_KEY",
            )?,
            database_url: get("DATABASE_URL"),
            upstream_timeout_secs: Self::parse_positive(
                get("UPSTREAM_TIMEOUT_SECS").as_deref(),
                "UPSTREAM_TIMEOUT_SECS",
                10,
            )?,
            body_size_limit_bytes: Self::parse_positive(
                get("BODY_SIZE_LIMIT_BYTES").as_deref(),
                "BODY_SIZE_LIMIT_BYTES",
                1024 * 1024,
            )?,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_format: get("LOG_FORMAT").unwrap_or_else(|| "json".to_string()),
        };

        // Post-load validation
        config.validate()?;

        Ok(config)
    }

    fn required(value: Option<String>, key: &str) -> Result<String, AdminError> {
        value.ok_or_else(|| AdminError::ConfigurationError(format!("{} not set", key)))
    }

    /// Parse port, defaulting to 8000
    fn parse_port(value: Option<&str>) -> Result<u16, AdminError> {
        let Some(value) = value else {
            return Ok(8000);
        };
        let port = value.parse::<u16>().map_err(|e| {
            AdminError::ConfigurationError(format!("Invalid PORT value '{}': {}", value, e))
        })?;

        if port == 0 {
            return Err(AdminError::ConfigurationError(
                "PORT must be between 1 and 65535".to_string(),
            ));
        }

        Ok(port)
    }

    /// Parse a number that must be greater than zero
    fn parse_positive<T>(value: Option<&str>, key: &str, default: T) -> Result<T, AdminError>
    where
        T: std::str::FromStr + PartialEq + Default,
        T::Err: fmt::Display,
    {
        let Some(value) = value else {
            return Ok(default);
        };
        let parsed = value.parse::<T>().map_err(|e| {
            AdminError::ConfigurationError(format!("Invalid {} value '{}': {}", key, value, e))
        })?;

        if parsed == T::default() {
            return Err(AdminError::ConfigurationError(format!(
                "{} must be greater than 0",
                key
            )));
        }

        Ok(parsed)
    }

    /// Validate all configuration values
    fn validate(&self) -> Result<(), AdminError> {
        Self::validate_url(&self.supabase_url, "Supabase")?;
        if let Some(ref url) = self.database_url {
            Self::validate_url(url, "Database")?;
        }
        Self::validate_log_level(&self.log_level)?;
        Self::validate_log_format(&self.log_format)?;
        Ok(())
    }

    /// Validate URL format
    fn validate_url(url: &str, description: &str) -> Result<(), AdminError> {
        url::Url::parse(url).map_err(|e| {
            AdminError::ConfigurationError(format!("Invalid {} URL '{}': {}", description, url, e))
        })?;
        Ok(())
    }

    /// Validate log level
    fn validate_log_level(level: &str) -> Result<(), AdminError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&level.to_lowercase().as_str()) {
            return Err(AdminError::ConfigurationError(format!(
                "Invalid LOG_LEVEL '{}': must be one of {}",
                level,
                valid_levels.join(", ")
            )));
        }
        Ok(())
    }

    /// Validate log format
    fn validate_log_format(format: &str) -> Result<(), AdminError> {
        if format != "json" && format != "text" {
            return Err(AdminError::ConfigurationError(format!(
                "Invalid LOG_FORMAT '{}': must be 'json' or 'text'",
                format
            )));
        }
        Ok(())
    }
}

impl Config {
    /// Create a test configuration for unit tests
    ///
    /// Bypasses environment loading; the URLs point nowhere.
    pub fn test_config() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8000,
            supabase_url: "http://localhost:54321".to_string(),
            service_role_key: "test-service-role-key".to_string(),
            database_url: None,
            upstream_timeout_secs: 5,
            body_size_limit_bytes: 64 * 1024,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }
}
