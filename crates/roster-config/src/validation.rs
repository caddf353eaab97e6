//! Configuration validation module.
//!
//! Collects every problem in one pass so startup fails with the full list
//! instead of one error at a time.

use crate::{AppConfig, DatabaseConfig, ObservabilityConfig, SecurityConfig, ServerConfig};
use std::fmt;
use url::Url;

/// Configuration validation error variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// Port number is invalid (must be 1-65535).
    InvalidPort { value: u16 },
    /// Pool size configuration is invalid (min must be <= max).
    InvalidPoolSize { min: u32, max: u32 },
    /// Pool size exceeds maximum allowed.
    PoolSizeTooLarge { value: u32, maximum: u32 },
    /// URL format is invalid.
    InvalidUrl { url_type: String, message: String },
    /// Timeout value must be positive.
    NonPositiveTimeout { name: String },
    /// Password hash cost is invalid.
    InvalidHashCost { value: u32, minimum: u32, maximum: u32 },
    /// Log level is invalid.
    InvalidLogLevel { value: String },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPort { value } => {
                write!(f, "Invalid server port: {value} (must be 1-65535)")
            }
            Self::InvalidPoolSize { min, max } => {
                write!(
                    f,
                    "Invalid pool size: min ({min}) cannot be greater than max ({max})"
                )
            }
            Self::PoolSizeTooLarge { value, maximum } => {
                write!(f, "Pool size {value} exceeds maximum allowed ({maximum})")
            }
            Self::InvalidUrl { url_type, message } => {
                write!(f, "Invalid {url_type} URL: {message}")
            }
            Self::NonPositiveTimeout { name } => {
                write!(f, "Timeout '{name}' must be positive")
            }
            Self::InvalidHashCost {
                value,
                minimum,
                maximum,
            } => {
                write!(
                    f,
                    "Invalid password hash cost: {value} (must be between {minimum} and {maximum})"
                )
            }
            Self::InvalidLogLevel { value } => {
                write!(
                    f,
                    "Invalid log level: '{value}' (valid: trace, debug, info, warn, error)"
                )
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Maximum connection pool size.
    const MAX_POOL_SIZE: u32 = 1000;
    /// Minimum Argon2 memory cost in MiB.
    const MIN_HASH_COST: u32 = 1;
    /// Maximum Argon2 memory cost in MiB.
    const MAX_HASH_COST: u32 = 1024;
    /// Valid log levels.
    const VALID_LOG_LEVELS: &'static [&'static str] = &["trace", "debug", "info", "warn", "error"];

    /// Validates the entire application configuration.
    ///
    /// Returns Ok(()) if valid, or Err with all validation errors found.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        Self::validate_server(&config.server, &mut errors);
        Self::validate_database(&config.database, &mut errors);
        Self::validate_security(&config.security, &mut errors);
        Self::validate_observability(&config.observability, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_server(config: &ServerConfig, errors: &mut Vec<ConfigValidationError>) {
        // 0 is invalid for binding
        if config.port == 0 {
            errors.push(ConfigValidationError::InvalidPort { value: config.port });
        }
    }

    fn validate_database(config: &DatabaseConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.url.is_empty() {
            errors.push(ConfigValidationError::InvalidUrl {
                url_type: "database".to_string(),
                message: "URL cannot be empty".to_string(),
            });
        } else {
            match Url::parse(&config.url) {
                Ok(url) if url.scheme() == "mysql" => {}
                Ok(url) => errors.push(ConfigValidationError::InvalidUrl {
                    url_type: "database".to_string(),
                    message: format!("unsupported scheme '{}', expected mysql://", url.scheme()),
                }),
                Err(e) => errors.push(ConfigValidationError::InvalidUrl {
                    url_type: "database".to_string(),
                    message: e.to_string(),
                }),
            }
        }

        if config.min_connections > config.max_connections {
            errors.push(ConfigValidationError::InvalidPoolSize {
                min: config.min_connections,
                max: config.max_connections,
            });
        }
        if config.max_connections > Self::MAX_POOL_SIZE {
            errors.push(ConfigValidationError::PoolSizeTooLarge {
                value: config.max_connections,
                maximum: Self::MAX_POOL_SIZE,
            });
        }

        if config.connect_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "database.connect_timeout_secs".to_string(),
            });
        }
        if config.idle_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "database.idle_timeout_secs".to_string(),
            });
        }
    }

    fn validate_security(config: &SecurityConfig, errors: &mut Vec<ConfigValidationError>) {
        if !(Self::MIN_HASH_COST..=Self::MAX_HASH_COST).contains(&config.password_hash_cost) {
            errors.push(ConfigValidationError::InvalidHashCost {
                value: config.password_hash_cost,
                minimum: Self::MIN_HASH_COST,
                maximum: Self::MAX_HASH_COST,
            });
        }
    }

    fn validate_observability(
        config: &ObservabilityConfig,
        errors: &mut Vec<ConfigValidationError>,
    ) {
        // Bare levels are checked; full EnvFilter directives are left to the subscriber.
        let level = config.log_level.to_lowercase();
        let is_directive = level.contains('=') || level.contains(',');
        if !is_directive && !Self::VALID_LOG_LEVELS.contains(&level.as_str()) {
            errors.push(ConfigValidationError::InvalidLogLevel {
                value: config.log_level.clone(),
            });
        }
    }
}
