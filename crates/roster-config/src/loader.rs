//! Configuration loader with layered sources.

use crate::{AppConfig, ConfigValidator};
use config::{Config, ConfigError, Environment, File};
use roster_core::{RosterError, RosterResult};
use std::path::PathBuf;

/// Environment variable selecting the environment overlay file.
pub const ENVIRONMENT_VAR: &str = "ROSTER_ENVIRONMENT";

/// Prefix for configuration overrides, e.g. `ROSTER__DATABASE__URL`.
pub const ENV_PREFIX: &str = "ROSTER";

/// Configuration loader.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    environment: Option<String>,
}

impl ConfigLoader {
    /// Creates a loader reading from `config_dir`.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Uncommitted local overrides
    /// 4. Environment variables with `ROSTER__` prefix
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            environment: None,
        }
    }

    /// Creates a loader for the default location (`./config`).
    #[must_use]
    pub fn from_default_location() -> Self {
        Self::new("./config")
    }

    /// Pins the environment instead of reading `ROSTER_ENVIRONMENT`.
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Loads and validates the configuration.
    pub fn load(&self) -> RosterResult<AppConfig> {
        // A missing .env file is not an error.
        dotenvy::dotenv().ok();

        let environment = self.environment.clone().unwrap_or_else(|| {
            std::env::var(ENVIRONMENT_VAR).unwrap_or_else(|_| "development".to_string())
        });

        let mut builder = Config::builder();
        for name in ["default", environment.as_str(), "local"] {
            let path = self.config_dir.join(format!("{name}.toml"));
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("server.cors_origins"),
        );

        let mut app_config: AppConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(config_error_to_roster_error)?;
        app_config.app.environment = environment;

        ConfigValidator::validate(&app_config).map_err(|errors| {
            let joined = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            RosterError::Configuration(joined)
        })?;

        Ok(app_config)
    }
}

fn config_error_to_roster_error(err: ConfigError) -> RosterError {
    RosterError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LogFormat;
    use std::fs;

    #[test]
    fn test_missing_directory_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigLoader::new(dir.path().join("absent"))
            .with_environment("test")
            .load()
            .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.app.environment, "test");
    }

    #[test]
    fn test_layers_override_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[server]\nport = 3000\nhost = \"127.0.0.1\"\n\n[observability]\nlog_level = \"debug\"\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("staging.toml"),
            "[server]\nport = 4000\n\n[observability]\nlog_format = \"json\"\n",
        )
        .unwrap();

        let config = ConfigLoader::new(dir.path())
            .with_environment("staging")
            .load()
            .unwrap();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.observability.log_level, "debug");
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[database]\nurl = \"sqlite://roster.db\"\n",
        )
        .unwrap();

        let err = ConfigLoader::new(dir.path())
            .with_environment("test")
            .load()
            .unwrap_err();

        assert!(matches!(err, RosterError::Configuration(ref msg) if msg.contains("database")));
    }
}
