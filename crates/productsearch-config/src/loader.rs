//! Configuration loader with layered sources.

use crate::{AppConfig, Stage};
use config::{Config, ConfigError, Environment, File, FileFormat};
use productsearch_core::ProductSearchError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Prefix of environment variable overrides.
pub const ENV_PREFIX: &str = "PRODUCTSEARCH";

/// Configuration loader with runtime refresh support.
#[derive(Clone)]
pub struct ConfigLoader {
    config: Arc<RwLock<AppConfig>>,
    config_dir: PathBuf,
    stage: Stage,
}

impl ConfigLoader {
    /// Creates a new configuration loader for the stage named by
    /// `PRODUCTSEARCH_STAGE`.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{stage}.toml` - Stage-specific overrides
    /// 3. `config/local.toml` - Local overrides
    /// 4. Environment variables with `PRODUCTSEARCH__` prefix
    ///
    /// # Errors
    ///
    /// Fails when a present file is malformed or the merged values are invalid.
    pub fn new(config_dir: impl Into<PathBuf>) -> Result<Self, ProductSearchError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }
        Self::with_stage(config_dir, Stage::from_env())
    }

    /// Creates a loader for an explicit stage.
    ///
    /// # Errors
    ///
    /// Fails when a present file is malformed or the merged values are invalid.
    pub fn with_stage(
        config_dir: impl Into<PathBuf>,
        stage: Stage,
    ) -> Result<Self, ProductSearchError> {
        let config_dir = config_dir.into();
        let config = Self::load_config(&config_dir, &stage)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_dir,
            stage,
        })
    }

    /// Loads configuration from the default location (`./config`).
    ///
    /// # Errors
    ///
    /// See [`ConfigLoader::new`].
    pub fn from_default_location() -> Result<Self, ProductSearchError> {
        Self::new("./config")
    }

    /// Returns the stage this loader reads.
    #[must_use]
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Returns the current configuration.
    pub async fn get(&self) -> AppConfig {
        self.config.read().await.clone()
    }

    /// Reloads the configuration from disk.
    ///
    /// The previous configuration stays in place when loading fails.
    ///
    /// # Errors
    ///
    /// See [`ConfigLoader::new`].
    pub async fn reload(&self) -> Result<(), ProductSearchError> {
        let new_config = Self::load_config(&self.config_dir, &self.stage)?;
        let mut config = self.config.write().await;
        *config = new_config;
        info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Gets a specific configuration value by dotted key path.
    pub async fn get_value<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let config = self.config.read().await;
        let json = serde_json::to_value(&*config).ok()?;

        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }

        serde_json::from_value(current.clone()).ok()
    }

    fn load_config(config_dir: &Path, stage: &Stage) -> Result<AppConfig, ProductSearchError> {
        info!("Loading configuration for stage: {}", stage);

        let mut builder = Config::builder();

        let default_path = config_dir.join("default.toml");
        if default_path.exists() {
            debug!("Loading default config from: {}", default_path.display());
            builder = builder.add_source(toml_file(&default_path));
        } else {
            warn!(
                "No default configuration at {}, continuing with built-in defaults",
                default_path.display()
            );
        }

        let stage_path = config_dir.join(stage.file_name());
        if stage_path.exists() {
            debug!("Loading stage config from: {}", stage_path.display());
            builder = builder.add_source(toml_file(&stage_path));
        } else {
            info!("No configuration for stage {} at {}", stage, stage_path.display());
        }

        // Not committed to version control
        let local_path = config_dir.join("local.toml");
        if local_path.exists() {
            debug!("Loading local config from: {}", local_path.display());
            builder = builder.add_source(toml_file(&local_path));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .set_override("app.stage", stage.as_str())
            .map_err(config_error_to_product_search_error)?
            .build()
            .map_err(config_error_to_product_search_error)?;

        let app_config: AppConfig = config
            .try_deserialize()
            .map_err(config_error_to_product_search_error)?;

        app_config.validate()?;

        debug!(
            "Configuration loaded: rest={}, database scheme={}",
            app_config.server.rest_addr(),
            app_config.database.scheme().unwrap_or_default()
        );

        Ok(app_config)
    }
}

fn toml_file(path: &Path) -> File<config::FileSourceFile, FileFormat> {
    File::from(path).format(FileFormat::Toml).required(true)
}

fn config_error_to_product_search_error(err: ConfigError) -> ProductSearchError {
    ProductSearchError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[tokio::test]
    async fn test_missing_directory_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ConfigLoader::with_stage(dir.path().join("absent"), Stage::new("test")).unwrap();

        let config = loader.get().await;
        assert_eq!(config.server.rest_host, "0.0.0.0");
        assert_eq!(config.app.stage.as_str(), "test");
    }

    #[tokio::test]
    async fn test_stage_file_overrides_default() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "default.toml",
            "[server]\nrest_host = \"127.0.0.1\"\nrest_port = 8081\n\n[database]\nurl = \"sqlite::memory:\"\nmax_connections = 1\n",
        );
        write(dir.path(), "qa.toml", "[server]\nrest_port = 9191\n");

        let loader = ConfigLoader::with_stage(dir.path(), Stage::new("qa")).unwrap();
        let config = loader.get().await;

        assert_eq!(config.server.rest_host, "127.0.0.1");
        assert_eq!(config.server.rest_port, 9191);
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.app.stage.as_str(), "qa");
    }

    #[tokio::test]
    async fn test_local_file_wins_over_stage_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "qa.toml", "[observability]\nlog_level = \"debug\"\n");
        write(dir.path(), "local.toml", "[observability]\nlog_level = \"trace\"\n");

        let loader = ConfigLoader::with_stage(dir.path(), Stage::new("qa")).unwrap();
        assert_eq!(
            loader.get_value::<String>("observability.log_level").await.as_deref(),
            Some("trace")
        );
    }

    #[test]
    fn test_malformed_file_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "default.toml", "[server\nrest_port = ");

        let result = ConfigLoader::with_stage(dir.path(), Stage::new("qa"));
        assert!(matches!(result, Err(ProductSearchError::Configuration(_))));
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "default.toml", "[database]\nurl = \"postgres://localhost/db\"\n");

        let result = ConfigLoader::with_stage(dir.path(), Stage::new("qa"));
        assert!(matches!(result, Err(ProductSearchError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_reload_picks_up_changes() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "default.toml", "[server]\nrest_port = 8081\n");

        let loader = ConfigLoader::with_stage(dir.path(), Stage::new("qa")).unwrap();
        assert_eq!(loader.get().await.server.rest_port, 8081);

        write(dir.path(), "default.toml", "[server]\nrest_port = 8082\n");
        loader.reload().await.unwrap();
        assert_eq!(loader.get().await.server.rest_port, 8082);
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_config() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "default.toml", "[server]\nrest_port = 8081\n");

        let loader = ConfigLoader::with_stage(dir.path(), Stage::new("qa")).unwrap();
        write(dir.path(), "default.toml", "not = [valid");

        assert!(loader.reload().await.is_err());
        assert_eq!(loader.get().await.server.rest_port, 8081);
    }

    #[tokio::test]
    async fn test_get_value_unknown_path() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ConfigLoader::with_stage(dir.path(), Stage::new("qa")).unwrap();
        assert!(loader.get_value::<String>("server.nope").await.is_none());
    }
}
