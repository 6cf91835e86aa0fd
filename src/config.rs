//! Configuration management for the Folio client

use config::{Config, Environment, File};
use serde::Deserialize;
use std::env;
use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::models::EntityKind;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    /// Root URL for every collection endpoint
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

/// Per entity kind endpoint settings
#[derive(Debug, Deserialize, Clone, Default)]
pub struct EntityConfig {
    /// Path below `api.base_url`, defaults to the kind name
    pub path: Option<String>,
    /// Key wrapping the collection array in list responses (`{"books": [...]}`)
    pub envelope: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub books: EntityConfig,
    #[serde(default)]
    pub authors: EntityConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> AppResult<Self> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // FOLIO_API__BASE_URL, FOLIO_BOOKS__ENVELOPE, ...
            .add_source(
                Environment::with_prefix("FOLIO")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("api.base_url", env::var("API_BASE_URL").ok())?
            .build()?;

        let config: AppConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check values the deserializer cannot
    pub fn validate(&self) -> AppResult<()> {
        let url = reqwest::Url::parse(&self.api.base_url).map_err(|e| {
            AppError::Validation(format!("Invalid api.base_url '{}': {}", self.api.base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::Validation(format!(
                "api.base_url must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::Validation(
                "api.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn entity(&self, kind: EntityKind) -> &EntityConfig {
        match kind {
            EntityKind::Books => &self.books,
            EntityKind::Authors => &self.authors,
        }
    }

    /// Fully qualified collection endpoint for a kind
    pub fn endpoint(&self, kind: EntityKind) -> String {
        let path = self.entity(kind).path.as_deref().unwrap_or(kind.as_str());
        self.api.endpoint(path)
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout_secs: 10,
            user_agent: format!("folio-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
