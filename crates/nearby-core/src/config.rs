use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::{ConfigError, PlacesError};

/// Environment variable that overrides `places.api_key`.
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

const DEFAULT_PLACES_BASE_URL: &str = "https://places.googleapis.com/v1";
const DEFAULT_GEOCODE_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Places provider credential.
///
/// Never printed in full; `Debug` shows only a redacted marker.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a credential, rejecting blank values.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Upstream places provider settings
    #[serde(default)]
    pub places: PlacesConfig,

    /// Deadlines applied by the front end
    #[serde(default)]
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesConfig {
    /// Provider API key (overridden by `GOOGLE_API_KEY`)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the Places API (nearby search and details)
    #[serde(default = "default_places_base_url")]
    pub places_base_url: String,

    /// Base URL of the Geocoding API
    #[serde(default = "default_geocode_base_url")]
    pub geocode_base_url: String,

    /// Region bias for geocoding (ccTLD, e.g. "us")
    #[serde(default = "default_region")]
    pub region: String,
}

fn default_places_base_url() -> String {
    DEFAULT_PLACES_BASE_URL.to_string()
}

fn default_geocode_base_url() -> String {
    DEFAULT_GEOCODE_BASE_URL.to_string()
}

fn default_region() -> String {
    "us".to_string()
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            places_base_url: default_places_base_url(),
            geocode_base_url: default_geocode_base_url(),
            region: default_region(),
        }
    }
}

impl PlacesConfig {
    /// The configured credential, or `PlacesError::Configuration` when it is unset
    /// or still a `YOUR_...` placeholder.
    pub fn api_key(&self) -> Result<ApiKey, PlacesError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().starts_with("YOUR_"))
            .and_then(ApiKey::new)
            .ok_or_else(|| {
                PlacesError::Configuration(format!(
                    "places.api_key is not set (or export {})",
                    API_KEY_ENV
                ))
            })
    }

    /// Check if a credential is configured (not a placeholder)
    pub fn is_configured(&self) -> bool {
        self.api_key().is_ok()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Deadline for one whole command, every upstream call included, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nearby");

        Self {
            config_dir,
            places: PlacesConfig::default(),
            client: ClientConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if missing,
    /// then apply environment overrides.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        let config = Self::load_from(&config_path)?;
        Ok(config.with_api_key_override(std::env::var(API_KEY_ENV).ok()))
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;

        let config: Config =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Replace the configured key when an override value is present and non-blank.
    pub fn with_api_key_override(mut self, value: Option<String>) -> Self {
        if let Some(key) = value.filter(|v| !v.trim().is_empty()) {
            self.places.api_key = Some(key);
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(
            &self.places.places_base_url,
            "places.places_base_url",
            &mut result,
        );
        self.validate_url(
            &self.places.geocode_base_url,
            "places.geocode_base_url",
            &mut result,
        );

        if !self.places.is_configured() {
            result.add_warning(
                "places.api_key",
                format!("API key not configured - set it here or export {}", API_KEY_ENV),
            );
        }

        let region = &self.places.region;
        if region.len() != 2 || !region.chars().all(|c| c.is_ascii_alphabetic()) {
            result.add_warning(
                "places.region",
                format!("Region bias should be a two-letter code, got: {}", region),
            );
        }

        if self.client.request_timeout_secs == 0 {
            result.add_error(
                "client.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        } else if self.client.request_timeout_secs > 300 {
            result.add_warning(
                "client.request_timeout_secs",
                "Request timeout is unusually long (>300s)",
            );
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("nearby");

        Ok(config_dir.join("config.toml"))
    }
}
