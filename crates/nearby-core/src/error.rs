//! Centralized error types for the Nearby application.
//!
//! This module provides a typed error hierarchy that:
//! - Enables precise error handling throughout the codebase
//! - Provides user-friendly messages suitable for display
//! - Preserves full error context for debugging/logging

use thiserror::Error;

/// Top-level application error type.
///
/// Use `user_message()` to get a display-appropriate message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Places error: {0}")]
    Places(#[from] PlacesError),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Recover a typed configuration error from an `anyhow` chain, if that is
    /// what it carries.
    pub fn from_anyhow(err: anyhow::Error) -> Self {
        match err.downcast::<ConfigError>() {
            Ok(config_err) => AppError::Config(config_err),
            Err(other) => AppError::Other(other),
        }
    }

    /// Returns a user-friendly message suitable for display.
    ///
    /// These messages are designed to be actionable and non-technical.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Config(e) => e.user_message(),
            AppError::Places(e) => e.user_message(),
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }
}

/// Errors surfaced by the nearby-search pipeline and its upstream clients.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Caller-supplied data failed a precondition (empty postal code, bad coordinate).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A required setting, typically the API credential, is absent.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The provider could not be reached.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("Upstream error: {status} - {details}")]
    Upstream {
        status: u16,
        details: serde_json::Value,
    },

    /// The provider succeeded but had nothing matching.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl PlacesError {
    /// Build an `Upstream` error from a raw response body, keeping the provider's
    /// JSON payload when it parses and the plain text otherwise.
    pub fn upstream(status: u16, body: &str) -> Self {
        let details = serde_json::from_str(body)
            .unwrap_or_else(|_| serde_json::Value::String(body.to_string()));
        PlacesError::Upstream { status, details }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            PlacesError::InvalidInput(_) => "Please check your input and try again.",
            PlacesError::Configuration(_) => {
                "The places API key is not set. Check your settings."
            }
            PlacesError::UpstreamUnavailable(_) => {
                "Unable to reach the places service. Check your internet connection."
            }
            PlacesError::Upstream { status, .. } if *status >= 500 => {
                "The places service is experiencing issues. Please try again later."
            }
            PlacesError::Upstream { .. } => "The places service rejected the request.",
            PlacesError::NotFound(_) => "Nothing was found for that search.",
        }
    }

    /// HTTP status a serving layer should answer with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            PlacesError::InvalidInput(_) => 400,
            PlacesError::Configuration(_) => 500,
            PlacesError::UpstreamUnavailable(_) => 503,
            PlacesError::Upstream { .. } => 502,
            PlacesError::NotFound(_) => 404,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }
}
