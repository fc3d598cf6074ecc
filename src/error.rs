// src/error.rs

//! Unified error handling for the blog front end.

use std::fmt;

use thiserror::Error;

/// Result type alias for blog operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Content source answered with a non-success status
    #[error("HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Embedded payload could not be extracted or decoded
    #[error("Payload error: {0}")]
    Payload(String),

    /// Draft generation failed
    #[error("Generation failed: {0}")]
    Generation(String),

    /// Translation failed
    #[error("Translation failed for '{language}': {message}")]
    Translation { language: String, message: String },

    /// Login rejected
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Requested post does not exist
    #[error("Post not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a payload error.
    pub fn payload(message: impl fmt::Display) -> Self {
        Self::Payload(message.to_string())
    }

    /// Create a generation error.
    pub fn generation(message: impl fmt::Display) -> Self {
        Self::Generation(message.to_string())
    }

    /// Create a translation error for a target language.
    pub fn translation(language: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Translation {
            language: language.into(),
            message: message.to_string(),
        }
    }

    /// Create a not-found error for a post id.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    /// Whether the error came from the transport or the payload, i.e. the
    /// kind a refresh loop swallows and retries on the next tick.
    pub fn is_refresh_error(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Status { .. } | Self::Json(_) | Self::Payload(_) | Self::Url(_)
        )
    }
}
