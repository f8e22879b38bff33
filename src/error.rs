//! Error types for the Libdesk client

use serde::Deserialize;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("HTTP {status}: {}", message.as_deref().unwrap_or("no error message"))]
    Http {
        status: u16,
        message: Option<String>,
    },

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Error body returned by the library backend
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: Option<String>,
}

impl AppError {
    /// Build an HTTP error from a non-success status and its raw body.
    ///
    /// The `error` field of a JSON body is kept verbatim; anything else
    /// (HTML error pages, empty bodies) leaves the message unset.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.is_empty());
        AppError::Http { status, message }
    }

    /// The backend-provided error message, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            AppError::Http { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Text to show the user: the server message when present, else `fallback`.
    /// Local validation failures carry their own message.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            _ => self.server_message().unwrap_or(fallback).to_string(),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AppError::Timeout(e.to_string())
        } else if e.is_connect() {
            AppError::Connect(e.to_string())
        } else if e.is_decode() {
            AppError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            AppError::Http {
                status: status.as_u16(),
                message: None,
            }
        } else {
            AppError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Decode(e.to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
