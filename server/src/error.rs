//! Error types for the server.

use std::path::PathBuf;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use filemod_worker::{QueueError, ScanError};
use thiserror::Error;

/// Errors loading or validating the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// None of the search paths held a config file.
    #[error("no config file found (searched {searched:?})")]
    NotFound { searched: Vec<PathBuf> },

    /// The config file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid YAML for [`crate::config::Config`].
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors returned by HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request was missing something it needs.
    #[error("{0}")]
    BadRequest(String),

    /// The command queue rejected a command.
    #[error("failed to enqueue commands: {0}")]
    Queue(#[from] QueueError),

    /// An on-demand scan failed.
    #[error("failed to get file stats: {0}")]
    Scan(#[from] ScanError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Queue(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Scan(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(serde_json::json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
