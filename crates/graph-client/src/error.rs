//! Error types for graph-client

use thiserror::Error;

/// graph-client error type
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Graph configuration error: {0}")]
    Config(String),

    #[error("Graph auth error: {0}")]
    Auth(String),

    #[error("{0}")]
    Validation(String),

    #[error("Graph API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Graph API request failed: {0}")]
    Request(String),

    #[error("Invalid Graph payload: {0}")]
    Json(String),
}

impl From<reqwest::Error> for GraphError {
    fn from(err: reqwest::Error) -> Self {
        GraphError::Request(err.to_string())
    }
}

impl From<serde_json::Error> for GraphError {
    fn from(err: serde_json::Error) -> Self {
        GraphError::Json(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, GraphError>;
