//! HTTP transport for the Graph API
//!
//! The facade depends only on the minimal `Transport` contract: one
//! (method, path, params, token) request in, one raw JSON payload out.
//! Production traffic goes through the reqwest-backed `HttpTransport`;
//! tests substitute an in-memory mock.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, error};

use crate::error::{GraphError, Result};

/// Graph API base URL
pub const GRAPH_API_URL: &str = "https://graph.facebook.com/v18.0";

/// Flat request parameter mapping, serialized as query or form fields.
pub type Params = BTreeMap<String, String>;

/// Minimal request/response channel the facade talks through.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue one request with the given access token. Single attempt, no
    /// retries; the bound token is appended when non-empty.
    async fn send(
        &self,
        method: Method,
        path: &str,
        params: &Params,
        token: &str,
    ) -> Result<Value>;
}

/// reqwest-backed Graph API transport
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport against the production Graph API endpoint.
    pub fn new() -> Result<Self> {
        Self::with_base_url(GRAPH_API_URL)
    }

    /// Create a transport against a custom base URL (staging endpoints).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        method: Method,
        path: &str,
        params: &Params,
        token: &str,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);

        debug!("Graph request: {} {}", method, path);

        let mut request = if method == Method::POST {
            self.client.post(&url).form(params)
        } else {
            self.client.get(&url).query(params)
        };

        if !token.is_empty() {
            request = request.query(&[("access_token", token)]);
        }

        let response = request.send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!("Graph API error: {} - {}", status, body);
            return Err(GraphError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(Into::into)
    }
}

/// Pull the human-readable message out of a Graph error envelope, falling
/// back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")?
                .get("message")?
                .as_str()
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}
