//! Graph session management
//!
//! A `GraphSession` owns the app configuration and the transport, binds a
//! user access token via `validate`, and dispatches all requests with it.
//! Hydrated entities keep a weak `SessionHandle` back to the session that
//! produced them, so they stay usable exactly as long as the session lives.

use std::fmt;
use std::sync::{Arc, Weak};

use chrono::{DateTime, Duration, Utc};
use reqwest::{Method, Url};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::GraphConfig;
use crate::error::{GraphError, Result};
use crate::graph::GraphObject;
use crate::transport::{HttpTransport, Params, Transport};

/// OAuth login dialog URL
const OAUTH_DIALOG_URL: &str = "https://www.facebook.com/v18.0/dialog/oauth";

pub(crate) struct SessionInner {
    config: GraphConfig,
    transport: Box<dyn Transport>,
    token: RwLock<Option<String>>,
}

/// An authenticated Graph API session.
///
/// One session per logical caller: `validate` is the only mutation, every
/// other operation reads the bound token. Cloning is cheap and shares the
/// same underlying session.
#[derive(Clone)]
pub struct GraphSession {
    inner: Arc<SessionInner>,
}

/// A user access token returned by the OAuth code exchange.
#[derive(Debug, Clone)]
pub struct AccessToken {
    token: String,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.token
    }

    /// Expiry instant, when the exchange response carried one.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}

/// Shape of the `/oauth/access_token` exchange response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl GraphSession {
    /// Create a session backed by the production HTTP transport.
    ///
    /// Fails when the config is missing app credentials.
    pub fn new(config: GraphConfig) -> Result<Self> {
        let transport = HttpTransport::new()?;
        Self::with_transport(config, Box::new(transport))
    }

    /// Create a session over a custom transport.
    pub fn with_transport(config: GraphConfig, transport: Box<dyn Transport>) -> Result<Self> {
        config.ensure_credentials()?;

        Ok(Self {
            inner: Arc::new(SessionInner {
                config,
                transport,
                token: RwLock::new(None),
            }),
        })
    }

    /// Bind `token` to this session and verify it against the API.
    ///
    /// Invalid, expired or rejected tokens come back as `false` — never as
    /// an error — so callers can fall through to the login flow. A failed
    /// validation leaves the session unbound.
    pub async fn validate(&self, token: &str) -> bool {
        if token.trim().is_empty() {
            debug!("rejecting empty access token");
            return false;
        }

        let probe = self
            .inner
            .transport
            .send(Method::GET, "/me", &Params::new(), token)
            .await;

        match probe {
            Ok(_) => {
                *self.inner.token.write().await = Some(token.to_string());
                info!("access token validated");
                true
            }
            Err(err) => {
                warn!("access token rejected: {}", err);
                *self.inner.token.write().await = None;
                false
            }
        }
    }

    /// Login URL for the OAuth redirect flow.
    ///
    /// Pure function of the app identity, redirect URL and configured scope;
    /// no network call.
    pub fn login_url(&self) -> Result<Url> {
        let config = &self.inner.config;

        Url::parse_with_params(
            OAUTH_DIALOG_URL,
            &[
                ("client_id", config.app_id.as_str()),
                ("redirect_uri", config.redirect_url.as_str()),
                ("response_type", "code"),
                ("scope", config.scope.join(",").as_str()),
            ],
        )
        .map_err(|e| GraphError::Config(format!("invalid login URL: {}", e)))
    }

    /// Exchange the redirect callback's query parameters for an access token.
    ///
    /// Returns `Ok(None)` when the redirect carried no authorization code —
    /// the user denied the dialog or hit the callback directly.
    pub async fn access_token_from_redirect(
        &self,
        query: &Params,
    ) -> Result<Option<AccessToken>> {
        if query.contains_key("error") {
            debug!("redirect carried an error, no token to exchange");
            return Ok(None);
        }
        let Some(code) = query.get("code") else {
            return Ok(None);
        };

        let config = &self.inner.config;
        let mut params = Params::new();
        params.insert("client_id".to_string(), config.app_id.clone());
        params.insert("client_secret".to_string(), config.app_secret.clone());
        params.insert("redirect_uri".to_string(), config.redirect_url.clone());
        params.insert("code".to_string(), code.clone());

        let value = self
            .inner
            .transport
            .send(Method::GET, "/oauth/access_token", &params, "")
            .await?;

        let response: TokenResponse = GraphObject::from_value(value)?.cast()?;
        let expires_at = response
            .expires_in
            .map(|seconds| Utc::now() + Duration::seconds(seconds));

        info!("exchanged authorization code for access token");

        Ok(Some(AccessToken {
            token: response.access_token,
            expires_at,
        }))
    }

    /// Dispatch one request with the bound token.
    ///
    /// Calling this before a successful `validate` is a programmer error;
    /// it fails before any network I/O. Transport and API failures pass
    /// through unchanged — single attempt, no retries.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        params: Option<Params>,
    ) -> Result<GraphObject> {
        let token = self
            .inner
            .token
            .read()
            .await
            .clone()
            .ok_or_else(|| {
                GraphError::Auth("no validated access token bound to this session".to_string())
            })?;

        debug!("dispatching {} {}", method, path);

        let value = self
            .inner
            .transport
            .send(method, path, &params.unwrap_or_default(), &token)
            .await?;

        GraphObject::from_value(value)
    }

    /// The token currently bound to this session.
    pub async fn token(&self) -> Option<String> {
        self.inner.token.read().await.clone()
    }

    /// Weak capability for hydrated entities to reach back to this session.
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

/// Weak back-reference from a hydrated entity to its owning session.
///
/// Holding a handle never keeps the session alive; `upgrade` fails once the
/// owner is gone.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Weak<SessionInner>,
}

impl SessionHandle {
    /// A handle attached to no session, for caller-constructed entities
    /// (e.g. a friend profile referenced only by id).
    pub fn detached() -> Self {
        Self { inner: Weak::new() }
    }

    /// Reacquire the owning session.
    pub fn upgrade(&self) -> Result<GraphSession> {
        self.inner
            .upgrade()
            .map(|inner| GraphSession { inner })
            .ok_or_else(|| GraphError::Auth("owning session is gone".to_string()))
    }
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionHandle")
    }
}
