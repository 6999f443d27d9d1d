//! Graph application configuration
//!
//! Configuration is resolved in this order:
//! 1. Environment variables
//! 2. graph-gateway.toml config file
//!
//! Inside the config file, `${VAR_NAME}` strings expand to environment
//! variables. App credentials are required; a config without `app_id` or
//! `app_secret` fails at load/construction time.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{GraphError, Result};

/// Application identity and OAuth settings for a Graph session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Graph app ID
    pub app_id: String,

    /// Graph app secret
    pub app_secret: String,

    /// Redirect URI after login
    pub redirect_url: String,

    /// Permission scope requested at login
    #[serde(default)]
    pub scope: Vec<String>,
}

impl GraphConfig {
    /// Build a config in code. Scope starts empty.
    pub fn new(
        app_id: impl Into<String>,
        app_secret: impl Into<String>,
        redirect_url: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            redirect_url: redirect_url.into(),
            scope: Vec::new(),
        }
    }

    /// Replace the permission scope.
    pub fn with_scope(mut self, scope: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.scope = scope.into_iter().map(Into::into).collect();
        self
    }

    /// App credentials are required; everything else may stay empty.
    pub(crate) fn ensure_credentials(&self) -> Result<()> {
        if self.app_id.trim().is_empty() {
            return Err(GraphError::Config("app_id is not set".to_string()));
        }
        if self.app_secret.trim().is_empty() {
            return Err(GraphError::Config("app_secret is not set".to_string()));
        }
        Ok(())
    }

    /// Expand `${VAR_NAME}` occurrences to environment variable values.
    /// Unknown variables expand to the empty string.
    fn expand_env_vars(value: &str) -> String {
        let mut result = String::new();
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next();

                let mut var_name = String::new();
                while let Some(&c) = chars.peek() {
                    if c == '}' {
                        chars.next();
                        break;
                    }
                    var_name.push(chars.next().unwrap());
                }

                if let Ok(env_value) = std::env::var(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// Load configuration from a TOML file.
    ///
    /// `${VAR_NAME}` inside the file is replaced with the environment
    /// variable's value, and explicit `GRAPH_*` environment variables win
    /// over file values.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let toml_content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| GraphError::Config(format!("failed to read config file: {}", e)))?;

        let expanded = Self::expand_env_vars(&toml_content);

        let toml_config: TomlConfig = toml::from_str(&expanded)
            .map_err(|e| GraphError::Config(format!("failed to parse TOML: {}", e)))?;

        let mut config = Self::from_toml_config(toml_config);
        config.apply_env_overrides();
        config.ensure_credentials()?;

        Ok(config)
    }

    /// Load from the default path, falling back to environment variables.
    ///
    /// Looks for `./graph-gateway.toml`; without it, all settings must come
    /// from the environment.
    pub fn load() -> Result<Self> {
        if Path::new("graph-gateway.toml").exists() {
            return Self::from_toml_file("graph-gateway.toml");
        }

        Self::from_env()
    }

    fn from_toml_config(toml_config: TomlConfig) -> Self {
        let app = toml_config.app.unwrap_or_default();

        Self {
            app_id: app.id.unwrap_or_default(),
            app_secret: app.secret.unwrap_or_default(),
            redirect_url: app.redirect_url.unwrap_or_default(),
            scope: app.scope.unwrap_or_default(),
        }
    }

    /// Explicit environment variables win over file values.
    fn apply_env_overrides(&mut self) {
        if let Ok(app_id) = std::env::var("GRAPH_APP_ID") {
            self.app_id = app_id;
        }
        if let Ok(app_secret) = std::env::var("GRAPH_APP_SECRET") {
            self.app_secret = app_secret;
        }
        if let Ok(redirect_url) = std::env::var("GRAPH_REDIRECT_URL") {
            self.redirect_url = redirect_url;
        }
        if let Ok(scope) = std::env::var("GRAPH_SCOPE") {
            self.scope = scope.split(',').map(|s| s.trim().to_string()).collect();
        }
    }

    /// Load configuration from environment variables only.
    pub fn from_env() -> Result<Self> {
        let app_id = std::env::var("GRAPH_APP_ID")
            .map_err(|_| GraphError::Config("GRAPH_APP_ID not set".to_string()))?;
        let app_secret = std::env::var("GRAPH_APP_SECRET")
            .map_err(|_| GraphError::Config("GRAPH_APP_SECRET not set".to_string()))?;

        let config = Self {
            app_id,
            app_secret,
            redirect_url: std::env::var("GRAPH_REDIRECT_URL").unwrap_or_default(),
            scope: std::env::var("GRAPH_SCOPE")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_default(),
        };

        config.ensure_credentials()?;
        Ok(config)
    }
}

// ============================================================================
// TOML structures (file parsing only)
// ============================================================================

#[derive(Debug, Deserialize)]
struct TomlConfig {
    app: Option<TomlAppConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlAppConfig {
    id: Option<String>,
    secret: Option<String>,
    redirect_url: Option<String>,
    scope: Option<Vec<String>>,
}
