//! Connector configuration
//!
//! Loaded from TOML; every field has a default so an empty document is a
//! valid local-development configuration.
//!
//! ```toml
//! base_url = "https://matching.example.com/api"
//! timeout_ms = 15000
//!
//! [endpoints]
//! suggest_content = "ai-diagnosis"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default request timeout
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Connector setup errors
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    /// Config file unreadable
    #[error("failed to read connector config {path}: {source}")]
    Io {
        /// File path
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config TOML malformed
    #[error("invalid connector config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Base URL is not an absolute URL
    #[error("invalid base url {url:?}: {message}")]
    InvalidBaseUrl {
        /// Rejected value
        url: String,
        /// Parser message
        message: String,
    },

    /// HTTP client could not be built
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Paths of the six remote operations, relative to the base URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// suggest-content (POST)
    pub suggest_content: String,
    /// register-project (POST)
    pub register_project: String,
    /// fetch-matching-results (GET, `project_id` query)
    pub matching_results: String,
    /// fetch-localized-researcher-fields (POST)
    pub localized_fields: String,
    /// set-favorite (POST)
    pub favorites: String,
    /// send-offer (POST)
    pub offers: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            suggest_content: "ai-diagnosis".into(),
            register_project: "project-registration".into(),
            matching_results: "matching-results".into(),
            localized_fields: "researchers-en".into(),
            favorites: "favorites".into(),
            offers: "offers".into(),
        }
    }
}

/// HTTP backend settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpBackendConfig {
    /// Service root; endpoint paths are appended to it
    pub base_url: String,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Bearer token sent on every request
    pub bearer_token: Option<String>,
    /// User-Agent header
    pub user_agent: String,
    /// Operation paths
    pub endpoints: Endpoints,
}

impl Default for HttpBackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            bearer_token: None,
            user_agent: concat!("intake/", env!("CARGO_PKG_VERSION")).into(),
            endpoints: Endpoints::default(),
        }
    }
}

impl HttpBackendConfig {
    /// Create config for a base URL with defaults elsewhere
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// With request timeout
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// With bearer token
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Request timeout as a duration
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Parse a TOML document
    ///
    /// # Errors
    /// Returns [`ConnectorError::Parse`] on malformed input
    pub fn from_toml_str(raw: &str) -> Result<Self, ConnectorError> {
        Ok(toml::from_str(raw)?)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns [`ConnectorError`] if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConnectorError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConnectorError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = HttpBackendConfig::from_toml_str("").unwrap();
        assert_eq!(config, HttpBackendConfig::default());
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.endpoints.favorites, "favorites");
    }

    #[test]
    fn partial_document_overrides() {
        let config = HttpBackendConfig::from_toml_str(
            r#"
            base_url = "https://api.example.com/v1"
            timeout_ms = 1500
            bearer_token = "secret"

            [endpoints]
            offers = "offers/send"
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url, "https://api.example.com/v1");
        assert_eq!(config.timeout_ms, 1500);
        assert_eq!(config.bearer_token.as_deref(), Some("secret"));
        assert_eq!(config.endpoints.offers, "offers/send");
        assert_eq!(config.endpoints.suggest_content, "ai-diagnosis");
    }

    #[test]
    fn malformed_document_is_rejected() {
        let err = HttpBackendConfig::from_toml_str("timeout_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, ConnectorError::Parse(_)));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backend.toml");
        std::fs::write(&path, "timeout_ms = 250\n").unwrap();

        let config = HttpBackendConfig::load(&path).unwrap();
        assert_eq!(config.timeout_ms, 250);

        let missing = HttpBackendConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(missing, ConnectorError::Io { .. }));
    }
}
