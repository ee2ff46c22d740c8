//! Endpoint configuration: where the API lives and how to authenticate.
//!
//! Built once by the caller and never mutated afterwards, so a single
//! `Endpoint` can back any number of clients across threads.

use std::fmt;

use crate::error::GiteaError;

/// Environment variable holding the API base URL (e.g. `https://gitea.example.com/api/v1`).
pub const BASE_URL_ENV: &str = "GITEA_BASE_URL";

/// Environment variable holding the personal access token.
pub const TOKEN_ENV: &str = "GITEA_TOKEN";

/// Base URI plus optional token.
#[derive(Clone, PartialEq, Eq)]
pub struct Endpoint {
    base_uri: String,
    token: Option<String>,
}

impl Endpoint {
    /// Create an endpoint. `base_uri` must be an absolute `http(s)` URL; a
    /// blank `token` counts as no token.
    pub fn new(base_uri: impl Into<String>, token: Option<String>) -> Result<Self, GiteaError> {
        let base_uri = base_uri.into().trim().to_string();
        if base_uri.is_empty() {
            return Err(GiteaError::InvalidArgument(
                "the base URI cannot be empty".to_string(),
            ));
        }
        if !(base_uri.starts_with("http://") || base_uri.starts_with("https://")) {
            return Err(GiteaError::InvalidArgument(format!(
                "the base URI must be an absolute http(s) URL, got '{base_uri}'"
            )));
        }
        let token = token.filter(|t| !t.trim().is_empty());
        Ok(Self { base_uri, token })
    }

    /// Read the endpoint from `GITEA_BASE_URL` and `GITEA_TOKEN`.
    pub fn from_env() -> Result<Self, GiteaError> {
        let base_uri = std::env::var(BASE_URL_ENV).map_err(|_| {
            GiteaError::InvalidArgument(format!("{BASE_URL_ENV} is not set"))
        })?;
        Self::new(base_uri, std::env::var(TOKEN_ENV).ok())
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("base_uri", &self.base_uri)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
