//! Request builder, dispatcher and response parser for the Gitea API.
//!
//! # Design
//! `GiteaClient` holds an immutable `Endpoint` and an owned transport handle;
//! it carries no mutable state between calls. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method that
//! consumes an `HttpResponse`, so either half can be driven by a caller that
//! performs its own I/O. The plain operation methods (`create_repository`,
//! `get_release_by_tag`, ...) chain build, `dispatch` and parse.
//!
//! Every operation here requires authentication. A missing token is reported
//! by `build_*` before anything reaches the transport.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::attributes::{parse_object, AttributeMap};
use crate::classify::{classify, NotFound, Outcome};
use crate::config::Endpoint;
use crate::error::GiteaError;
use crate::http::{HttpHeaders, HttpMethod, HttpRequest, HttpResponse, HttpTransport, UreqTransport};
use crate::types::CreateRepoOption;

const CONTENT_TYPE: &str = "application/json";

/// Synchronous client for the Gitea REST API.
///
/// Cheap to clone; clones share the transport. Safe to use from several
/// threads at once.
#[derive(Clone)]
pub struct GiteaClient {
    endpoint: Endpoint,
    transport: Arc<dyn HttpTransport>,
}

impl fmt::Debug for GiteaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GiteaClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl GiteaClient {
    /// Client backed by a fresh `UreqTransport`.
    pub fn new(endpoint: Endpoint) -> Self {
        Self::with_transport(endpoint, Arc::new(UreqTransport::new()))
    }

    pub fn with_transport(endpoint: Endpoint, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            endpoint,
            transport,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Join `relative_path` onto the base URI with exactly one `/` between
    /// them. A blank path yields the base URI unchanged.
    pub fn build_uri(&self, relative_path: &str) -> String {
        let base = self.endpoint.base_uri();
        if relative_path.trim().is_empty() {
            return base.to_string();
        }
        match (base.ends_with('/'), relative_path.starts_with('/')) {
            (true, true) => format!("{base}{}", &relative_path[1..]),
            (false, false) => format!("{base}/{relative_path}"),
            _ => format!("{base}{relative_path}"),
        }
    }

    /// Build a JSON request for `uri`.
    ///
    /// When `requires_auth` is set the request carries
    /// `Authorization: token <value>`; without a configured token this fails
    /// with `GiteaError::Authentication`.
    pub fn build_request(
        &self,
        method: HttpMethod,
        uri: String,
        body: Option<Value>,
        requires_auth: bool,
    ) -> Result<HttpRequest, GiteaError> {
        let mut headers: HttpHeaders = vec![("Content-Type".to_string(), CONTENT_TYPE.to_string())];
        if requires_auth {
            let token = self.endpoint.token().ok_or_else(|| GiteaError::Authentication {
                status: None,
                message: "no authentication token configured".to_string(),
            })?;
            headers.push(("Authorization".to_string(), format!("token {token}")));
        }
        Ok(HttpRequest {
            method,
            url: uri,
            headers,
            body: body.map(|b| b.to_string()),
        })
    }

    /// Send `request` through the transport. Exactly one attempt is made.
    pub fn dispatch(&self, request: &HttpRequest) -> Result<HttpResponse, GiteaError> {
        tracing::debug!(method = request.method.as_str(), uri = %request.url, "HTTP request");
        tracing::trace!(headers = ?redacted(&request.headers), "HTTP request headers");

        let response = self.transport.send(request).map_err(|e| {
            tracing::debug!(error = %e, "HTTP request failed");
            GiteaError::from(e)
        })?;

        tracing::debug!(status = response.status, "HTTP response");
        tracing::trace!(headers = ?response.headers, "HTTP response headers");
        tracing::trace!(body = %response.body, "HTTP response body");
        Ok(response)
    }

    pub fn build_create_repository(&self, input: &CreateRepoOption) -> Result<HttpRequest, GiteaError> {
        require("repository name", &input.name)?;
        let body = serde_json::to_value(input)
            .map_err(|e| GiteaError::InvalidArgument(format!("cannot serialize request body: {e}")))?;
        self.build_request(HttpMethod::Post, self.build_uri("/user/repos"), Some(body), true)
    }

    pub fn parse_create_repository(&self, response: HttpResponse) -> Result<AttributeMap, GiteaError> {
        classify(&response, 201, NotFound::Failure)?;
        parse_object(&response.body)
    }

    /// Create a repository owned by the authenticated user.
    pub fn create_repository(
        &self,
        name: &str,
        description: Option<&str>,
        private: bool,
        auto_init: bool,
    ) -> Result<AttributeMap, GiteaError> {
        let input = CreateRepoOption {
            name: name.to_string(),
            description: description.map(str::to_string),
            private,
            auto_init,
        };
        let request = self.build_create_repository(&input)?;
        self.parse_create_repository(self.dispatch(&request)?)
    }

    /// `name` is appended verbatim to `/repos/`, so `owner/repo` addresses a
    /// repository of a specific owner.
    pub fn build_delete_repository(&self, name: &str) -> Result<HttpRequest, GiteaError> {
        let name = require("repository name", name)?;
        self.build_request(HttpMethod::Delete, self.build_uri(&format!("/repos/{name}")), None, true)
    }

    pub fn parse_delete_repository(&self, response: HttpResponse) -> Result<(), GiteaError> {
        classify(&response, 204, NotFound::Failure)?;
        Ok(())
    }

    pub fn delete_repository(&self, name: &str) -> Result<(), GiteaError> {
        let request = self.build_delete_repository(name)?;
        self.parse_delete_repository(self.dispatch(&request)?)
    }

    pub fn build_get_release_by_tag(
        &self,
        owner: &str,
        repository: &str,
        tag: &str,
    ) -> Result<HttpRequest, GiteaError> {
        let owner = require("release repository owner", owner)?;
        let repository = require("release repository name", repository)?;
        let tag = require("release tag", tag)?;
        let path = format!("/repos/{owner}/{repository}/releases/tags/{tag}");
        self.build_request(HttpMethod::Get, self.build_uri(&path), None, true)
    }

    /// A 404 means the release does not exist and yields `Ok(None)`.
    pub fn parse_get_release_by_tag(
        &self,
        response: HttpResponse,
    ) -> Result<Option<AttributeMap>, GiteaError> {
        match classify(&response, 200, NotFound::Absent)? {
            Outcome::Success => parse_object(&response.body).map(Some),
            Outcome::Absent => Ok(None),
        }
    }

    pub fn get_release_by_tag(
        &self,
        owner: &str,
        repository: &str,
        tag: &str,
    ) -> Result<Option<AttributeMap>, GiteaError> {
        let request = self.build_get_release_by_tag(owner, repository, tag)?;
        self.parse_get_release_by_tag(self.dispatch(&request)?)
    }

    pub fn build_get_authenticated_user(&self) -> Result<HttpRequest, GiteaError> {
        self.build_request(HttpMethod::Get, self.build_uri("/user"), None, true)
    }

    pub fn parse_get_authenticated_user(&self, response: HttpResponse) -> Result<AttributeMap, GiteaError> {
        classify(&response, 200, NotFound::Failure)?;
        parse_object(&response.body)
    }

    /// The user owning the configured token.
    pub fn get_authenticated_user(&self) -> Result<AttributeMap, GiteaError> {
        let request = self.build_get_authenticated_user()?;
        self.parse_get_authenticated_user(self.dispatch(&request)?)
    }
}

fn require<'a>(what: &str, value: &'a str) -> Result<&'a str, GiteaError> {
    if value.trim().is_empty() {
        return Err(GiteaError::InvalidArgument(format!("the {what} cannot be empty")));
    }
    Ok(value)
}

fn redacted(headers: &HttpHeaders) -> HttpHeaders {
    headers
        .iter()
        .map(|(name, value)| {
            if name.eq_ignore_ascii_case("authorization") {
                (name.clone(), "token <redacted>".to_string())
            } else {
                (name.clone(), value.clone())
            }
        })
        .collect()
}
