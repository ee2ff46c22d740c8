//! Blocking client core for the Gitea REST API.
//!
//! # Overview
//! Turns repository and release operations into authenticated JSON requests
//! and turns the replies into flat attribute maps or classified errors.
//!
//! # Design
//! - `GiteaClient` holds an immutable `Endpoint` and an owned
//!   `Arc<dyn HttpTransport>`; there is no global HTTP client.
//! - Each operation is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), joined by `dispatch`.
//! - Status handling lives in `classify`: the expected success code and the
//!   meaning of 404 are chosen per operation.
//! - Response bodies are flattened one level into `AttributeMap`s rather than
//!   deserialized into fixed structs.
//! - `GiteaService` wraps the client and returns `Repository` / `Release` /
//!   `User` entities.

pub mod attributes;
pub mod classify;
pub mod client;
pub mod config;
pub mod entity;
pub mod error;
pub mod http;
pub mod service;
pub mod types;

pub use attributes::{parse_collection, parse_named_element, parse_object, AttributeMap};
pub use client::GiteaClient;
pub use config::Endpoint;
pub use entity::{Entity, Release, Repository, User};
pub use error::GiteaError;
pub use http::{HttpError, HttpMethod, HttpRequest, HttpResponse, HttpTransport, UreqTransport};
pub use service::{Feature, GiteaService};
pub use types::CreateRepoOption;
