//! Request payloads sent to the Gitea API.
//!
//! Responses are not modelled here; they come back as flat attribute maps
//! (see `attributes`).

use serde::Serialize;

/// Body of `POST /user/repos`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CreateRepoOption {
    pub name: String,
    /// Serialized as `null` when absent.
    pub description: Option<String>,
    pub private: bool,
    /// Initialize the repository with a default README.
    pub auto_init: bool,
}
