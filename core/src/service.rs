//! Service facade returning entities instead of raw attribute maps.
//!
//! Release publishing and asset upload are not implemented; those calls fail
//! with `GiteaError::Unsupported` and `supports` reports them as such.

use std::path::PathBuf;

use crate::client::GiteaClient;
use crate::config::Endpoint;
use crate::entity::{Release, Repository, User};
use crate::error::GiteaError;

/// Capabilities a hosting service may offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Creating and deleting repositories.
    GitHosting,
    /// Looking up and publishing releases.
    Releases,
    /// Uploading release assets.
    ReleaseAssets,
    /// Reading the authenticated user.
    Users,
}

#[derive(Debug, Clone)]
pub struct GiteaService {
    client: GiteaClient,
}

impl GiteaService {
    pub fn new(client: GiteaClient) -> Self {
        Self { client }
    }

    /// Service backed by the endpoint found in the environment.
    pub fn from_env() -> Result<Self, GiteaError> {
        Ok(Self::new(GiteaClient::new(Endpoint::from_env()?)))
    }

    pub fn client(&self) -> &GiteaClient {
        &self.client
    }

    pub fn supports(&self, feature: Feature) -> bool {
        match feature {
            Feature::GitHosting | Feature::Users => true,
            Feature::Releases | Feature::ReleaseAssets => false,
        }
    }

    pub fn create_git_repository(
        &self,
        name: &str,
        description: Option<&str>,
        private: bool,
        initialize: bool,
    ) -> Result<Repository, GiteaError> {
        let attributes = self
            .client
            .create_repository(name, description, private, initialize)?;
        Repository::try_from(attributes)
    }

    pub fn delete_git_repository(&self, name: &str) -> Result<(), GiteaError> {
        self.client.delete_repository(name)
    }

    pub fn get_release_by_tag(
        &self,
        owner: &str,
        repository: &str,
        tag: &str,
    ) -> Result<Option<Release>, GiteaError> {
        self.client
            .get_release_by_tag(owner, repository, tag)?
            .map(Release::try_from)
            .transpose()
    }

    pub fn get_authenticated_user(&self) -> Result<User, GiteaError> {
        User::try_from(self.client.get_authenticated_user()?)
    }

    pub fn publish_release(
        &self,
        _owner: &str,
        _repository: &str,
        _title: Option<&str>,
        tag: &str,
        _description: Option<&str>,
    ) -> Result<Release, GiteaError> {
        Err(GiteaError::Unsupported(format!(
            "publishing release '{tag}' is not supported by this service"
        )))
    }

    pub fn publish_release_assets(
        &self,
        _owner: &str,
        _repository: &str,
        release: &Release,
        _assets: &[PathBuf],
    ) -> Result<Release, GiteaError> {
        Err(GiteaError::Unsupported(format!(
            "publishing assets for release '{}' is not supported by this service",
            release.tag_name().unwrap_or("<untagged>")
        )))
    }
}
