//! Typed views over attribute maps returned by the API.
//!
//! Each entity wraps a non-empty `AttributeMap` and adds accessors for the
//! fields callers commonly need. Every other field is still reachable through
//! `attributes()` / `attribute()`.

use crate::attributes::AttributeMap;
use crate::error::GiteaError;

/// Common behaviour of attribute-backed entities.
pub trait Entity {
    fn attributes(&self) -> &AttributeMap;

    fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes().get(key).map(String::as_str)
    }

    fn id(&self) -> Option<&str> {
        self.attribute("id")
    }
}

fn non_empty(kind: &str, attributes: AttributeMap) -> Result<AttributeMap, GiteaError> {
    if attributes.is_empty() {
        return Err(GiteaError::InvalidArgument(format!(
            "cannot build a {kind} from an empty attribute map"
        )));
    }
    Ok(attributes)
}

/// A hosted git repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    attributes: AttributeMap,
}

impl Repository {
    pub fn name(&self) -> Option<&str> {
        self.attribute("name")
    }

    /// `owner/name`.
    pub fn full_name(&self) -> Option<&str> {
        self.attribute("full_name")
    }

    pub fn description(&self) -> Option<&str> {
        self.attribute("description")
    }

    pub fn clone_url(&self) -> Option<&str> {
        self.attribute("clone_url")
    }

    pub fn html_url(&self) -> Option<&str> {
        self.attribute("html_url")
    }

    pub fn default_branch(&self) -> Option<&str> {
        self.attribute("default_branch")
    }

    pub fn is_private(&self) -> bool {
        self.attribute("private") == Some("true")
    }
}

impl TryFrom<AttributeMap> for Repository {
    type Error = GiteaError;

    fn try_from(attributes: AttributeMap) -> Result<Self, Self::Error> {
        Ok(Self {
            attributes: non_empty("repository", attributes)?,
        })
    }
}

impl Entity for Repository {
    fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }
}

/// A release attached to a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    attributes: AttributeMap,
}

impl Release {
    pub fn tag_name(&self) -> Option<&str> {
        self.attribute("tag_name")
    }

    /// Release title.
    pub fn name(&self) -> Option<&str> {
        self.attribute("name")
    }

    pub fn body(&self) -> Option<&str> {
        self.attribute("body")
    }

    pub fn is_draft(&self) -> bool {
        self.attribute("draft") == Some("true")
    }

    pub fn is_prerelease(&self) -> bool {
        self.attribute("prerelease") == Some("true")
    }
}

impl TryFrom<AttributeMap> for Release {
    type Error = GiteaError;

    fn try_from(attributes: AttributeMap) -> Result<Self, Self::Error> {
        Ok(Self {
            attributes: non_empty("release", attributes)?,
        })
    }
}

impl Entity for Release {
    fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }
}

/// A Gitea user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    attributes: AttributeMap,
}

impl User {
    pub fn login(&self) -> Option<&str> {
        self.attribute("login")
    }

    pub fn full_name(&self) -> Option<&str> {
        self.attribute("full_name")
    }

    pub fn email(&self) -> Option<&str> {
        self.attribute("email")
    }
}

impl TryFrom<AttributeMap> for User {
    type Error = GiteaError;

    fn try_from(attributes: AttributeMap) -> Result<Self, Self::Error> {
        Ok(Self {
            attributes: non_empty("user", attributes)?,
        })
    }
}

impl Entity for User {
    fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }
}
