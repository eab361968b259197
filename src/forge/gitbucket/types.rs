use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    error::KeeperError,
    forge::types::{Repository, User, UserPermissions},
};

#[derive(Debug, Default, Clone, Deserialize)]
pub struct GitBucketUser {
    pub login: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GitBucketPermissions {
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub push: bool,
    #[serde(default)]
    pub pull: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitBucketRepository {
    pub name: String,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub permissions: Option<GitBucketPermissions>,
    #[serde(default)]
    pub clone_url: Option<String>,
    #[serde(default)]
    pub owner: GitBucketUser,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub parent: Option<Box<GitBucketRepository>>,
}

#[derive(Debug, Deserialize)]
pub struct GitBucketBranch {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct GitBucketPullRequest {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatePull {
    pub title: String,
    pub head: String,
    pub base: String,
    pub body: String,
}

impl From<GitBucketUser> for User {
    fn from(user: GitBucketUser) -> Self {
        Self {
            login: user.login,
            name: user.name,
            email: user.email,
        }
    }
}

impl From<GitBucketPermissions> for UserPermissions {
    fn from(permissions: GitBucketPermissions) -> Self {
        Self {
            admin: permissions.admin,
            push: permissions.push,
            pull: permissions.pull,
        }
    }
}

impl TryFrom<GitBucketRepository> for Repository {
    type Error = KeeperError;

    fn try_from(repo: GitBucketRepository) -> Result<Self, Self::Error> {
        let parent = match repo.parent {
            Some(parent) => Some(Box::new(Repository::try_from(*parent)?)),
            None => None,
        };

        Ok(Self {
            name: repo.name,
            archived: repo.archived,
            user_permissions: repo.permissions.map(UserPermissions::from),
            clone_url: normalise_clone_url(repo.clone_url.as_deref())?,
            owner: User::from(repo.owner),
            fork: repo.fork,
            parent,
        })
    }
}

/// Strip a trailing `.git` and then a trailing `/` before parsing the clone
/// URL as an absolute URL. Blank values have no URL.
pub fn normalise_clone_url(
    value: Option<&str>,
) -> Result<Option<Url>, KeeperError> {
    let Some(mut value) = value.filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };

    if value.len() >= 4
        && let Some(suffix) = value.get(value.len() - 4..)
        && suffix.eq_ignore_ascii_case(".git")
    {
        value = &value[..value.len() - 4];
    }

    if let Some(stripped) = value.strip_suffix('/') {
        value = stripped;
    }

    Ok(Some(Url::parse(value)?))
}
