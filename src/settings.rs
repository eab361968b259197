//! Resolution of repository URIs and local working copies into the
//! coordinates needed to talk to a GitBucket instance.
//!
//! Two addressing modes are supported:
//!
//! - **Remote**: the URI is the repository URL itself, e.g.
//!   `https://bucket.example.com/git/acme/widgets.git`.
//! - **Local**: a `file://` URI pointing into a git working copy. The first
//!   remote whose host contains `gitbucket` supplies the repository URL and
//!   the working copy supplies branch and remote tracking details.
//!
//! Platform detection lives in [`probe`] and is exposed through
//! [`reader::SettingsReader::can_read`].
use serde::Serialize;
use std::path::PathBuf;
use url::Url;

/// Unauthenticated detection of GitBucket instances.
pub mod probe;

/// Turns URIs into [`RepositorySettings`].
pub mod reader;

#[cfg(test)]
mod reader_tests;

/// Local tracking details for a repository resolved from a working copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RemoteInfo {
    /// Folder originally supplied by the caller.
    pub working_folder: Option<PathBuf>,
    /// Root of the working copy as discovered by git.
    pub local_repository_uri: Option<PathBuf>,
    /// Branch to work against.
    pub branch_name: Option<String>,
    /// Name of the git remote pointing at GitBucket.
    pub remote_name: Option<String>,
}

/// Resolved identity of a repository on a GitBucket instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositorySettings {
    /// API root of the instance, always ending in `/api/v3/`.
    pub api_uri: Url,
    /// Repository URL as given or as configured on the git remote.
    pub repository_uri: Url,
    pub repository_name: String,
    pub repository_owner: String,
    pub remote_info: Option<RemoteInfo>,
}
