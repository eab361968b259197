//! Discovery of local git working copies and the remotes they track.
use log::*;
#[cfg(test)]
use mockall::automock;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::{KeeperError, Result};

/// A configured remote of a local working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitRemote {
    pub name: String,
    pub url: Url,
}

/// Read-only queries against a local working copy.
#[cfg_attr(test, automock)]
pub trait GitDiscovery {
    /// Whether `path` is inside a git working copy.
    fn is_git_repo(&self, path: &Path) -> Result<bool>;
    /// First remote whose URL host contains `platform_host`.
    fn get_remote_for_platform(
        &self,
        path: &Path,
        platform_host: &str,
    ) -> Result<Option<GitRemote>>;
    /// Root of the working copy containing `path`.
    fn discover_repo(&self, path: &Path) -> Result<PathBuf>;
    /// Short name of the currently checked out branch.
    fn get_current_head(&self, path: &Path) -> Result<String>;
}

/// [`GitDiscovery`] backed by libgit2.
#[derive(Debug, Default, Clone, Copy)]
pub struct Git2Discovery;

impl GitDiscovery for Git2Discovery {
    fn is_git_repo(&self, path: &Path) -> Result<bool> {
        Ok(git2::Repository::discover(path).is_ok())
    }

    fn get_remote_for_platform(
        &self,
        path: &Path,
        platform_host: &str,
    ) -> Result<Option<GitRemote>> {
        let repo = git2::Repository::discover(path)?;
        let platform_host = platform_host.to_lowercase();

        for name in repo.remotes()?.iter().flatten() {
            let remote = repo.find_remote(name)?;

            let Some(raw_url) = remote.url() else {
                continue;
            };

            let url = match Url::parse(raw_url) {
                Ok(url) => url,
                Err(err) => {
                    debug!("skipping remote {name} with url {raw_url}: {err}");
                    continue;
                }
            };

            let matches = url
                .host_str()
                .map(|host| host.to_lowercase().contains(&platform_host))
                .unwrap_or(false);

            if matches {
                debug!("found {platform_host} remote {name}: {url}");
                return Ok(Some(GitRemote {
                    name: name.to_string(),
                    url,
                }));
            }
        }

        Ok(None)
    }

    fn discover_repo(&self, path: &Path) -> Result<PathBuf> {
        let repo = git2::Repository::discover(path)?;
        let root = repo.workdir().unwrap_or_else(|| repo.path());
        Ok(root.to_path_buf())
    }

    fn get_current_head(&self, path: &Path) -> Result<String> {
        let repo = git2::Repository::discover(path)?;

        match repo.head() {
            Ok(head) => head.shorthand().map(String::from).ok_or_else(|| {
                KeeperError::from(git2::Error::from_str(
                    "current head is not valid utf-8",
                ))
            }),
            // a freshly initialised repository has no commits yet
            Err(err) if err.code() == git2::ErrorCode::UnbornBranch => {
                let head = repo.find_reference("HEAD")?;
                let target = head.symbolic_target().ok_or_else(|| {
                    git2::Error::from_str("HEAD is not a symbolic reference")
                })?;
                Ok(target.trim_start_matches("refs/heads/").to_string())
            }
            Err(err) => Err(err.into()),
        }
    }
}
