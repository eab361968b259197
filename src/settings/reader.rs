use log::*;
use secrecy::SecretString;
use std::env;
use url::Url;

use crate::{
    error::{KeeperError, Result},
    forge::config::{
        API_PATH, ForkMode, PLATFORM_HOST, PlatformSettings, TOKEN_ENV_VAR,
        URL_PATTERN,
    },
    git::GitDiscovery,
    settings::{RemoteInfo, RepositorySettings, probe},
};

/// Reads GitBucket repository settings from remote URLs or local working
/// copies.
pub struct SettingsReader<G: GitDiscovery> {
    git: G,
}

impl<G: GitDiscovery> SettingsReader<G> {
    pub fn new(git: G) -> Self {
        Self { git }
    }

    /// Whether `uri` belongs to a reachable GitBucket instance. Local
    /// working copies are checked through their GitBucket remote. Never
    /// fails; any problem means the URI is not claimed.
    pub async fn can_read(&self, uri: &Url) -> bool {
        let target = if uri.scheme() == "file" {
            match self.platform_remote_url(uri) {
                Ok(Some(url)) => url,
                Ok(None) => {
                    debug!("no {PLATFORM_HOST} remote configured for {uri}");
                    return false;
                }
                Err(err) => {
                    debug!("No valid GitBucket repo during repo check: {err}");
                    return false;
                }
            }
        } else {
            uri.clone()
        };

        probe::can_read(&target).await
    }

    /// Apply environment defaults. A non-empty `GITBUCKET_TOKEN` wins over a
    /// configured token; fork mode defaults to single repository only.
    pub fn update_platform_settings(&self, settings: &mut PlatformSettings) {
        if let Ok(token) = env::var(TOKEN_ENV_VAR)
            && !token.is_empty()
        {
            debug!("using token from {TOKEN_ENV_VAR}");
            settings.token = Some(SecretString::from(token));
        }

        if settings.fork_mode.is_none() {
            settings.fork_mode = Some(ForkMode::SingleRepositoryOnly);
        }
    }

    /// Resolve `uri` into repository settings.
    ///
    /// Returns `Ok(None)` only for a local working copy that has no
    /// GitBucket remote, so another platform can be tried.
    pub fn repository_settings(
        &self,
        uri: &Url,
        target_branch: Option<&str>,
    ) -> Result<Option<RepositorySettings>> {
        if uri.scheme() == "file" {
            self.settings_from_local(uri, target_branch)
        } else {
            settings_from_remote(uri, target_branch).map(Some)
        }
    }

    fn platform_remote_url(&self, uri: &Url) -> Result<Option<Url>> {
        let folder = uri.to_file_path().map_err(|_| invalid_uri(uri))?;
        if !self.git.is_git_repo(&folder)? {
            return Ok(None);
        }
        let remote = self.git.get_remote_for_platform(&folder, PLATFORM_HOST)?;
        Ok(remote.map(|r| r.url))
    }

    fn settings_from_local(
        &self,
        uri: &Url,
        target_branch: Option<&str>,
    ) -> Result<Option<RepositorySettings>> {
        let working_folder =
            uri.to_file_path().map_err(|_| invalid_uri(uri))?;

        if !self.git.is_git_repo(&working_folder)? {
            return Err(KeeperError::NotARepository(working_folder));
        }

        let Some(remote) = self
            .git
            .get_remote_for_platform(&working_folder, PLATFORM_HOST)?
        else {
            info!(
                "no {PLATFORM_HOST} remote found for {}",
                working_folder.display()
            );
            return Ok(None);
        };

        let local_root = self.git.discover_repo(&working_folder)?;

        let branch_name = match target_branch {
            Some(branch) => branch.to_string(),
            None => self.git.get_current_head(&local_root)?,
        };

        let (owner, name, api_uri) = parse_repository_uri(&remote.url)?;

        debug!(
            "resolved {} via remote {} to {owner}/{name} on branch {branch_name}",
            working_folder.display(),
            remote.name
        );

        Ok(Some(RepositorySettings {
            api_uri,
            repository_uri: remote.url,
            repository_name: name,
            repository_owner: owner,
            remote_info: Some(RemoteInfo {
                working_folder: Some(working_folder),
                local_repository_uri: Some(local_root),
                branch_name: Some(branch_name),
                remote_name: Some(remote.name),
            }),
        }))
    }
}

fn settings_from_remote(
    uri: &Url,
    target_branch: Option<&str>,
) -> Result<RepositorySettings> {
    let (owner, name, api_uri) = parse_repository_uri(uri)?;

    let remote_info = target_branch.map(|branch| RemoteInfo {
        branch_name: Some(branch.to_string()),
        ..Default::default()
    });

    Ok(RepositorySettings {
        api_uri,
        repository_uri: uri.clone(),
        repository_name: name,
        repository_owner: owner,
        remote_info,
    })
}

fn invalid_uri(uri: &Url) -> KeeperError {
    KeeperError::configuration(format!(
        "The provided uri was not in the correct format. Provided {uri} and format should be {URL_PATTERN}"
    ))
}

/// Split `/<marker>/<owner>/<repo>[.git]` into owner, repository name and the
/// API root on the same scheme, host and port.
pub fn parse_repository_uri(uri: &Url) -> Result<(String, String, Url)> {
    let parts = uri
        .path()
        .split('/')
        .filter(|s| !s.trim().is_empty())
        .collect::<Vec<&str>>();

    if parts.len() != 3 || uri.cannot_be_a_base() {
        return Err(invalid_uri(uri));
    }

    let owner = parts[1];
    let name = parts[2].strip_suffix(".git").unwrap_or(parts[2]);

    if owner.is_empty() || name.is_empty() {
        return Err(invalid_uri(uri));
    }

    let mut api_uri = uri.clone();
    api_uri.set_path(API_PATH);
    api_uri.set_query(None);
    api_uri.set_fragment(None);

    Ok((owner.to_string(), name.to_string(), api_uri))
}
