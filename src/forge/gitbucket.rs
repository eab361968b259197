//! Implements the CollaborationPlatform trait for GitBucket
use async_trait::async_trait;
use log::*;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashSet;
use url::Url;

use crate::{
    error::{KeeperError, Result},
    forge::{
        config::{AuthSettings, DEFAULT_PAGE_SIZE},
        gitbucket::types::{
            CreatePull, GitBucketBranch, GitBucketPullRequest,
            GitBucketRepository, GitBucketUser,
        },
        request::ApiRequest,
        traits::{CollaborationPlatform, Transport},
        types::{
            ForkData, Organization, PullRequestRequest, Repository,
            SearchCodeRequest, SearchCodeResult, User,
        },
    },
};

mod transport;
mod types;


pub use transport::HttpTransport;

/// Outcome of a single API exchange that did not produce the expected value.
#[derive(Debug)]
enum ApiError {
    NotFound { body: String },
    Status { status: StatusCode, body: String },
    Decode { source: serde_json::Error },
    Transport(KeeperError),
}

impl From<ApiError> for KeeperError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NotFound { body } => {
                KeeperError::platform(error_message(StatusCode::NOT_FOUND, &body))
            }
            ApiError::Status { status, body } => {
                KeeperError::platform(error_message(status, &body))
            }
            ApiError::Decode { source } => KeeperError::platform(format!(
                "unable to decode response: {source}"
            )),
            ApiError::Transport(err) => match err {
                KeeperError::Platform(_) => err,
                other => KeeperError::platform(other.to_string()),
            },
        }
    }
}

/// Pick the most specific message a failed response offers: the first entry
/// of `errors`, then the top level `message`, then the status line.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(doc) = serde_json::from_str::<Value>(body) {
        if let Some(message) = doc["errors"]
            .as_array()
            .and_then(|errors| errors.first())
            .and_then(|first| first["message"].as_str())
            && !message.is_empty()
        {
            return message.to_string();
        }

        if let Some(message) = doc["message"].as_str()
            && !message.is_empty()
        {
            return message.to_string();
        }
    }

    status.to_string()
}

struct Session {
    api_base: Url,
    transport: Box<dyn Transport>,
}

impl Session {
    async fn request<T: DeserializeOwned>(
        &self,
        req: ApiRequest,
    ) -> std::result::Result<T, ApiError> {
        let response =
            self.transport.send(req).await.map_err(ApiError::Transport)?;

        if response.status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound {
                body: response.body,
            });
        }

        if !response.status.is_success() {
            return Err(ApiError::Status {
                status: response.status,
                body: response.body,
            });
        }

        serde_json::from_str(&response.body)
            .map_err(|source| ApiError::Decode { source })
    }
}

/// GitBucket collaboration platform backed by its GitHub compatible REST API.
#[derive(Default)]
pub struct GitBucket {
    session: Option<Session>,
}

impl GitBucket {
    /// Create an uninitialised platform. Call
    /// [`CollaborationPlatform::initialise`] before use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a platform that is already initialised over the given
    /// transport.
    pub fn with_transport(api_base: Url, transport: Box<dyn Transport>) -> Self {
        Self {
            session: Some(Session {
                api_base,
                transport,
            }),
        }
    }

    fn session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or(KeeperError::NotInitialised)
    }

    async fn list_open_pull_requests(
        &self,
        target: &ForkData,
    ) -> Result<Vec<GitBucketPullRequest>> {
        let session = self.session()?;
        let mut page = 1;
        let mut seen = HashSet::new();
        let mut pulls = vec![];

        loop {
            let req = ApiRequest::get([
                "repos",
                target.owner.as_str(),
                target.name.as_str(),
                "pulls",
            ])
            .with_query("state", "open")
            .with_query("per_page", DEFAULT_PAGE_SIZE)
            .with_query("page", page);

            let batch: Vec<GitBucketPullRequest> = session.request(req).await?;

            let count = batch.len();
            let mut added = 0;

            for pr in batch {
                if seen.insert(pr.number) {
                    pulls.push(pr);
                    added += 1;
                }
            }

            // some instances ignore paging and return the full list each time
            if count < DEFAULT_PAGE_SIZE as usize || added == 0 {
                break;
            }

            page += 1;
        }

        Ok(pulls)
    }

    async fn find_pull_request_number(
        &self,
        target: &ForkData,
        request: &PullRequestRequest,
    ) -> Result<u64> {
        let pulls = self.list_open_pull_requests(target).await?;

        let mut matches = pulls
            .iter()
            .filter(|pr| {
                pr.title == request.title
                    && pr.body.as_deref().unwrap_or_default() == request.body
            })
            .map(|pr| pr.number)
            .collect::<Vec<u64>>();

        matches.sort_unstable();

        if matches.len() > 1 {
            warn!(
                "found {} open pull requests titled '{}' on {}/{}: using the most recent",
                matches.len(),
                request.title,
                target.owner,
                target.name
            );
        }

        matches.last().copied().ok_or_else(|| {
            KeeperError::platform(format!(
                "created pull request '{}' was not found on {}/{}",
                request.title, target.owner, target.name
            ))
        })
    }

    async fn add_labels_to_issue(
        &self,
        target: &ForkData,
        issue_number: u64,
        labels: &[String],
    ) -> Result<()> {
        let session = self.session()?;

        let labels_to_apply = labels
            .iter()
            .filter(|l| !l.trim().is_empty())
            .cloned()
            .collect::<Vec<String>>();

        if labels_to_apply.is_empty() {
            return Ok(());
        }

        info!(
            "Adding label(s) '{}' to issue '{} {}/{} {}'",
            labels_to_apply.join(", "),
            session.api_base,
            target.owner,
            target.name,
            issue_number
        );

        let number = issue_number.to_string();
        let req = ApiRequest::post(
            [
                "repos",
                target.owner.as_str(),
                target.name.as_str(),
                "issues",
                number.as_str(),
                "labels",
            ],
            Value::from(labels_to_apply),
        );

        if let Err(err) = session.request::<Value>(req).await
        {
            error!("Failed to add labels. Continuing: {}", KeeperError::from(err));
        }

        Ok(())
    }
}

#[async_trait]
impl CollaborationPlatform for GitBucket {
    fn initialise(&mut self, settings: AuthSettings) -> Result<()> {
        let transport = HttpTransport::new(&settings)?;

        debug!("initialised GitBucket client for {}", settings.api_base);

        self.session = Some(Session {
            api_base: settings.api_base,
            transport: Box::new(transport),
        });

        Ok(())
    }

    async fn get_current_user(&self) -> Result<User> {
        let session = self.session()?;
        let user: GitBucketUser = session.request(ApiRequest::get(["user"])).await?;
        debug!(
            "Read gitbucket user '{}'",
            user.login.as_deref().unwrap_or_default()
        );
        Ok(User::from(user))
    }

    async fn get_organizations(&self) -> Result<Vec<Organization>> {
        error!("GitBucket organizations have not yet been implemented.");
        Err(KeeperError::NotSupported("Organizations".into()))
    }

    async fn get_repositories_for_organisation(
        &self,
        _organisation: &str,
    ) -> Result<Vec<Repository>> {
        error!("GitBucket organizations have not yet been implemented.");
        Err(KeeperError::NotSupported("Organizations".into()))
    }

    async fn get_user_repository(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Option<Repository>> {
        let session = self.session()?;

        debug!("Looking for user fork for {owner}/{name}");

        let req = ApiRequest::get(["repos", owner, name]);

        match session.request::<GitBucketRepository>(req).await {
            Ok(result) => {
                let repo = Repository::try_from(result)?;
                info!(
                    "User fork found at {} for {}",
                    repo.clone_url
                        .as_ref()
                        .map(|u| u.to_string())
                        .unwrap_or_default(),
                    repo.owner.login.as_deref().unwrap_or_default()
                );
                Ok(Some(repo))
            }
            Err(ApiError::NotFound { .. }) => {
                debug!("User fork not found");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn make_user_fork(
        &self,
        _owner: &str,
        _name: &str,
    ) -> Result<Repository> {
        error!("GitBucket Fork API has not yet been implemented.");
        Err(KeeperError::NotSupported("Fork API".into()))
    }

    async fn repository_branch_exists(
        &self,
        owner: &str,
        name: &str,
        branch: &str,
    ) -> Result<bool> {
        let session = self.session()?;

        // slashes in branch names stay path separators
        let req = ApiRequest::get(
            ["repos", owner, name, "branches"]
                .into_iter()
                .chain(branch.split('/')),
        );

        match session.request::<GitBucketBranch>(req).await {
            Ok(found) => {
                debug!("Branch found for {owner} / {name} / {}", found.name);
                Ok(true)
            }
            Err(ApiError::NotFound { .. }) => {
                debug!("No branch found for {owner} / {name} / {branch}");
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn open_pull_request(
        &self,
        target: &ForkData,
        request: &PullRequestRequest,
        labels: &[String],
    ) -> Result<()> {
        let session = self.session()?;

        info!(
            "Making PR onto '{} {}/{} from {}",
            session.api_base, target.owner, target.name, request.head
        );
        debug!("PR title: {}", request.title);

        let data = CreatePull {
            title: request.title.clone(),
            head: request.head.clone(),
            base: request.base_ref.clone(),
            body: request.body.clone(),
        };

        let req = ApiRequest::post(
            ["repos", target.owner.as_str(), target.name.as_str(), "pulls"],
            serde_json::to_value(&data)?,
        );

        let number = match session.request::<GitBucketPullRequest>(req).await
        {
            Ok(pr) => pr.number,
            // The pull request is created even when the response body cannot
            // be decoded. https://github.com/gitbucket/gitbucket/issues/2306
            Err(ApiError::Decode { source }) => {
                warn!(
                    "unreadable response creating pull request, looking it up instead: {source}"
                );
                self.find_pull_request_number(target, request).await?
            }
            Err(err) => return Err(err.into()),
        };

        debug!("opened pull request #{number}");

        self.add_labels_to_issue(target, number, labels).await
    }

    async fn search(
        &self,
        _search: &SearchCodeRequest,
    ) -> Result<SearchCodeResult> {
        error!("Search has not yet been implemented for GitBucket.");
        Err(KeeperError::NotSupported("Search".into()))
    }
}
