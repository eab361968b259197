//! Traits related to the collaboration platform and its REST transport
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::{
    error::Result,
    forge::{
        config::AuthSettings,
        request::{ApiRequest, ApiResponse},
        types::{
            ForkData, Organization, PullRequestRequest, Repository,
            SearchCodeRequest, SearchCodeResult, User,
        },
    },
};

/// Capability surface an orchestrator drives to open update pull requests.
#[async_trait]
pub trait CollaborationPlatform: Send + Sync {
    fn initialise(&mut self, settings: AuthSettings) -> Result<()>;
    async fn get_current_user(&self) -> Result<User>;
    async fn get_organizations(&self) -> Result<Vec<Organization>>;
    async fn get_repositories_for_organisation(
        &self,
        organisation: &str,
    ) -> Result<Vec<Repository>>;
    async fn get_user_repository(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Option<Repository>>;
    async fn make_user_fork(&self, owner: &str, name: &str)
    -> Result<Repository>;
    async fn repository_branch_exists(
        &self,
        owner: &str,
        name: &str,
        branch: &str,
    ) -> Result<bool>;
    async fn open_pull_request(
        &self,
        target: &ForkData,
        request: &PullRequestRequest,
        labels: &[String],
    ) -> Result<()>;
    async fn search(
        &self,
        search: &SearchCodeRequest,
    ) -> Result<SearchCodeResult>;
}

/// Issues authenticated JSON requests against the platform API root.
///
/// Any response that reaches the server is returned as an [`ApiResponse`]
/// regardless of status; only failures to complete the exchange are errors.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}
