use serde::Serialize;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Identity of a platform account.
pub struct User {
    pub login: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
/// Access the authenticated user holds on a repository.
pub struct UserPermissions {
    pub admin: bool,
    pub push: bool,
    pub pull: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Platform independent view of a hosted repository.
pub struct Repository {
    pub name: String,
    pub archived: bool,
    pub user_permissions: Option<UserPermissions>,
    pub clone_url: Option<Url>,
    pub owner: User,
    pub fork: bool,
    pub parent: Option<Box<Repository>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Organization {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Repository a pull request targets.
pub struct ForkData {
    pub owner: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to open a pull request.
pub struct PullRequestRequest {
    pub head: String,
    pub title: String,
    pub base_ref: String,
    pub body: String,
    pub delete_branch_after_merge: bool,
}

#[derive(Debug, Clone)]
/// Request to search code across repositories.
pub struct SearchCodeRequest {
    pub term: String,
    pub repos: Vec<ForkData>,
    pub extension: Option<String>,
    pub per_page: u32,
}

#[derive(Debug, Clone, Default)]
pub struct SearchCodeResult {
    pub total_count: u64,
}
