//! Configuration for GitBucket platform connections.
use secrecy::SecretString;
use std::time::Duration;
use url::Url;

/// Host marker used to recognise GitBucket remotes in a working copy.
pub const PLATFORM_HOST: &str = "gitbucket";
/// Path of the REST API root relative to the instance host.
pub const API_PATH: &str = "/api/v3/";
/// Version marker that identifies a URI already pointing at the API.
pub const API_VERSION_MARKER: &str = "api/v3";
/// Side-effect free route used to detect a GitBucket instance.
pub const DIAGNOSTIC_PATH: &str = "gitbucket/plugins";
/// Expected repository URL shape, used in configuration error messages.
pub const URL_PATTERN: &str =
    "http(s)://yourgitbucket/git/{owner}/{reponame}.git";
/// Environment variable that overrides the configured access token.
pub const TOKEN_ENV_VAR: &str = "GITBUCKET_TOKEN";
/// Upper bound on how long platform detection waits for a response.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
/// Page size used when listing pull requests.
pub const DEFAULT_PAGE_SIZE: u8 = 100;
/// User agent sent with every API request.
pub const USER_AGENT: &str = concat!("gitbucket-keeper/", env!("CARGO_PKG_VERSION"));

/// Credentials and endpoint used to initialise a platform client.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// API root of the instance, e.g. `https://host/api/v3/`.
    pub api_base: Url,
    /// Access token for authentication.
    pub token: SecretString,
}

/// How the orchestrator may place branches for pull requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForkMode {
    PreferFork,
    PreferSingleRepository,
    SingleRepositoryOnly,
}

/// Platform-level settings that can be defaulted from the environment.
#[derive(Debug, Clone, Default)]
pub struct PlatformSettings {
    pub token: Option<SecretString>,
    pub fork_mode: Option<ForkMode>,
}
