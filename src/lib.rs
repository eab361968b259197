//! GitBucket support for automated dependency update pull requests.
//!
//! The crate resolves repository URIs and local working copies into
//! [`settings::RepositorySettings`], detects GitBucket instances, talks to
//! the GitBucket REST API through [`forge::gitbucket::GitBucket`] and models
//! validated package update proposals in [`update`].
pub mod error;
pub mod forge;
pub mod git;
pub mod settings;
pub mod update;

pub use error::{KeeperError, Result};
pub use forge::{gitbucket::GitBucket, traits::CollaborationPlatform};
pub use settings::{RepositorySettings, reader::SettingsReader};
pub use update::PackageUpdateSet;
