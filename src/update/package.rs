use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf};

use crate::{
    error::{KeeperError, Result},
    update::version::PackageVersion,
};

/// How far an update may move away from the version currently in use.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum VersionChange {
    None,
    Patch,
    Minor,
    Major,
}

impl fmt::Display for VersionChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VersionChange::None => "None",
            VersionChange::Patch => "Patch",
            VersionChange::Minor => "Minor",
            VersionChange::Major => "Major",
        };
        f.write_str(name)
    }
}

/// A package id at a specific version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageIdentity {
    pub id: String,
    pub version: PackageVersion,
}

impl PackageIdentity {
    pub fn new(id: impl Into<String>, version: PackageVersion) -> Self {
        Self {
            id: id.into(),
            version,
        }
    }

    /// Build an identity from a possibly short version string.
    pub fn parse(id: impl Into<String>, version: &str) -> Result<Self> {
        Ok(Self::new(id, PackageVersion::parse(version)?))
    }
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.version)
    }
}

/// A version candidate found by a package source search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageSearchMetadata {
    pub identity: PackageIdentity,
    /// Package source the candidate was found on.
    pub source: Option<String>,
}

impl PackageSearchMetadata {
    pub fn new(identity: PackageIdentity, source: Option<String>) -> Self {
        Self { identity, source }
    }
}

/// Candidates found for one package: the newest overall plus the newest
/// within the minor and patch ranges of the version in use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLookupResult {
    pub allowed_change: VersionChange,
    pub major: Option<PackageSearchMetadata>,
    pub minor: Option<PackageSearchMetadata>,
    pub patch: Option<PackageSearchMetadata>,
}

impl PackageLookupResult {
    pub fn new(
        allowed_change: VersionChange,
        major: Option<PackageSearchMetadata>,
        minor: Option<PackageSearchMetadata>,
        patch: Option<PackageSearchMetadata>,
    ) -> Self {
        Self {
            allowed_change,
            major,
            minor,
            patch,
        }
    }

    /// Candidate permitted by the allowed change, if any.
    pub fn selected(&self) -> Option<&PackageSearchMetadata> {
        match self.allowed_change {
            VersionChange::Major => self.major.as_ref(),
            VersionChange::Minor => self.minor.as_ref(),
            VersionChange::Patch => self.patch.as_ref(),
            VersionChange::None => None,
        }
    }
}

/// A package reference found in a project file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageInProject {
    pub id: String,
    pub version: PackageVersion,
    /// Project file containing the reference.
    pub path: PathBuf,
}

impl PackageInProject {
    pub fn new(
        id: impl Into<String>,
        version: &str,
        path: impl Into<PathBuf>,
    ) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(KeeperError::invalid_update(
                "package reference has an empty id",
            ));
        }

        Ok(Self {
            id,
            version: PackageVersion::parse(version)?,
            path: path.into(),
        })
    }
}
