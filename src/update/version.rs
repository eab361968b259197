use semver::Version;
use serde::{Serialize, Serializer};
use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use crate::error::{KeeperError, Result};

/// A package version as NuGet understands it.
///
/// Accepts one to four numeric parts (`1`, `1.2`, `1.2.3`, `1.0.118.0`)
/// followed by optional pre-release and build metadata. Comparison, equality
/// and hashing ignore build metadata and treat a missing revision as zero.
#[derive(Debug, Clone)]
pub struct PackageVersion {
    version: Version,
    revision: Option<u64>,
}

impl PackageVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            version: Version::new(major, minor, patch),
            revision: None,
        }
    }

    pub fn with_revision(mut self, revision: u64) -> Self {
        self.revision = Some(revision);
        self
    }

    /// Parse a possibly short or four part version.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let split_at = raw.find(['-', '+']).unwrap_or(raw.len());
        let (core, suffix) = raw.split_at(split_at);

        let mut parts = core.split('.').collect::<Vec<&str>>();

        let revision = match parts.len() {
            1..=3 => None,
            4 => {
                let text = parts.pop().unwrap_or_default();
                // same numeric rules as the other parts
                Some(Version::parse(&format!("0.0.{text}"))?.patch)
            }
            _ => {
                return Err(KeeperError::invalid_update(format!(
                    "version '{raw}' has more than four parts"
                )));
            }
        };

        let padding = ".0".repeat(3 - parts.len());
        let version =
            Version::parse(&format!("{}{padding}{suffix}", parts.join(".")))?;

        Ok(Self { version, revision })
    }

    pub fn major(&self) -> u64 {
        self.version.major
    }

    pub fn minor(&self) -> u64 {
        self.version.minor
    }

    pub fn patch(&self) -> u64 {
        self.version.patch
    }

    pub fn revision(&self) -> u64 {
        self.revision.unwrap_or(0)
    }

    pub fn is_prerelease(&self) -> bool {
        !self.version.pre.is_empty()
    }

    fn key(&self) -> (u64, u64, u64, u64, &semver::Prerelease) {
        (
            self.version.major,
            self.version.minor,
            self.version.patch,
            self.revision(),
            &self.version.pre,
        )
    }
}

impl FromStr for PackageVersion {
    type Err = KeeperError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl PartialEq for PackageVersion {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for PackageVersion {}

impl PartialOrd for PackageVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PackageVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl Hash for PackageVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = &self.version;
        write!(f, "{}.{}.{}", v.major, v.minor, v.patch)?;
        if let Some(revision) = self.revision {
            write!(f, ".{revision}")?;
        }
        if !v.pre.is_empty() {
            write!(f, "-{}", v.pre)?;
        }
        if !v.build.is_empty() {
            write!(f, "+{}", v.build)?;
        }
        Ok(())
    }
}

impl Serialize for PackageVersion {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
