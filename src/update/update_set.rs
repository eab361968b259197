use serde::Serialize;
use std::collections::HashSet;

use crate::{
    error::{KeeperError, Result},
    update::package::{
        PackageInProject, PackageLookupResult, PackageSearchMetadata,
        VersionChange,
    },
    update::version::PackageVersion,
};

/// A validated proposal to move every reference of one package to a
/// selected version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageUpdateSet {
    allowed_change: VersionChange,
    highest: PackageSearchMetadata,
    selected: PackageSearchMetadata,
    current_packages: Vec<PackageInProject>,
}

impl PackageUpdateSet {
    /// Build a proposal from a lookup result and the references it applies
    /// to. Fails unless the lookup has both a highest and a selected
    /// candidate, there is at least one reference, and every reference is
    /// for the selected package.
    pub fn new(
        lookup: PackageLookupResult,
        current_packages: Vec<PackageInProject>,
    ) -> Result<Self> {
        let selected = lookup.selected().cloned().ok_or_else(|| {
            KeeperError::invalid_update(format!(
                "no candidate version selected for allowed change {}",
                lookup.allowed_change
            ))
        })?;

        let highest = lookup.major.ok_or_else(|| {
            KeeperError::invalid_update(format!(
                "no highest version known for package '{}'",
                selected.identity.id
            ))
        })?;

        if current_packages.is_empty() {
            return Err(KeeperError::invalid_update(format!(
                "no current references given for package '{}'",
                selected.identity.id
            )));
        }

        let set = Self {
            allowed_change: lookup.allowed_change,
            highest,
            selected,
            current_packages,
        };

        set.check_id_consistency()?;

        Ok(set)
    }

    fn check_id_consistency(&self) -> Result<()> {
        let match_id = self.match_id();

        let mut offending: Vec<&str> = vec![];
        for package in &self.current_packages {
            if package.id != match_id && !offending.contains(&package.id.as_str())
            {
                offending.push(&package.id);
            }
        }

        if offending.is_empty() {
            return Ok(());
        }

        Err(KeeperError::invalid_update(format!(
            "Updates must all be for package '{match_id}', got '{}'",
            offending.join(", ")
        )))
    }

    pub fn allowed_change(&self) -> VersionChange {
        self.allowed_change
    }

    /// Newest version known to exist, regardless of policy.
    pub fn highest(&self) -> &PackageSearchMetadata {
        &self.highest
    }

    /// Version chosen to apply under the allowed change.
    pub fn selected(&self) -> &PackageSearchMetadata {
        &self.selected
    }

    pub fn current_packages(&self) -> &[PackageInProject] {
        &self.current_packages
    }

    pub fn match_id(&self) -> &str {
        &self.selected.identity.id
    }

    pub fn match_version(&self) -> &PackageVersion {
        &self.selected.identity.version
    }

    pub fn highest_version(&self) -> &PackageVersion {
        &self.highest.identity.version
    }

    /// Number of distinct versions currently referenced. Build metadata
    /// does not make a version distinct.
    pub fn count_current_versions(&self) -> usize {
        self.current_packages
            .iter()
            .map(|p| &p.version)
            .collect::<HashSet<_>>()
            .len()
    }
}
