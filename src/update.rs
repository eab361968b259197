//! Package update proposals and the wording used to present them.
//!
//! A [`PackageUpdateSet`] ties a package version lookup to every place the
//! package is currently referenced. The set is validated once at
//! construction and is immutable afterwards. [`wording`] turns one or more
//! sets into pull request titles, bodies and commit messages.

/// Package identities, versions and lookup results.
pub mod package;

/// Validated update proposals.
pub mod update_set;

/// NuGet style package versions.
pub mod version;

/// Pull request and commit text for update proposals.
pub mod wording;

pub use package::{
    PackageIdentity, PackageInProject, PackageLookupResult,
    PackageSearchMetadata, VersionChange,
};
pub use update_set::PackageUpdateSet;
pub use version::PackageVersion;
