//! GitBucket collaboration platform support.
//!
//! Provides token-based authentication, repository and branch lookups, and
//! pull request creation behind a platform independent trait.

/// Configuration and authentication for the platform.
pub mod config;

/// GitBucket REST client implementation.
pub mod gitbucket;

/// Request and response shapes exchanged with the REST transport.
pub mod request;

/// Platform and transport traits.
pub mod traits;

/// Platform independent data types for users, repositories and pull requests.
pub mod types;
