//! Authentication for GitLab
//!
//! Credentials come from environment variables set by the surrounding
//! pipeline.

mod gitlab;

pub use gitlab::{
    DEFAULT_GITLAB_URL, GITLAB_TOKEN_ENV, GITLAB_URL_ENV, GitLabAuthConfig, get_gitlab_auth,
    normalize_api_url,
};

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token from environment variable
    EnvVar,
    /// Token passed in directly by the caller
    Explicit,
}
