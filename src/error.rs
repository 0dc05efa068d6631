//! Error types for mr-push

use thiserror::Error;

/// Substring GitLab uses when an open MR already exists for a source branch
pub const MR_EXISTS_MESSAGE: &str = "merge request already exists";

/// Errors that can occur while pushing a change and reconciling its MR
#[derive(Debug, Error)]
pub enum Error {
    /// Git exited non-zero; holds the raw combined output
    #[error("{0}")]
    Process(String),

    /// GitLab API returned an error
    #[error("GitLab API error: {0}")]
    GitLabApi(String),

    /// An open MR already exists for the source branch
    #[error("{0}")]
    MergeRequestExists(String),

    /// Expected exactly one open MR for the branch after a create conflict
    #[error("unexpected: found more than 1 MR for branch")]
    AmbiguousMergeRequest {
        /// Number of open MRs the listing returned
        found: usize,
    },

    /// Pipeline listing failed
    #[error("unexpected: cannot get pipeline status")]
    PipelineLookup,

    /// Missing or unusable credentials
    #[error("authentication error: {0}")]
    Auth(String),

    /// Invalid configuration value
    #[error("configuration error: {0}")]
    Config(String),

    /// A git step was cancelled before it finished
    #[error("git command cancelled")]
    Cancelled,

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error (including failure to spawn git)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error means the MR to be created already exists.
    ///
    /// The typed variant is authoritative. Other errors are matched on their
    /// text so that conflicts surfaced through an untyped path still count.
    pub fn is_merge_request_conflict(&self) -> bool {
        match self {
            Self::MergeRequestExists(_) => true,
            other => other.to_string().contains(MR_EXISTS_MESSAGE),
        }
    }
}

/// Result type alias for mr-push operations
pub type Result<T> = std::result::Result<T, Error>;
