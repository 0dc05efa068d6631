//! Platform service for GitLab
//!
//! Provides the narrow set of MR and pipeline operations the push flow needs.

mod gitlab;

pub use gitlab::GitLabService;

use crate::error::Result;
use crate::types::{
    CreateMergeRequest, MergeRequest, MergeRequestState, Pipeline, UpdateMergeRequest,
};
use async_trait::async_trait;

/// Platform service trait for MR/pipeline operations
///
/// The push flow is written against this trait so that the GitLab client can
/// be swapped for a mock in tests.
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Create a new MR.
    ///
    /// Returns [`Error::MergeRequestExists`] when the server reports that an
    /// open MR already exists for the source branch. Other failures, including
    /// unrelated conflicts, are returned as ordinary API errors.
    ///
    /// [`Error::MergeRequestExists`]: crate::error::Error::MergeRequestExists
    async fn create_merge_request(&self, request: &CreateMergeRequest) -> Result<MergeRequest>;

    /// List MRs in the project for a source/target branch pair and state
    async fn list_merge_requests(
        &self,
        source_branch: &str,
        target_branch: &str,
        state: MergeRequestState,
    ) -> Result<Vec<MergeRequest>>;

    /// Update an existing MR, addressed by IID
    async fn update_merge_request(
        &self,
        iid: u64,
        update: &UpdateMergeRequest,
    ) -> Result<MergeRequest>;

    /// List pipelines for a commit SHA, most recent first
    async fn list_pipelines(&self, sha: &str) -> Result<Vec<Pipeline>>;
}
