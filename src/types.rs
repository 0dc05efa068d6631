//! Core types for mr-push

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything needed to push a change and open its MR
#[derive(Debug, Clone, Default)]
pub struct PushInput {
    /// Git working tree containing the commit to push
    pub plan_dir: PathBuf,
    /// Remote branch HEAD is force-pushed to (the MR source branch)
    pub branch_name: String,
    /// Commit message; its first line becomes the MR title
    pub commit_message: String,
    /// Explicit MR description; empty means "derive from the commit message"
    pub pr_body: String,
    /// Project namespace (group or user)
    pub repo_owner: String,
    /// Project name
    pub repo_name: String,
    /// Assignee reported back in the output
    pub pr_assignee: String,
}

/// Result of a push invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushOutput {
    /// Whether every step completed
    pub success: bool,
    /// Commit SHA the MR points at
    pub commit_sha: String,
    /// MR number (IID, as shown in `!N`)
    pub pull_request_number: u64,
    /// Web URL for the MR
    pub pull_request_url: String,
    /// Status of the latest pipeline, or the "no pipeline" sentinel
    pub pull_request_combined_status: String,
    /// Assignee echoed from the input
    pub pull_request_assignee: String,
    /// Web URL of the MR's pipeline, when GitLab reports one
    pub ci_build_url: Option<String>,
}

impl PushOutput {
    /// Output returned alongside an error
    pub fn failure() -> Self {
        Self::default()
    }
}

/// State filter for MR listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeRequestState {
    /// Open and mergeable
    Opened,
    /// Closed without merging
    Closed,
    /// Merged
    Merged,
    /// Locked while a merge is in flight
    Locked,
}

impl MergeRequestState {
    /// Value used in GitLab API query strings
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Opened => "opened",
            Self::Closed => "closed",
            Self::Merged => "merged",
            Self::Locked => "locked",
        }
    }
}

impl std::fmt::Display for MergeRequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pipeline summary embedded in an MR
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineRef {
    /// Pipeline ID
    pub id: u64,
    /// Git ref the pipeline ran for
    #[serde(rename = "ref", default)]
    pub git_ref: String,
    /// Pipeline status
    #[serde(default)]
    pub status: String,
    /// Web URL for the pipeline
    #[serde(default)]
    pub web_url: String,
}

/// A GitLab merge request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRequest {
    /// Instance-wide ID
    pub id: u64,
    /// Project-scoped number (`!N`)
    pub iid: u64,
    /// MR title
    pub title: String,
    /// MR description (empty when unset)
    pub description: String,
    /// Source branch name
    pub source_branch: String,
    /// Target branch name
    pub target_branch: String,
    /// MR state
    pub state: MergeRequestState,
    /// Head commit SHA (empty if GitLab has not computed it yet)
    pub sha: String,
    /// Web URL for the MR
    pub web_url: String,
    /// Latest pipeline for the MR, if any
    pub pipeline: Option<PipelineRef>,
}

/// A CI pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    /// Pipeline ID
    pub id: u64,
    /// Commit SHA the pipeline ran for
    #[serde(default)]
    pub sha: String,
    /// Git ref the pipeline ran for
    #[serde(rename = "ref", default)]
    pub git_ref: String,
    /// "created", "pending", "running", "success", "failed", ...
    pub status: String,
    /// Web URL for the pipeline
    #[serde(default)]
    pub web_url: String,
    /// When the pipeline was created
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// When the pipeline last changed
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Desired MR contents, used for creation and as the reconciliation target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateMergeRequest {
    /// Source branch name
    pub source_branch: String,
    /// Target branch name
    pub target_branch: String,
    /// MR title
    pub title: String,
    /// MR description
    pub description: String,
}

/// Fields sent when updating an existing MR
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateMergeRequest {
    /// Target branch name
    pub target_branch: String,
    /// New title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Platform configuration
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Project namespace (group or user)
    pub owner: String,
    /// Project name
    pub repo: String,
    /// API root, e.g. `https://gitlab.com/api/v4`
    pub api_url: String,
}

impl PlatformConfig {
    /// `owner/repo` project path
    pub fn project_path(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}
