//! Push a commit and open or update its merge request
//!
//! The flow is strictly sequential and stops at the first failure:
//! 1. Locate the HEAD commit
//! 2. Force-push HEAD to the branch
//! 3. Find or create the MR against [`TARGET_BRANCH`]
//! 4. Read the pipeline status for the MR's commit

mod message;
mod pipeline;
mod progress;
mod reconcile;

pub use message::{MrContent, split_commit_message};
pub use pipeline::{NO_PIPELINE_FOUND, get_pipeline_status};
pub use progress::{NoopProgress, Phase, ProgressCallback};
pub use reconcile::{find_or_create_merge_request, needs_update};

use crate::auth::GitLabAuthConfig;
use crate::error::{Error, Result};
use crate::platform::{GitLabService, PlatformService};
use crate::repo::{CancelSignal, force_push_head, head_commit_sha};
use crate::throttle::Throttle;
use crate::types::{CreateMergeRequest, MergeRequest, PushInput, PushOutput};
use tracing::debug;

/// Branch every MR targets
pub const TARGET_BRANCH: &str = "master";

/// Reject inputs that cannot name a branch or project
fn validate_input(input: &PushInput) -> Result<()> {
    let branch = &input.branch_name;
    if branch.is_empty() {
        return Err(Error::Config("branch name is empty".to_string()));
    }
    if branch.chars().any(char::is_whitespace) {
        return Err(Error::Config(format!(
            "branch name {branch:?} contains whitespace"
        )));
    }
    if input.repo_owner.trim().is_empty() || input.repo_name.trim().is_empty() {
        return Err(Error::Config(
            "repository owner and name are required".to_string(),
        ));
    }
    Ok(())
}

/// Desired MR for the input: its branch into [`TARGET_BRANCH`], titled from
/// the commit message
pub fn desired_merge_request(input: &PushInput) -> CreateMergeRequest {
    let content = split_commit_message(&input.commit_message, Some(input.pr_body.as_str()));
    CreateMergeRequest {
        source_branch: input.branch_name.clone(),
        target_branch: TARGET_BRANCH.to_string(),
        title: content.title,
        description: content.description,
    }
}

/// Shape the final output from the resolved MR and pipeline status
pub fn build_output(
    input: &PushInput,
    mr: &MergeRequest,
    commit_sha: String,
    pipeline_status: String,
) -> PushOutput {
    PushOutput {
        success: true,
        commit_sha,
        pull_request_number: mr.iid,
        pull_request_url: mr.web_url.clone(),
        pull_request_combined_status: pipeline_status,
        pull_request_assignee: input.pr_assignee.clone(),
        ci_build_url: mr
            .pipeline
            .as_ref()
            .map(|p| p.web_url.clone())
            .filter(|url| !url.is_empty()),
    }
}

/// Push `input.plan_dir`'s HEAD and reconcile its MR using `platform`.
///
/// The input is validated before any git or API call.
///
/// Cancellation applies to the git steps only; API calls and throttle waits
/// run to completion once started.
pub async fn push_merge_request(
    input: &PushInput,
    platform: &dyn PlatformService,
    api_throttle: &dyn Throttle,
    push_throttle: &dyn Throttle,
    cancel: &CancelSignal,
    progress: &dyn ProgressCallback,
) -> Result<PushOutput> {
    validate_input(input)?;

    progress.on_phase(Phase::LocatingCommit).await;
    let head_sha = head_commit_sha(&input.plan_dir, cancel).await?;

    progress.on_phase(Phase::Pushing).await;
    force_push_head(&input.plan_dir, &input.branch_name, cancel).await?;
    progress
        .on_message(&format!("Pushed {head_sha} to {}", input.branch_name))
        .await;

    progress.on_phase(Phase::Reconciling).await;
    let desired = desired_merge_request(input);
    let mr = find_or_create_merge_request(platform, &desired, api_throttle, push_throttle).await?;
    progress
        .on_message(&format!("MR !{}: {}", mr.iid, mr.web_url))
        .await;

    // GitLab may not have computed the MR head yet right after creation
    let commit_sha = if mr.sha.is_empty() {
        head_sha
    } else {
        mr.sha.clone()
    };

    progress.on_phase(Phase::CheckingPipeline).await;
    api_throttle.acquire().await;
    let status = get_pipeline_status(platform, &commit_sha).await?;
    debug!(mr_iid = mr.iid, sha = %commit_sha, status = %status, "push complete");

    Ok(build_output(input, &mr, commit_sha, status))
}

/// Push and reconcile against GitLab, using `input`'s owner and repo as the
/// project
pub async fn gitlab_push(
    input: &PushInput,
    auth: &GitLabAuthConfig,
    api_throttle: &dyn Throttle,
    push_throttle: &dyn Throttle,
    cancel: &CancelSignal,
    progress: &dyn ProgressCallback,
) -> Result<PushOutput> {
    let platform = GitLabService::from_auth(auth, &input.repo_owner, &input.repo_name)?;
    push_merge_request(input, &platform, api_throttle, push_throttle, cancel, progress).await
}
