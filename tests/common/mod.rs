//! Shared test fixtures

#![allow(dead_code, unused_imports)]

mod mock_platform;

pub use mock_platform::{
    CallLog, CountingThrottle, Injected, ListMrCall, MockPlatformService, UpdateMrCall, call_log,
};

use mr_push::types::{
    MergeRequest, MergeRequestState, Pipeline, PipelineRef, PlatformConfig, PushInput,
};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Platform config for a `group/project` project on gitlab.com
pub fn gitlab_config() -> PlatformConfig {
    PlatformConfig {
        owner: "group".to_string(),
        repo: "project".to_string(),
        api_url: "https://gitlab.com/api/v4".to_string(),
    }
}

/// Open MR from `branch` into master
pub fn make_mr(iid: u64, branch: &str, title: &str, description: &str) -> MergeRequest {
    MergeRequest {
        id: 1000 + iid,
        iid,
        title: title.to_string(),
        description: description.to_string(),
        source_branch: branch.to_string(),
        target_branch: "master".to_string(),
        state: MergeRequestState::Opened,
        sha: format!("sha_{iid}"),
        web_url: format!("https://gitlab.com/group/project/-/merge_requests/{iid}"),
        pipeline: None,
    }
}

/// MR with an attached head pipeline
pub fn make_mr_with_pipeline(iid: u64, branch: &str, pipeline_id: u64) -> MergeRequest {
    let mut mr = make_mr(iid, branch, "Title", "");
    mr.pipeline = Some(PipelineRef {
        id: pipeline_id,
        git_ref: branch.to_string(),
        status: "running".to_string(),
        web_url: format!("https://gitlab.com/group/project/-/pipelines/{pipeline_id}"),
    });
    mr
}

/// Pipeline with the given status
pub fn make_pipeline(id: u64, sha: &str, status: &str) -> Pipeline {
    Pipeline {
        id,
        sha: sha.to_string(),
        git_ref: "fix-1".to_string(),
        status: status.to_string(),
        web_url: format!("https://gitlab.com/group/project/-/pipelines/{id}"),
        created_at: None,
        updated_at: None,
    }
}

/// Push input for `group/project`
pub fn make_input(plan_dir: &Path, branch: &str, message: &str) -> PushInput {
    PushInput {
        plan_dir: plan_dir.to_path_buf(),
        branch_name: branch.to_string(),
        commit_message: message.to_string(),
        pr_body: String::new(),
        repo_owner: "group".to_string(),
        repo_name: "project".to_string(),
        pr_assignee: "alice".to_string(),
    }
}

/// Run git in `dir`, panicking on failure, returning trimmed stdout
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .expect("spawn git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Working tree with a bare repository configured as `origin`
pub struct TempGitRepo {
    #[allow(dead_code)]
    dir: TempDir,
    /// Working tree
    pub work: PathBuf,
    /// Bare remote
    pub remote: PathBuf,
}

impl TempGitRepo {
    /// Create an empty working tree and remote
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let work = dir.path().join("work");
        let remote = dir.path().join("remote.git");

        git(dir.path(), &["init", "-q", "--bare", remote.to_str().unwrap()]);
        git(dir.path(), &["init", "-q", work.to_str().unwrap()]);
        git(&work, &["remote", "add", "origin", remote.to_str().unwrap()]);

        Self { dir, work, remote }
    }

    /// Create an empty commit and return its SHA
    pub fn commit(&self, message: &str) -> String {
        git(
            &self.work,
            &[
                "-c",
                "user.name=Test",
                "-c",
                "user.email=test@example.com",
                "-c",
                "commit.gpgsign=false",
                "commit",
                "-q",
                "--allow-empty",
                "-m",
                message,
            ],
        );
        git(&self.work, &["rev-parse", "HEAD"])
    }

    /// SHA of `branch` on the remote, if it exists
    pub fn remote_branch_sha(&self, branch: &str) -> Option<String> {
        let output = Command::new("git")
            .args(["rev-parse", "--verify", "--quiet"])
            .arg(format!("refs/heads/{branch}"))
            .current_dir(&self.remote)
            .output()
            .expect("spawn git");
        output
            .status
            .success()
            .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
