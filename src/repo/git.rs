//! Git subprocess runner, commit locator and pusher

use super::CancelSignal;
use crate::error::{Error, Result};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Captured output of a successful git invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}

impl GitOutput {
    /// stdout followed by stderr
    pub fn combined(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }
}

/// Run `git <args>` with `dir` as the working directory.
///
/// A non-zero exit becomes [`Error::Process`] carrying the combined output.
/// Cancellation kills the child and returns [`Error::Cancelled`].
pub async fn run_git(dir: &Path, args: &[&str], cancel: &CancelSignal) -> Result<GitOutput> {
    debug!(dir = %dir.display(), ?args, "running git");
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }

    let child = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    let output = tokio::select! {
        output = child.wait_with_output() => output?,
        () = cancel.cancelled() => {
            debug!(?args, "git cancelled");
            return Err(Error::Cancelled);
        }
    };

    let captured = GitOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    if !output.status.success() {
        debug!(?args, status = ?output.status.code(), "git failed");
        return Err(Error::Process(captured.combined()));
    }
    Ok(captured)
}

/// SHA of the HEAD commit in `dir`
pub async fn head_commit_sha(dir: &Path, cancel: &CancelSignal) -> Result<String> {
    let output = run_git(dir, &["log", "-1", "--pretty=format:%H"], cancel).await?;
    let sha = output.stdout.trim().to_string();
    debug!(%sha, "located HEAD commit");
    Ok(sha)
}

/// Force-push HEAD to `origin/<branch>`, overwriting whatever the branch held
pub async fn force_push_head(dir: &Path, branch: &str, cancel: &CancelSignal) -> Result<()> {
    let refspec = format!("HEAD:{branch}");
    run_git(dir, &["push", "-f", "origin", &refspec], cancel).await?;
    debug!(branch, "pushed HEAD");
    Ok(())
}
