//! Push command - push HEAD and open or update its MR

use crate::cli::CliProgress;
use crate::cli::style::{Stylize, check, link};
use anstream::println;
use anyhow::{Context, Result};
use dialoguer::Confirm;
use mr_push::auth::get_gitlab_auth;
use mr_push::push::{NoopProgress, ProgressCallback, TARGET_BRANCH, gitlab_push};
use mr_push::repo::cancel_pair;
use mr_push::throttle::throttle_from_millis;
use mr_push::types::{PushInput, PushOutput};
use std::path::{Path, PathBuf};

/// Where a piece of text comes from
#[derive(Debug, Clone)]
pub enum TextSource {
    /// Given inline on the command line
    Inline(String),
    /// Read from a file
    File(PathBuf),
}

impl TextSource {
    fn read(&self) -> Result<String> {
        match self {
            Self::Inline(text) => Ok(text.clone()),
            Self::File(path) => read_text_file(path),
        }
    }
}

fn read_text_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Options for the push command
#[derive(Debug, Clone)]
pub struct PushOptions {
    /// Git working tree
    pub path: PathBuf,
    /// Branch to push HEAD to
    pub branch: String,
    /// Commit message used for the MR title/description
    pub message: TextSource,
    /// Optional explicit MR description
    pub body: Option<TextSource>,
    /// Project namespace
    pub owner: String,
    /// Project name
    pub repo: String,
    /// Assignee echoed in the output
    pub assignee: String,
    /// Milliseconds between API calls (0 disables pacing)
    pub api_interval_ms: u64,
    /// Milliseconds between pushes (0 disables pacing)
    pub push_interval_ms: u64,
    /// Prompt before force-pushing
    pub confirm: bool,
    /// Print only the JSON output
    pub json: bool,
}

impl PushOptions {
    fn to_input(&self) -> Result<PushInput> {
        let body = self
            .body
            .as_ref()
            .map(TextSource::read)
            .transpose()?
            .unwrap_or_default();

        Ok(PushInput {
            plan_dir: self.path.clone(),
            branch_name: self.branch.clone(),
            commit_message: self.message.read()?,
            pr_body: body,
            repo_owner: self.owner.clone(),
            repo_name: self.repo.clone(),
            pr_assignee: self.assignee.clone(),
        })
    }
}

/// Run the push command
pub async fn run_push(options: &PushOptions) -> Result<()> {
    let input = options.to_input()?;
    let auth = get_gitlab_auth()?;

    if options.confirm && !options.json {
        let proceed = Confirm::new()
            .with_prompt(format!(
                "Force-push HEAD to origin/{}?",
                input.branch_name
            ))
            .default(false)
            .interact()
            .context("failed to read confirmation")?;
        if !proceed {
            println!("{}", "Aborted".muted());
            return Ok(());
        }
    }

    let api_throttle = throttle_from_millis(options.api_interval_ms);
    let push_throttle = throttle_from_millis(options.push_interval_ms);

    let (cancel_handle, cancel) = cancel_pair();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_handle.cancel();
        }
    });

    let spinner = (!options.json).then(CliProgress::spinner);
    let progress: &dyn ProgressCallback = match &spinner {
        Some(spinner) => spinner,
        None => &NoopProgress,
    };

    let result = gitlab_push(
        &input,
        &auth,
        api_throttle.as_ref(),
        push_throttle.as_ref(),
        &cancel,
        progress,
    )
    .await;

    if let Some(spinner) = &spinner {
        spinner.finish();
    }
    let output = result?;

    if options.json {
        print_json(&output)?;
    } else {
        print_summary(&output);
    }
    Ok(())
}

/// Print an output record as pretty JSON on stdout
pub fn print_json(output: &PushOutput) -> Result<()> {
    let json = serde_json::to_string_pretty(output).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}

fn print_summary(output: &PushOutput) {
    let mr_label = format!("!{}", output.pull_request_number);
    println!(
        "{} Merge request {} into {}",
        check(),
        link(&mr_label, &output.pull_request_url).accent(),
        TARGET_BRANCH.emphasis()
    );
    println!("  {:<9} {}", "commit".muted(), output.commit_sha);
    println!(
        "  {:<9} {}",
        "pipeline".muted(),
        output.pull_request_combined_status.emphasis()
    );
    if let Some(url) = &output.ci_build_url {
        println!("  {:<9} {}", "build".muted(), link(url, url));
    }
    if !output.pull_request_assignee.is_empty() {
        println!("  {:<9} {}", "assignee".muted(), output.pull_request_assignee);
    }
}
