//! mr-push CLI

mod cli;

use anstream::eprintln;
use clap::Parser;
use cli::push::{PushOptions, TextSource, print_json, run_push};
use cli::style::{Stylize, cross};
use mr_push::types::PushOutput;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Push a commit and open or update its GitLab merge request
#[derive(Parser, Debug)]
#[command(name = "mr-push", version, about)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Path to the git working tree
    #[arg(short, long, default_value = ".")]
    path: PathBuf,

    /// Branch to force-push HEAD to (the MR source branch)
    #[arg(short, long)]
    branch: String,

    /// Commit message; the first line becomes the MR title
    #[arg(
        short,
        long,
        conflicts_with = "message_file",
        required_unless_present = "message_file"
    )]
    message: Option<String>,

    /// Read the commit message from a file
    #[arg(long)]
    message_file: Option<PathBuf>,

    /// MR description (defaults to the commit message body)
    #[arg(long, conflicts_with = "body_file")]
    body: Option<String>,

    /// Read the MR description from a file
    #[arg(long)]
    body_file: Option<PathBuf>,

    /// Project namespace (group or user)
    #[arg(long)]
    owner: String,

    /// Project name
    #[arg(long)]
    repo: String,

    /// Assignee reported in the output
    #[arg(long, default_value = "")]
    assignee: String,

    /// Minimum milliseconds between GitLab API calls (0 disables)
    #[arg(long, default_value_t = 1000)]
    api_interval_ms: u64,

    /// Minimum milliseconds between MR pushes (0 disables)
    #[arg(long, default_value_t = 1000)]
    push_interval_ms: u64,

    /// Ask before force-pushing
    #[arg(long)]
    confirm: bool,

    /// Print the result as JSON only
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn push_options(self) -> PushOptions {
        let message = match (self.message, self.message_file) {
            (Some(message), _) => TextSource::Inline(message),
            (None, Some(path)) => TextSource::File(path),
            // clap enforces one of the two
            (None, None) => TextSource::Inline(String::new()),
        };
        let body = self
            .body
            .map(TextSource::Inline)
            .or_else(|| self.body_file.map(TextSource::File));

        PushOptions {
            path: self.path,
            branch: self.branch,
            message,
            body,
            owner: self.owner,
            repo: self.repo,
            assignee: self.assignee,
            api_interval_ms: self.api_interval_ms,
            push_interval_ms: self.push_interval_ms,
            confirm: self.confirm,
            json: self.json,
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("mr_push=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = cli.push_options();
    if let Err(e) = run_push(&options).await {
        if options.json
            && let Err(json_err) = print_json(&PushOutput::failure())
        {
            eprintln!("{} {}", cross(), format!("{json_err:#}").error());
        }
        eprintln!("{} {}", cross(), format!("{e:#}").error());
        std::process::exit(1);
    }
}
