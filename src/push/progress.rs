//! Progress reporting for the push flow

use async_trait::async_trait;

/// Step of the push flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Reading the HEAD commit
    LocatingCommit,
    /// Force-pushing HEAD to the branch
    Pushing,
    /// Finding or creating the MR
    Reconciling,
    /// Looking up the pipeline status
    CheckingPipeline,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LocatingCommit => write!(f, "Locating commit"),
            Self::Pushing => write!(f, "Pushing"),
            Self::Reconciling => write!(f, "Reconciling merge request"),
            Self::CheckingPipeline => write!(f, "Checking pipeline"),
        }
    }
}

/// Receives progress updates while a push runs
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Called when a new phase starts
    async fn on_phase(&self, phase: Phase);

    /// Called with a free-form status message
    async fn on_message(&self, message: &str);
}

/// Progress callback that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_phase(&self, _phase: Phase) {}

    async fn on_message(&self, _message: &str) {}
}
