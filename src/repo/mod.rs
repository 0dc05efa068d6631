//! Local git repository operations
//!
//! Git is driven as a subprocess with fixed argument lists.

mod cancel;
mod git;

pub use cancel::{CancelHandle, CancelSignal, cancel_pair};
pub use git::{GitOutput, force_push_head, head_commit_sha, run_git};
