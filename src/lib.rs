//! mr-push - push a commit and open or update its GitLab merge request
//!
//! Given a git working tree, `mr-push` force-pushes HEAD to a branch, finds or
//! creates the open MR for that branch against `master`, brings its title and
//! description in line with the commit message, and reports the status of the
//! commit's latest CI pipeline.
//!
//! Outbound API calls are paced through injected [`throttle::Throttle`]s and
//! the GitLab client sits behind [`platform::PlatformService`].

pub mod auth;
pub mod error;
pub mod platform;
pub mod push;
pub mod repo;
pub mod throttle;
pub mod types;
