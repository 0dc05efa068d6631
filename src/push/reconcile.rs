//! Find-or-create reconciliation for the branch's MR
//!
//! Creation is attempted first. A conflict means an open MR already exists,
//! which is then looked up and brought in line with the desired title and
//! description.

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::throttle::Throttle;
use crate::types::{CreateMergeRequest, MergeRequest, MergeRequestState, UpdateMergeRequest};
use tracing::debug;

/// Whether an existing MR's title or description differs from the desired one
pub fn needs_update(existing: &MergeRequest, desired: &CreateMergeRequest) -> bool {
    existing.title != desired.title || existing.description != desired.description
}

/// Ensure exactly one open MR exists for the desired source/target pair with
/// the desired title and description, and return it.
///
/// Permits: one push permit and one API permit before creating, one API
/// permit before listing, one API permit before updating.
pub async fn find_or_create_merge_request(
    platform: &dyn PlatformService,
    desired: &CreateMergeRequest,
    api_throttle: &dyn Throttle,
    push_throttle: &dyn Throttle,
) -> Result<MergeRequest> {
    push_throttle.acquire().await;
    api_throttle.acquire().await;

    let conflict = match platform.create_merge_request(desired).await {
        Ok(mr) => return Ok(mr),
        Err(e) if e.is_merge_request_conflict() => e,
        Err(e) => return Err(e),
    };
    debug!(
        source_branch = %desired.source_branch,
        reason = %conflict,
        "MR already exists, looking it up"
    );

    api_throttle.acquire().await;
    let existing = platform
        .list_merge_requests(
            &desired.source_branch,
            &desired.target_branch,
            MergeRequestState::Opened,
        )
        .await?;

    let [mr] = <[MergeRequest; 1]>::try_from(existing).map_err(|existing| {
        Error::AmbiguousMergeRequest {
            found: existing.len(),
        }
    })?;

    if !needs_update(&mr, desired) {
        debug!(mr_iid = mr.iid, "existing MR is up to date");
        return Ok(mr);
    }

    api_throttle.acquire().await;
    let update = UpdateMergeRequest {
        target_branch: desired.target_branch.clone(),
        title: Some(desired.title.clone()),
        description: Some(desired.description.clone()),
    };
    platform.update_merge_request(mr.iid, &update).await
}
