//! Pipeline status lookup

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use tracing::debug;

/// Status reported when no pipeline exists for the commit
pub const NO_PIPELINE_FOUND: &str = "No pipeline was found";

/// Status of the most recent pipeline for `sha`.
///
/// Returns [`NO_PIPELINE_FOUND`] (not an error) when there are no pipelines.
/// Any API failure becomes [`Error::PipelineLookup`].
pub async fn get_pipeline_status(platform: &dyn PlatformService, sha: &str) -> Result<String> {
    let pipelines = platform.list_pipelines(sha).await.map_err(|e| {
        debug!(sha, error = %e, "pipeline listing failed");
        Error::PipelineLookup
    })?;

    let Some(latest) = pipelines.into_iter().next() else {
        debug!(sha, "no pipeline for commit");
        return Ok(NO_PIPELINE_FOUND.to_string());
    };

    debug!(sha, pipeline_id = latest.id, status = %latest.status, "found pipeline");
    Ok(latest.status)
}
