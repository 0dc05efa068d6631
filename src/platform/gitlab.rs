//! GitLab platform service implementation

use crate::auth::GitLabAuthConfig;
use crate::error::{Error, MR_EXISTS_MESSAGE, Result};
use crate::platform::PlatformService;
use crate::types::{
    CreateMergeRequest, MergeRequest, MergeRequestState, Pipeline, PipelineRef, PlatformConfig,
    UpdateMergeRequest,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

/// GitLab service using reqwest
pub struct GitLabService {
    client: Client,
    token: String,
    config: PlatformConfig,
}

#[derive(Deserialize)]
struct MergeRequestResponse {
    id: u64,
    iid: u64,
    title: String,
    description: Option<String>,
    source_branch: String,
    target_branch: String,
    state: MergeRequestState,
    sha: Option<String>,
    web_url: String,
    #[serde(default)]
    head_pipeline: Option<PipelineInfo>,
    // Deprecated by GitLab in favour of head_pipeline, still sent by older versions
    #[serde(default)]
    pipeline: Option<PipelineInfo>,
}

#[derive(Deserialize)]
struct PipelineInfo {
    id: u64,
    #[serde(rename = "ref")]
    git_ref: Option<String>,
    status: Option<String>,
    web_url: Option<String>,
}

#[derive(Deserialize)]
struct PipelineResponse {
    id: u64,
    sha: Option<String>,
    #[serde(rename = "ref")]
    git_ref: Option<String>,
    status: String,
    web_url: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<PipelineInfo> for PipelineRef {
    fn from(p: PipelineInfo) -> Self {
        Self {
            id: p.id,
            git_ref: p.git_ref.unwrap_or_default(),
            status: p.status.unwrap_or_default(),
            web_url: p.web_url.unwrap_or_default(),
        }
    }
}

impl From<MergeRequestResponse> for MergeRequest {
    fn from(mr: MergeRequestResponse) -> Self {
        Self {
            id: mr.id,
            iid: mr.iid,
            title: mr.title,
            description: mr.description.unwrap_or_default(),
            source_branch: mr.source_branch,
            target_branch: mr.target_branch,
            state: mr.state,
            sha: mr.sha.unwrap_or_default(),
            web_url: mr.web_url,
            pipeline: mr.head_pipeline.or(mr.pipeline).map(Into::into),
        }
    }
}

impl From<PipelineResponse> for Pipeline {
    fn from(p: PipelineResponse) -> Self {
        Self {
            id: p.id,
            sha: p.sha.unwrap_or_default(),
            git_ref: p.git_ref.unwrap_or_default(),
            status: p.status,
            web_url: p.web_url.unwrap_or_default(),
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

impl GitLabService {
    /// Create a new GitLab service for `owner/repo`.
    ///
    /// `api_url` is the REST root, e.g. `https://gitlab.com/api/v4`.
    pub fn new(token: String, owner: String, repo: String, api_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::GitLabApi(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token,
            config: PlatformConfig {
                owner,
                repo,
                api_url: api_url.trim_end_matches('/').to_string(),
            },
        })
    }

    /// Create a service from loaded credentials
    pub fn from_auth(auth: &GitLabAuthConfig, owner: &str, repo: &str) -> Result<Self> {
        Self::new(
            auth.token.clone(),
            owner.to_string(),
            repo.to_string(),
            auth.api_url.clone(),
        )
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url, path)
    }

    fn encoded_project(&self) -> String {
        urlencoding::encode(&self.config.project_path()).into_owned()
    }
}

/// Pull the human-readable message out of a GitLab error body.
///
/// GitLab sends `{"message": "..."}`, `{"message": ["...", ...]}`,
/// `{"message": {"field": ["..."]}}` or `{"error": "..."}`.
fn api_message(body: &str) -> Option<String> {
    use serde_json::Value;

    let value: Value = serde_json::from_str(body).ok()?;
    let message = value.get("message").or_else(|| value.get("error"))?;
    Some(match message {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map_or_else(|| item.to_string(), ToString::to_string))
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    })
}

/// Read an unsuccessful response into `(status, message)`
async fn read_failure(response: Response) -> (StatusCode, String) {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = api_message(&body).unwrap_or(body);
    (status, message)
}

/// Pass successful responses through, turn failures into `Error::GitLabApi`
async fn check_status(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let (status, message) = read_failure(response).await;
    Err(Error::GitLabApi(format!("{status}: {message}")))
}

#[async_trait]
impl PlatformService for GitLabService {
    async fn create_merge_request(&self, request: &CreateMergeRequest) -> Result<MergeRequest> {
        debug!(
            source_branch = %request.source_branch,
            target_branch = %request.target_branch,
            "creating MR"
        );
        let url = self.api_url(&format!(
            "/projects/{}/merge_requests",
            self.encoded_project()
        ));

        let response = self
            .client
            .post(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, message) = read_failure(response).await;
            if message.contains(MR_EXISTS_MESSAGE) {
                debug!(%status, "MR already exists");
                return Err(Error::MergeRequestExists(message));
            }
            return Err(Error::GitLabApi(format!("{status}: {message}")));
        }

        let mr: MergeRequestResponse = response.json().await?;
        let mr: MergeRequest = mr.into();
        debug!(mr_iid = mr.iid, "created MR");
        Ok(mr)
    }

    async fn list_merge_requests(
        &self,
        source_branch: &str,
        target_branch: &str,
        state: MergeRequestState,
    ) -> Result<Vec<MergeRequest>> {
        debug!(source_branch, target_branch, %state, "listing MRs");
        let url = self.api_url(&format!(
            "/projects/{}/merge_requests",
            self.encoded_project()
        ));

        let response = self
            .client
            .get(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .query(&[
                ("source_branch", source_branch),
                ("target_branch", target_branch),
                ("state", state.as_str()),
            ])
            .send()
            .await?;

        let mrs: Vec<MergeRequestResponse> = check_status(response).await?.json().await?;
        let mrs: Vec<MergeRequest> = mrs.into_iter().map(Into::into).collect();
        debug!(count = mrs.len(), "listed MRs");
        Ok(mrs)
    }

    async fn update_merge_request(
        &self,
        iid: u64,
        update: &UpdateMergeRequest,
    ) -> Result<MergeRequest> {
        debug!(mr_iid = iid, "updating MR");
        let url = self.api_url(&format!(
            "/projects/{}/merge_requests/{}",
            self.encoded_project(),
            iid
        ));

        let response = self
            .client
            .put(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .json(update)
            .send()
            .await?;

        let mr: MergeRequestResponse = check_status(response).await?.json().await?;
        debug!(mr_iid = iid, "updated MR");
        Ok(mr.into())
    }

    async fn list_pipelines(&self, sha: &str) -> Result<Vec<Pipeline>> {
        debug!(sha, "listing pipelines");
        let url = self.api_url(&format!("/projects/{}/pipelines", self.encoded_project()));

        let response = self
            .client
            .get(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .query(&[("sha", sha), ("order_by", "id"), ("sort", "desc")])
            .send()
            .await?;

        let pipelines: Vec<PipelineResponse> = check_status(response).await?.json().await?;
        debug!(sha, count = pipelines.len(), "listed pipelines");
        Ok(pipelines.into_iter().map(Into::into).collect())
    }

}
