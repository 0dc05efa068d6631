//! GitLab credentials from the environment

use super::AuthSource;
use crate::error::{Error, Result};
use std::env;
use tracing::debug;
use url::Url;

/// Environment variable holding the GitLab personal/project access token
pub const GITLAB_TOKEN_ENV: &str = "GITLAB_API_TOKEN";

/// Environment variable holding the GitLab instance URL
pub const GITLAB_URL_ENV: &str = "GITLAB_URL";

/// Instance used when `GITLAB_URL` is unset
pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";

const API_SUFFIX: &str = "/api/v4";

/// GitLab authentication configuration
#[derive(Clone)]
pub struct GitLabAuthConfig {
    /// Access token sent as `PRIVATE-TOKEN`
    pub token: String,
    /// API root, always ending in `/api/v4`
    pub api_url: String,
    /// Where the token came from
    pub source: AuthSource,
}

impl std::fmt::Debug for GitLabAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitLabAuthConfig")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("source", &self.source)
            .finish()
    }
}

impl GitLabAuthConfig {
    /// Build a config from an explicit token and instance URL
    pub fn new(token: impl Into<String>, base_url: &str) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(Error::Auth("GitLab token is empty".to_string()));
        }
        Ok(Self {
            token,
            api_url: normalize_api_url(base_url)?,
            source: AuthSource::Explicit,
        })
    }
}

/// Read GitLab credentials from `GITLAB_API_TOKEN` and `GITLAB_URL`
pub fn get_gitlab_auth() -> Result<GitLabAuthConfig> {
    let token = env::var(GITLAB_TOKEN_ENV)
        .ok()
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| Error::Auth(format!("{GITLAB_TOKEN_ENV} is not set")))?;

    let base_url = env::var(GITLAB_URL_ENV)
        .ok()
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_GITLAB_URL.to_string());

    let api_url = normalize_api_url(base_url.trim())?;
    debug!(%api_url, "loaded GitLab credentials from environment");

    Ok(GitLabAuthConfig {
        token,
        api_url,
        source: AuthSource::EnvVar,
    })
}

/// Turn an instance URL into its REST API root.
///
/// `https://gitlab.example.com` and `https://gitlab.example.com/api/v4/` both
/// become `https://gitlab.example.com/api/v4`.
pub fn normalize_api_url(base_url: &str) -> Result<String> {
    let mut url =
        Url::parse(base_url).map_err(|e| Error::Config(format!("invalid GitLab URL {base_url:?}: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::Config(format!(
            "unsupported GitLab URL scheme {:?}",
            url.scheme()
        )));
    }

    let path = url.path().trim_end_matches('/').to_string();
    if !path.ends_with(API_SUFFIX) {
        url.set_path(&format!("{path}{API_SUFFIX}"));
    } else {
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);

    Ok(url.as_str().trim_end_matches('/').to_string())
}
