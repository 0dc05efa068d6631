//! Mock platform service for testing
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use mr_push::error::{Error, Result};
use mr_push::platform::PlatformService;
use mr_push::throttle::Throttle;
use mr_push::types::{
    CreateMergeRequest, MergeRequest, MergeRequestState, Pipeline, PlatformConfig,
    UpdateMergeRequest,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Ordered log of throttle permits and API calls, shared between the mock
/// platform and [`CountingThrottle`]s
pub type CallLog = Arc<Mutex<Vec<String>>>;

/// Create an empty call log
pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Call record for `list_merge_requests`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMrCall {
    pub source_branch: String,
    pub target_branch: String,
    pub state: MergeRequestState,
}

/// Call record for `update_merge_request`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateMrCall {
    pub iid: u64,
    pub update: UpdateMergeRequest,
}

/// Failure to inject into a mocked call
#[derive(Debug, Clone)]
pub enum Injected {
    /// Typed "already exists" conflict
    Conflict(String),
    /// Generic API failure
    Api(String),
}

impl Injected {
    fn to_error(&self) -> Error {
        match self {
            Self::Conflict(msg) => Error::MergeRequestExists(msg.clone()),
            Self::Api(msg) => Error::GitLabApi(msg.clone()),
        }
    }
}

/// Simple mock platform service for testing
///
/// Features:
/// - Auto-incrementing MR IIDs for creates
/// - Call tracking for verification
/// - Configurable list/pipeline responses
/// - Error injection for failure path testing
pub struct MockPlatformService {
    config: PlatformConfig,
    log: CallLog,
    next_iid: AtomicU64,
    list_mr_response: Mutex<Vec<MergeRequest>>,
    pipelines_response: Mutex<Vec<Pipeline>>,
    // Call tracking
    create_mr_calls: Mutex<Vec<CreateMergeRequest>>,
    list_mr_calls: Mutex<Vec<ListMrCall>>,
    update_mr_calls: Mutex<Vec<UpdateMrCall>>,
    list_pipelines_calls: Mutex<Vec<String>>,
    // Error injection
    error_on_create_mr: Mutex<Option<Injected>>,
    error_on_list_mr: Mutex<Option<Injected>>,
    error_on_update_mr: Mutex<Option<Injected>>,
    error_on_list_pipelines: Mutex<Option<Injected>>,
}

impl MockPlatformService {
    /// Create a new mock with the given config
    pub fn with_config(config: PlatformConfig) -> Self {
        Self::with_log(config, call_log())
    }

    /// Create a new mock that records calls into a shared log
    pub fn with_log(config: PlatformConfig, log: CallLog) -> Self {
        Self {
            config,
            log,
            next_iid: AtomicU64::new(1),
            list_mr_response: Mutex::new(Vec::new()),
            pipelines_response: Mutex::new(Vec::new()),
            create_mr_calls: Mutex::new(Vec::new()),
            list_mr_calls: Mutex::new(Vec::new()),
            update_mr_calls: Mutex::new(Vec::new()),
            list_pipelines_calls: Mutex::new(Vec::new()),
            error_on_create_mr: Mutex::new(None),
            error_on_list_mr: Mutex::new(None),
            error_on_update_mr: Mutex::new(None),
            error_on_list_pipelines: Mutex::new(None),
        }
    }

    // === Error injection methods ===

    /// Make `create_merge_request` fail with a typed conflict
    pub fn conflict_on_create(&self, msg: &str) {
        *self.error_on_create_mr.lock().unwrap() = Some(Injected::Conflict(msg.to_string()));
    }

    /// Make `create_merge_request` fail with a generic API error
    pub fn fail_create_mr(&self, msg: &str) {
        *self.error_on_create_mr.lock().unwrap() = Some(Injected::Api(msg.to_string()));
    }

    /// Make `list_merge_requests` fail
    pub fn fail_list_mr(&self, msg: &str) {
        *self.error_on_list_mr.lock().unwrap() = Some(Injected::Api(msg.to_string()));
    }

    /// Make `update_merge_request` fail
    pub fn fail_update_mr(&self, msg: &str) {
        *self.error_on_update_mr.lock().unwrap() = Some(Injected::Api(msg.to_string()));
    }

    /// Make `list_pipelines` fail
    pub fn fail_list_pipelines(&self, msg: &str) {
        *self.error_on_list_pipelines.lock().unwrap() = Some(Injected::Api(msg.to_string()));
    }

    /// Set the open MRs returned by `list_merge_requests`
    pub fn set_existing_mrs(&self, mrs: Vec<MergeRequest>) {
        *self.list_mr_response.lock().unwrap() = mrs;
    }

    /// Set the pipelines returned by `list_pipelines`
    pub fn set_pipelines(&self, pipelines: Vec<Pipeline>) {
        *self.pipelines_response.lock().unwrap() = pipelines;
    }

    // === Call verification methods ===

    /// Get all `create_merge_request` calls
    pub fn get_create_mr_calls(&self) -> Vec<CreateMergeRequest> {
        self.create_mr_calls.lock().unwrap().clone()
    }

    /// Get all `list_merge_requests` calls
    pub fn get_list_mr_calls(&self) -> Vec<ListMrCall> {
        self.list_mr_calls.lock().unwrap().clone()
    }

    /// Get all `update_merge_request` calls
    pub fn get_update_mr_calls(&self) -> Vec<UpdateMrCall> {
        self.update_mr_calls.lock().unwrap().clone()
    }

    /// Get all SHAs `list_pipelines` was called with
    pub fn get_list_pipelines_calls(&self) -> Vec<String> {
        self.list_pipelines_calls.lock().unwrap().clone()
    }

    /// Snapshot of the shared call log
    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    /// Assert that no list or update calls happened
    pub fn assert_no_reconciliation(&self) {
        assert!(
            self.get_list_mr_calls().is_empty(),
            "Expected no list_merge_requests calls but got: {:?}",
            self.get_list_mr_calls()
        );
        assert!(
            self.get_update_mr_calls().is_empty(),
            "Expected no update_merge_request calls but got: {:?}",
            self.get_update_mr_calls()
        );
    }

    fn record(&self, entry: &str) {
        self.log.lock().unwrap().push(entry.to_string());
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn create_merge_request(&self, request: &CreateMergeRequest) -> Result<MergeRequest> {
        self.record("create");
        self.create_mr_calls.lock().unwrap().push(request.clone());

        if let Some(injected) = self.error_on_create_mr.lock().unwrap().as_ref() {
            return Err(injected.to_error());
        }

        let iid = self.next_iid.fetch_add(1, Ordering::SeqCst);
        let mut mr = super::make_mr(iid, &request.source_branch, &request.title, &request.description);
        mr.target_branch.clone_from(&request.target_branch);
        mr.web_url = format!(
            "https://gitlab.com/{}/-/merge_requests/{iid}",
            self.config.project_path()
        );
        Ok(mr)
    }

    async fn list_merge_requests(
        &self,
        source_branch: &str,
        target_branch: &str,
        state: MergeRequestState,
    ) -> Result<Vec<MergeRequest>> {
        self.record("list");
        self.list_mr_calls.lock().unwrap().push(ListMrCall {
            source_branch: source_branch.to_string(),
            target_branch: target_branch.to_string(),
            state,
        });

        if let Some(injected) = self.error_on_list_mr.lock().unwrap().as_ref() {
            return Err(injected.to_error());
        }

        Ok(self.list_mr_response.lock().unwrap().clone())
    }

    async fn update_merge_request(
        &self,
        iid: u64,
        update: &UpdateMergeRequest,
    ) -> Result<MergeRequest> {
        self.record("update");
        self.update_mr_calls.lock().unwrap().push(UpdateMrCall {
            iid,
            update: update.clone(),
        });

        if let Some(injected) = self.error_on_update_mr.lock().unwrap().as_ref() {
            return Err(injected.to_error());
        }

        let existing = self
            .list_mr_response
            .lock()
            .unwrap()
            .iter()
            .find(|mr| mr.iid == iid)
            .cloned();
        let mut mr = existing.ok_or_else(|| {
            Error::GitLabApi(format!("update_merge_request: no MR !{iid} configured"))
        })?;
        mr.target_branch.clone_from(&update.target_branch);
        if let Some(title) = &update.title {
            mr.title.clone_from(title);
        }
        if let Some(description) = &update.description {
            mr.description.clone_from(description);
        }
        Ok(mr)
    }

    async fn list_pipelines(&self, sha: &str) -> Result<Vec<Pipeline>> {
        self.record("pipelines");
        self.list_pipelines_calls
            .lock()
            .unwrap()
            .push(sha.to_string());

        if let Some(injected) = self.error_on_list_pipelines.lock().unwrap().as_ref() {
            return Err(injected.to_error());
        }

        Ok(self.pipelines_response.lock().unwrap().clone())
    }
}

/// Throttle that never waits but records each permit it hands out
pub struct CountingThrottle {
    name: String,
    log: CallLog,
    permits: AtomicU64,
}

impl CountingThrottle {
    /// Create a throttle that logs `"<name>_permit"` on every acquire
    pub fn new(name: &str, log: CallLog) -> Self {
        Self {
            name: name.to_string(),
            log,
            permits: AtomicU64::new(0),
        }
    }

    /// Number of permits handed out so far
    pub fn permits(&self) -> u64 {
        self.permits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Throttle for CountingThrottle {
    async fn acquire(&self) {
        self.permits.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(format!("{}_permit", self.name));
    }
}
