//! Mock platform service for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use combine_prs::error::{Error, Result};
use combine_prs::platform::PlatformService;
use combine_prs::types::{
    BranchMergeOutcome, MergeMethod, MergeResult, PlatformConfig, PrState, PrStateUpdate,
    PrUpdate, PullRequest,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// How a branch behaves when merged into the integration branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchBehavior {
    /// Creates a merge commit (201)
    Clean,
    /// Already contained in the base (204)
    UpToDate,
    /// Conflicting content (409)
    Conflict,
    /// Some other API failure
    ApiError(String),
}

/// How `list_open_prs` should fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListFailure {
    /// 404
    NotFound,
    /// Anything else
    Other(String),
}

/// Call record for `create_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePrCall {
    pub head: String,
    pub base: String,
    pub title: String,
    pub body: String,
}

/// Call record for `update_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePrCall {
    pub pr_number: u64,
    pub update: PrUpdate,
}

/// Call record for `merge_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePrCall {
    pub pr_number: u64,
    pub method: MergeMethod,
}

/// In-memory repository implementing `PlatformService`
///
/// Features:
/// - PRs, branch refs and branch merges kept as simple state
/// - Auto-incrementing PR numbers for created PRs (starting at 100)
/// - Call tracking plus an ordered event log for sequencing assertions
/// - Configurable responses per branch / PR
/// - Error injection for failure path testing
pub struct MockPlatformService {
    config: PlatformConfig,
    next_pr_number: AtomicU64,
    prs: Mutex<Vec<PullRequest>>,
    branches: Mutex<HashMap<String, String>>,
    branch_behaviors: Mutex<HashMap<String, BranchBehavior>>,
    mergeable: Mutex<HashMap<u64, Option<bool>>>,
    merge_responses: Mutex<HashMap<u64, MergeResult>>,
    // Call tracking
    events: Mutex<Vec<String>>,
    list_calls: AtomicU64,
    list_call_times: Mutex<Vec<Instant>>,
    find_by_head_calls: Mutex<Vec<String>>,
    create_branch_calls: Mutex<Vec<(String, String)>>,
    merge_branch_calls: Mutex<Vec<(String, String)>>,
    create_pr_calls: Mutex<Vec<CreatePrCall>>,
    update_pr_calls: Mutex<Vec<UpdatePrCall>>,
    get_pr_calls: Mutex<Vec<u64>>,
    approve_calls: Mutex<Vec<u64>>,
    merge_pr_calls: Mutex<Vec<MergePrCall>>,
    // Error injection
    error_on_list: Mutex<Option<ListFailure>>,
    error_on_create_branch: Mutex<Option<String>>,
    error_on_get_pr: Mutex<Option<String>>,
    error_on_create_pr: Mutex<Option<String>>,
    error_on_approve: Mutex<HashSet<u64>>,
    error_on_merge_pr: Mutex<HashMap<u64, String>>,
    error_on_close: Mutex<HashSet<u64>>,
}

impl MockPlatformService {
    /// Create a new mock with the given config
    pub fn with_config(config: PlatformConfig) -> Self {
        Self {
            config,
            next_pr_number: AtomicU64::new(100),
            prs: Mutex::new(Vec::new()),
            branches: Mutex::new(HashMap::new()),
            branch_behaviors: Mutex::new(HashMap::new()),
            mergeable: Mutex::new(HashMap::new()),
            merge_responses: Mutex::new(HashMap::new()),
            events: Mutex::new(Vec::new()),
            list_calls: AtomicU64::new(0),
            list_call_times: Mutex::new(Vec::new()),
            find_by_head_calls: Mutex::new(Vec::new()),
            create_branch_calls: Mutex::new(Vec::new()),
            merge_branch_calls: Mutex::new(Vec::new()),
            create_pr_calls: Mutex::new(Vec::new()),
            update_pr_calls: Mutex::new(Vec::new()),
            get_pr_calls: Mutex::new(Vec::new()),
            approve_calls: Mutex::new(Vec::new()),
            merge_pr_calls: Mutex::new(Vec::new()),
            error_on_list: Mutex::new(None),
            error_on_create_branch: Mutex::new(None),
            error_on_get_pr: Mutex::new(None),
            error_on_create_pr: Mutex::new(None),
            error_on_approve: Mutex::new(HashSet::new()),
            error_on_merge_pr: Mutex::new(HashMap::new()),
            error_on_close: Mutex::new(HashSet::new()),
        }
    }

    // === State setup ===

    /// Add a PR to the repository
    pub fn add_pr(&self, pr: PullRequest) {
        self.prs.lock().unwrap().push(pr);
    }

    /// Add a branch ref
    pub fn add_branch(&self, name: &str, sha: &str) {
        self.branches
            .lock()
            .unwrap()
            .insert(name.to_string(), sha.to_string());
    }

    /// Set how merging `branch` into another branch behaves
    pub fn set_branch_behavior(&self, branch: &str, behavior: BranchBehavior) {
        self.branch_behaviors
            .lock()
            .unwrap()
            .insert(branch.to_string(), behavior);
    }

    /// Set the mergeable flag reported by `get_pr`
    pub fn set_mergeable(&self, pr_number: u64, mergeable: Option<bool>) {
        self.mergeable.lock().unwrap().insert(pr_number, mergeable);
    }

    /// Set the response for `merge_pr` for a specific PR
    pub fn set_merge_response(&self, pr_number: u64, result: MergeResult) {
        self.merge_responses
            .lock()
            .unwrap()
            .insert(pr_number, result);
    }

    // === Error injection methods ===

    /// Make `list_open_prs` fail
    pub fn fail_list(&self, failure: ListFailure) {
        *self.error_on_list.lock().unwrap() = Some(failure);
    }

    /// Make `create_branch` fail with a non-422 error
    pub fn fail_create_branch(&self, msg: &str) {
        *self.error_on_create_branch.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `get_pr` fail
    pub fn fail_get_pr(&self, msg: &str) {
        *self.error_on_get_pr.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `create_pr` fail
    pub fn fail_create_pr(&self, msg: &str) {
        *self.error_on_create_pr.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `approve_pr` fail for one PR
    pub fn fail_approve(&self, pr_number: u64) {
        self.error_on_approve.lock().unwrap().insert(pr_number);
    }

    /// Make `merge_pr` fail for one PR
    pub fn fail_merge_pr(&self, pr_number: u64, msg: &str) {
        self.error_on_merge_pr
            .lock()
            .unwrap()
            .insert(pr_number, msg.to_string());
    }

    /// Make closing one PR fail
    pub fn fail_close(&self, pr_number: u64) {
        self.error_on_close.lock().unwrap().insert(pr_number);
    }

    // === State inspection ===

    /// Current state of a PR
    pub fn pr_state(&self, pr_number: u64) -> PrState {
        self.find(pr_number).expect("PR exists").state
    }

    /// Current body of a PR
    pub fn pr_body(&self, pr_number: u64) -> Option<String> {
        self.find(pr_number).expect("PR exists").body
    }

    /// Whether a branch ref exists
    pub fn has_branch(&self, name: &str) -> bool {
        self.branches.lock().unwrap().contains_key(name)
    }

    /// SHA a branch ref points at
    pub fn branch_sha(&self, name: &str) -> Option<String> {
        self.branches.lock().unwrap().get(name).cloned()
    }

    /// Ordered log of state-changing calls
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    /// Position of an event in the log
    pub fn event_index(&self, event: &str) -> Option<usize> {
        self.events().iter().position(|e| e == event)
    }

    // === Call verification methods ===

    pub fn list_call_count(&self) -> u64 {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// When each `list_open_prs` call arrived
    pub fn list_call_times(&self) -> Vec<Instant> {
        self.list_call_times.lock().unwrap().clone()
    }

    pub fn get_find_by_head_calls(&self) -> Vec<String> {
        self.find_by_head_calls.lock().unwrap().clone()
    }

    pub fn get_create_branch_calls(&self) -> Vec<(String, String)> {
        self.create_branch_calls.lock().unwrap().clone()
    }

    pub fn get_merge_branch_calls(&self) -> Vec<(String, String)> {
        self.merge_branch_calls.lock().unwrap().clone()
    }

    pub fn get_create_pr_calls(&self) -> Vec<CreatePrCall> {
        self.create_pr_calls.lock().unwrap().clone()
    }

    pub fn get_update_pr_calls(&self) -> Vec<UpdatePrCall> {
        self.update_pr_calls.lock().unwrap().clone()
    }

    pub fn get_pr_calls(&self) -> Vec<u64> {
        self.get_pr_calls.lock().unwrap().clone()
    }

    pub fn get_approve_calls(&self) -> Vec<u64> {
        self.approve_calls.lock().unwrap().clone()
    }

    pub fn get_merge_pr_calls(&self) -> Vec<MergePrCall> {
        self.merge_pr_calls.lock().unwrap().clone()
    }

    /// Number of calls that would write to the remote
    pub fn write_call_count(&self) -> usize {
        self.create_branch_calls.lock().unwrap().len()
            + self.merge_branch_calls.lock().unwrap().len()
            + self.create_pr_calls.lock().unwrap().len()
            + self.update_pr_calls.lock().unwrap().len()
            + self.approve_calls.lock().unwrap().len()
            + self.merge_pr_calls.lock().unwrap().len()
    }

    /// Assert that a PR was closed via `update_pr`
    pub fn assert_closed(&self, pr_number: u64) {
        let calls = self.get_update_pr_calls();
        assert!(
            calls
                .iter()
                .any(|c| c.pr_number == pr_number && c.update.state == Some(PrStateUpdate::Closed)),
            "Expected PR #{pr_number} to be closed but got: {calls:?}"
        );
    }

    /// Assert that a PR was never closed
    pub fn assert_not_closed(&self, pr_number: u64) {
        let calls = self.get_update_pr_calls();
        assert!(
            !calls
                .iter()
                .any(|c| c.pr_number == pr_number && c.update.state == Some(PrStateUpdate::Closed)),
            "Expected PR #{pr_number} NOT to be closed but it was: {calls:?}"
        );
    }

    fn find(&self, pr_number: u64) -> Option<PullRequest> {
        self.prs
            .lock()
            .unwrap()
            .iter()
            .find(|pr| pr.number == pr_number)
            .cloned()
    }

    fn log(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn list_open_prs(&self) -> Result<Vec<PullRequest>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.list_call_times.lock().unwrap().push(Instant::now());

        match self.error_on_list.lock().unwrap().as_ref() {
            Some(ListFailure::NotFound) => return Err(Error::NotFound("Not Found".to_string())),
            Some(ListFailure::Other(msg)) => return Err(Error::GitHubApi(msg.clone())),
            None => {}
        }

        Ok(self
            .prs
            .lock()
            .unwrap()
            .iter()
            .filter(|pr| pr.state == PrState::Open)
            .cloned()
            .collect())
    }

    async fn find_open_prs_by_head(&self, head_branch: &str) -> Result<Vec<PullRequest>> {
        self.find_by_head_calls
            .lock()
            .unwrap()
            .push(head_branch.to_string());

        Ok(self
            .prs
            .lock()
            .unwrap()
            .iter()
            .filter(|pr| pr.state == PrState::Open && pr.head_ref == head_branch)
            .cloned()
            .collect())
    }

    async fn create_branch(&self, branch: &str, sha: &str) -> Result<()> {
        self.create_branch_calls
            .lock()
            .unwrap()
            .push((branch.to_string(), sha.to_string()));

        // Check for injected error
        if let Some(msg) = self.error_on_create_branch.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }

        let mut branches = self.branches.lock().unwrap();
        if branches.contains_key(branch) {
            return Err(Error::Unprocessable("Reference already exists".to_string()));
        }
        branches.insert(branch.to_string(), sha.to_string());
        drop(branches);
        self.log(format!("create_branch {branch}"));
        Ok(())
    }

    async fn merge_branch(&self, base: &str, head: &str) -> Result<BranchMergeOutcome> {
        self.merge_branch_calls
            .lock()
            .unwrap()
            .push((base.to_string(), head.to_string()));

        if !self.has_branch(base) {
            return Err(Error::NotFound(format!("Base {base} does not exist")));
        }

        let behavior = self
            .branch_behaviors
            .lock()
            .unwrap()
            .get(head)
            .cloned()
            .unwrap_or(BranchBehavior::Clean);

        match behavior {
            BranchBehavior::Clean => {
                let sha = format!("merge-{}", head.replace('/', "-"));
                self.add_branch(base, &sha);
                self.log(format!("merge_branch {base}<-{head}"));
                Ok(BranchMergeOutcome::Merged { sha })
            }
            BranchBehavior::UpToDate => Ok(BranchMergeOutcome::UpToDate),
            BranchBehavior::Conflict => Err(Error::MergeConflict("Merge conflict".to_string())),
            BranchBehavior::ApiError(msg) => Err(Error::GitHubApi(msg)),
        }
    }

    async fn create_pr(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest> {
        self.create_pr_calls.lock().unwrap().push(CreatePrCall {
            head: head.to_string(),
            base: base.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        });

        // Check for injected error
        if let Some(msg) = self.error_on_create_pr.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }

        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        let pr = PullRequest {
            number,
            title: title.to_string(),
            body: Some(body.to_string()),
            state: PrState::Open,
            head_ref: head.to_string(),
            head_label: format!("{}:{head}", self.config.owner),
            head_sha: self.branch_sha(head).unwrap_or_default(),
            base_ref: base.to_string(),
            base_sha: self.branch_sha(base).unwrap_or_default(),
            author: Some("github-actions[bot]".to_string()),
            mergeable: None,
            html_url: format!("https://github.com/test/repo/pull/{number}"),
        };
        self.add_pr(pr.clone());
        self.log(format!("create_pr #{number}"));
        Ok(pr)
    }

    async fn update_pr(&self, pr_number: u64, update: PrUpdate) -> Result<PullRequest> {
        self.update_pr_calls.lock().unwrap().push(UpdatePrCall {
            pr_number,
            update: update.clone(),
        });

        if update.state == Some(PrStateUpdate::Closed)
            && self.error_on_close.lock().unwrap().contains(&pr_number)
        {
            return Err(Error::GitHubApi(format!("cannot close #{pr_number}")));
        }

        let mut prs = self.prs.lock().unwrap();
        let pr = prs
            .iter_mut()
            .find(|pr| pr.number == pr_number)
            .ok_or_else(|| Error::NotFound(format!("PR #{pr_number}")))?;

        if let Some(title) = update.title {
            pr.title = title;
        }
        if let Some(body) = update.body {
            pr.body = Some(body);
        }
        match update.state {
            Some(PrStateUpdate::Closed) => pr.state = PrState::Closed,
            Some(PrStateUpdate::Open) => pr.state = PrState::Open,
            None => {}
        }
        let result = pr.clone();
        drop(prs);

        match update.state {
            Some(PrStateUpdate::Closed) => self.log(format!("close #{pr_number}")),
            _ => self.log(format!("update #{pr_number}")),
        }
        Ok(result)
    }

    async fn get_pr(&self, pr_number: u64) -> Result<PullRequest> {
        self.get_pr_calls.lock().unwrap().push(pr_number);

        if let Some(msg) = self.error_on_get_pr.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }

        let mut pr = self
            .find(pr_number)
            .ok_or_else(|| Error::NotFound(format!("PR #{pr_number}")))?;
        if let Some(mergeable) = self.mergeable.lock().unwrap().get(&pr_number) {
            pr.mergeable = *mergeable;
        }
        Ok(pr)
    }

    async fn approve_pr(&self, pr_number: u64) -> Result<()> {
        self.approve_calls.lock().unwrap().push(pr_number);

        if self.error_on_approve.lock().unwrap().contains(&pr_number) {
            return Err(Error::GitHubApi(format!("cannot approve #{pr_number}")));
        }
        self.log(format!("approve #{pr_number}"));
        Ok(())
    }

    async fn merge_pr(&self, pr_number: u64, method: MergeMethod) -> Result<MergeResult> {
        self.merge_pr_calls
            .lock()
            .unwrap()
            .push(MergePrCall { pr_number, method });

        // Check for injected error
        if let Some(msg) = self.error_on_merge_pr.lock().unwrap().get(&pr_number) {
            return Err(Error::GitHubApi(msg.clone()));
        }

        let result = self
            .merge_responses
            .lock()
            .unwrap()
            .get(&pr_number)
            .cloned()
            .unwrap_or_else(|| MergeResult {
                merged: true,
                sha: Some(format!("merged_sha_{pr_number}")),
                message: Some("Pull Request successfully merged".to_string()),
            });

        if result.merged {
            if let Some(pr) = self
                .prs
                .lock()
                .unwrap()
                .iter_mut()
                .find(|pr| pr.number == pr_number)
            {
                pr.state = PrState::Merged;
            }
            self.log(format!("merge_pr #{pr_number}"));
        }
        Ok(result)
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
