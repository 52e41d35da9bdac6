//! Platform services for GitHub
//!
//! Provides the remote operations the combiner needs, behind a trait so the
//! consolidation logic can run against a mock in tests.

mod detection;
mod github;

pub use detection::parse_repo_slug;
pub use github::GitHubService;

use crate::error::Result;
use crate::types::{
    BranchMergeOutcome, MergeMethod, MergeResult, PlatformConfig, PrUpdate, PullRequest,
};
use async_trait::async_trait;

/// Platform service trait for branch and PR operations
///
/// Every method is a single bounded request-response. Status-dependent
/// outcomes are surfaced as typed errors (`Error::NotFound`,
/// `Error::Unprocessable`, `Error::MergeConflict`) so callers decide which
/// of them are recoverable.
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// List every open PR in the repository
    async fn list_open_prs(&self) -> Result<Vec<PullRequest>>;

    /// List open PRs whose head is `owner:head_branch`
    async fn find_open_prs_by_head(&self, head_branch: &str) -> Result<Vec<PullRequest>>;

    /// Create a branch ref pointing at `sha`
    async fn create_branch(&self, branch: &str, sha: &str) -> Result<()>;

    /// Merge `head` into `base` on the remote
    async fn merge_branch(&self, base: &str, head: &str) -> Result<BranchMergeOutcome>;

    /// Create a new PR
    async fn create_pr(&self, head: &str, base: &str, title: &str, body: &str)
    -> Result<PullRequest>;

    /// Update title, body or state of an existing PR
    async fn update_pr(&self, pr_number: u64, update: PrUpdate) -> Result<PullRequest>;

    /// Close a PR without merging it.
    ///
    /// Delegates to [`update_pr`](Self::update_pr) by default.
    async fn close_pr(&self, pr_number: u64) -> Result<()> {
        self.update_pr(pr_number, PrUpdate::close()).await?;
        Ok(())
    }

    /// Fetch a single PR, including its mergeability
    async fn get_pr(&self, pr_number: u64) -> Result<PullRequest>;

    /// Submit an approving review
    async fn approve_pr(&self, pr_number: u64) -> Result<()>;

    /// Merge a PR into its base
    async fn merge_pr(&self, pr_number: u64, method: MergeMethod) -> Result<MergeResult>;

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}

/// Create a GitHub platform service from repository coordinates and a token
pub fn create_platform_service(
    config: &PlatformConfig,
    token: &str,
) -> Result<Box<dyn PlatformService>> {
    Ok(Box::new(GitHubService::new(
        token,
        config.owner.clone(),
        config.repo.clone(),
        config.api_url.clone(),
    )?))
}
