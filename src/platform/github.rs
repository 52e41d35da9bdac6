//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{
    BranchMergeOutcome, MergeMethod, MergeResult, PlatformConfig, PrState, PrStateUpdate,
    PrUpdate, PullRequest,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

const DEFAULT_API_URL: &str = "https://api.github.com";

/// GitHub service using octocrab
///
/// Typed pulls endpoints go through octocrab. Endpoints whose HTTP status
/// carries meaning (ref creation, branch merges, reviews, PR updates) use raw
/// reqwest calls so the status can be inspected directly.
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
    /// Token for raw HTTP requests
    token: String,
    /// HTTP client for raw requests
    http_client: Client,
    /// API base URL for raw requests, without trailing slash
    api_base: String,
}

impl GitHubService {
    /// Create a new GitHub service
    pub fn new(token: &str, owner: String, repo: String, api_url: Option<String>) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        let api_base = if let Some(ref url) = api_url {
            builder = builder
                .base_uri(url.as_str())
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
            url.trim_end_matches('/').to_string()
        } else {
            DEFAULT_API_URL.to_string()
        };

        let client = builder
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("combine-prs")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config: PlatformConfig {
                owner,
                repo,
                api_url,
            },
            token: token.to_string(),
            http_client,
            api_base,
        })
    }

    /// Build a raw request against `/repos/{owner}/{repo}{path}`
    fn repo_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!(
            "{}/repos/{}/{}{path}",
            self.api_base, self.config.owner, self.config.repo
        );

        self.http_client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    /// Convert a non-success response into a typed error
    async fn error_from_response(response: Response) -> Error {
        #[derive(Deserialize)]
        struct ApiMessage {
            message: String,
        }

        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiMessage>(&text).map_or(text, |m| m.message);
        Error::from_status(status, message)
    }
}

/// Helper to convert octocrab PR to our `PullRequest` type
fn pr_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    // IssueState is non-exhaustive, so use wildcard for Closed and any future variants
    let state = match pr.state {
        Some(octocrab::models::IssueState::Open) => PrState::Open,
        Some(octocrab::models::IssueState::Closed) if pr.merged_at.is_some() => PrState::Merged,
        Some(_) | None => PrState::Closed,
    };

    PullRequest {
        number: pr.number,
        title: pr.title.clone().unwrap_or_default(),
        body: pr.body.clone(),
        state,
        head_ref: pr.head.ref_field.clone(),
        head_label: pr.head.label.clone().unwrap_or_default(),
        head_sha: pr.head.sha.clone(),
        base_ref: pr.base.ref_field.clone(),
        base_sha: pr.base.sha.clone(),
        author: pr.user.as_ref().map(|u| u.login.clone()),
        mergeable: pr.mergeable,
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn list_open_prs(&self) -> Result<Vec<PullRequest>> {
        debug!("listing open PRs");
        let first_page = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list()
            .state(octocrab::params::State::Open)
            .per_page(100)
            .send()
            .await?;

        let prs = self.client.all_pages(first_page).await?;
        let result: Vec<PullRequest> = prs.iter().map(pr_from_octocrab).collect();
        debug!(count = result.len(), "listed open PRs");
        Ok(result)
    }

    async fn find_open_prs_by_head(&self, head_branch: &str) -> Result<Vec<PullRequest>> {
        debug!(head_branch, "finding open PRs by head");
        let head = format!("{}:{}", &self.config.owner, head_branch);

        let prs = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list()
            .head(head)
            .state(octocrab::params::State::Open)
            .send()
            .await?;

        let result: Vec<PullRequest> = prs.items.iter().map(pr_from_octocrab).collect();
        debug!(count = result.len(), "found open PRs by head");
        Ok(result)
    }

    async fn create_branch(&self, branch: &str, sha: &str) -> Result<()> {
        debug!(branch, sha, "creating branch ref");
        let response = self
            .repo_request(Method::POST, "/git/refs")
            .json(&json!({
                "ref": format!("refs/heads/{branch}"),
                "sha": sha,
            }))
            .send()
            .await?;

        if response.status() == StatusCode::CREATED {
            debug!(branch, "created branch ref");
            return Ok(());
        }
        Err(Self::error_from_response(response).await)
    }

    async fn merge_branch(&self, base: &str, head: &str) -> Result<BranchMergeOutcome> {
        #[derive(Deserialize)]
        struct MergeCommit {
            sha: String,
        }

        debug!(base, head, "merging branch");
        let response = self
            .repo_request(Method::POST, "/merges")
            .json(&json!({ "base": base, "head": head }))
            .send()
            .await?;

        match response.status() {
            StatusCode::CREATED => {
                let commit: MergeCommit = response
                    .json()
                    .await
                    .map_err(|e| Error::GitHubApi(format!("Failed to parse merge commit: {e}")))?;
                debug!(base, head, sha = %commit.sha, "merged branch");
                Ok(BranchMergeOutcome::Merged { sha: commit.sha })
            }
            StatusCode::NO_CONTENT => {
                debug!(base, head, "branch already up to date");
                Ok(BranchMergeOutcome::UpToDate)
            }
            _ => Err(Self::error_from_response(response).await),
        }
    }

    async fn create_pr(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest> {
        debug!(head, base, "creating PR");
        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .create(title, head, base)
            .body(body)
            .send()
            .await?;

        let result = pr_from_octocrab(&pr);
        debug!(pr_number = result.number, "created PR");
        Ok(result)
    }

    async fn update_pr(&self, pr_number: u64, update: PrUpdate) -> Result<PullRequest> {
        debug!(pr_number, ?update, "updating PR");
        let mut payload = serde_json::Map::new();
        if let Some(title) = update.title {
            payload.insert("title".to_string(), json!(title));
        }
        if let Some(body) = update.body {
            payload.insert("body".to_string(), json!(body));
        }
        if let Some(state) = update.state {
            let state = match state {
                PrStateUpdate::Open => "open",
                PrStateUpdate::Closed => "closed",
            };
            payload.insert("state".to_string(), json!(state));
        }

        let response = self
            .repo_request(Method::PATCH, &format!("/pulls/{pr_number}"))
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let pr: octocrab::models::pulls::PullRequest = response
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse updated PR: {e}")))?;

        debug!(pr_number, "updated PR");
        Ok(pr_from_octocrab(&pr))
    }

    async fn get_pr(&self, pr_number: u64) -> Result<PullRequest> {
        debug!(pr_number, "getting PR");
        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .get(pr_number)
            .await?;

        let result = pr_from_octocrab(&pr);
        debug!(pr_number, mergeable = ?result.mergeable, state = %result.state, "got PR");
        Ok(result)
    }

    async fn approve_pr(&self, pr_number: u64) -> Result<()> {
        debug!(pr_number, "approving PR");
        let response = self
            .repo_request(Method::POST, &format!("/pulls/{pr_number}/reviews"))
            .json(&json!({ "event": "APPROVE" }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }
        debug!(pr_number, "approved PR");
        Ok(())
    }

    async fn merge_pr(&self, pr_number: u64, method: MergeMethod) -> Result<MergeResult> {
        debug!(pr_number, %method, "merging PR");

        let octocrab_method = match method {
            MergeMethod::Squash => octocrab::params::pulls::MergeMethod::Squash,
            MergeMethod::Merge => octocrab::params::pulls::MergeMethod::Merge,
            MergeMethod::Rebase => octocrab::params::pulls::MergeMethod::Rebase,
        };

        let result = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .merge(pr_number)
            .method(octocrab_method)
            .send()
            .await?;

        let merge_result = MergeResult {
            merged: result.merged,
            sha: result.sha,
            message: result.message,
        };

        debug!(
            pr_number,
            merged = merge_result.merged,
            sha = ?merge_result.sha,
            "merge complete"
        );
        Ok(merge_result)
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
