//! Core types for combine-prs

use serde::{Deserialize, Serialize};

/// A pull request as seen by the combiner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// PR body/description
    pub body: Option<String>,
    /// Current state of the PR
    pub state: PrState,
    /// Head branch name
    pub head_ref: String,
    /// Head label (`owner:branch`), used for ignore matching
    pub head_label: String,
    /// Head commit SHA
    pub head_sha: String,
    /// Base branch name
    pub base_ref: String,
    /// Base commit SHA at the time the PR was read
    pub base_sha: String,
    /// Login of the PR author, if known
    pub author: Option<String>,
    /// Whether PR can be merged (no conflicts)
    /// - `Some(true)` = mergeable
    /// - `Some(false)` = has conflicts
    /// - `None` = unknown (GitHub still computing)
    pub mergeable: Option<bool>,
    /// Web URL for the PR
    pub html_url: String,
}

impl PullRequest {
    /// Whether the PR was opened by the given login
    pub fn is_authored_by(&self, login: &str) -> bool {
        self.author.as_deref() == Some(login)
    }
}

/// PR state (open, closed, merged)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrState {
    /// PR is open
    Open,
    /// PR was closed without merging
    Closed,
    /// PR was merged
    Merged,
}

impl std::fmt::Display for PrState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Merged => write!(f, "merged"),
        }
    }
}

/// Requested state when updating a PR
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrStateUpdate {
    /// Reopen or keep open
    Open,
    /// Close without merging
    Closed,
}

/// Partial update of a pull request; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrUpdate {
    /// New title
    pub title: Option<String>,
    /// New body
    pub body: Option<String>,
    /// New state
    pub state: Option<PrStateUpdate>,
}

impl PrUpdate {
    /// Update that only closes the PR
    pub const fn close() -> Self {
        Self {
            title: None,
            body: None,
            state: Some(PrStateUpdate::Closed),
        }
    }
}

/// Outcome of merging one branch into another via the merges API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchMergeOutcome {
    /// A merge commit was created (201)
    Merged {
        /// SHA of the new merge commit
        sha: String,
    },
    /// Base already contained head, nothing to do (204)
    UpToDate,
}

/// Result of merging a pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    /// Whether the merge was successful
    pub merged: bool,
    /// The SHA of the merge commit (if successful)
    pub sha: Option<String>,
    /// Message from the merge operation (especially on failure)
    pub message: Option<String>,
}

/// Merge strategy/method
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
    /// Create a merge commit
    #[default]
    Merge,
    /// Squash all commits into one
    Squash,
    /// Rebase commits onto base branch
    Rebase,
}

impl std::fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Merge => write!(f, "merge"),
            Self::Squash => write!(f, "squash"),
            Self::Rebase => write!(f, "rebase"),
        }
    }
}

impl std::str::FromStr for MergeMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "merge" => Ok(Self::Merge),
            "squash" => Ok(Self::Squash),
            "rebase" => Ok(Self::Rebase),
            other => Err(format!("unknown merge method '{other}'")),
        }
    }
}

/// Repository coordinates for the platform service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom API base URL (None for api.github.com)
    pub api_url: Option<String>,
}
