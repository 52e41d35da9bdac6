//! Branch consolidation - fold candidate branches into the integration branch
//!
//! Folds run strictly one after another: each merge must observe the
//! result of the previous one on the shared integration branch.

use crate::combine::progress::ProgressCallback;
use crate::config::CombineConfig;
use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{BranchMergeOutcome, PullRequest};
use tracing::{info, warn};

/// Whether the integration branch was created by this run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchCreation {
    /// The ref was created at the base commit
    Created,
    /// The ref already existed; left as-is
    AlreadyExists,
}

/// Why a candidate was skipped without attempting a merge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The candidate's head is the integration branch itself
    IntegrationBranch,
}

/// Per-candidate outcome of one fold
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FoldResult {
    /// Branch content is now in the integration branch
    Folded {
        /// Candidate head branch
        branch: String,
        /// Candidate PR number
        pr_number: u64,
        /// Merge commit, `None` if the branch was already contained
        merge_sha: Option<String>,
        /// Whether the original PR was closed right away
        closed: bool,
    },
    /// No merge was attempted
    Skipped {
        /// Candidate head branch
        branch: String,
        /// Candidate PR number
        pr_number: u64,
        /// Why it was skipped
        reason: SkipReason,
    },
    /// Merge was attempted and failed; the candidate is left untouched
    Failed {
        /// Candidate head branch
        branch: String,
        /// Candidate PR number
        pr_number: u64,
        /// Conflict or API error message
        reason: String,
    },
}

impl FoldResult {
    /// Head branch this result is about
    pub fn branch(&self) -> &str {
        match self {
            Self::Folded { branch, .. } | Self::Skipped { branch, .. } | Self::Failed { branch, .. } => {
                branch
            }
        }
    }

    /// PR number this result is about
    pub const fn pr_number(&self) -> u64 {
        match self {
            Self::Folded { pr_number, .. }
            | Self::Skipped { pr_number, .. }
            | Self::Failed { pr_number, .. } => *pr_number,
        }
    }

    /// Whether the branch was folded
    pub const fn is_folded(&self) -> bool {
        matches!(self, Self::Folded { .. })
    }

    /// Whether the candidate was skipped
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

impl std::fmt::Display for FoldResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Folded {
                branch,
                pr_number,
                merge_sha,
                closed,
            } => {
                write!(f, "folded {branch} (#{pr_number})")?;
                if let Some(sha) = merge_sha {
                    write!(f, " at {}", sha.get(..7).unwrap_or(sha))?;
                } else {
                    write!(f, ", already up to date")?;
                }
                if *closed {
                    write!(f, ", closed")?;
                }
                Ok(())
            }
            Self::Skipped {
                branch, pr_number, ..
            } => write!(f, "skipped {branch} (#{pr_number}): integration branch"),
            Self::Failed {
                branch,
                pr_number,
                reason,
            } => write!(f, "failed {branch} (#{pr_number}): {reason}"),
        }
    }
}

/// Create the integration branch at `base_sha` unless it already exists.
///
/// A 422 from ref creation means the ref exists and is not an error. Any
/// other failure is fatal for the run.
pub async fn ensure_integration_branch(
    platform: &dyn PlatformService,
    config: &CombineConfig,
    base_sha: &str,
) -> Result<BranchCreation> {
    match platform
        .create_branch(&config.combined_pr_name, base_sha)
        .await
    {
        Ok(()) => {
            info!(branch = %config.combined_pr_name, base_sha, "created integration branch");
            Ok(BranchCreation::Created)
        }
        Err(Error::Unprocessable(_)) => {
            info!(branch = %config.combined_pr_name, "integration branch already exists");
            Ok(BranchCreation::AlreadyExists)
        }
        Err(e) => Err(e),
    }
}

/// Fold one candidate into the integration branch.
///
/// Never returns an error: conflicts and API failures become
/// [`FoldResult::Failed`] so the caller can move on to the next candidate.
pub async fn fold(
    platform: &dyn PlatformService,
    config: &CombineConfig,
    candidate: &PullRequest,
    progress: &dyn ProgressCallback,
) -> FoldResult {
    let branch = candidate.head_ref.clone();
    let pr_number = candidate.number;

    if branch == config.combined_pr_name {
        progress
            .on_message(&format!("Skipping merge of {branch} into itself"))
            .await;
        return FoldResult::Skipped {
            branch,
            pr_number,
            reason: SkipReason::IntegrationBranch,
        };
    }

    let outcome = match platform
        .merge_branch(&config.combined_pr_name, &branch)
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(%branch, pr_number, error = %e, "fold failed");
            progress
                .on_message(&format!("Failed to merge {branch}: {e}"))
                .await;
            return FoldResult::Failed {
                branch,
                pr_number,
                reason: e.to_string(),
            };
        }
    };

    let merge_sha = match outcome {
        BranchMergeOutcome::Merged { sha } => Some(sha),
        BranchMergeOutcome::UpToDate => None,
    };

    // With auto-merge on, originals stay open until the combined PR lands.
    let mut closed = false;
    if merge_sha.is_some() && config.close_merged && !config.auto_merge_combined {
        match platform.close_pr(pr_number).await {
            Ok(()) => closed = true,
            Err(e) => warn!(pr_number, error = %e, "failed to close folded PR"),
        }
    }

    info!(%branch, pr_number, ?merge_sha, closed, "folded branch");
    let result = FoldResult::Folded {
        branch,
        pr_number,
        merge_sha,
        closed,
    };
    progress.on_message(&result.to_string()).await;
    result
}

/// Fold every candidate in order
pub async fn fold_all(
    platform: &dyn PlatformService,
    config: &CombineConfig,
    candidates: &[PullRequest],
    progress: &dyn ProgressCallback,
) -> Vec<FoldResult> {
    let mut results = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        results.push(fold(platform, config, candidate, progress).await);
    }
    results
}

/// Branch names that go into the combined PR ledger.
///
/// With `require_green`, only folded branches count. Without it, every
/// non-skipped candidate is listed whether or not its merge landed.
pub fn ledger_entries(results: &[FoldResult], require_green: bool) -> Vec<String> {
    results
        .iter()
        .filter(|r| {
            if require_green {
                r.is_folded()
            } else {
                !r.is_skipped()
            }
        })
        .map(|r| r.branch().to_string())
        .collect()
}
