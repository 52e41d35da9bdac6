//! Auto-merge of the combined PR and closure cascade
//!
//! Every failure in here is caught and reported through the returned
//! [`AutoMergeOutcome`]; nothing propagates to abort the run.

use crate::combine::progress::ProgressCallback;
use crate::combine::select::{CandidateFilter, list_candidates};
use crate::config::CombineConfig;
use crate::platform::PlatformService;
use tracing::{info, warn};

/// Outcome of trying to merge the combined PR
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoMergeOutcome {
    /// The combined PR merged and the originals were closed
    Merged {
        /// Merge commit SHA reported by the platform
        sha: Option<String>,
        /// Original PRs closed by the cascade
        closed: Vec<u64>,
    },
    /// Mergeability was false or not yet known; left open for a later run
    NotMergeable {
        /// The mergeable flag as reported (`None` = still computing)
        mergeable: Option<bool>,
    },
    /// The merge call returned without merging
    MergeFailed(String),
    /// A remote call failed
    Error(String),
}

impl AutoMergeOutcome {
    /// Whether the combined PR definitively merged
    pub const fn is_merged(&self) -> bool {
        matches!(self, Self::Merged { .. })
    }
}

impl std::fmt::Display for AutoMergeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Merged { closed, .. } => {
                write!(f, "merged, closed {} original PR(s)", closed.len())
            }
            Self::NotMergeable { mergeable: None } => {
                write!(f, "not mergeable (status still being computed)")
            }
            Self::NotMergeable { .. } => write!(f, "not mergeable"),
            Self::MergeFailed(msg) => write!(f, "merge failed: {msg}"),
            Self::Error(msg) => write!(f, "error: {msg}"),
        }
    }
}

/// Merge the combined PR if it is mergeable, then close the originals.
///
/// Only a definitive `merged` response counts as success. After a merge the
/// open PR list is fetched again, since new bot PRs may have appeared since
/// folding; only bot-authored candidates still open are closed.
pub async fn attempt_merge(
    platform: &dyn PlatformService,
    config: &CombineConfig,
    pr_number: u64,
    progress: &dyn ProgressCallback,
) -> AutoMergeOutcome {
    let pr = match platform.get_pr(pr_number).await {
        Ok(pr) => pr,
        Err(e) => {
            warn!(pr_number, error = %e, "failed to fetch combined PR");
            progress
                .on_message(&format!("Error merging pull request #{pr_number}: {e}"))
                .await;
            return AutoMergeOutcome::Error(e.to_string());
        }
    };

    if pr.mergeable != Some(true) {
        let outcome = AutoMergeOutcome::NotMergeable {
            mergeable: pr.mergeable,
        };
        progress
            .on_message(&format!("Pull request #{pr_number} is {outcome}"))
            .await;
        return outcome;
    }

    let result = match platform.merge_pr(pr_number, config.merge_method).await {
        Ok(result) => result,
        Err(e) => {
            warn!(pr_number, error = %e, "combined PR merge errored");
            progress
                .on_message(&format!("Error merging pull request #{pr_number}: {e}"))
                .await;
            return AutoMergeOutcome::Error(e.to_string());
        }
    };

    if !result.merged {
        let message = result
            .message
            .unwrap_or_else(|| "merge not performed".to_string());
        progress
            .on_message(&format!("Failed to merge pull request #{pr_number}: {message}"))
            .await;
        return AutoMergeOutcome::MergeFailed(message);
    }

    info!(pr_number, sha = ?result.sha, "combined PR merged");
    progress
        .on_message(&format!("Pull request #{pr_number} merged successfully"))
        .await;

    let closed = close_original_prs(platform, config, progress).await;
    AutoMergeOutcome::Merged {
        sha: result.sha,
        closed,
    }
}

/// Close every open bot-authored candidate. Failures are logged and skipped.
async fn close_original_prs(
    platform: &dyn PlatformService,
    config: &CombineConfig,
    progress: &dyn ProgressCallback,
) -> Vec<u64> {
    let originals = match list_candidates(platform, &CandidateFilter::bot_only(config)).await {
        Ok(prs) => prs,
        Err(e) => {
            warn!(error = %e, "failed to list PRs for closure cascade");
            return Vec::new();
        }
    };

    let mut closed = Vec::new();
    for pr in originals
        .iter()
        .filter(|pr| pr.head_ref != config.combined_pr_name)
    {
        match platform.close_pr(pr.number).await {
            Ok(()) => {
                progress
                    .on_message(&format!("Closed #{} ({})", pr.number, pr.head_ref))
                    .await;
                closed.push(pr.number);
            }
            Err(e) => warn!(pr_number = pr.number, error = %e, "failed to close original PR"),
        }
    }
    closed
}
