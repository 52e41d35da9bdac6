//! Individual merge mode - approve and merge each bot PR on its own

use crate::combine::progress::ProgressCallback;
use crate::combine::select::{CandidateFilter, select_candidates};
use crate::config::CombineConfig;
use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::PullRequest;
use tracing::{info, warn};

/// Outcome for one PR in individual mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndividualOutcome {
    /// Approved and merged
    Merged {
        /// Merge commit SHA
        sha: Option<String>,
    },
    /// Approval or merge failed
    Failed(String),
}

/// Per-PR record of an individual merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndividualMerge {
    /// PR number
    pub pr_number: u64,
    /// Head branch
    pub branch: String,
    /// What happened
    pub outcome: IndividualOutcome,
}

impl IndividualMerge {
    /// Whether this PR merged
    pub const fn is_merged(&self) -> bool {
        matches!(self.outcome, IndividualOutcome::Merged { .. })
    }
}

async fn approve_and_merge(
    platform: &dyn PlatformService,
    config: &CombineConfig,
    pr: &PullRequest,
) -> Result<Option<String>> {
    platform.approve_pr(pr.number).await?;
    let result = platform.merge_pr(pr.number, config.merge_method).await?;
    if !result.merged {
        return Err(Error::Platform(
            result
                .message
                .unwrap_or_else(|| "merge not performed".to_string()),
        ));
    }
    Ok(result.sha)
}

/// Approve and merge every bot-authored candidate in `open_prs`.
///
/// Each PR is independent: a failure is recorded and the loop continues.
pub async fn merge_individually(
    platform: &dyn PlatformService,
    config: &CombineConfig,
    open_prs: &[PullRequest],
    progress: &dyn ProgressCallback,
) -> Vec<IndividualMerge> {
    let candidates = select_candidates(open_prs, &CandidateFilter::bot_only(config));
    let mut results = Vec::with_capacity(candidates.len());

    for pr in &candidates {
        let outcome = match approve_and_merge(platform, config, pr).await {
            Ok(sha) => {
                info!(pr_number = pr.number, ?sha, "merged PR individually");
                progress
                    .on_message(&format!("Merged pull request #{}", pr.number))
                    .await;
                IndividualOutcome::Merged { sha }
            }
            Err(e) => {
                warn!(pr_number = pr.number, error = %e, "individual merge failed");
                progress
                    .on_message(&format!("Failed to merge pull request #{}: {e}", pr.number))
                    .await;
                IndividualOutcome::Failed(e.to_string())
            }
        };

        results.push(IndividualMerge {
            pr_number: pr.number,
            branch: pr.head_ref.clone(),
            outcome,
        });
    }

    results
}
