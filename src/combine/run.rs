//! Run orchestration
//!
//! Gather (window check, open PR list) → consolidate → upsert → auto-merge.
//! Only the initial listing, branch creation and the combined PR upsert can
//! fail the run; per-candidate failures are recorded in the report.

use crate::combine::auto_merge::{AutoMergeOutcome, attempt_merge};
use crate::combine::combined_pr::{CombinedPrUpsert, find_combined_pr, upsert_combined_pr};
use crate::combine::consolidate::{
    BranchCreation, FoldResult, ensure_integration_branch, fold_all, ledger_entries,
};
use crate::combine::individual::{IndividualMerge, merge_individually};
use crate::combine::progress::ProgressCallback;
use crate::combine::select::{CandidateFilter, select_candidates};
use crate::config::CombineConfig;
use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::schedule::is_within_window;
use crate::types::PullRequest;
use chrono::NaiveDateTime;
use tracing::{debug, info};

/// Report for a consolidation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineReport {
    /// Base branch the combined PR targets
    pub base_branch: String,
    /// Whether the integration branch was created this run
    pub branch_creation: BranchCreation,
    /// Per-candidate fold outcomes, in candidate order
    pub folds: Vec<FoldResult>,
    /// Branch names added to the combined PR ledger
    pub ledger: Vec<String>,
    /// Combined PR upsert, if anything was added
    pub combined_pr: Option<CombinedPrUpsert>,
    /// Merge retry of an already-open combined PR when nothing new was added
    pub retried_merge: Option<(u64, AutoMergeOutcome)>,
}

impl CombineReport {
    /// Number of folded candidates
    pub fn folded_count(&self) -> usize {
        self.folds.iter().filter(|f| f.is_folded()).count()
    }

    /// Number of failed candidates
    pub fn failed_count(&self) -> usize {
        self.folds
            .iter()
            .filter(|f| matches!(f, FoldResult::Failed { .. }))
            .count()
    }

    /// Auto-merge outcome from either the upsert or the retry path
    pub fn auto_merge(&self) -> Option<&AutoMergeOutcome> {
        self.combined_pr
            .as_ref()
            .and_then(|c| c.auto_merge.as_ref())
            .or(self.retried_merge.as_ref().map(|(_, outcome)| outcome))
    }
}

/// What a run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Current time is outside the configured day/hour window
    OutsideWindow,
    /// No open PRs in the repository
    NoPullRequests,
    /// Individual merge mode results
    Individual(Vec<IndividualMerge>),
    /// Consolidation results
    Combined(CombineReport),
}

impl RunOutcome {
    /// Whether the run should be reported as failed.
    ///
    /// Only individual merge failures count; fold failures are expected and
    /// simply leave the candidate for a later run.
    pub fn has_failures(&self) -> bool {
        match self {
            Self::Individual(merges) => merges.iter().any(|m| !m.is_merged()),
            _ => false,
        }
    }
}

/// List open PRs, treating a 404 as "no work"
pub async fn list_open_prs_or_empty(platform: &dyn PlatformService) -> Result<Vec<PullRequest>> {
    match platform.list_open_prs().await {
        Ok(prs) => Ok(prs),
        Err(Error::NotFound(msg)) => {
            debug!(%msg, "PR listing returned not found, treating as empty");
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

/// Run the whole pipeline once.
///
/// Concurrent runs against the same repository are not safe and must be
/// serialized by the caller.
pub async fn run_combine(
    platform: &dyn PlatformService,
    config: &CombineConfig,
    now: &NaiveDateTime,
    progress: &dyn ProgressCallback,
) -> Result<RunOutcome> {
    if !is_within_window(now, config.day, config.hour) {
        info!(day = ?config.day, hour = ?config.hour, "outside run window");
        return Ok(RunOutcome::OutsideWindow);
    }

    if !config.settle_delay.is_zero() {
        tokio::time::sleep(config.settle_delay).await;
    }

    let open_prs = list_open_prs_or_empty(platform).await?;
    let Some(first) = open_prs.first() else {
        progress.on_message("No open pull requests").await;
        return Ok(RunOutcome::NoPullRequests);
    };
    let base_sha = first.base_sha.clone();
    let base_branch = first.base_ref.clone();

    if config.merge_individually {
        let merges = merge_individually(platform, config, &open_prs, progress).await;
        return Ok(RunOutcome::Individual(merges));
    }

    let branch_creation = ensure_integration_branch(platform, config, &base_sha).await?;

    let candidates = select_candidates(&open_prs, &CandidateFilter::from_config(config));
    progress
        .on_message(&format!(
            "Folding {} candidate(s) into {}",
            candidates.len(),
            config.combined_pr_name
        ))
        .await;

    let folds = fold_all(platform, config, &candidates, progress).await;
    let ledger = ledger_entries(&folds, config.require_green);

    let combined_pr =
        upsert_combined_pr(platform, config, &ledger, &base_branch, progress).await?;

    // Nothing new to add, but an earlier combined PR may now be mergeable.
    let retried_merge = if combined_pr.is_none() && config.auto_merge_combined {
        match find_combined_pr(platform, config).await? {
            Some(existing) => {
                let outcome = attempt_merge(platform, config, existing.number, progress).await;
                Some((existing.number, outcome))
            }
            None => None,
        }
    } else {
        None
    };

    Ok(RunOutcome::Combined(CombineReport {
        base_branch,
        branch_creation,
        folds,
        ledger,
        combined_pr,
        retried_merge,
    }))
}
