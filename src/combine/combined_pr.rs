//! Combined PR management - create or extend the single combined PR
//!
//! The combined PR body is an append-only ledger of branch names: updates
//! add lines to whatever is already there and never rewrite earlier ones.

use crate::combine::auto_merge::{AutoMergeOutcome, attempt_merge};
use crate::combine::progress::ProgressCallback;
use crate::config::CombineConfig;
use crate::error::Result;
use crate::platform::PlatformService;
use crate::types::{PrStateUpdate, PrUpdate, PullRequest};
use tracing::{info, warn};

/// First line of a freshly created combined PR body
pub const LEDGER_HEADER: &str = "This pull request contains the following pull requests:";

/// Whether the combined PR was created or extended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertAction {
    /// A new combined PR was opened
    Created,
    /// An existing combined PR had its ledger extended
    Updated,
}

/// Result of a combined PR upsert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedPrUpsert {
    /// Combined PR number
    pub pr_number: u64,
    /// What happened to it
    pub action: UpsertAction,
    /// Outcome of the synchronous auto-merge, when enabled
    pub auto_merge: Option<AutoMergeOutcome>,
}

/// Body for a new combined PR
pub fn new_ledger_body(branch_names: &[String]) -> String {
    format!("{LEDGER_HEADER}\n{}", branch_names.join("\n"))
}

/// Existing body with `branch_names` appended, one per line
pub fn append_to_ledger(existing: Option<&str>, branch_names: &[String]) -> String {
    let additions = branch_names.join("\n");
    match existing {
        Some(body) if !body.is_empty() => format!("{body}\n{additions}"),
        _ => additions,
    }
}

/// Find the open combined PR (`head = owner:combined_pr_name`).
///
/// More than one match should not happen; the first is treated as canonical.
pub async fn find_combined_pr(
    platform: &dyn PlatformService,
    config: &CombineConfig,
) -> Result<Option<PullRequest>> {
    let mut existing = platform
        .find_open_prs_by_head(&config.combined_pr_name)
        .await?;

    if existing.len() > 1 {
        let numbers: Vec<u64> = existing.iter().map(|pr| pr.number).collect();
        warn!(
            branch = %config.combined_pr_name,
            ?numbers,
            "multiple open combined PRs found, using the first"
        );
    }

    if existing.is_empty() {
        return Ok(None);
    }
    Ok(Some(existing.swap_remove(0)))
}

/// Create or extend the combined PR so its ledger lists `branch_names`.
///
/// Makes no remote call at all when `branch_names` is empty. When
/// `auto_merge_combined` is set, the merge attempt runs before returning.
pub async fn upsert_combined_pr(
    platform: &dyn PlatformService,
    config: &CombineConfig,
    branch_names: &[String],
    base_branch: &str,
    progress: &dyn ProgressCallback,
) -> Result<Option<CombinedPrUpsert>> {
    if branch_names.is_empty() {
        progress.on_message("No pull requests to combine").await;
        return Ok(None);
    }

    let (pr_number, action) = if let Some(existing) = find_combined_pr(platform, config).await? {
        progress
            .on_message(&format!("Updating combined PR #{}", existing.number))
            .await;
        let update = PrUpdate {
            title: None,
            body: Some(append_to_ledger(existing.body.as_deref(), branch_names)),
            state: Some(PrStateUpdate::Open),
        };
        platform.update_pr(existing.number, update).await?;
        info!(pr_number = existing.number, added = branch_names.len(), "extended combined PR ledger");
        (existing.number, UpsertAction::Updated)
    } else {
        let pr = platform
            .create_pr(
                &config.combined_pr_name,
                base_branch,
                &config.combined_pr_title,
                &new_ledger_body(branch_names),
            )
            .await?;
        progress
            .on_message(&format!("Created combined PR #{}", pr.number))
            .await;
        info!(pr_number = pr.number, base_branch, "created combined PR");
        (pr.number, UpsertAction::Created)
    };

    let auto_merge = if config.auto_merge_combined {
        Some(attempt_merge(platform, config, pr_number, progress).await)
    } else {
        None
    };

    Ok(Some(CombinedPrUpsert {
        pr_number,
        action,
        auto_merge,
    }))
}
