//! Combine engine for dependency-update PRs
//!
//! Pipeline: select candidates → fold them into the integration branch →
//! upsert the combined PR → optionally auto-merge it and close originals.
//! Selection and ledger aggregation are pure; everything else talks to the
//! platform one call at a time.

mod auto_merge;
mod combined_pr;
mod consolidate;
mod individual;
mod progress;
mod run;
mod select;

pub use auto_merge::{AutoMergeOutcome, attempt_merge};
pub use combined_pr::{
    CombinedPrUpsert, LEDGER_HEADER, UpsertAction, append_to_ledger, find_combined_pr,
    new_ledger_body, upsert_combined_pr,
};
pub use consolidate::{
    BranchCreation, FoldResult, SkipReason, ensure_integration_branch, fold, fold_all,
    ledger_entries,
};
pub use individual::{IndividualMerge, IndividualOutcome, merge_individually};
pub use progress::{NoopProgress, ProgressCallback};
pub use run::{CombineReport, RunOutcome, list_open_prs_or_empty, run_combine};
pub use select::{CandidateFilter, Exclusion, exclusion, list_candidates, select_candidates};
