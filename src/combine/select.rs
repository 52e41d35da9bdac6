//! Candidate selection - pure filtering of open PRs
//!
//! The ignore rule is matched against the PR's head label (`owner:branch`),
//! case-insensitively, in every mode.

use crate::combine::run::list_open_prs_or_empty;
use crate::config::CombineConfig;
use crate::error::Result;
use crate::platform::PlatformService;
use crate::types::PullRequest;
use tracing::debug;

/// Rules a PR must satisfy to be a candidate
#[derive(Debug, Clone, Copy)]
pub struct CandidateFilter<'a> {
    /// Required head branch prefix
    pub prefix: &'a str,
    /// Head label substring that excludes a PR
    pub ignore: &'a str,
    /// Required author login, if restricted
    pub author: Option<&'a str>,
}

impl<'a> CandidateFilter<'a> {
    /// Prefix and ignore rules only
    pub fn from_config(config: &'a CombineConfig) -> Self {
        Self {
            prefix: &config.prefix,
            ignore: &config.ignore,
            author: None,
        }
    }

    /// Prefix and ignore rules, restricted to the automated bot's PRs
    pub fn bot_only(config: &'a CombineConfig) -> Self {
        Self {
            author: Some(&config.bot_login),
            ..Self::from_config(config)
        }
    }
}

/// Why a PR was not selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// Head branch does not start with the prefix
    PrefixMismatch,
    /// Head label contains the ignore marker
    IgnoredLabel,
    /// Authored by someone other than the required login
    ForeignAuthor,
}

impl std::fmt::Display for Exclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PrefixMismatch => write!(f, "branch prefix does not match"),
            Self::IgnoredLabel => write!(f, "ignored label"),
            Self::ForeignAuthor => write!(f, "not opened by the update bot"),
        }
    }
}

/// Return why `pr` fails `filter`, or `None` if it is a candidate
pub fn exclusion(pr: &PullRequest, filter: &CandidateFilter<'_>) -> Option<Exclusion> {
    if !pr.head_ref.starts_with(filter.prefix) {
        return Some(Exclusion::PrefixMismatch);
    }

    if !filter.ignore.is_empty()
        && pr
            .head_label
            .to_lowercase()
            .contains(&filter.ignore.to_lowercase())
    {
        return Some(Exclusion::IgnoredLabel);
    }

    if let Some(author) = filter.author
        && !pr.is_authored_by(author)
    {
        return Some(Exclusion::ForeignAuthor);
    }

    None
}

/// Filter `prs` down to candidates, preserving order
pub fn select_candidates(prs: &[PullRequest], filter: &CandidateFilter<'_>) -> Vec<PullRequest> {
    prs.iter()
        .filter(|pr| match exclusion(pr, filter) {
            Some(reason) => {
                debug!(pr_number = pr.number, branch = %pr.head_ref, %reason, "PR excluded");
                false
            }
            None => true,
        })
        .cloned()
        .collect()
}

/// Fetch the live open PR list and filter it.
///
/// The post-merge closure cascade uses this to see PRs opened since folding.
/// The run itself lists once and filters with [`select_candidates`], since
/// it also needs the unfiltered list for the base commit.
pub async fn list_candidates(
    platform: &dyn PlatformService,
    filter: &CandidateFilter<'_>,
) -> Result<Vec<PullRequest>> {
    let open = list_open_prs_or_empty(platform).await?;
    Ok(select_candidates(&open, filter))
}
