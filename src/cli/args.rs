//! Command-line surface
//!
//! Every run option can also come from a GitHub Actions input
//! (`INPUT_<NAME>`), so the binary works unchanged as an action step.

use clap::{ArgAction, Args, Parser};
use combine_prs::config::InputOverrides;
use std::path::PathBuf;

/// Combine open dependency-update pull requests into a single PR
#[derive(Debug, Parser)]
#[command(name = "combine-prs", version, about)]
pub struct Cli {
    /// Repository as owner/repo or a clone URL
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repo: Option<String>,

    /// GitHub API base URL (for GitHub Enterprise)
    #[arg(long, env = "GITHUB_API_URL")]
    pub api_url: Option<String>,

    /// API token (defaults to GITHUB_TOKEN, GH_TOKEN, then `gh auth token`)
    #[arg(long)]
    pub token: Option<String>,

    /// TOML file with default run options
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(long, short = 'v', action = ArgAction::Count)]
    pub verbose: u8,

    #[command(flatten)]
    pub inputs: InputArgs,
}

/// Run options, mirroring the action inputs
#[derive(Debug, Clone, Default, Args)]
pub struct InputArgs {
    /// Branch prefix of PRs to combine [default: dependabot]
    #[arg(long, env = "INPUT_PREFIX")]
    pub prefix: Option<String>,

    /// Only list successfully merged branches in the combined PR [default: true]
    #[arg(long, env = "INPUT_REQUIRE_GREEN", value_name = "BOOL")]
    pub require_green: Option<String>,

    /// Name of the combined branch [default: combined]
    #[arg(long, env = "INPUT_COMBINED_PR_NAME", value_name = "BRANCH")]
    pub combined_pr_name: Option<String>,

    /// Skip PRs whose head label contains this text [default: ignore]
    #[arg(long, env = "INPUT_IGNORE", value_name = "TEXT")]
    pub ignore: Option<String>,

    /// Close original PRs after their content was merged [default: false]
    #[arg(long, env = "INPUT_CLOSE_MERGED", value_name = "BOOL")]
    pub close_merged: Option<String>,

    /// Merge the combined PR automatically when mergeable [default: false]
    #[arg(long, env = "INPUT_AUTO_MERGE_COMBINED", value_name = "BOOL")]
    pub auto_merge_combined: Option<String>,

    /// Only run on this weekday (e.g. Monday)
    #[arg(long, env = "INPUT_DAY")]
    pub day: Option<String>,

    /// Only run at or after this hour (0-23)
    #[arg(long, env = "INPUT_HOUR")]
    pub hour: Option<String>,

    /// Approve and merge each bot PR on its own instead of combining [default: false]
    #[arg(long, env = "INPUT_MERGE_DEPENDABOT_INDIVIDUALLY", value_name = "BOOL")]
    pub merge_dependabot_individually: Option<String>,

    /// Login of the dependency-update bot [default: dependabot[bot]]
    #[arg(long, env = "INPUT_BOT_LOGIN", value_name = "LOGIN")]
    pub bot_login: Option<String>,

    /// Title for a newly created combined PR [default: Combined pull request]
    #[arg(long, env = "INPUT_COMBINED_PR_TITLE", value_name = "TITLE")]
    pub combined_pr_title: Option<String>,

    /// Merge method for PR merges: merge, squash or rebase [default: merge]
    #[arg(long, env = "INPUT_MERGE_METHOD", value_name = "METHOD")]
    pub merge_method: Option<String>,

    /// Delay before reading PR status, in milliseconds [default: 1000]
    #[arg(long, env = "INPUT_SETTLE_DELAY_MS", value_name = "MS")]
    pub settle_delay_ms: Option<String>,
}

impl InputArgs {
    /// Convert to the library's raw override layer
    pub fn to_overrides(&self) -> InputOverrides {
        InputOverrides {
            prefix: self.prefix.clone(),
            require_green: self.require_green.clone(),
            combined_pr_name: self.combined_pr_name.clone(),
            ignore: self.ignore.clone(),
            close_merged: self.close_merged.clone(),
            auto_merge_combined: self.auto_merge_combined.clone(),
            day: self.day.clone(),
            hour: self.hour.clone(),
            merge_individually: self.merge_dependabot_individually.clone(),
            bot_login: self.bot_login.clone(),
            combined_pr_title: self.combined_pr_title.clone(),
            merge_method: self.merge_method.clone(),
            settle_delay_ms: self.settle_delay_ms.clone(),
        }
    }
}
