//! Shared test fixtures

#![allow(dead_code)]

mod mock_platform;

pub use mock_platform::{BranchBehavior, ListFailure, MockPlatformService};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use combine_prs::combine::ProgressCallback;
use combine_prs::config::CombineConfig;
use combine_prs::types::{PlatformConfig, PrState, PullRequest};
use std::sync::Mutex;
use std::time::Duration;

pub const OWNER: &str = "test-owner";
pub const BOT: &str = "dependabot[bot]";
pub const BASE_SHA: &str = "base-sha";

/// Platform config for a GitHub test repository
pub fn github_config() -> PlatformConfig {
    PlatformConfig {
        owner: OWNER.to_string(),
        repo: "test-repo".to_string(),
        api_url: None,
    }
}

/// Mock platform preloaded with the test repository config
pub fn mock() -> MockPlatformService {
    MockPlatformService::with_config(github_config())
}

/// Default config without the settle delay
pub fn test_config() -> CombineConfig {
    CombineConfig {
        settle_delay: Duration::ZERO,
        ..CombineConfig::default()
    }
}

/// Monday 2026-10-19, 10:00
pub fn monday_morning() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 19)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

/// Open PR with the given head branch and author, targeting main
pub fn make_pr(number: u64, branch: &str, author: &str) -> PullRequest {
    PullRequest {
        number,
        title: format!("Bump {branch}"),
        body: Some(format!("Bumps {branch}")),
        state: PrState::Open,
        head_ref: branch.to_string(),
        head_label: format!("{OWNER}:{branch}"),
        head_sha: format!("sha-{number}"),
        base_ref: "main".to_string(),
        base_sha: BASE_SHA.to_string(),
        author: Some(author.to_string()),
        mergeable: Some(true),
        html_url: format!("https://github.com/test/repo/pull/{number}"),
    }
}

/// Open PR authored by the dependency bot
pub fn bot_pr(number: u64, branch: &str) -> PullRequest {
    make_pr(number, branch, BOT)
}

/// Progress sink that records every message
#[derive(Default)]
pub struct RecordingProgress {
    messages: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.messages().iter().any(|m| m.contains(needle))
    }
}

#[async_trait]
impl ProgressCallback for RecordingProgress {
    async fn on_message(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
