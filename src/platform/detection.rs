//! Repository slug and URL parsing

use crate::error::{Error, Result};
use crate::types::PlatformConfig;
use url::Url;

/// Parse a repository reference into owner/repo coordinates.
///
/// Accepts `owner/repo`, `https://host/owner/repo(.git)` and
/// `git@host:owner/repo(.git)`.
pub fn parse_repo_slug(input: &str, api_url: Option<String>) -> Result<PlatformConfig> {
    let input = input.trim();
    let path = if let Some(rest) = input.strip_prefix("git@") {
        rest.split_once(':')
            .map(|(_, path)| path.to_string())
            .ok_or_else(|| Error::InvalidRepository(input.to_string()))?
    } else if input.contains("://") {
        let url = Url::parse(input).map_err(|e| Error::InvalidRepository(format!("{input}: {e}")))?;
        url.path().to_string()
    } else {
        input.to_string()
    };

    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);

    let mut parts = path.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(repo), None) if !owner.is_empty() && !repo.is_empty() => {
            Ok(PlatformConfig {
                owner: owner.to_string(),
                repo: repo.to_string(),
                api_url,
            })
        }
        _ => Err(Error::InvalidRepository(format!(
            "expected owner/repo, got '{input}'"
        ))),
    }
}
