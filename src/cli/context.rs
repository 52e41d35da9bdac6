//! Shared command context
//!
//! Resolves configuration, repository coordinates and credentials once, so
//! the run itself only receives explicit values.

use crate::cli::args::Cli;
use combine_prs::auth::get_github_auth;
use combine_prs::config::{CombineConfig, FileConfig};
use combine_prs::error::{Error, Result};
use combine_prs::platform::{PlatformService, create_platform_service, parse_repo_slug};
use tracing::debug;

/// Everything a run needs, built once at startup
///
/// Repository coordinates live on the platform service (`platform.config()`).
pub struct CommandContext {
    /// Resolved run configuration
    pub config: CombineConfig,
    /// Platform service (GitHub)
    pub platform: Box<dyn PlatformService>,
}

/// Resolve the run configuration from the config file and inputs.
///
/// Kept separate from [`CommandContext::new`] so invalid inputs are reported
/// before any credentials are looked up.
pub fn resolve_config(cli: &Cli) -> Result<CombineConfig> {
    let file = cli.config.as_deref().map(FileConfig::load).transpose()?;
    let config = CombineConfig::resolve(file.as_ref(), &cli.inputs.to_overrides())?;
    debug!(?config, "resolved configuration");
    Ok(config)
}

impl CommandContext {
    /// Create a new command context
    ///
    /// - Parse the repository slug
    /// - Resolve a token
    /// - Create the platform service for those coordinates
    pub async fn new(cli: &Cli, config: CombineConfig) -> Result<Self> {
        let slug = cli
            .repo
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                Error::InvalidRepository(
                    "no repository given; pass --repo or set GITHUB_REPOSITORY".to_string(),
                )
            })?;

        let api_url = cli.api_url.clone().filter(|u| !u.trim().is_empty());
        let repo = parse_repo_slug(slug, api_url)?;

        let auth = get_github_auth(cli.token.as_deref()).await?;
        debug!(source = ?auth.source, "resolved GitHub token");

        let platform = create_platform_service(&repo, &auth.token)?;

        Ok(Self { config, platform })
    }
}
