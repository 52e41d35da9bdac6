//! Run configuration
//!
//! `CombineConfig` is resolved once at startup and passed by reference into
//! every component. Values are layered: explicit inputs (flags or
//! `INPUT_*` environment variables) override an optional TOML file, which
//! overrides the built-in defaults. Empty strings count as unset.

use crate::error::{Error, Result};
use crate::types::MergeMethod;
use chrono::Weekday;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Login GitHub uses for Dependabot-authored PRs
pub const DEFAULT_BOT_LOGIN: &str = "dependabot[bot]";

/// Fully resolved configuration for one run
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct CombineConfig {
    /// Head branch prefix a PR must have to be a candidate
    pub prefix: String,
    /// Only list successfully folded branches in the combined PR
    pub require_green: bool,
    /// Name of the integration branch (and head of the combined PR)
    pub combined_pr_name: String,
    /// Case-insensitive substring that excludes a PR via its head label.
    /// An empty value falls back to the default like every other option.
    pub ignore: String,
    /// Close original PRs once their content landed
    pub close_merged: bool,
    /// Merge the combined PR automatically when mergeable
    pub auto_merge_combined: bool,
    /// Only run on this weekday
    pub day: Option<Weekday>,
    /// Only run at or after this hour of the day
    pub hour: Option<u32>,
    /// Approve and merge each candidate on its own instead of combining
    pub merge_individually: bool,
    /// Login of the automated dependency-update bot
    pub bot_login: String,
    /// Title used when creating the combined PR
    pub combined_pr_title: String,
    /// Merge method for combined and individual PR merges
    pub merge_method: MergeMethod,
    /// Delay before reading PR status, so fresh pushes get a status signal
    pub settle_delay: Duration,
}

impl Default for CombineConfig {
    fn default() -> Self {
        Self {
            prefix: "dependabot".to_string(),
            require_green: true,
            combined_pr_name: "combined".to_string(),
            ignore: "ignore".to_string(),
            close_merged: false,
            auto_merge_combined: false,
            day: None,
            hour: None,
            merge_individually: false,
            bot_login: DEFAULT_BOT_LOGIN.to_string(),
            combined_pr_title: "Combined pull request".to_string(),
            merge_method: MergeMethod::Merge,
            settle_delay: Duration::from_secs(1),
        }
    }
}

/// Configuration as read from a TOML file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// See [`CombineConfig::prefix`]
    pub prefix: Option<String>,
    /// See [`CombineConfig::require_green`]
    pub require_green: Option<bool>,
    /// See [`CombineConfig::combined_pr_name`]
    pub combined_pr_name: Option<String>,
    /// See [`CombineConfig::ignore`]
    pub ignore: Option<String>,
    /// See [`CombineConfig::close_merged`]
    pub close_merged: Option<bool>,
    /// See [`CombineConfig::auto_merge_combined`]
    pub auto_merge_combined: Option<bool>,
    /// See [`CombineConfig::day`]
    pub day: Option<String>,
    /// See [`CombineConfig::hour`]
    pub hour: Option<u32>,
    /// See [`CombineConfig::merge_individually`]
    #[serde(alias = "merge_dependabot_individually")]
    pub merge_individually: Option<bool>,
    /// See [`CombineConfig::bot_login`]
    pub bot_login: Option<String>,
    /// See [`CombineConfig::combined_pr_title`]
    pub combined_pr_title: Option<String>,
    /// See [`CombineConfig::merge_method`]
    pub merge_method: Option<MergeMethod>,
    /// See [`CombineConfig::settle_delay`], in milliseconds
    pub settle_delay_ms: Option<u64>,
}

impl FileConfig {
    /// Load a config file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::parse(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Parse TOML config content
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Raw string inputs (command-line flags or action inputs)
#[derive(Debug, Clone, Default)]
pub struct InputOverrides {
    /// Raw `prefix`
    pub prefix: Option<String>,
    /// Raw `require_green`
    pub require_green: Option<String>,
    /// Raw `combined_pr_name`
    pub combined_pr_name: Option<String>,
    /// Raw `ignore`
    pub ignore: Option<String>,
    /// Raw `close_merged`
    pub close_merged: Option<String>,
    /// Raw `auto_merge_combined`
    pub auto_merge_combined: Option<String>,
    /// Raw `day`
    pub day: Option<String>,
    /// Raw `hour`
    pub hour: Option<String>,
    /// Raw `merge_dependabot_individually`
    pub merge_individually: Option<String>,
    /// Raw `bot_login`
    pub bot_login: Option<String>,
    /// Raw `combined_pr_title`
    pub combined_pr_title: Option<String>,
    /// Raw `merge_method`
    pub merge_method: Option<String>,
    /// Raw `settle_delay_ms`
    pub settle_delay_ms: Option<String>,
}

impl CombineConfig {
    /// Resolve configuration from defaults, an optional file, and raw inputs
    pub fn resolve(file: Option<&FileConfig>, inputs: &InputOverrides) -> Result<Self> {
        let mut config = Self::default();

        if let Some(file) = file {
            config.apply_file(file)?;
        }
        config.apply_inputs(inputs)?;

        if config.combined_pr_name.trim().is_empty() {
            return Err(Error::Config("combined_pr_name must not be empty".to_string()));
        }
        Ok(config)
    }

    fn apply_file(&mut self, file: &FileConfig) -> Result<()> {
        if let Some(v) = non_empty(file.prefix.as_deref()) {
            self.prefix = v.to_string();
        }
        if let Some(v) = file.require_green {
            self.require_green = v;
        }
        if let Some(v) = non_empty(file.combined_pr_name.as_deref()) {
            self.combined_pr_name = v.to_string();
        }
        if let Some(v) = non_empty(file.ignore.as_deref()) {
            self.ignore = v.to_string();
        }
        if let Some(v) = file.close_merged {
            self.close_merged = v;
        }
        if let Some(v) = file.auto_merge_combined {
            self.auto_merge_combined = v;
        }
        if let Some(v) = non_empty(file.day.as_deref()) {
            self.day = Some(parse_day(v)?);
        }
        if let Some(v) = file.hour {
            self.hour = Some(check_hour(v)?);
        }
        if let Some(v) = file.merge_individually {
            self.merge_individually = v;
        }
        if let Some(v) = non_empty(file.bot_login.as_deref()) {
            self.bot_login = v.to_string();
        }
        if let Some(v) = non_empty(file.combined_pr_title.as_deref()) {
            self.combined_pr_title = v.to_string();
        }
        if let Some(v) = file.merge_method {
            self.merge_method = v;
        }
        if let Some(ms) = file.settle_delay_ms {
            self.settle_delay = Duration::from_millis(ms);
        }
        Ok(())
    }

    fn apply_inputs(&mut self, inputs: &InputOverrides) -> Result<()> {
        if let Some(v) = non_empty(inputs.prefix.as_deref()) {
            self.prefix = v.to_string();
        }
        if let Some(v) = non_empty(inputs.require_green.as_deref()) {
            self.require_green = parse_bool("require_green", v)?;
        }
        if let Some(v) = non_empty(inputs.combined_pr_name.as_deref()) {
            self.combined_pr_name = v.to_string();
        }
        if let Some(v) = non_empty(inputs.ignore.as_deref()) {
            self.ignore = v.to_string();
        }
        if let Some(v) = non_empty(inputs.close_merged.as_deref()) {
            self.close_merged = parse_bool("close_merged", v)?;
        }
        if let Some(v) = non_empty(inputs.auto_merge_combined.as_deref()) {
            self.auto_merge_combined = parse_bool("auto_merge_combined", v)?;
        }
        if let Some(v) = non_empty(inputs.day.as_deref()) {
            self.day = Some(parse_day(v)?);
        }
        if let Some(v) = non_empty(inputs.hour.as_deref()) {
            let hour = v
                .parse::<u32>()
                .map_err(|_| Error::Config(format!("hour must be a number, got '{v}'")))?;
            self.hour = Some(check_hour(hour)?);
        }
        if let Some(v) = non_empty(inputs.merge_individually.as_deref()) {
            self.merge_individually = parse_bool("merge_dependabot_individually", v)?;
        }
        if let Some(v) = non_empty(inputs.bot_login.as_deref()) {
            self.bot_login = v.to_string();
        }
        if let Some(v) = non_empty(inputs.combined_pr_title.as_deref()) {
            self.combined_pr_title = v.to_string();
        }
        if let Some(v) = non_empty(inputs.merge_method.as_deref()) {
            self.merge_method = v.parse().map_err(Error::Config)?;
        }
        if let Some(v) = non_empty(inputs.settle_delay_ms.as_deref()) {
            let ms = v.parse::<u64>().map_err(|_| {
                Error::Config(format!("settle_delay_ms must be a number, got '{v}'"))
            })?;
            self.settle_delay = Duration::from_millis(ms);
        }
        Ok(())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Parse a boolean input the way workflow inputs are written
pub fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        other => Err(Error::Config(format!(
            "{name} must be true or false, got '{other}'"
        ))),
    }
}

fn parse_day(value: &str) -> Result<Weekday> {
    value
        .parse::<Weekday>()
        .map_err(|_| Error::Config(format!("day must be a weekday name, got '{value}'")))
}

fn check_hour(hour: u32) -> Result<u32> {
    if hour > 23 {
        return Err(Error::Config(format!("hour must be 0-23, got {hour}")));
    }
    Ok(hour)
}
