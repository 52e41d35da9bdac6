//! CLI layer for the combine-prs binary

pub mod args;
pub mod context;
pub mod run;
pub mod style;

pub use args::Cli;

use anstream::println;
use async_trait::async_trait;
use combine_prs::combine::ProgressCallback;
use style::{Stylize, arrow};

/// Progress sink that prints each message as an indented step
pub struct CliProgress;

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_message(&self, message: &str) {
        println!("  {} {}", arrow(), message.muted());
    }
}
