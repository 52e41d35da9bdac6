//! Progress reporting for long-running combine steps

use async_trait::async_trait;

/// Receives human-readable progress messages as the run advances
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Called with one progress line
    async fn on_message(&self, message: &str);
}

/// Progress sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_message(&self, _message: &str) {}
}
