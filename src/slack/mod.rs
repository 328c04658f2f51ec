//! Slack Web API surface consumed by the sweep.

mod client;
mod error;

use async_trait::async_trait;

use crate::models::{Channel, HistoryPage};

pub use client::SlackApiClient;
pub use error::{SlackError, SlackResult};

/// The workspace operations the sweep needs.
///
/// Implementations must be safe to call from many tasks at once; the two
/// archive partitions hit the same client concurrently.
#[async_trait]
pub trait WorkspaceApi: Send + Sync {
    async fn list_channels(&self, exclude_archived: bool) -> SlackResult<Vec<Channel>>;

    /// Fetch up to `limit` messages strictly older than `before`, newest first.
    async fn fetch_history(
        &self,
        channel_id: &str,
        limit: usize,
        before: Option<&str>,
    ) -> SlackResult<HistoryPage>;

    async fn archive_channel(&self, channel_id: &str) -> SlackResult<()>;

    async fn send_message(&self, target: &str, text: &str) -> SlackResult<()>;
}
