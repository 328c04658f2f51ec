use futures::stream::{self, StreamExt};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::models::{ArchiveOutcome, ArchiveReason, Channel, SweepStats};
use crate::slack::{SlackError, WorkspaceApi};

pub struct ArchiveOptions<'a> {
    pub notify_target: Option<&'a str>,
    pub max_concurrency: usize,
    pub dry_run: bool,
}

fn failure_notice(channel: &Channel, reason: ArchiveReason, error: &SlackError) -> String {
    format!(
        "Couldn't archive #{} ({}) due to {}: {}",
        channel.name, channel.id, reason, error
    )
}

async fn notify_operator<A>(api: &A, target: &str, text: &str)
where
    A: WorkspaceApi + ?Sized,
{
    if let Err(e) = api.send_message(target, text).await {
        warn!(notify_target = target, error = %e, "failed to notify operator");
    }
}

async fn archive_one<A>(
    api: &A,
    channel: &Channel,
    reason: ArchiveReason,
    options: &ArchiveOptions<'_>,
) -> ArchiveOutcome
where
    A: WorkspaceApi + ?Sized,
{
    if options.dry_run {
        info!(
            channel_id = %channel.id,
            channel_name = %channel.name,
            %reason,
            "dry run, would archive channel"
        );
        return ArchiveOutcome::DryRun;
    }

    match api.archive_channel(&channel.id).await {
        Ok(()) => {
            info!(
                channel_id = %channel.id,
                channel_name = %channel.name,
                %reason,
                "archived channel #{} due to {}",
                channel.name,
                reason
            );
            ArchiveOutcome::Archived
        }
        Err(e) => {
            error!(
                channel_id = %channel.id,
                channel_name = %channel.name,
                %reason,
                error = %e,
                "couldn't archive channel"
            );
            if let Some(target) = options.notify_target {
                notify_operator(api, target, &failure_notice(channel, reason, &e)).await;
            }
            ArchiveOutcome::Failed
        }
    }
}

/// Archive every channel of one partition concurrently.
///
/// Failures are logged and reported to the operator target; they never stop
/// the remaining channels. Each attempt is counted in `stats` as it settles.
pub async fn archive_channels<A>(
    api: &A,
    channels: &[Channel],
    reason: ArchiveReason,
    options: &ArchiveOptions<'_>,
    stats: &Mutex<SweepStats>,
) where
    A: WorkspaceApi + ?Sized,
{
    if channels.is_empty() {
        info!(%reason, "nothing to archive");
        return;
    }
    info!(%reason, count = channels.len(), "archiving channels");

    stream::iter(channels)
        .for_each_concurrent(options.max_concurrency.max(1), |channel| async move {
            let outcome = archive_one(api, channel, reason, options).await;
            stats.lock().await.tally(reason, outcome);
        })
        .await;
}
