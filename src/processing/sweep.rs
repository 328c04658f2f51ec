use std::future::Future;

use anyhow::{Context as _, Result};
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::archiver::{ArchiveOptions, archive_channels};
use super::classifier::{empty_channels, inactive_channels, inactivity_candidates};
use crate::config::SweepSettings;
use crate::models::{ArchiveReason, Channel, SweepStats};
use crate::slack::WorkspaceApi;

/// Archive the empty partition while the inactive one is classified, then
/// archive that too. Archive outcomes land in `stats` one by one.
async fn sweep<A>(
    api: &A,
    channels: Vec<Channel>,
    settings: &SweepSettings,
    stats: &Mutex<SweepStats>,
) where
    A: WorkspaceApi + ?Sized,
{
    let options = ArchiveOptions {
        notify_target: settings.notify_target.as_deref(),
        max_concurrency: settings.max_concurrency,
        dry_run: settings.dry_run,
    };

    let empty = empty_channels(&channels);
    let candidates = inactivity_candidates(&channels, &empty);
    info!(
        empty = empty.len(),
        candidates = candidates.len(),
        inactive_days = settings.inactive_days,
        "classifying channels"
    );

    let empty_phase = archive_channels(api, &empty, ArchiveReason::Emptiness, &options, stats);

    let inactive_phase = async {
        let (inactive, classification) =
            inactive_channels(api, candidates, settings.cutoff, settings.max_concurrency).await;
        stats.lock().await.classification = classification;

        let inactive: Vec<Channel> = inactive.into_iter().map(|c| c.channel).collect();
        archive_channels(api, &inactive, ArchiveReason::Inactivity, &options, stats).await;
    };

    tokio::join!(empty_phase, inactive_phase);
}

/// Run one sweep over `channels`, bounded by the configured deadline and by
/// `interrupt`, whichever resolves first.
pub async fn run<A, F>(
    api: &A,
    channels: Vec<Channel>,
    settings: &SweepSettings,
    interrupt: F,
) -> SweepStats
where
    A: WorkspaceApi + ?Sized,
    F: Future<Output = String>,
{
    let stats = Mutex::new(SweepStats::new(channels.len()));

    let stopped = tokio::select! {
        _ = sweep(api, channels, settings, &stats) => None,
        _ = tokio::time::sleep(settings.deadline) => {
            Some(format!("deadline of {:?} reached", settings.deadline))
        }
        reason = interrupt => Some(reason),
    };

    let mut stats = stats.into_inner();
    if let Some(reason) = stopped {
        warn!(%reason, "sweep stopped before every channel was handled");
        stats.interrupted = Some(reason);
    }
    stats
}

/// Take the channel snapshot and sweep it. A failed listing aborts the run
/// before anything is archived.
pub async fn list_and_sweep<A, F>(
    api: &A,
    settings: &SweepSettings,
    interrupt: F,
) -> Result<SweepStats>
where
    A: WorkspaceApi + ?Sized,
    F: Future<Output = String>,
{
    let channels = api
        .list_channels(true)
        .await
        .context("failed to list channels")?;
    info!(
        channels = channels.len(),
        inactive_days = settings.inactive_days,
        dry_run = settings.dry_run,
        "🚀 starting archive sweep"
    );

    Ok(run(api, channels, settings, interrupt).await)
}
