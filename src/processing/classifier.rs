use std::collections::HashSet;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use super::history::last_qualifying_timestamp;
use crate::models::{Channel, Classification, ClassificationStats, LastActivity};
use crate::slack::WorkspaceApi;

pub fn empty_channels(channels: &[Channel]) -> Vec<Channel> {
    channels.iter().filter(|c| c.is_empty()).cloned().collect()
}

/// Channels eligible for the inactivity check. Anything already in the empty
/// partition is left out so a channel is archived at most once per run.
pub fn inactivity_candidates(channels: &[Channel], empty: &[Channel]) -> Vec<Channel> {
    let empty_ids: HashSet<&str> = empty.iter().map(|c| c.id.as_str()).collect();
    let mut seen = HashSet::new();
    channels
        .iter()
        .filter(|c| !c.is_empty() && !empty_ids.contains(c.id.as_str()))
        .filter(|c| seen.insert(c.id.clone()))
        .cloned()
        .collect()
}

/// Walk every candidate's history concurrently and keep the ones whose last
/// qualifying message is older than `cutoff`.
///
/// Every walk resolves before this returns. A failed walk counts as unknown
/// activity and never marks the channel inactive.
pub async fn inactive_channels<A>(
    api: &A,
    candidates: Vec<Channel>,
    cutoff: i64,
    max_concurrency: usize,
) -> (Vec<Classification>, ClassificationStats)
where
    A: WorkspaceApi + ?Sized,
{
    let mut stats = ClassificationStats {
        checked: candidates.len(),
        ..ClassificationStats::default()
    };

    let results = stream::iter(candidates)
        .map(|channel| async move {
            let last_activity = last_qualifying_timestamp(api, &channel.id)
                .await
                .inspect_err(|e| {
                    warn!(
                        channel_id = %channel.id,
                        channel_name = %channel.name,
                        error = %e,
                        "couldn't read channel history, keeping channel"
                    )
                })
                .ok();
            (channel, last_activity)
        })
        .buffer_unordered(max_concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

    let mut inactive = Vec::new();
    for (channel, result) in results {
        let Some(last_activity) = result else {
            stats.errors += 1;
            continue;
        };

        match last_activity {
            LastActivity::Unknown => {
                stats.unknown += 1;
                debug!(channel_id = %channel.id, "no qualifying messages found");
            }
            LastActivity::At(_) if last_activity.is_before(cutoff) => {
                let classification = Classification {
                    channel,
                    last_activity,
                };
                info!(
                    channel_id = %classification.channel.id,
                    channel_name = %classification.channel.name,
                    last_activity = %classification.last_activity,
                    "channel is inactive"
                );
                inactive.push(classification);
            }
            LastActivity::At(_) => {
                debug!(channel_id = %channel.id, %last_activity, "channel is active");
            }
        }
    }

    (inactive, stats)
}
