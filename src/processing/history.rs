use tracing::debug;

use crate::models::LastActivity;
use crate::slack::{SlackResult, WorkspaceApi};

/// Messages requested per `conversations.history` call.
pub const HISTORY_PAGE_SIZE: usize = 5;

/// Page backwards through a channel until the newest message that isn't a
/// join/leave event turns up.
///
/// Pages are fetched one after another, each starting below the oldest
/// timestamp seen so far. Messages whose `ts` can't be parsed are skipped.
/// Fetch failures are returned as-is so callers can tell them apart from a
/// channel that simply has no qualifying history.
pub async fn last_qualifying_timestamp<A>(api: &A, channel_id: &str) -> SlackResult<LastActivity>
where
    A: WorkspaceApi + ?Sized,
{
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = api
            .fetch_history(channel_id, HISTORY_PAGE_SIZE, cursor.as_deref())
            .await?;
        pages += 1;

        if page.messages.is_empty() {
            debug!(channel_id, pages, "history exhausted without activity");
            return Ok(LastActivity::Unknown);
        }

        for message in &page.messages {
            if message.subtype.is_synthetic() {
                continue;
            }
            match message.unix_seconds() {
                Some(seconds) => {
                    debug!(
                        channel_id,
                        pages,
                        subtype = message.subtype.as_str(),
                        "found last activity"
                    );
                    return Ok(LastActivity::At(seconds));
                }
                None => debug!(channel_id, ts = %message.ts, "skipping malformed timestamp"),
            }
        }

        let previous = cursor.replace(page.next_cursor().unwrap_or_default().to_string());
        if !page.has_more {
            debug!(channel_id, pages, "reached end of history without activity");
            return Ok(LastActivity::Unknown);
        }
        if cursor == previous {
            debug!(channel_id, pages, "history cursor stalled");
            return Ok(LastActivity::Unknown);
        }
    }
}
