//! Scripted in-memory workspace for exercising the sweep without Slack.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::models::{Channel, HistoryPage, Message, MessageSubtype};
use crate::slack::{SlackError, SlackResult, WorkspaceApi};

pub fn msg(ts: &str, subtype: MessageSubtype) -> Message {
    Message {
        ts: ts.to_string(),
        subtype,
    }
}

pub fn channel(id: &str, num_members: u32) -> Channel {
    Channel {
        id: id.to_string(),
        name: format!("chan-{}", id.to_lowercase()),
        num_members,
    }
}

#[derive(Default)]
struct CallLog {
    history: Vec<(String, Option<String>)>,
    archived: Vec<String>,
    notifications: Vec<(String, String)>,
}

#[derive(Default)]
pub struct FakeWorkspace {
    channels: Vec<Channel>,
    histories: HashMap<String, Vec<Message>>,
    failing_history: HashSet<String>,
    failing_archive: HashSet<String>,
    failing_notify: bool,
    failing_list: bool,
    hanging_archive: HashSet<String>,
    ignore_cursor: bool,
    calls: Mutex<CallLog>,
}

impl FakeWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_channels(mut self, channels: Vec<Channel>) -> Self {
        self.channels = channels;
        self
    }

    /// History for `channel_id`, newest first.
    pub fn with_history(mut self, channel_id: &str, messages: Vec<Message>) -> Self {
        self.histories.insert(channel_id.to_string(), messages);
        self
    }

    pub fn failing_history(mut self, channel_id: &str) -> Self {
        self.failing_history.insert(channel_id.to_string());
        self
    }

    pub fn failing_archive(mut self, channel_id: &str) -> Self {
        self.failing_archive.insert(channel_id.to_string());
        self
    }

    pub fn failing_notify(mut self) -> Self {
        self.failing_notify = true;
        self
    }

    pub fn failing_list(mut self) -> Self {
        self.failing_list = true;
        self
    }

    /// Archive calls for `channel_id` are recorded and then never answer.
    pub fn hanging_archive(mut self, channel_id: &str) -> Self {
        self.hanging_archive.insert(channel_id.to_string());
        self
    }

    pub fn ignoring_cursor(mut self) -> Self {
        self.ignore_cursor = true;
        self
    }

    pub fn history_calls(&self, channel_id: &str) -> Vec<Option<String>> {
        let calls = self.calls.lock().unwrap();
        calls
            .history
            .iter()
            .filter(|(id, _)| id == channel_id)
            .map(|(_, before)| before.clone())
            .collect()
    }

    pub fn archived(&self) -> Vec<String> {
        let mut archived = self.calls.lock().unwrap().archived.clone();
        archived.sort();
        archived
    }

    pub fn notifications(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().notifications.clone()
    }
}

#[async_trait]
impl WorkspaceApi for FakeWorkspace {
    async fn list_channels(&self, _exclude_archived: bool) -> SlackResult<Vec<Channel>> {
        if self.failing_list {
            return Err(SlackError::rejected("conversations.list", "invalid_auth"));
        }
        Ok(self.channels.clone())
    }

    async fn fetch_history(
        &self,
        channel_id: &str,
        limit: usize,
        before: Option<&str>,
    ) -> SlackResult<HistoryPage> {
        self.calls
            .lock()
            .unwrap()
            .history
            .push((channel_id.to_string(), before.map(str::to_string)));

        if self.failing_history.contains(channel_id) {
            return Err(SlackError::rejected("conversations.history", "channel_not_found"));
        }

        let history = self.histories.get(channel_id).cloned().unwrap_or_default();
        let start = match before {
            Some(cursor) if !self.ignore_cursor => history
                .iter()
                .position(|m| m.ts == cursor)
                .map_or(history.len(), |i| i + 1),
            _ => 0,
        };
        let end = (start + limit).min(history.len());

        Ok(HistoryPage {
            messages: history[start..end].to_vec(),
            has_more: end < history.len(),
        })
    }

    async fn archive_channel(&self, channel_id: &str) -> SlackResult<()> {
        self.calls.lock().unwrap().archived.push(channel_id.to_string());
        if self.hanging_archive.contains(channel_id) {
            return std::future::pending().await;
        }
        if self.failing_archive.contains(channel_id) {
            return Err(SlackError::rejected("conversations.archive", "restricted_action"));
        }
        Ok(())
    }

    async fn send_message(&self, target: &str, text: &str) -> SlackResult<()> {
        self.calls
            .lock()
            .unwrap()
            .notifications
            .push((target.to_string(), text.to_string()));
        if self.failing_notify {
            return Err(SlackError::rejected("chat.postMessage", "channel_not_found"));
        }
        Ok(())
    }
}
