//! reqwest-backed Slack Web API client.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use super::{SlackError, SlackResult, WorkspaceApi};
use crate::models::{Channel, HistoryPage, Message, MessageSubtype};

const LIST_PAGE_LIMIT: usize = 200;

#[derive(Debug, Deserialize)]
struct SlackChannelRecord {
    id: String,
    #[serde(default)]
    name: String,
    num_members: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct SlackResponseMetadata {
    #[serde(default)]
    next_cursor: String,
}

#[derive(Debug, Deserialize)]
struct SlackListResponse {
    ok: bool,
    error: Option<String>,
    #[serde(default)]
    channels: Vec<SlackChannelRecord>,
    response_metadata: Option<SlackResponseMetadata>,
}

#[derive(Debug, Deserialize)]
struct SlackHistoryMessage {
    ts: String,
    subtype: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SlackHistoryResponse {
    ok: bool,
    error: Option<String>,
    #[serde(default)]
    messages: Vec<SlackHistoryMessage>,
    #[serde(default)]
    has_more: bool,
}

#[derive(Debug, Deserialize)]
struct SlackAckResponse {
    ok: bool,
    error: Option<String>,
}

fn ensure_ok(operation: &'static str, ok: bool, error: Option<String>) -> SlackResult<()> {
    if ok {
        return Ok(());
    }
    Err(SlackError::rejected(
        operation,
        error.unwrap_or_else(|| "unknown error".to_string()),
    ))
}

fn truncate_for_error(body: &str, max_chars: usize) -> String {
    if body.chars().count() <= max_chars {
        return body.to_string();
    }
    let mut truncated: String = body.chars().take(max_chars).collect();
    truncated.push_str("...");
    truncated
}

pub struct SlackApiClient {
    http: reqwest::Client,
    api_base: String,
    token: String,
}

impl SlackApiClient {
    pub fn new(api_base: &str, token: &str, request_timeout: Duration) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("channel-archiver"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(request_timeout.max(Duration::from_millis(1)))
            .build()
            .context("failed to create slack api client")?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.trim().to_string(),
        })
    }

    fn get(&self, method: &str) -> reqwest::RequestBuilder {
        self.http
            .get(format!("{}/{method}", self.api_base))
            .bearer_auth(&self.token)
    }

    fn post(&self, method: &str) -> reqwest::RequestBuilder {
        self.http
            .post(format!("{}/{method}", self.api_base))
            .bearer_auth(&self.token)
    }

    async fn request_json<T>(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> SlackResult<T>
    where
        T: DeserializeOwned,
    {
        let response = request
            .send()
            .await
            .map_err(|source| SlackError::Transport { operation, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SlackError::Status {
                operation,
                status: status.as_u16(),
                body: truncate_for_error(&body, 800),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| SlackError::Decode { operation, source })
    }
}

#[async_trait]
impl WorkspaceApi for SlackApiClient {
    async fn list_channels(&self, exclude_archived: bool) -> SlackResult<Vec<Channel>> {
        let mut channels = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut query = vec![
                ("types", "public_channel".to_string()),
                ("exclude_archived", exclude_archived.to_string()),
                ("limit", LIST_PAGE_LIMIT.to_string()),
            ];
            if let Some(cursor) = &cursor {
                query.push(("cursor", cursor.clone()));
            }

            let response: SlackListResponse = self
                .request_json("conversations.list", self.get("conversations.list").query(&query))
                .await?;
            ensure_ok("conversations.list", response.ok, response.error)?;

            for record in response.channels {
                match record.num_members {
                    Some(num_members) => channels.push(Channel {
                        id: record.id,
                        name: record.name,
                        num_members,
                    }),
                    None => warn!(
                        channel_id = %record.id,
                        channel_name = %record.name,
                        "channel listed without a member count, leaving it alone"
                    ),
                }
            }

            let next = response
                .response_metadata
                .map(|meta| meta.next_cursor)
                .filter(|next| !next.trim().is_empty());
            match next {
                Some(next) => {
                    debug!(fetched = channels.len(), "following conversations.list cursor");
                    cursor = Some(next);
                }
                None => break,
            }
        }

        Ok(channels)
    }

    async fn fetch_history(
        &self,
        channel_id: &str,
        limit: usize,
        before: Option<&str>,
    ) -> SlackResult<HistoryPage> {
        let mut query = vec![
            ("channel", channel_id.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(before) = before {
            query.push(("latest", before.to_string()));
        }

        let response: SlackHistoryResponse = self
            .request_json(
                "conversations.history",
                self.get("conversations.history").query(&query),
            )
            .await?;
        ensure_ok("conversations.history", response.ok, response.error)?;

        Ok(HistoryPage {
            messages: response
                .messages
                .into_iter()
                .map(|message| Message {
                    subtype: MessageSubtype::from_slack(message.subtype.as_deref()),
                    ts: message.ts,
                })
                .collect(),
            has_more: response.has_more,
        })
    }

    async fn archive_channel(&self, channel_id: &str) -> SlackResult<()> {
        let response: SlackAckResponse = self
            .request_json(
                "conversations.archive",
                self.post("conversations.archive")
                    .json(&json!({ "channel": channel_id })),
            )
            .await?;
        ensure_ok("conversations.archive", response.ok, response.error)
    }

    async fn send_message(&self, target: &str, text: &str) -> SlackResult<()> {
        let payload = json!({
            "channel": target,
            "text": text,
            "mrkdwn": false,
            "unfurl_links": false,
        });
        let response: SlackAckResponse = self
            .request_json(
                "chat.postMessage",
                self.post("chat.postMessage").json(&payload),
            )
            .await?;
        ensure_ok("chat.postMessage", response.ok, response.error)
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    fn client(server: &MockServer) -> SlackApiClient {
        SlackApiClient::new(&server.base_url(), "xoxb-test", Duration::from_secs(5))
            .expect("client")
    }

    #[tokio::test]
    async fn list_channels_follows_cursor_and_skips_unknown_member_counts() {
        let server = MockServer::start();
        let first = server.mock(|when, then| {
            when.method(GET)
                .path("/conversations.list")
                .query_param("exclude_archived", "true")
                .query_param_missing("cursor")
                .header("authorization", "Bearer xoxb-test");
            then.status(200).json_body(json!({
                "ok": true,
                "channels": [
                    { "id": "C1", "name": "general", "num_members": 12 },
                    { "id": "C2", "name": "mystery" }
                ],
                "response_metadata": { "next_cursor": "page2" }
            }));
        });
        let second = server.mock(|when, then| {
            when.method(GET)
                .path("/conversations.list")
                .query_param("cursor", "page2");
            then.status(200).json_body(json!({
                "ok": true,
                "channels": [{ "id": "C3", "name": "ghost-town", "num_members": 0 }],
                "response_metadata": { "next_cursor": "" }
            }));
        });

        let channels = client(&server).list_channels(true).await.expect("list");

        first.assert();
        second.assert();
        let ids: Vec<_> = channels.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["C1", "C3"]);
        assert!(channels[1].is_empty());
    }

    #[tokio::test]
    async fn list_channels_surfaces_rejections() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/conversations.list");
            then.status(200)
                .json_body(json!({ "ok": false, "error": "invalid_auth" }));
        });

        let error = client(&server).list_channels(true).await.unwrap_err();
        assert!(matches!(
            error,
            SlackError::Rejected { operation: "conversations.list", ref code } if code == "invalid_auth"
        ));
    }

    #[tokio::test]
    async fn fetch_history_passes_cursor_as_latest() {
        let server = MockServer::start();
        let history = server.mock(|when, then| {
            when.method(GET)
                .path("/conversations.history")
                .query_param("channel", "C9")
                .query_param("limit", "5")
                .query_param("latest", "1700000000.000100");
            then.status(200).json_body(json!({
                "ok": true,
                "messages": [
                    { "type": "message", "subtype": "channel_join", "ts": "1699999999.000001" },
                    { "type": "message", "ts": "1699999000.000001" }
                ],
                "has_more": true
            }));
        });

        let page = client(&server)
            .fetch_history("C9", 5, Some("1700000000.000100"))
            .await
            .expect("history");

        history.assert();
        assert!(page.has_more);
        assert_eq!(page.messages[0].subtype, MessageSubtype::ChannelJoin);
        assert_eq!(page.messages[1].subtype, MessageSubtype::Ordinary);
        assert_eq!(page.next_cursor(), Some("1699999000.000001"));
    }

    #[tokio::test]
    async fn archive_reports_slack_error_code() {
        let server = MockServer::start();
        let archive = server.mock(|when, then| {
            when.method(POST)
                .path("/conversations.archive")
                .json_body(json!({ "channel": "C4" }));
            then.status(200)
                .json_body(json!({ "ok": false, "error": "already_archived" }));
        });

        let error = client(&server).archive_channel("C4").await.unwrap_err();

        archive.assert();
        assert_eq!(
            error.to_string(),
            "slack api conversations.archive failed: already_archived"
        );
    }

    #[tokio::test]
    async fn http_failures_map_to_status_errors() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/chat.postMessage");
            then.status(429).body("slow down");
        });

        let error = client(&server).send_message("U1", "hello").await.unwrap_err();
        assert!(matches!(error, SlackError::Status { status: 429, .. }));
    }

    #[test]
    fn truncate_for_error_keeps_short_bodies() {
        assert_eq!(truncate_for_error("short", 10), "short");
        assert_eq!(truncate_for_error("abcdefghij", 4), "abcd...");
    }
}
