#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageSubtype {
    Ordinary,
    ChannelJoin,
    ChannelLeave,
    Other(String),
}

impl MessageSubtype {
    pub fn from_slack(subtype: Option<&str>) -> Self {
        match subtype {
            None => MessageSubtype::Ordinary,
            Some("channel_join") => MessageSubtype::ChannelJoin,
            Some("channel_leave") => MessageSubtype::ChannelLeave,
            Some(other) => MessageSubtype::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MessageSubtype::Ordinary => "message",
            MessageSubtype::ChannelJoin => "channel_join",
            MessageSubtype::ChannelLeave => "channel_leave",
            MessageSubtype::Other(other) => other,
        }
    }

    /// Join/leave events are generated by Slack and don't count as activity.
    pub fn is_synthetic(&self) -> bool {
        matches!(self, MessageSubtype::ChannelJoin | MessageSubtype::ChannelLeave)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Slack `ts`, fixed-point seconds such as `1700000000.000200`.
    pub ts: String,
    pub subtype: MessageSubtype,
}

impl Message {
    /// Whole seconds of `ts`, or `None` when the value is malformed.
    pub fn unix_seconds(&self) -> Option<i64> {
        let seconds = self.ts.split('.').next()?;
        seconds.trim().parse().ok()
    }
}

/// One page of `conversations.history`, newest message first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryPage {
    pub messages: Vec<Message>,
    pub has_more: bool,
}

impl HistoryPage {
    /// Cursor for the next older page: the oldest `ts` that parses, or the
    /// oldest `ts` at all when none of them do.
    pub fn next_cursor(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.unix_seconds().is_some())
            .or(self.messages.last())
            .map(|m| m.ts.as_str())
    }
}
