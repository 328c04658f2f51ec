use std::fmt;

use chrono::DateTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub num_members: u32,
}

impl Channel {
    pub fn is_empty(&self) -> bool {
        self.num_members == 0
    }
}

/// Why a channel ended up in an archive partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveReason {
    Emptiness,
    Inactivity,
}

impl fmt::Display for ArchiveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveReason::Emptiness => f.write_str("emptiness"),
            ArchiveReason::Inactivity => f.write_str("inactivity"),
        }
    }
}

/// Most recent qualifying activity found for a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastActivity {
    At(i64),
    Unknown,
}

impl LastActivity {
    pub fn is_before(&self, cutoff: i64) -> bool {
        matches!(self, LastActivity::At(ts) if *ts < cutoff)
    }
}

impl fmt::Display for LastActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LastActivity::At(ts) => match DateTime::from_timestamp(*ts, 0) {
                Some(at) => write!(f, "{}", at.format("%Y-%m-%d %H:%M:%S UTC")),
                None => write!(f, "{ts}"),
            },
            LastActivity::Unknown => f.write_str("unknown"),
        }
    }
}

pub struct Classification {
    pub channel: Channel,
    pub last_activity: LastActivity,
}
