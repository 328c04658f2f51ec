mod channel;
mod message;
mod stats;

pub use channel::{ArchiveReason, Channel, Classification, LastActivity};
pub use message::{HistoryPage, Message, MessageSubtype};
pub use stats::{ArchiveOutcome, ArchiveReport, ClassificationStats, SweepStats};
