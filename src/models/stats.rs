use std::time::{Duration, Instant};

use colorful::{Colorful, RGB};

use super::ArchiveReason;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveOutcome {
    Archived,
    Failed,
    DryRun,
}

/// Outcome of one archiver pass over a partition.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ArchiveReport {
    pub archived: usize,
    pub failed: usize,
    pub skipped_dry_run: usize,
}

/// Outcome of the inactivity fan-out, besides the partition itself.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClassificationStats {
    pub checked: usize,
    pub unknown: usize,
    pub errors: usize,
}

pub struct SweepStats {
    pub channels_seen: usize,
    pub empty: ArchiveReport,
    pub inactive: ArchiveReport,
    pub classification: ClassificationStats,
    pub interrupted: Option<String>,
    pub start_time: Instant,
}

impl SweepStats {
    pub fn new(channels_seen: usize) -> Self {
        Self {
            channels_seen,
            empty: ArchiveReport::default(),
            inactive: ArchiveReport::default(),
            classification: ClassificationStats::default(),
            interrupted: None,
            start_time: Instant::now(),
        }
    }

    pub fn report(&self, reason: ArchiveReason) -> &ArchiveReport {
        match reason {
            ArchiveReason::Emptiness => &self.empty,
            ArchiveReason::Inactivity => &self.inactive,
        }
    }

    /// Count a single archive attempt as soon as it settles, so an early stop
    /// still reports what already happened.
    pub fn tally(&mut self, reason: ArchiveReason, outcome: ArchiveOutcome) {
        let report = match reason {
            ArchiveReason::Emptiness => &mut self.empty,
            ArchiveReason::Inactivity => &mut self.inactive,
        };
        match outcome {
            ArchiveOutcome::Archived => report.archived += 1,
            ArchiveOutcome::Failed => report.failed += 1,
            ArchiveOutcome::DryRun => report.skipped_dry_run += 1,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn print_stats(&self) {
        let success = RGB::new(16, 185, 129);
        let warning = RGB::new(245, 158, 11);
        let danger = RGB::new(231, 76, 60);
        let subtle = RGB::new(107, 114, 128);

        println!("\n📊 Archive sweep summary:");
        println!("⏱️  Time taken: {:.2?}", self.elapsed());
        println!("📁 Channels inspected: {}", self.channels_seen);
        for (label, reason) in [
            ("🕳️  Empty", ArchiveReason::Emptiness),
            ("💤 Inactive", ArchiveReason::Inactivity),
        ] {
            let report = self.report(reason);
            println!(
                "{}: {} archived, {} failed",
                label,
                report.archived.to_string().color(success),
                report.failed.to_string().color(danger)
            );
        }
        println!(
            "🔍 History checks: {} run, {} without activity, {} errors",
            self.classification.checked,
            self.classification.unknown.to_string().color(subtle),
            self.classification.errors.to_string().color(warning)
        );

        let dry_run = self.empty.skipped_dry_run + self.inactive.skipped_dry_run;
        if dry_run > 0 {
            println!(
                "🧪 Dry run: {} channels would have been archived",
                dry_run.to_string().color(warning)
            );
        }
        if let Some(reason) = &self.interrupted {
            println!("🛑 {}", format!("Sweep stopped early: {reason}").color(danger));
        }
    }
}
