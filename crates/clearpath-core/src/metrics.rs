//! Process-wide lookup tallies.
//!
//! The pipeline records one [`LookupOutcome`] per `run` and one tick per
//! generation call. [`Metrics::flush`] emits a [`MetricsSnapshot`] as a
//! single `info!` event before the CLI exits.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::domain::RiskLevel;

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// How one lookup ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    NoRecalls,
    Classified { records: usize, level: RiskLevel },
    Failed,
}

/// Point-in-time copy of every tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub no_recalls: u64,
    pub red_verdicts: u64,
    pub yellow_verdicts: u64,
    pub failed_lookups: u64,
    pub recalls_classified: u64,
    pub generation_calls: u64,
}

impl MetricsSnapshot {
    pub fn lookups(&self) -> u64 {
        self.no_recalls + self.red_verdicts + self.yellow_verdicts + self.failed_lookups
    }
}

#[derive(Default)]
pub struct Metrics {
    no_recalls: AtomicU64,
    red_verdicts: AtomicU64,
    yellow_verdicts: AtomicU64,
    failed_lookups: AtomicU64,
    recalls_classified: AtomicU64,
    generation_calls: AtomicU64,
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            no_recalls: AtomicU64::new(0),
            red_verdicts: AtomicU64::new(0),
            yellow_verdicts: AtomicU64::new(0),
            failed_lookups: AtomicU64::new(0),
            recalls_classified: AtomicU64::new(0),
            generation_calls: AtomicU64::new(0),
        }
    }

    pub fn record_lookup(&self, outcome: LookupOutcome) {
        let tally = match outcome {
            LookupOutcome::NoRecalls => &self.no_recalls,
            LookupOutcome::Failed => &self.failed_lookups,
            LookupOutcome::Classified { records, level } => {
                self.recalls_classified
                    .fetch_add(records as u64, Ordering::Relaxed);
                match level {
                    RiskLevel::Red => &self.red_verdicts,
                    RiskLevel::Yellow => &self.yellow_verdicts,
                }
            }
        };
        tally.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_generation_call(&self) {
        self.generation_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            no_recalls: self.no_recalls.load(Ordering::Relaxed),
            red_verdicts: self.red_verdicts.load(Ordering::Relaxed),
            yellow_verdicts: self.yellow_verdicts.load(Ordering::Relaxed),
            failed_lookups: self.failed_lookups.load(Ordering::Relaxed),
            recalls_classified: self.recalls_classified.load(Ordering::Relaxed),
            generation_calls: self.generation_calls.load(Ordering::Relaxed),
        }
    }

    /// Emit the current snapshot as one `info!` event.
    pub fn flush(&self) {
        let s = self.snapshot();
        tracing::info!(
            metric = "flush",
            lookups = s.lookups(),
            no_recalls = s.no_recalls,
            red_verdicts = s.red_verdicts,
            yellow_verdicts = s.yellow_verdicts,
            failed_lookups = s.failed_lookups,
            recalls_classified = s.recalls_classified,
            generation_calls = s.generation_calls,
        );
    }

    /// Zero every tally; tests share the global.
    pub fn reset(&self) {
        for tally in [
            &self.no_recalls,
            &self.red_verdicts,
            &self.yellow_verdicts,
            &self.failed_lookups,
            &self.recalls_classified,
            &self.generation_calls,
        ] {
            tally.store(0, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_land_in_their_tallies() {
        let m = Metrics::new();
        m.record_lookup(LookupOutcome::NoRecalls);
        m.record_lookup(LookupOutcome::Classified {
            records: 3,
            level: RiskLevel::Red,
        });
        m.record_lookup(LookupOutcome::Classified {
            records: 1,
            level: RiskLevel::Yellow,
        });
        m.record_lookup(LookupOutcome::Failed);
        m.record_generation_call();

        let s = m.snapshot();
        assert_eq!(s.lookups(), 4);
        assert_eq!(s.no_recalls, 1);
        assert_eq!(s.red_verdicts, 1);
        assert_eq!(s.yellow_verdicts, 1);
        assert_eq!(s.failed_lookups, 1);
        assert_eq!(s.recalls_classified, 4);
        assert_eq!(s.generation_calls, 1);
    }

    #[test]
    fn reset_zeroes_all() {
        let m = Metrics::new();
        m.record_lookup(LookupOutcome::Failed);
        m.record_generation_call();
        m.reset();
        assert_eq!(m.snapshot(), MetricsSnapshot::default());
    }
}
