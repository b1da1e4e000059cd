//! Batch runner — evaluates dates in parallel with Rayon.
//!
//! Dates are independent, so the per-date evaluation is a plain parallel map.
//! Duplicate detection and ordering go through the core's `partition_batch`
//! and `assemble`, which keeps the output identical to `compute`.

use rayon::prelude::*;

use ratelab_core::{
    assemble, evaluate, partition_batch, BatchOutcome, DateOutcome, RateSignal, ValidatedConfig,
};

/// Batch executor over a set of dated signals.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    parallel: bool,
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchRunner {
    /// Creates a runner with parallel execution enabled.
    pub fn new() -> Self {
        Self { parallel: true }
    }

    /// Enables or disables parallel execution.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Computes recommendations for every date in `signals`.
    pub fn run(&self, signals: &[RateSignal], config: &ValidatedConfig) -> BatchOutcome {
        tracing::info!(
            dates = signals.len(),
            parallel = self.parallel,
            version = %config.version().short(),
            strategy = %config.strategy(),
            "batch started"
        );

        let (unique, duplicates) = partition_batch(signals);
        let outcomes: Vec<DateOutcome> = if self.parallel {
            unique.par_iter().map(|s| evaluate(s, config)).collect()
        } else {
            unique.iter().map(|s| evaluate(s, config)).collect()
        };
        let outcome = assemble(outcomes, duplicates, config);

        for d in &outcome.indeterminate {
            tracing::warn!(date = %d.date, reason = ?d.reason, "date is indeterminate");
        }
        if outcome.adr_guardrail.is_breached() {
            tracing::warn!(
                average = ?outcome.adr_guardrail.average_suggested,
                min_adr = outcome.adr_guardrail.min_adr,
                max_adr = outcome.adr_guardrail.max_adr,
                status = ?outcome.adr_guardrail.status,
                "average suggested price is outside the ADR guardrail"
            );
        }
        tracing::info!(
            recommended = outcome.recommendations.len(),
            indeterminate = outcome.indeterminate.len(),
            "batch finished"
        );

        outcome
    }
}
