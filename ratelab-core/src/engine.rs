//! Batch engine — `compute(signals, config) -> BatchOutcome`.
//!
//! Each date runs through normalize → aggregate → decide → enforce → emit
//! independently. The batch-level steps (duplicate detection, ordering and the
//! ADR guardrail) live in `partition_batch` and `assemble` so parallel callers
//! produce exactly the same outcome as `compute`.

use std::collections::HashSet;

use crate::config::ValidatedConfig;
use crate::decision::decide;
use crate::domain::{
    AdrGuardrail, BatchOutcome, IndeterminateDate, IndeterminateReason, RateSignal,
    Recommendation,
};
use crate::emit::emit;
use crate::normalize::{normalize, Normalized};
use crate::pressure::aggregate;
use crate::pricing::enforce;

/// Result for a single date.
#[derive(Debug, Clone, PartialEq)]
pub enum DateOutcome {
    Recommended(Box<Recommendation>),
    Indeterminate(IndeterminateDate),
}

/// Evaluate one date. Pure; safe to call from any thread.
pub fn evaluate(signal: &RateSignal, config: &ValidatedConfig) -> DateOutcome {
    let normalized = match normalize(signal) {
        Normalized::Ready(s) => s,
        Normalized::Indeterminate(d) => return DateOutcome::Indeterminate(d),
    };

    let (pressure, warnings) = aggregate(&normalized, config);
    let decision = decide(pressure.net, normalized.available_rooms, config.strategy());
    let priced = enforce(&decision, pressure.net, &normalized, config);

    DateOutcome::Recommended(Box::new(emit(
        &normalized,
        pressure,
        decision,
        priced,
        warnings,
        config,
    )))
}

/// Split a batch into unique dates and duplicate reports.
///
/// The first occurrence of a date wins; later ones are reported as
/// `DuplicateDate`. Input order is otherwise preserved.
pub fn partition_batch(signals: &[RateSignal]) -> (Vec<&RateSignal>, Vec<IndeterminateDate>) {
    let mut seen = HashSet::with_capacity(signals.len());
    let mut unique = Vec::with_capacity(signals.len());
    let mut duplicates = Vec::new();
    for signal in signals {
        if seen.insert(signal.date) {
            unique.push(signal);
        } else {
            duplicates.push(IndeterminateDate {
                date: signal.date,
                reason: IndeterminateReason::DuplicateDate,
            });
        }
    }
    (unique, duplicates)
}

/// Order per-date outcomes and attach the batch-level guardrail.
pub fn assemble(
    outcomes: Vec<DateOutcome>,
    duplicates: Vec<IndeterminateDate>,
    config: &ValidatedConfig,
) -> BatchOutcome {
    let mut recommendations = Vec::with_capacity(outcomes.len());
    let mut indeterminate = Vec::new();
    for outcome in outcomes {
        match outcome {
            DateOutcome::Recommended(rec) => recommendations.push(*rec),
            DateOutcome::Indeterminate(d) => indeterminate.push(d),
        }
    }
    indeterminate.extend(duplicates);

    recommendations.sort_by_key(|r| r.date);
    // Stable: a date's own outcome stays ahead of its duplicate reports.
    indeterminate.sort_by_key(|d| d.date);

    let prices: Vec<f64> = recommendations.iter().map(|r| r.suggested_price).collect();
    let cfg = config.config();
    let adr_guardrail = AdrGuardrail::evaluate(&prices, cfg.min_adr, cfg.max_adr);

    BatchOutcome {
        config_version: config.version().to_string(),
        recommendations,
        indeterminate,
        adr_guardrail,
    }
}

/// Compute recommendations for a whole batch.
pub fn compute(signals: &[RateSignal], config: &ValidatedConfig) -> BatchOutcome {
    let (unique, duplicates) = partition_batch(signals);
    let outcomes = unique.into_iter().map(|s| evaluate(s, config)).collect();
    let outcome = assemble(outcomes, duplicates, config);

    tracing::debug!(
        version = %config.version().short(),
        dates = signals.len(),
        recommended = outcome.recommendations.len(),
        indeterminate = outcome.indeterminate.len(),
        adr_status = ?outcome.adr_guardrail.status,
        "batch computed"
    );

    outcome
}
