//! Recommendation emitter — magnitude, auto-approval and the structured rationale.

use crate::config::ValidatedConfig;
use crate::decision::Decision;
use crate::domain::{DecisionRule, GuardWarning, OccupancyContext, Rationale, Recommendation};
use crate::normalize::NormalizedSignal;
use crate::pressure::PressureBreakdown;
use crate::pricing::PricedAction;

/// Signed percent change from `current` to `suggested`.
///
/// Zero when there is no real reference rate to measure against.
pub fn magnitude_pct(current: f64, suggested: f64, current_imputed: bool) -> f64 {
    if current_imputed || current <= 0.0 {
        return 0.0;
    }
    (suggested - current) / current * 100.0
}

/// Assemble the final recommendation for a date.
///
/// `warnings` are the aggregation-stage warnings; normalization and pricing
/// warnings are taken from `signal` and `priced`.
pub fn emit(
    signal: &NormalizedSignal,
    pressure: PressureBreakdown,
    decision: Decision,
    priced: PricedAction,
    warnings: Vec<GuardWarning>,
    config: &ValidatedConfig,
) -> Recommendation {
    let cfg = config.config();
    let magnitude = magnitude_pct(
        signal.current_rate,
        priced.suggested_price,
        signal.current_rate_imputed,
    );
    let auto_approvable = magnitude.abs() <= cfg.auto_approve_threshold_pct;

    let mut all_warnings = signal.warnings.clone();
    all_warnings.extend(warnings);
    all_warnings.extend(priced.warnings.iter().copied());

    let occupancy = config.capacity().map(|capacity| {
        OccupancyContext::project(capacity, signal.available_rooms, cfg.target_occupancy_pct)
    });

    let rationale = Rationale {
        competitor_gap_pct: pressure.competitor_gap_pct,
        demand_index: signal.demand_index,
        event_present: signal.event_impact.is_some(),
        event_impact: signal.event_impact.unwrap_or(0),
        pickup_velocity: signal.pickup_velocity.unwrap_or(0.0),
        available_rooms: signal.available_rooms,
        pressure,
        rule: decision.rule,
        scarcity_override: decision.rule == DecisionRule::ScarcityOverride,
        abundance_override: decision.rule == DecisionRule::AbundanceOverride,
        adjustments: priced.adjustments,
        rack_rate: signal.rack_rate,
        above_rack: signal.rack_rate > 0.0 && priced.suggested_price > signal.rack_rate,
        occupancy,
        warnings: all_warnings,
    };

    Recommendation {
        date: signal.date,
        action: decision.action,
        current_rate: signal.current_rate,
        suggested_price: priced.suggested_price,
        magnitude_pct: magnitude,
        auto_approvable,
        rationale,
    }
}
