//! Signal normalization — clean and default raw signals into canonical form.
//!
//! Corrections are local and recorded as `GuardWarning`s. The only outcome
//! that removes a date from aggregation is both reference prices missing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{GuardWarning, IndeterminateDate, IndeterminateReason, RateSignal};

const INDEX_MAX: i32 = 10;

/// A signal ready for aggregation. Every numeric field is finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSignal {
    pub date: NaiveDate,
    pub current_rate: f64,
    pub competitor_median_rate: f64,
    pub current_rate_imputed: bool,
    pub competitor_rate_imputed: bool,
    /// Clamped to 0..=10.
    pub demand_index: u8,
    /// Clamped to 0..=10; `None` when no event overlaps the date.
    pub event_impact: Option<u8>,
    pub available_rooms: u32,
    pub rack_rate: f64,
    /// `None` when the raw value was not finite.
    pub pickup_velocity: Option<f64>,
    pub warnings: Vec<GuardWarning>,
}

/// Result of normalizing one raw signal.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Ready(NormalizedSignal),
    Indeterminate(IndeterminateDate),
}

impl Normalized {
    pub fn ready(self) -> Option<NormalizedSignal> {
        match self {
            Self::Ready(s) => Some(s),
            Self::Indeterminate(_) => None,
        }
    }
}

/// Normalize a raw signal.
pub fn normalize(signal: &RateSignal) -> Normalized {
    let mut warnings = Vec::new();

    let current = usable_rate(signal.current_rate, &mut warnings);
    let competitor = usable_rate(signal.competitor_median_rate, &mut warnings);

    let (current_rate, competitor_median_rate, current_imputed, competitor_imputed) =
        match (current, competitor) {
            (Some(c), Some(m)) => (c, m, false, false),
            (Some(c), None) => {
                warnings.push(GuardWarning::CompetitorRateImputed);
                (c, c, false, true)
            }
            (None, Some(m)) => {
                warnings.push(GuardWarning::CurrentRateImputed);
                (m, m, true, false)
            }
            (None, None) => {
                return Normalized::Indeterminate(IndeterminateDate {
                    date: signal.date,
                    reason: IndeterminateReason::MissingReferencePrices,
                });
            }
        };

    let demand_index = clamp_index(signal.demand_index, GuardWarning::DemandIndexClamped, &mut warnings);
    let event_impact = signal
        .event_impact
        .map(|impact| clamp_index(impact, GuardWarning::EventImpactClamped, &mut warnings));

    let available_rooms = if signal.available_rooms < 0 {
        warnings.push(GuardWarning::NegativeInventory);
        0
    } else {
        u32::try_from(signal.available_rooms).unwrap_or(u32::MAX)
    };

    let rack_rate = if signal.rack_rate.is_finite() && signal.rack_rate >= 0.0 {
        signal.rack_rate
    } else {
        warnings.push(GuardWarning::InvalidRackRate);
        0.0
    };

    let pickup_velocity = if signal.pickup_velocity.is_finite() {
        Some(signal.pickup_velocity)
    } else {
        warnings.push(GuardWarning::NonFinitePickup);
        None
    };

    if !warnings.is_empty() {
        tracing::debug!(date = %signal.date, ?warnings, "signal corrected during normalization");
    }

    Normalized::Ready(NormalizedSignal {
        date: signal.date,
        current_rate,
        competitor_median_rate,
        current_rate_imputed: current_imputed,
        competitor_rate_imputed: competitor_imputed,
        demand_index,
        event_impact,
        available_rooms,
        rack_rate,
        pickup_velocity,
        warnings,
    })
}

fn usable_rate(rate: Option<f64>, warnings: &mut Vec<GuardWarning>) -> Option<f64> {
    match rate {
        Some(r) if r.is_finite() && r >= 0.0 => Some(r),
        Some(_) => {
            warnings.push(GuardWarning::InvalidRateDiscarded);
            None
        }
        None => None,
    }
}

fn clamp_index(value: i32, warning: GuardWarning, warnings: &mut Vec<GuardWarning>) -> u8 {
    let clamped = value.clamp(0, INDEX_MAX);
    if clamped != value {
        warnings.push(warning);
    }
    clamped as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 12).unwrap()
    }

    fn ready(signal: &RateSignal) -> NormalizedSignal {
        normalize(signal).ready().expect("expected a determinate signal")
    }

    #[test]
    fn clean_signal_passes_through() {
        let s = ready(&RateSignal::new(date(), 150.0, 180.0).with_demand(8).with_event(6));
        assert_eq!(s.current_rate, 150.0);
        assert_eq!(s.competitor_median_rate, 180.0);
        assert_eq!(s.demand_index, 8);
        assert_eq!(s.event_impact, Some(6));
        assert!(s.warnings.is_empty());
    }

    #[test]
    fn missing_competitor_defaults_to_own_rate() {
        let mut raw = RateSignal::new(date(), 150.0, 0.0);
        raw.competitor_median_rate = None;
        let s = ready(&raw);
        assert_eq!(s.competitor_median_rate, 150.0);
        assert!(s.competitor_rate_imputed);
        assert_eq!(s.warnings, vec![GuardWarning::CompetitorRateImputed]);
    }

    #[test]
    fn missing_current_defaults_to_competitor() {
        let mut raw = RateSignal::new(date(), 0.0, 175.0);
        raw.current_rate = None;
        let s = ready(&raw);
        assert_eq!(s.current_rate, 175.0);
        assert!(s.current_rate_imputed);
    }

    #[test]
    fn both_missing_is_indeterminate() {
        let mut raw = RateSignal::new(date(), 0.0, 0.0);
        raw.current_rate = None;
        raw.competitor_median_rate = None;
        assert_eq!(
            normalize(&raw),
            Normalized::Indeterminate(IndeterminateDate {
                date: date(),
                reason: IndeterminateReason::MissingReferencePrices,
            })
        );
    }

    #[test]
    fn invalid_rates_count_as_absent() {
        let mut raw = RateSignal::new(date(), f64::NAN, -10.0);
        raw.rack_rate = 100.0;
        assert!(matches!(normalize(&raw), Normalized::Indeterminate(_)));

        let raw = RateSignal::new(date(), f64::INFINITY, 120.0);
        let s = ready(&raw);
        assert_eq!(s.current_rate, 120.0);
        assert!(s.warnings.contains(&GuardWarning::InvalidRateDiscarded));
        assert!(s.warnings.contains(&GuardWarning::CurrentRateImputed));
    }

    #[test]
    fn indices_are_clamped() {
        let s = ready(&RateSignal::new(date(), 150.0, 150.0).with_demand(14).with_event(-3));
        assert_eq!(s.demand_index, 10);
        assert_eq!(s.event_impact, Some(0));
        assert!(s.warnings.contains(&GuardWarning::DemandIndexClamped));
        assert!(s.warnings.contains(&GuardWarning::EventImpactClamped));
    }

    #[test]
    fn absent_event_stays_separate_from_demand() {
        let s = ready(&RateSignal::new(date(), 150.0, 150.0).with_demand(4));
        assert_eq!(s.event_impact, None);
        assert_eq!(s.demand_index, 4);
    }

    #[test]
    fn negative_inventory_floors_to_zero() {
        let s = ready(&RateSignal::new(date(), 150.0, 150.0).with_rooms(-4));
        assert_eq!(s.available_rooms, 0);
        assert_eq!(s.warnings, vec![GuardWarning::NegativeInventory]);
    }

    #[test]
    fn non_finite_pickup_is_skipped() {
        let s = ready(&RateSignal::new(date(), 150.0, 150.0).with_pickup(f64::NAN));
        assert_eq!(s.pickup_velocity, None);
        assert!(s.warnings.contains(&GuardWarning::NonFinitePickup));
    }

    #[test]
    fn bad_rack_rate_floors_to_zero() {
        let s = ready(&RateSignal::new(date(), 150.0, 150.0).with_rack(-1.0));
        assert_eq!(s.rack_rate, 0.0);
        assert!(s.warnings.contains(&GuardWarning::InvalidRackRate));
    }
}
