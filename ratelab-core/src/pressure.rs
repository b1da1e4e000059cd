//! Pressure aggregation — one weighted market-pressure score per date.
//!
//! ```text
//! demand     = (demand_index - demand_baseline) / 10
//! competitor = clamp(-(current - median) / median, -1, 1)
//! event      = event_impact / 10
//! pickup     = sign(v) * min(|v| / reference_velocity, 1)
//! net        = clamp(Σ wᵢ·termᵢ / Σ wᵢ, -1, 1)
//! ```
//!
//! A term whose inputs are unusable is skipped together with its weight, so
//! missing data never drags the score toward zero.

use serde::{Deserialize, Serialize};

use crate::config::ValidatedConfig;
use crate::domain::GuardWarning;
use crate::normalize::NormalizedSignal;

/// One weighted contribution. `value` is `None` when the term was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureTerm {
    pub value: Option<f64>,
    pub weight: f64,
}

impl PressureTerm {
    fn active_weight(&self) -> f64 {
        if self.value.is_some() {
            self.weight
        } else {
            0.0
        }
    }

    fn weighted(&self) -> f64 {
        self.value.map_or(0.0, |v| v * self.weight)
    }
}

/// Every term behind a pressure score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureBreakdown {
    pub demand: PressureTerm,
    pub competitor: PressureTerm,
    pub event: PressureTerm,
    pub pickup: PressureTerm,
    /// `(current - median) / median`; `None` when the median is zero or either
    /// side was imputed.
    pub competitor_gap_pct: Option<f64>,
    /// Signed pressure in `[-1, 1]`; negative favors lowering the price.
    pub net: f64,
    /// `net` rescaled to `[0, 1]`, 0.5 being neutral.
    pub scaled: f64,
}

impl PressureBreakdown {
    fn terms(&self) -> [PressureTerm; 4] {
        [self.demand, self.competitor, self.event, self.pickup]
    }
}

/// Compute the pressure breakdown for a normalized signal.
///
/// Returns any guard warnings raised while aggregating.
pub fn aggregate(
    signal: &NormalizedSignal,
    config: &ValidatedConfig,
) -> (PressureBreakdown, Vec<GuardWarning>) {
    let w = config.weights();
    let mut warnings = Vec::new();

    let demand = (f64::from(signal.demand_index) - w.demand_baseline) / 10.0;

    // An imputed side mirrors the other one, so there is no real gap to score.
    let imputed = signal.current_rate_imputed || signal.competitor_rate_imputed;
    let competitor_gap_pct = if imputed {
        None
    } else if signal.competitor_median_rate > 0.0 {
        Some((signal.current_rate - signal.competitor_median_rate) / signal.competitor_median_rate)
    } else {
        warnings.push(GuardWarning::ZeroCompetitorMedian);
        None
    };
    let competitor = competitor_gap_pct.map(|gap| (-gap).clamp(-1.0, 1.0));

    let event = f64::from(signal.event_impact.unwrap_or(0)) / 10.0;

    let pickup = signal
        .pickup_velocity
        .map(|v| v.signum() * (v.abs() / w.reference_velocity).min(1.0))
        .map(|p| if p == 0.0 { 0.0 } else { p });

    let mut breakdown = PressureBreakdown {
        demand: PressureTerm {
            value: Some(demand),
            weight: w.demand,
        },
        competitor: PressureTerm {
            value: competitor,
            weight: w.competitor,
        },
        event: PressureTerm {
            value: Some(event),
            weight: w.event,
        },
        pickup: PressureTerm {
            value: pickup,
            weight: w.pickup,
        },
        competitor_gap_pct,
        net: 0.0,
        scaled: 0.5,
    };

    let terms = breakdown.terms();
    let active: f64 = terms.iter().map(PressureTerm::active_weight).sum();
    if active > 0.0 {
        let weighted: f64 = terms.iter().map(PressureTerm::weighted).sum();
        breakdown.net = (weighted / active).clamp(-1.0, 1.0);
        breakdown.scaled = (breakdown.net + 1.0) / 2.0;
    } else {
        warnings.push(GuardWarning::NoUsableTerms);
    }

    (breakdown, warnings)
}
