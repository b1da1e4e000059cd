//! Recommendation — the engine's per-date output, plus batch-level results.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::signal::GuardWarning;
use crate::pressure::PressureBreakdown;

/// Pricing action for a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Up,
    Down,
    Hold,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Hold => "hold",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which rung of the decision ladder produced the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionRule {
    /// Inventory at or below the strategy's scarcity floor.
    ScarcityOverride,
    /// Abundant inventory with clearly negative pressure.
    AbundanceOverride,
    /// Pressure strictly above the up threshold.
    ThresholdUp,
    /// Pressure strictly below the down threshold.
    ThresholdDown,
    /// Pressure inside the band, thresholds included.
    WithinBand,
}

impl DecisionRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ScarcityOverride => "scarcity_override",
            Self::AbundanceOverride => "abundance_override",
            Self::ThresholdUp => "threshold_up",
            Self::ThresholdDown => "threshold_down",
            Self::WithinBand => "within_band",
        }
    }

    pub fn is_override(&self) -> bool {
        matches!(self, Self::ScarcityOverride | Self::AbundanceOverride)
    }
}

/// Side of the hard price clamp that bound the suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClampSide {
    MinPrice,
    MaxPrice,
}

/// Price adjustments applied after the raw action price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceAdjustments {
    pub weekend_premium: bool,
    pub last_minute_discount: bool,
    pub rounded: bool,
    pub clamp: Option<ClampSide>,
}

/// Occupancy implied by remaining inventory, when capacity is configured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OccupancyContext {
    pub capacity: u32,
    pub projected_occupancy_pct: f64,
    pub target_occupancy_pct: f64,
    /// Projected minus target; negative means below target.
    pub gap_pct: f64,
}

impl OccupancyContext {
    pub fn project(capacity: u32, available_rooms: u32, target_occupancy_pct: f64) -> Self {
        let sold = capacity.saturating_sub(available_rooms);
        let projected = f64::from(sold) / f64::from(capacity) * 100.0;
        Self {
            capacity,
            projected_occupancy_pct: projected,
            target_occupancy_pct,
            gap_pct: projected - target_occupancy_pct,
        }
    }
}

/// Structured explanation of a recommendation.
///
/// Carries every contributing term so a consumer can render an explanation
/// without recomputing anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rationale {
    /// `(current - competitor) / competitor`; negative means underpriced.
    pub competitor_gap_pct: Option<f64>,
    pub demand_index: u8,
    pub event_present: bool,
    pub event_impact: u8,
    pub pickup_velocity: f64,
    pub available_rooms: u32,
    pub pressure: PressureBreakdown,
    pub rule: DecisionRule,
    pub scarcity_override: bool,
    pub abundance_override: bool,
    pub adjustments: PriceAdjustments,
    pub rack_rate: f64,
    pub above_rack: bool,
    pub occupancy: Option<OccupancyContext>,
    pub warnings: Vec<GuardWarning>,
}

/// Final per-date recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub date: NaiveDate,
    pub action: Action,
    /// Reference rate the change is measured against (possibly imputed).
    pub current_rate: f64,
    pub suggested_price: f64,
    /// Signed percent change from `current_rate`.
    pub magnitude_pct: f64,
    pub auto_approvable: bool,
    pub rationale: Rationale,
}

/// Why a date produced no price action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndeterminateReason {
    /// Both own rate and competitor median absent.
    MissingReferencePrices,
    /// The date already appeared earlier in the batch.
    DuplicateDate,
}

impl IndeterminateReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingReferencePrices => "missing_reference_prices",
            Self::DuplicateDate => "duplicate_date",
        }
    }
}

/// A date reported as "data unavailable" instead of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndeterminateDate {
    pub date: NaiveDate,
    pub reason: IndeterminateReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdrStatus {
    Within,
    BelowMin,
    AboveMax,
    /// No recommendations to average.
    NoData,
}

/// Batch-level check of the average suggested price against `[min_adr, max_adr]`.
///
/// Reported only; daily prices are never clamped to the ADR band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdrGuardrail {
    pub average_suggested: Option<f64>,
    pub min_adr: f64,
    pub max_adr: f64,
    pub status: AdrStatus,
}

impl AdrGuardrail {
    pub fn evaluate(prices: &[f64], min_adr: f64, max_adr: f64) -> Self {
        if prices.is_empty() {
            return Self {
                average_suggested: None,
                min_adr,
                max_adr,
                status: AdrStatus::NoData,
            };
        }
        let average = prices.iter().sum::<f64>() / prices.len() as f64;
        let status = if average < min_adr {
            AdrStatus::BelowMin
        } else if average > max_adr {
            AdrStatus::AboveMax
        } else {
            AdrStatus::Within
        };
        Self {
            average_suggested: Some(average),
            min_adr,
            max_adr,
            status,
        }
    }

    pub fn is_breached(&self) -> bool {
        matches!(self.status, AdrStatus::BelowMin | AdrStatus::AboveMax)
    }
}

/// Complete result of one `compute` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Version of the config the batch ran under.
    pub config_version: String,
    /// One per determinate date, ordered by date.
    pub recommendations: Vec<Recommendation>,
    /// Dates with no price action, ordered by date.
    pub indeterminate: Vec<IndeterminateDate>,
    pub adr_guardrail: AdrGuardrail,
}

impl BatchOutcome {
    pub fn recommendation_for(&self, date: NaiveDate) -> Option<&Recommendation> {
        self.recommendations
            .binary_search_by_key(&date, |r| r.date)
            .ok()
            .map(|i| &self.recommendations[i])
    }

    pub fn is_indeterminate(&self, date: NaiveDate) -> bool {
        self.indeterminate.iter().any(|d| d.date == date)
    }

    pub fn count(&self, action: Action) -> usize {
        self.recommendations
            .iter()
            .filter(|r| r.action == action)
            .count()
    }
}
