//! RateSignal — one property-date of market and inventory data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Raw per-date input, as assembled by the data-access layer.
///
/// Field types are wider than the valid domain (signed inventory, unbounded
/// demand index) so bad upstream data survives deserialization and is
/// corrected by the normalizer with a recorded warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSignal {
    pub date: NaiveDate,
    /// Own BAR for the date.
    pub current_rate: Option<f64>,
    /// Median rate of the compset.
    pub competitor_median_rate: Option<f64>,
    /// Market-wide demand, nominally 0..=10.
    pub demand_index: i32,
    /// Remaining sellable rooms, summed over room types.
    pub available_rooms: i64,
    pub rack_rate: f64,
    /// Impact of an overlapping demand event, nominally 0..=10.
    #[serde(default)]
    pub event_impact: Option<i32>,
    /// Recent booking revenue trend; positive means accelerating.
    #[serde(default)]
    pub pickup_velocity: f64,
}

impl RateSignal {
    /// Signal with both reference prices known and neutral extras.
    pub fn new(date: NaiveDate, current_rate: f64, competitor_median_rate: f64) -> Self {
        Self {
            date,
            current_rate: Some(current_rate),
            competitor_median_rate: Some(competitor_median_rate),
            demand_index: 5,
            available_rooms: 10,
            rack_rate: current_rate,
            event_impact: None,
            pickup_velocity: 0.0,
        }
    }

    pub fn with_demand(mut self, demand_index: i32) -> Self {
        self.demand_index = demand_index;
        self
    }

    pub fn with_rooms(mut self, available_rooms: i64) -> Self {
        self.available_rooms = available_rooms;
        self
    }

    pub fn with_event(mut self, impact: i32) -> Self {
        self.event_impact = Some(impact);
        self
    }

    pub fn with_pickup(mut self, velocity: f64) -> Self {
        self.pickup_velocity = velocity;
        self
    }

    pub fn with_rack(mut self, rack_rate: f64) -> Self {
        self.rack_rate = rack_rate;
        self
    }
}

/// Local corrections applied to a date's data. Never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardWarning {
    /// `available_rooms` was negative and floored to 0.
    NegativeInventory,
    /// `demand_index` was outside 0..=10.
    DemandIndexClamped,
    /// `event_impact` was outside 0..=10.
    EventImpactClamped,
    /// Own rate absent; competitor median used in its place.
    CurrentRateImputed,
    /// Competitor median absent; own rate used in its place.
    CompetitorRateImputed,
    /// A monetary input was negative or non-finite and treated as absent.
    InvalidRateDiscarded,
    /// Rack rate was negative or non-finite and floored to 0.
    InvalidRackRate,
    /// Pickup velocity was non-finite; the pickup term was skipped.
    NonFinitePickup,
    /// Competitor median was zero; the competitor term was skipped.
    ZeroCompetitorMedian,
    /// Every weighted term was skipped; pressure defaulted to neutral.
    NoUsableTerms,
    /// No multiple of `price_step` lies inside `[min_price, max_price]`.
    UnalignedPriceBounds,
}

impl GuardWarning {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NegativeInventory => "negative_inventory",
            Self::DemandIndexClamped => "demand_index_clamped",
            Self::EventImpactClamped => "event_impact_clamped",
            Self::CurrentRateImputed => "current_rate_imputed",
            Self::CompetitorRateImputed => "competitor_rate_imputed",
            Self::InvalidRateDiscarded => "invalid_rate_discarded",
            Self::InvalidRackRate => "invalid_rack_rate",
            Self::NonFinitePickup => "non_finite_pickup",
            Self::ZeroCompetitorMedian => "zero_competitor_median",
            Self::NoUsableTerms => "no_usable_terms",
            Self::UnalignedPriceBounds => "unaligned_price_bounds",
        }
    }
}
