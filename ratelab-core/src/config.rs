//! RMS configuration — operator-supplied strategy, weights, bounds, thresholds.
//!
//! `RmsConfig` is the serializable form loaded from TOML. It must pass
//! `validate()` to become a `ValidatedConfig`, the only handle the engine
//! accepts. A config is versioned as a whole; there are no partial updates.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::strategy::Strategy;

/// Errors from parsing or validating an `RmsConfig`. Fatal to the batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("parse config TOML: {0}")]
    Parse(String),
    #[error("{field} must be finite (got {value})")]
    NonFinite { field: &'static str, value: f64 },
    #[error("weight '{field}' must be non-negative (got {value})")]
    NegativeWeight { field: &'static str, value: f64 },
    #[error("weights sum to zero")]
    ZeroWeightSum,
    #[error("reference_velocity must be > 0 (got {0})")]
    NonPositiveReferenceVelocity(f64),
    #[error("demand_baseline must be within 0..=10 (got {0})")]
    DemandBaselineOutOfRange(f64),
    #[error("{field} must be non-negative (got {value})")]
    NegativeAmount { field: &'static str, value: f64 },
    #[error("min_adr ({min}) exceeds max_adr ({max})")]
    InvertedAdrBounds { min: f64, max: f64 },
    #[error("min_price ({min}) exceeds max_price ({max})")]
    InvertedPriceBounds { min: f64, max: f64 },
    #[error("price_step must be > 0 (got {0})")]
    NonPositivePriceStep(f64),
    #[error("{field} must be within 0..=100 (got {value})")]
    PercentOutOfRange { field: &'static str, value: f64 },
    #[error("hotel_capacity must be > 0")]
    ZeroCapacity,
    #[error("room_type_capacities sum overflows")]
    CapacityOverflow,
    #[error("fingerprint config: {0}")]
    Fingerprint(String),
}

/// Weights of the four pressure terms plus their normalization constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PressureWeights {
    pub demand: f64,
    pub competitor: f64,
    pub event: f64,
    pub pickup: f64,
    /// Pickup velocity that saturates the pickup term.
    pub reference_velocity: f64,
    /// Demand index treated as neutral; 0 makes every demand level push up.
    pub demand_baseline: f64,
}

impl PressureWeights {
    pub fn sum(&self) -> f64 {
        self.demand + self.competitor + self.event + self.pickup
    }
}

impl Default for PressureWeights {
    fn default() -> Self {
        Self {
            demand: 0.4,
            competitor: 0.3,
            event: 0.2,
            pickup: 0.1,
            reference_velocity: 500.0,
            demand_baseline: 5.0,
        }
    }
}

/// Calendar rules for the weekend premium and the last-minute discount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingCalendar {
    pub weekend_days: Vec<Weekday>,
    /// A date is last-minute when `0 <= date - as_of <= window`.
    pub last_minute_window_days: u32,
    /// Reference date of the batch. Without it no date is last-minute.
    pub as_of: Option<NaiveDate>,
}

impl PricingCalendar {
    pub fn is_weekend(&self, date: NaiveDate) -> bool {
        use chrono::Datelike;
        self.weekend_days.contains(&date.weekday())
    }

    pub fn is_last_minute(&self, date: NaiveDate) -> bool {
        match self.as_of {
            Some(as_of) => {
                let lead = (date - as_of).num_days();
                (0..=i64::from(self.last_minute_window_days)).contains(&lead)
            }
            None => false,
        }
    }
}

impl Default for PricingCalendar {
    fn default() -> Self {
        Self {
            weekend_days: vec![Weekday::Sat, Weekday::Sun],
            last_minute_window_days: 3,
            as_of: None,
        }
    }
}

/// Serializable RMS configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RmsConfig {
    pub strategy: Strategy,
    pub target_occupancy_pct: f64,
    pub min_adr: f64,
    pub max_adr: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub weekend_premium_pct: f64,
    pub last_minute_discount_pct: f64,
    /// All suggested prices are rounded to a multiple of this.
    pub price_step: f64,
    /// Changes with `|magnitude_pct|` at or below this are auto-approvable.
    pub auto_approve_threshold_pct: f64,
    pub weights: PressureWeights,
    pub calendar: PricingCalendar,
    /// Total physical rooms. Defaults to the sum of `room_type_capacities`.
    pub hotel_capacity: Option<u32>,
    pub room_type_capacities: BTreeMap<String, u32>,
}

impl Default for RmsConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Balanced,
            target_occupancy_pct: 85.0,
            min_adr: 120.0,
            max_adr: 450.0,
            min_price: 90.0,
            max_price: 600.0,
            weekend_premium_pct: 15.0,
            last_minute_discount_pct: 10.0,
            price_step: 5.0,
            auto_approve_threshold_pct: 5.0,
            weights: PressureWeights::default(),
            calendar: PricingCalendar::default(),
            hotel_capacity: None,
            room_type_capacities: BTreeMap::new(),
        }
    }
}

impl RmsConfig {
    /// Parse a config from a TOML string. Does not validate.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Validate every field, failing on the first violation.
    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        let w = &self.weights;

        for (field, value) in [
            ("target_occupancy_pct", self.target_occupancy_pct),
            ("min_adr", self.min_adr),
            ("max_adr", self.max_adr),
            ("min_price", self.min_price),
            ("max_price", self.max_price),
            ("weekend_premium_pct", self.weekend_premium_pct),
            ("last_minute_discount_pct", self.last_minute_discount_pct),
            ("price_step", self.price_step),
            ("auto_approve_threshold_pct", self.auto_approve_threshold_pct),
            ("weights.demand", w.demand),
            ("weights.competitor", w.competitor),
            ("weights.event", w.event),
            ("weights.pickup", w.pickup),
            ("weights.reference_velocity", w.reference_velocity),
            ("weights.demand_baseline", w.demand_baseline),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
        }

        for (field, value) in [
            ("demand", w.demand),
            ("competitor", w.competitor),
            ("event", w.event),
            ("pickup", w.pickup),
        ] {
            if value < 0.0 {
                return Err(ConfigError::NegativeWeight { field, value });
            }
        }
        let weight_sum = w.sum();
        if weight_sum <= 0.0 {
            return Err(ConfigError::ZeroWeightSum);
        }
        if w.reference_velocity <= 0.0 {
            return Err(ConfigError::NonPositiveReferenceVelocity(w.reference_velocity));
        }
        if !(0.0..=10.0).contains(&w.demand_baseline) {
            return Err(ConfigError::DemandBaselineOutOfRange(w.demand_baseline));
        }

        for (field, value) in [
            ("min_adr", self.min_adr),
            ("max_adr", self.max_adr),
            ("min_price", self.min_price),
            ("max_price", self.max_price),
        ] {
            if value < 0.0 {
                return Err(ConfigError::NegativeAmount { field, value });
            }
        }
        if self.min_adr > self.max_adr {
            return Err(ConfigError::InvertedAdrBounds {
                min: self.min_adr,
                max: self.max_adr,
            });
        }
        if self.min_price > self.max_price {
            return Err(ConfigError::InvertedPriceBounds {
                min: self.min_price,
                max: self.max_price,
            });
        }
        if self.price_step <= 0.0 {
            return Err(ConfigError::NonPositivePriceStep(self.price_step));
        }

        for (field, value) in [
            ("target_occupancy_pct", self.target_occupancy_pct),
            ("weekend_premium_pct", self.weekend_premium_pct),
            ("last_minute_discount_pct", self.last_minute_discount_pct),
            ("auto_approve_threshold_pct", self.auto_approve_threshold_pct),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::PercentOutOfRange { field, value });
            }
        }

        let capacity = match self.hotel_capacity {
            Some(0) => return Err(ConfigError::ZeroCapacity),
            Some(c) => Some(c),
            None => {
                let total = self
                    .room_type_capacities
                    .values()
                    .try_fold(0u32, |acc, &rooms| acc.checked_add(rooms))
                    .ok_or(ConfigError::CapacityOverflow)?;
                (total > 0).then_some(total)
            }
        };

        let version = ConfigVersion::of(&self)?;
        Ok(ValidatedConfig {
            config: self,
            version,
            weight_sum,
            capacity,
        })
    }
}

/// Content hash identifying a config as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfigVersion(pub String);

impl ConfigVersion {
    fn of(config: &RmsConfig) -> Result<Self, ConfigError> {
        // BTreeMap keys keep the JSON canonical.
        let json =
            serde_json::to_string(config).map_err(|e| ConfigError::Fingerprint(e.to_string()))?;
        Ok(Self(blake3::hash(json.as_bytes()).to_hex().to_string()))
    }

    /// First 12 hex chars, for display.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for ConfigVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable, validated config consumed by every engine stage.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig {
    config: RmsConfig,
    version: ConfigVersion,
    weight_sum: f64,
    capacity: Option<u32>,
}

impl ValidatedConfig {
    pub fn config(&self) -> &RmsConfig {
        &self.config
    }

    pub fn version(&self) -> &ConfigVersion {
        &self.version
    }

    pub fn strategy(&self) -> Strategy {
        self.config.strategy
    }

    pub fn weights(&self) -> &PressureWeights {
        &self.config.weights
    }

    /// Sum of the four weights; always > 0.
    pub fn weight_sum(&self) -> f64 {
        self.weight_sum
    }

    /// Effective hotel capacity, if known.
    pub fn capacity(&self) -> Option<u32> {
        self.capacity
    }

    pub fn calendar(&self) -> &PricingCalendar {
        &self.config.calendar
    }

    /// Copy with a different reference date, re-validated and re-versioned.
    pub fn with_as_of(&self, as_of: NaiveDate) -> Result<Self, ConfigError> {
        let mut config = self.config.clone();
        config.calendar.as_of = Some(as_of);
        config.validate()
    }

    pub fn into_inner(self) -> RmsConfig {
        self.config
    }
}
