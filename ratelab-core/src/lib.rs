//! RateLab Core — rate-recommendation engine for hotel revenue management.
//!
//! This crate is pure computation over supplied data:
//! - Validated strategy configuration (weights, bounds, thresholds)
//! - Signal normalization with local, recorded corrections
//! - Weighted market-pressure aggregation
//! - Strategy-parameterized decision ladder (up / down / hold)
//! - Price bounds: step rounding, weekend and last-minute adjustments, hard clamps
//! - Recommendations with a structured rationale and auto-approval flag
//!
//! Entry point: [`compute`].

pub mod config;
pub mod decision;
pub mod domain;
pub mod emit;
pub mod engine;
pub mod normalize;
pub mod pressure;
pub mod pricing;
pub mod strategy;

pub use config::{ConfigError, ConfigVersion, PressureWeights, PricingCalendar, RmsConfig, ValidatedConfig};
pub use domain::{
    Action, AdrGuardrail, AdrStatus, BatchOutcome, DecisionRule, GuardWarning, IndeterminateDate,
    IndeterminateReason, RateSignal, Rationale, Recommendation,
};
pub use engine::{assemble, compute, evaluate, partition_batch, DateOutcome};
pub use strategy::Strategy;
