//! Domain types shared by every stage of the engine.

pub mod recommendation;
pub mod signal;

pub use recommendation::{
    Action, AdrGuardrail, AdrStatus, BatchOutcome, ClampSide, DecisionRule, IndeterminateDate,
    IndeterminateReason, OccupancyContext, PriceAdjustments, Rationale, Recommendation,
};
pub use signal::{GuardWarning, RateSignal};
