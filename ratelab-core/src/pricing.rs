//! Price bounds — turn an action into a concrete, bounded suggested price.
//!
//! Order of operations:
//! 1. raw price from the action (Hold keeps the current rate)
//! 2. weekend premium, unless the action is Down
//! 3. last-minute discount, when inside the lead-time window with abundant inventory
//! 4. rounding to the nearest multiple of `price_step`
//! 5. hard clamp to `[min_price, max_price]`
//!
//! A Hold that no adjustment touched is left unrounded, so inside the bounds
//! it reports the current rate exactly. Every path clamps to the same bounds:
//! the tightest step multiples inside `[min_price, max_price]`, or the raw
//! bounds when no multiple fits. `[min_adr, max_adr]` is not applied here; it
//! is a batch-level check on the average (see `AdrGuardrail`).

use serde::{Deserialize, Serialize};

use crate::config::ValidatedConfig;
use crate::decision::Decision;
use crate::domain::{Action, ClampSide, GuardWarning, PriceAdjustments};
use crate::normalize::NormalizedSignal;

/// Suggested price with the adjustments that shaped it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedAction {
    pub suggested_price: f64,
    pub adjustments: PriceAdjustments,
    pub warnings: Vec<GuardWarning>,
}

/// Raw price before calendar adjustments, rounding and clamping.
pub fn raw_price(action: Action, pressure: f64, current: f64, config: &ValidatedConfig) -> f64 {
    let cfg = config.config();
    let aggressiveness = config.strategy().aggressiveness();
    match action {
        Action::Hold => current,
        Action::Up => {
            // Only pressure on the side of the move scales it; an override
            // against the pressure moves by one step.
            let intensity = pressure.max(0.0);
            current + cfg.price_step.max(intensity * (cfg.max_price - current) * aggressiveness)
        }
        Action::Down => {
            let intensity = (-pressure).max(0.0);
            current - cfg.price_step.max(intensity * (current - cfg.min_price) * aggressiveness)
        }
    }
}

/// Compute the bounded suggested price for a decided date.
pub fn enforce(
    decision: &Decision,
    pressure: f64,
    signal: &NormalizedSignal,
    config: &ValidatedConfig,
) -> PricedAction {
    let cfg = config.config();
    let calendar = config.calendar();
    let mut adjustments = PriceAdjustments::default();
    let mut warnings = Vec::new();

    let mut price = raw_price(decision.action, pressure, signal.current_rate, config);

    if decision.action != Action::Down
        && cfg.weekend_premium_pct > 0.0
        && calendar.is_weekend(signal.date)
    {
        price *= 1.0 + cfg.weekend_premium_pct / 100.0;
        adjustments.weekend_premium = true;
    }

    if cfg.last_minute_discount_pct > 0.0
        && calendar.is_last_minute(signal.date)
        && signal.available_rooms > config.strategy().abundance_ceiling()
    {
        price *= 1.0 - cfg.last_minute_discount_pct / 100.0;
        adjustments.last_minute_discount = true;
    }

    let touched = decision.action != Action::Hold
        || adjustments.weekend_premium
        || adjustments.last_minute_discount;

    if touched {
        price = round_to_step(price, cfg.price_step);
        adjustments.rounded = true;
    }

    let (lo, hi) = match aligned_bounds(cfg.min_price, cfg.max_price, cfg.price_step) {
        Some(bounds) => bounds,
        None => {
            if touched {
                warnings.push(GuardWarning::UnalignedPriceBounds);
            }
            (cfg.min_price, cfg.max_price)
        }
    };

    if price < lo {
        price = lo;
        adjustments.clamp = Some(ClampSide::MinPrice);
    } else if price > hi {
        price = hi;
        adjustments.clamp = Some(ClampSide::MaxPrice);
    }

    PricedAction {
        suggested_price: price,
        adjustments,
        warnings,
    }
}

/// Round to the nearest multiple of `step`; halves round away from zero.
pub fn round_to_step(price: f64, step: f64) -> f64 {
    (price / step).round() * step
}

/// Tightest step multiples inside `[min, max]`, if any exist.
fn aligned_bounds(min: f64, max: f64, step: f64) -> Option<(f64, f64)> {
    let lo = (min / step).ceil() * step;
    let hi = (max / step).floor() * step;
    (lo <= hi).then_some((lo, hi))
}
