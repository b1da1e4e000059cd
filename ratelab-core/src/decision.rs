//! Decision ladder — map pressure and inventory to an action.
//!
//! Rungs, first match wins:
//! 1. scarcity: `rooms <= scarcity_floor` → Up
//! 2. abundance: `rooms > abundance_ceiling && P < -abundance_threshold` → Down
//! 3. thresholds: `P > up` → Up, `P < down` → Down, otherwise Hold
//!
//! Comparisons against thresholds are strict, so a pressure exactly on a
//! boundary resolves to Hold.

use serde::{Deserialize, Serialize};

use crate::domain::{Action, DecisionRule};
use crate::strategy::Strategy;

/// Action plus the rung that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub action: Action,
    pub rule: DecisionRule,
}

/// Run the ladder for one date.
pub fn decide(pressure: f64, available_rooms: u32, strategy: Strategy) -> Decision {
    if available_rooms <= strategy.scarcity_floor() {
        return Decision {
            action: Action::Up,
            rule: DecisionRule::ScarcityOverride,
        };
    }

    if available_rooms > strategy.abundance_ceiling() && pressure < -strategy.abundance_threshold() {
        return Decision {
            action: Action::Down,
            rule: DecisionRule::AbundanceOverride,
        };
    }

    if pressure > strategy.up_threshold() {
        Decision {
            action: Action::Up,
            rule: DecisionRule::ThresholdUp,
        }
    } else if pressure < strategy.down_threshold() {
        Decision {
            action: Action::Down,
            rule: DecisionRule::ThresholdDown,
        }
    } else {
        Decision {
            action: Action::Hold,
            rule: DecisionRule::WithinBand,
        }
    }
}
