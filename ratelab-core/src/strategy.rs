//! Strategy — the operator's pricing posture and its rule-ladder parameters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Global pricing strategy.
///
/// Aggressive raises readily and lowers reluctantly; conservative is the
/// mirror image; balanced sits at the midpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Aggressive,
    #[default]
    Balanced,
    Conservative,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Self::Aggressive, Self::Balanced, Self::Conservative];

    /// Inventory at or below this forces a raise.
    pub fn scarcity_floor(&self) -> u32 {
        match self {
            Self::Aggressive => 5,
            Self::Balanced => 3,
            Self::Conservative => 2,
        }
    }

    /// Inventory above this counts as abundant.
    pub fn abundance_ceiling(&self) -> u32 {
        match self {
            Self::Aggressive => 10,
            Self::Balanced => 15,
            Self::Conservative => 20,
        }
    }

    /// With abundant inventory, pressure below `-abundance_threshold` forces a cut.
    pub fn abundance_threshold(&self) -> f64 {
        match self {
            Self::Aggressive => 0.15,
            Self::Balanced => 0.10,
            Self::Conservative => 0.05,
        }
    }

    pub fn up_threshold(&self) -> f64 {
        match self {
            Self::Aggressive => 0.15,
            Self::Balanced => 0.25,
            Self::Conservative => 0.35,
        }
    }

    pub fn down_threshold(&self) -> f64 {
        match self {
            Self::Aggressive => -0.35,
            Self::Balanced => -0.25,
            Self::Conservative => -0.15,
        }
    }

    /// Share of the distance to the price bound a full-pressure move covers.
    pub fn aggressiveness(&self) -> f64 {
        match self {
            Self::Aggressive => 0.5,
            Self::Balanced => 0.3,
            Self::Conservative => 0.15,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aggressive => "aggressive",
            Self::Balanced => "balanced",
            Self::Conservative => "conservative",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aggressive" => Ok(Self::Aggressive),
            "balanced" => Ok(Self::Balanced),
            "conservative" => Ok(Self::Conservative),
            other => Err(format!("unknown strategy '{other}'")),
        }
    }
}
