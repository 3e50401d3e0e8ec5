//! Trade direction and its resolution from the market state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::market_state::{Case, MarketState, Rupture, Territory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "LONG")]
    Long,
    #[serde(rename = "SHORT")]
    Short,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Long => "LONG",
            Direction::Short => "SHORT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LONG" => Ok(Direction::Long),
            "SHORT" => Ok(Direction::Short),
            other => Err(format!("unknown direction: {other}")),
        }
    }
}

fn from_territory(territory: Territory) -> Direction {
    match territory {
        Territory::Discount => Direction::Long,
        Territory::Premium => Direction::Short,
    }
}

fn from_rupture(rupture: Rupture) -> Direction {
    match rupture {
        Rupture::Bullish => Direction::Long,
        _ => Direction::Short,
    }
}

/// Case A trades the territory, case C trades the rupture. Case B trades the
/// rupture too, falling back to the territory if there is none.
pub fn resolve_direction(state: &MarketState) -> Direction {
    match (state.case, state.rupture) {
        (Case::A, _) => from_territory(state.territory),
        (Case::C, rupture) => from_rupture(rupture),
        (Case::B, Rupture::None) => from_territory(state.territory),
        (Case::B, rupture) => from_rupture(rupture),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(case: Case, rupture: Rupture, territory: Territory) -> MarketState {
        MarketState {
            rupture,
            rupture_distance: 0.0,
            territory,
            case,
        }
    }

    #[test]
    fn case_a_uses_territory() {
        assert_eq!(
            resolve_direction(&state(Case::A, Rupture::None, Territory::Discount)),
            Direction::Long
        );
        assert_eq!(
            resolve_direction(&state(Case::A, Rupture::None, Territory::Premium)),
            Direction::Short
        );
    }

    #[test]
    fn case_c_follows_rupture() {
        assert_eq!(
            resolve_direction(&state(Case::C, Rupture::Bullish, Territory::Discount)),
            Direction::Long
        );
        assert_eq!(
            resolve_direction(&state(Case::C, Rupture::Bearish, Territory::Premium)),
            Direction::Short
        );
    }

    #[test]
    fn case_b_follows_rupture() {
        assert_eq!(
            resolve_direction(&state(Case::B, Rupture::Bullish, Territory::Discount)),
            Direction::Long
        );
        assert_eq!(
            resolve_direction(&state(Case::B, Rupture::Bearish, Territory::Premium)),
            Direction::Short
        );
    }

    #[test]
    fn case_b_without_rupture_falls_back_to_territory() {
        assert_eq!(
            resolve_direction(&state(Case::B, Rupture::None, Territory::Discount)),
            Direction::Long
        );
        assert_eq!(
            resolve_direction(&state(Case::B, Rupture::None, Territory::Premium)),
            Direction::Short
        );
    }

    #[test]
    fn serializes_as_upper_case() {
        assert_eq!(serde_json::to_string(&Direction::Long).unwrap(), "\"LONG\"");
        assert_eq!(
            serde_json::from_str::<Direction>("\"SHORT\"").unwrap(),
            Direction::Short
        );
    }
}
