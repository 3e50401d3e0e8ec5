//! Stop-loss and take-profit placement from the winning zone.

use std::fmt;

use crate::domain::direction::Direction;
use crate::domain::instrument::InstrumentClass;

pub const DEFAULT_REWARD_MULTIPLIER: f64 = 2.0;
pub const MIN_REWARD_RATIO: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopType {
    /// Minimum-risk floor applied.
    Min,
    /// Distance to the winning zone used as-is.
    Technical,
}

impl fmt::Display for StopType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StopType::Min => "MIN",
            StopType::Technical => "TECHNICAL",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiskPlan {
    pub entry_price: f64,
    pub stop_price: f64,
    pub stop_type: StopType,
    pub stop_points: f64,
    pub stop_pct: f64,
    pub target_price: f64,
    pub target_points: f64,
    pub target_pct: f64,
    pub reward_ratio: f64,
    /// Informational only; never gates the signal.
    pub meets_min_ratio: bool,
    pub multiplier: f64,
}

/// Stop distance is the larger of the technical distance to `zone_value`
/// and the instrument's minimum-risk floor. Target distance is the stop
/// distance times `multiplier`.
pub fn plan_risk(
    direction: Direction,
    zone_value: f64,
    entry_price: f64,
    class: InstrumentClass,
    multiplier: f64,
) -> RiskPlan {
    let floor = entry_price * class.min_risk_pct();
    let technical = (entry_price - zone_value).abs();

    let (stop_points, stop_type) = if technical < floor {
        (floor, StopType::Min)
    } else {
        (technical, StopType::Technical)
    };
    let target_points = stop_points * multiplier;

    let (stop_price, target_price) = match direction {
        Direction::Long => (entry_price - stop_points, entry_price + target_points),
        Direction::Short => (entry_price + stop_points, entry_price - target_points),
    };

    RiskPlan {
        entry_price,
        stop_price,
        stop_type,
        stop_points,
        stop_pct: stop_points / entry_price,
        target_price,
        target_points,
        target_pct: target_points / entry_price,
        reward_ratio: multiplier,
        meets_min_ratio: multiplier >= MIN_REWARD_RATIO,
        multiplier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn crypto_floor_applies_to_reference_case() {
        let plan = plan_risk(Direction::Long, 95.0, 95.5, InstrumentClass::Crypto, 2.0);
        assert_eq!(plan.stop_type, StopType::Min);
        assert_relative_eq!(plan.stop_points, 1.4325, epsilon = 1e-9);
        assert_relative_eq!(plan.stop_price, 94.0675, epsilon = 1e-9);
        assert_relative_eq!(plan.target_points, 2.865, epsilon = 1e-9);
        assert_relative_eq!(plan.target_price, 98.365, epsilon = 1e-9);
        assert_relative_eq!(plan.reward_ratio, 2.0);
        assert!(plan.meets_min_ratio);
    }

    #[test]
    fn technical_stop_when_zone_is_far_enough() {
        // FOREX floor 0.5% of 100 = 0.5; zone 1.0 away.
        let plan = plan_risk(Direction::Short, 101.0, 100.0, InstrumentClass::Forex, 2.0);
        assert_eq!(plan.stop_type, StopType::Technical);
        assert_relative_eq!(plan.stop_price, 101.0);
        assert_relative_eq!(plan.target_price, 98.0);
        assert_relative_eq!(plan.stop_pct, 0.01);
        assert_relative_eq!(plan.target_pct, 0.02);
    }

    #[test]
    fn distance_equal_to_floor_is_technical() {
        let plan = plan_risk(Direction::Long, 99.5, 100.0, InstrumentClass::Oro, 2.0);
        assert_eq!(plan.stop_type, StopType::Technical);
        assert_relative_eq!(plan.stop_points, 0.5);
    }

    #[test]
    fn custom_multiplier_scales_target() {
        let plan = plan_risk(Direction::Long, 90.0, 100.0, InstrumentClass::Default, 3.0);
        assert_relative_eq!(plan.target_points, 30.0);
        assert_relative_eq!(plan.target_price, 130.0);
        assert_relative_eq!(plan.reward_ratio, 3.0);
    }

    #[test]
    fn ratio_check_is_informational() {
        let plan = plan_risk(Direction::Long, 90.0, 100.0, InstrumentClass::Default, 1.5);
        assert!(!plan.meets_min_ratio);
        assert_relative_eq!(plan.target_price, 115.0);
    }

    #[test]
    fn stop_type_labels() {
        assert_eq!(StopType::Min.to_string(), "MIN");
        assert_eq!(StopType::Technical.to_string(), "TECHNICAL");
    }
}
