//! Four-point admissibility gate.

use crate::domain::signal_request::SignalRequest;
use crate::domain::zones::ZoneSet;

pub const MIN_CHECKLIST_SCORE: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checklist {
    /// Reserved zone-proximity check. Always satisfied until a real
    /// proximity rule is defined; proximity is enforced by the veto stage.
    pub zone: bool,
    pub volatility: bool,
    pub range: bool,
    pub weekly: bool,
}

impl Checklist {
    pub fn evaluate(request: &SignalRequest, zones: &ZoneSet) -> Self {
        Checklist {
            zone: true,
            volatility: request.atr_5d > 0.0,
            range: zones.daily_range > 0.0,
            weekly: request.weekly.contains(request.price),
        }
    }

    pub fn score(&self) -> u8 {
        [self.zone, self.volatility, self.range, self.weekly]
            .iter()
            .filter(|&&ok| ok)
            .count() as u8
    }

    pub fn passes(&self) -> bool {
        self.score() >= MIN_CHECKLIST_SCORE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::candle::{DailyCandle, WeeklyRange};
    use crate::domain::instrument::Instrument;

    fn request(price: f64, atr: f64, high: f64, low: f64) -> SignalRequest {
        SignalRequest {
            id_signal: "C1".into(),
            instrument: Instrument::new("FOREX"),
            price,
            prior_day: DailyCandle {
                open: 100.0,
                high,
                low,
                close: 110.0,
            },
            weekly: WeeklyRange {
                high: 130.0,
                low: 70.0,
            },
            atr_5d: atr,
        }
    }

    fn evaluate(req: &SignalRequest) -> Checklist {
        Checklist::evaluate(req, &ZoneSet::compute(req))
    }

    #[test]
    fn all_points_satisfied() {
        let c = evaluate(&request(95.5, 50.0, 120.0, 80.0));
        assert_eq!(c.score(), 4);
        assert!(c.passes());
    }

    #[test]
    fn zone_point_is_always_satisfied() {
        let c = evaluate(&request(500.0, 0.0, 80.0, 80.0));
        assert!(c.zone);
        assert!(!c.volatility);
        assert!(!c.range);
        assert!(!c.weekly);
        assert_eq!(c.score(), 1);
        assert!(!c.passes());
    }

    #[test]
    fn two_points_is_enough() {
        let c = evaluate(&request(500.0, 10.0, 80.0, 80.0));
        assert_eq!(c.score(), 2);
        assert!(c.passes());
    }

    #[test]
    fn weekly_bounds_inclusive() {
        assert!(evaluate(&request(130.0, 1.0, 120.0, 80.0)).weekly);
        assert!(evaluate(&request(70.0, 1.0, 120.0, 80.0)).weekly);
    }
}
