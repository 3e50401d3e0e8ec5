//! Ledger entry for one generated signal and its outcome.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::direction::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeStatus {
    #[serde(rename = "ABIERTA")]
    Abierta,
    #[serde(rename = "TP")]
    Tp,
    #[serde(rename = "SL LONG")]
    SlLong,
    #[serde(rename = "SL SHORT")]
    SlShort,
    #[serde(rename = "MANUAL")]
    Manual,
}

impl TradeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TradeStatus::Abierta => "ABIERTA",
            TradeStatus::Tp => "TP",
            TradeStatus::SlLong => "SL LONG",
            TradeStatus::SlShort => "SL SHORT",
            TradeStatus::Manual => "MANUAL",
        }
    }

    pub fn is_open(self) -> bool {
        self == TradeStatus::Abierta
    }

    pub fn is_stop_loss(self) -> bool {
        matches!(self, TradeStatus::SlLong | TradeStatus::SlShort)
    }

    /// The stop-loss status matching a trade direction.
    pub fn stop_loss_for(direction: Direction) -> Self {
        match direction {
            Direction::Long => TradeStatus::SlLong,
            Direction::Short => TradeStatus::SlShort,
        }
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ABIERTA" => Ok(TradeStatus::Abierta),
            "TP" => Ok(TradeStatus::Tp),
            "SL LONG" => Ok(TradeStatus::SlLong),
            "SL SHORT" => Ok(TradeStatus::SlShort),
            "MANUAL" => Ok(TradeStatus::Manual),
            other => Err(format!("unknown trade status: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub id_signal: String,
    pub instrument: String,
    pub direction: Direction,
    pub entry_price: f64,
    pub sl_price: f64,
    pub tp_price: f64,
    pub setup_tag: String,
    pub atr_5d: f64,
    pub context: String,
    pub status: TradeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p_g_points: Option<f64>,
}

impl TradeRecord {
    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    /// Closed with a stop loss, or closed manually at a loss.
    pub fn is_loss(&self) -> bool {
        self.status.is_stop_loss()
            || (self.status == TradeStatus::Manual && self.p_g_points.unwrap_or(0.0) < 0.0)
    }

    /// Signed points from entry to `close`; positive is favourable.
    pub fn points_to(&self, close: f64) -> f64 {
        match self.direction {
            Direction::Long => close - self.entry_price,
            Direction::Short => self.entry_price - close,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> TradeRecord {
        TradeRecord {
            id_signal: "0078".into(),
            instrument: "CRYPTO".into(),
            direction: Direction::Long,
            entry_price: 95.5,
            sl_price: 94.0675,
            tp_price: 98.365,
            setup_tag: "LONG: OB".into(),
            atr_5d: 50.0,
            context: "Sin ruptura".into(),
            status: TradeStatus::Abierta,
            close_price: None,
            p_g_points: None,
        }
    }

    #[test]
    fn open_record_omits_close_fields() {
        let json = serde_json::to_string(&sample_record()).unwrap();
        assert!(json.contains("\"status\":\"ABIERTA\""));
        assert!(json.contains("\"direction\":\"LONG\""));
        assert!(!json.contains("close_price"));
        assert!(!json.contains("p_g_points"));
    }

    #[test]
    fn status_strings_round_trip_through_json() {
        let json = r#"{"id_signal":"1","instrument":"ORO","direction":"SHORT",
            "entry_price":10.0,"sl_price":11.0,"tp_price":8.0,"setup_tag":"SHORT: OB",
            "atr_5d":1.0,"context":"Fakeout","status":"SL SHORT",
            "close_price":11.0,"p_g_points":0.0}"#;
        let record: TradeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, TradeStatus::SlShort);
        assert_eq!(record.direction, Direction::Short);
        assert_eq!(record.close_price, Some(11.0));
    }

    #[test]
    fn loss_classification() {
        let mut r = sample_record();
        assert!(!r.is_loss());
        r.status = TradeStatus::SlLong;
        assert!(r.is_loss());
        r.status = TradeStatus::Manual;
        r.p_g_points = Some(-0.5);
        assert!(r.is_loss());
        r.p_g_points = Some(0.0);
        assert!(!r.is_loss());
        r.status = TradeStatus::Tp;
        assert!(!r.is_loss());
    }

    #[test]
    fn points_are_signed_by_direction() {
        let mut r = sample_record();
        assert!((r.points_to(96.5) - 1.0).abs() < 1e-12);
        r.direction = Direction::Short;
        assert!((r.points_to(96.5) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn status_parse() {
        assert_eq!("SL LONG".parse::<TradeStatus>().unwrap(), TradeStatus::SlLong);
        assert!("CLOSED".parse::<TradeStatus>().is_err());
        assert_eq!(TradeStatus::stop_loss_for(Direction::Short), TradeStatus::SlShort);
    }
}
