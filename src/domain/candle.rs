//! Prior-day candle and weekly range.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyCandle {
    pub open: f64,
    /// Prior-day high (PDH).
    pub high: f64,
    /// Prior-day low (PDL).
    pub low: f64,
    pub close: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandleKind {
    Alcista,
    Bajista,
    Neutra,
}

impl fmt::Display for CandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CandleKind::Alcista => "ALCISTA",
            CandleKind::Bajista => "BAJISTA",
            CandleKind::Neutra => "NEUTRA",
        })
    }
}

impl DailyCandle {
    pub fn kind(&self) -> CandleKind {
        if self.close > self.open {
            CandleKind::Alcista
        } else if self.close < self.open {
            CandleKind::Bajista
        } else {
            CandleKind::Neutra
        }
    }

    /// high - low
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeeklyRange {
    pub high: f64,
    pub low: f64,
}

impl WeeklyRange {
    /// Inclusive on both ends.
    pub fn contains(&self, price: f64) -> bool {
        self.low <= price && price <= self.high
    }
}
