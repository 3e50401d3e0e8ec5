//! Rupture, territory and case classification.

use std::fmt;

use crate::domain::zones::ZoneSet;

/// Rupture distance at or above which a rupture counts as a breakout.
pub const BREAKOUT_THRESHOLD: f64 = 0.003;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rupture {
    None,
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Territory {
    Discount,
    Premium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    /// No rupture.
    A,
    /// Rupture below the breakout threshold (fakeout).
    B,
    /// Rupture at or beyond the breakout threshold.
    C,
}

impl Case {
    /// Context label carried into the trade record.
    pub fn context(self) -> &'static str {
        match self {
            Case::A => "Sin ruptura",
            Case::B => "Fakeout",
            Case::C => "Breakout",
        }
    }
}

impl fmt::Display for Rupture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Rupture::None => "NONE",
            Rupture::Bullish => "BULLISH",
            Rupture::Bearish => "BEARISH",
        })
    }
}

impl fmt::Display for Territory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Territory::Discount => "DISCOUNT",
            Territory::Premium => "PREMIUM",
        })
    }
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Case::A => "A",
            Case::B => "B",
            Case::C => "C",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketState {
    pub rupture: Rupture,
    /// Fraction of current price; 0 when there is no rupture.
    pub rupture_distance: f64,
    pub territory: Territory,
    pub case: Case,
}

impl MarketState {
    pub fn classify(price: f64, zones: &ZoneSet) -> Self {
        let (rupture, rupture_distance) = if price > zones.pdh {
            (Rupture::Bullish, (price - zones.pdh) / price)
        } else if price < zones.pdl {
            (Rupture::Bearish, (zones.pdl - price) / price)
        } else {
            (Rupture::None, 0.0)
        };

        let territory = if price < zones.eq50 {
            Territory::Discount
        } else {
            Territory::Premium
        };

        let case = match rupture {
            Rupture::None => Case::A,
            _ if rupture_distance >= BREAKOUT_THRESHOLD => Case::C,
            _ => Case::B,
        };

        MarketState {
            rupture,
            rupture_distance,
            territory,
            case,
        }
    }

    pub fn context(&self) -> &'static str {
        self.case.context()
    }
}
