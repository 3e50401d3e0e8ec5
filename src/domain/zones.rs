//! Reference price zones derived from the prior-day candle and weekly range.

use crate::domain::candle::CandleKind;
use crate::domain::signal_request::SignalRequest;

const FVG_BULLISH_RATIO: f64 = 0.618;
const FVG_BEARISH_RATIO: f64 = 0.382;

#[derive(Debug, Clone, PartialEq)]
pub struct ZoneSet {
    pub pdh: f64,
    pub pdl: f64,
    pub eq50: f64,
    pub daily_range: f64,
    pub candle: CandleKind,
    /// `None` when the candle is NEUTRA.
    pub ob: Option<f64>,
    /// `None` when the candle is NEUTRA.
    pub fvg: Option<f64>,
    pub wh: f64,
    pub wl: f64,
    pub prior_open: f64,
    pub prior_close: f64,
}

impl ZoneSet {
    pub fn compute(request: &SignalRequest) -> Self {
        let day = &request.prior_day;
        let pdh = day.high;
        let pdl = day.low;
        let candle = day.kind();

        let (ob, fvg) = match candle {
            CandleKind::Alcista => (
                Some(pdl + (day.close - pdl) / 2.0),
                Some(pdl + (day.close - pdl) * FVG_BULLISH_RATIO),
            ),
            CandleKind::Bajista => (
                Some(day.open + (pdh - day.open) / 2.0),
                Some(day.open + (pdh - day.open) * FVG_BEARISH_RATIO),
            ),
            CandleKind::Neutra => (None, None),
        };

        ZoneSet {
            pdh,
            pdl,
            eq50: pdl + (pdh - pdl) / 2.0,
            daily_range: day.range(),
            candle,
            ob,
            fvg,
            wh: request.weekly.high,
            wl: request.weekly.low,
            prior_open: day.open,
            prior_close: day.close,
        }
    }
}
