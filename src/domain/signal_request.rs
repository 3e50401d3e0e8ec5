//! Signal request input and its validation.
//!
//! The presentation layer hands over raw text fields; [`SignalInput::parse`]
//! turns them into a [`SignalRequest`] or a validation failure naming the
//! offending field. Nothing downstream re-validates.

use crate::domain::candle::{DailyCandle, WeeklyRange};
use crate::domain::error::MiloError;
use crate::domain::instrument::Instrument;

/// Raw form input, as typed.
#[derive(Debug, Clone, Default)]
pub struct SignalInput {
    pub id_signal: String,
    pub instrument: String,
    pub current_price: String,
    /// `"open,high,low,close"`
    pub ohlc_yesterday: String,
    /// `"high,low"`
    pub weekly_range: String,
    pub atr_5d: String,
}

/// Validated inputs for one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalRequest {
    pub id_signal: String,
    pub instrument: Instrument,
    pub price: f64,
    pub prior_day: DailyCandle,
    pub weekly: WeeklyRange,
    pub atr_5d: f64,
}

impl SignalInput {
    pub fn parse(&self) -> Result<SignalRequest, MiloError> {
        let id_signal = self.id_signal.trim();
        if id_signal.is_empty() {
            return Err(MiloError::validation("id_signal", "must not be empty"));
        }

        let instrument = Instrument::new(&self.instrument);
        if instrument.name().is_empty() {
            return Err(MiloError::validation("instrument", "must not be empty"));
        }

        let price = parse_number("current_price", &self.current_price)?;
        require_positive("current_price", price)?;

        let ohlc = parse_list("ohlc_yesterday", &self.ohlc_yesterday, 4, "open,high,low,close")?;
        for value in &ohlc {
            require_positive("ohlc_yesterday", *value)?;
        }

        let weekly = parse_list("weekly_range", &self.weekly_range, 2, "high,low")?;
        for value in &weekly {
            require_positive("weekly_range", *value)?;
        }

        let atr_5d = parse_number("atr_5d", &self.atr_5d)?;
        if atr_5d < 0.0 {
            return Err(MiloError::validation("atr_5d", "must not be negative"));
        }

        Ok(SignalRequest {
            id_signal: id_signal.to_string(),
            instrument,
            price,
            prior_day: DailyCandle {
                open: ohlc[0],
                high: ohlc[1],
                low: ohlc[2],
                close: ohlc[3],
            },
            weekly: WeeklyRange {
                high: weekly[0],
                low: weekly[1],
            },
            atr_5d,
        })
    }
}

fn parse_number(field: &str, text: &str) -> Result<f64, MiloError> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| MiloError::validation(field, format!("'{}' is not a number", text.trim())))?;
    if !value.is_finite() {
        return Err(MiloError::validation(field, "must be a finite number"));
    }
    Ok(value)
}

fn parse_list(field: &str, text: &str, expected: usize, shape: &str) -> Result<Vec<f64>, MiloError> {
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() != expected {
        return Err(MiloError::validation(
            field,
            format!("expected {expected} values ({shape}), got {}", parts.len()),
        ));
    }
    parts.iter().map(|part| parse_number(field, part)).collect()
}

fn require_positive(field: &str, value: f64) -> Result<(), MiloError> {
    if value <= 0.0 {
        return Err(MiloError::validation(field, "prices must be positive"));
    }
    Ok(())
}
