//! Ledger persistence port.
//!
//! The registry only ever loads or rewrites the whole record sequence.

use crate::domain::error::MiloError;
use crate::domain::trade_record::TradeRecord;

pub trait LedgerPort {
    /// Load every stored record in storage order. A store that does not
    /// exist yet loads as empty; unreadable content is an error.
    fn load(&self) -> Result<Vec<TradeRecord>, MiloError>;

    /// Replace the stored sequence with `records`.
    fn save(&self, records: &[TradeRecord]) -> Result<(), MiloError>;
}
