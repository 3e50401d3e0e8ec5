//! Tabular export port for the trade ledger.

use crate::domain::error::MiloError;
use crate::domain::trade_record::TradeRecord;

pub trait ExportPort {
    fn export(&self, records: &[TradeRecord], output_path: &str) -> Result<(), MiloError>;
}
