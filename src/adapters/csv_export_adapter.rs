//! CSV export of the trade ledger.

use crate::domain::error::MiloError;
use crate::domain::trade_record::TradeRecord;
use crate::ports::export_port::ExportPort;

pub const HEADER: [&str; 12] = [
    "id_signal",
    "instrument",
    "direction",
    "entry_price",
    "sl_price",
    "tp_price",
    "setup_tag",
    "atr_5d",
    "context",
    "status",
    "close_price",
    "p_g_points",
];

pub struct CsvExportAdapter;

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn row(r: &TradeRecord) -> [String; 12] {
    [
        r.id_signal.clone(),
        r.instrument.clone(),
        r.direction.to_string(),
        r.entry_price.to_string(),
        r.sl_price.to_string(),
        r.tp_price.to_string(),
        r.setup_tag.clone(),
        r.atr_5d.to_string(),
        r.context.clone(),
        r.status.to_string(),
        optional(r.close_price),
        optional(r.p_g_points),
    ]
}

impl ExportPort for CsvExportAdapter {
    fn export(&self, records: &[TradeRecord], output_path: &str) -> Result<(), MiloError> {
        let mut writer = csv::Writer::from_path(output_path).map_err(|e| {
            MiloError::storage(format!("failed to create {}: {}", output_path, e))
        })?;

        writer
            .write_record(HEADER)
            .map_err(|e| MiloError::storage(format!("CSV write error: {}", e)))?;
        for record in records {
            writer
                .write_record(row(record))
                .map_err(|e| MiloError::storage(format!("CSV write error: {}", e)))?;
        }
        writer.flush()?;

        tracing::info!(rows = records.len(), path = output_path, "ledger exported");
        Ok(())
    }
}
