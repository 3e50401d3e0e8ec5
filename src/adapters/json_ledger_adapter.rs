//! JSON file ledger: the whole trade sequence as one pretty-printed array.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::error::MiloError;
use crate::domain::trade_record::TradeRecord;
use crate::ports::ledger_port::LedgerPort;

pub struct JsonLedgerAdapter {
    path: PathBuf,
}

impl JsonLedgerAdapter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LedgerPort for JsonLedgerAdapter {
    fn load(&self) -> Result<Vec<TradeRecord>, MiloError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(MiloError::storage(format!(
                    "cannot read {}: {e}",
                    self.path.display()
                )));
            }
        };
        serde_json::from_str(&content).map_err(|e| {
            MiloError::storage(format!("cannot parse {}: {e}", self.path.display()))
        })
    }

    fn save(&self, records: &[TradeRecord]) -> Result<(), MiloError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(records)
            .map_err(|e| MiloError::storage(format!("cannot serialize ledger: {e}")))?;
        std::fs::write(&self.path, json).map_err(|e| {
            MiloError::storage(format!("cannot write {}: {e}", self.path.display()))
        })?;
        debug!(path = %self.path.display(), records = records.len(), "ledger written");
        Ok(())
    }
}
