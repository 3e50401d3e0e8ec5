//! Trade registry: the authoritative in-memory ledger, mirrored to a
//! [`LedgerPort`] after every mutation.
//!
//! Records are only ever appended. Closing mutates the first open record
//! with a matching id in place. Identifiers are not required to be unique.

use crate::domain::error::MiloError;
use crate::domain::trade_record::{TradeRecord, TradeStatus};
use crate::ports::ledger_port::LedgerPort;

pub struct TradeRegistry {
    records: Vec<TradeRecord>,
    store: Box<dyn LedgerPort>,
    recovered_from: Option<String>,
}

impl TradeRegistry {
    /// Load the registry from `store`. An unreadable store is replaced by an
    /// empty ledger; the reason is logged and kept in
    /// [`TradeRegistry::recovered_from`].
    pub fn load(store: Box<dyn LedgerPort>) -> Self {
        match store.load() {
            Ok(records) => {
                tracing::info!(records = records.len(), "ledger loaded");
                TradeRegistry {
                    records,
                    store,
                    recovered_from: None,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "ledger unreadable, starting from an empty ledger");
                TradeRegistry {
                    records: Vec::new(),
                    store,
                    recovered_from: Some(e.to_string()),
                }
            }
        }
    }

    /// Why the last load fell back to an empty ledger, if it did.
    pub fn recovered_from(&self) -> Option<&str> {
        self.recovered_from.as_deref()
    }

    pub fn records(&self) -> &[TradeRecord] {
        &self.records
    }

    pub fn open_records(&self) -> impl Iterator<Item = &TradeRecord> {
        self.records.iter().filter(|r| r.is_open())
    }

    /// First open record with `id_signal`, in storage order.
    pub fn find_open(&self, id_signal: &str) -> Option<&TradeRecord> {
        self.records
            .iter()
            .find(|r| r.id_signal == id_signal && r.is_open())
    }

    pub fn append(&mut self, record: TradeRecord) -> Result<(), MiloError> {
        self.records.push(record);
        if let Err(e) = self.store.save(&self.records) {
            self.records.pop();
            return Err(e);
        }
        if let Some(r) = self.records.last() {
            tracing::info!(id_signal = %r.id_signal, setup_tag = %r.setup_tag, "trade registered");
        }
        Ok(())
    }

    /// Close the first open record with `id_signal`.
    ///
    /// The close price defaults to the target for TP and to the stop
    /// otherwise. A stop-loss close without an explicit price books zero
    /// points regardless of the stop distance.
    pub fn close(
        &mut self,
        id_signal: &str,
        outcome: TradeStatus,
        close_price: Option<f64>,
    ) -> Result<&TradeRecord, MiloError> {
        if outcome.is_open() {
            return Err(MiloError::validation(
                "outcome",
                "a trade can only be closed as TP, SL LONG, SL SHORT or MANUAL",
            ));
        }
        if close_price.is_some_and(|price| !price.is_finite() || price <= 0.0) {
            return Err(MiloError::validation(
                "close_price",
                "must be a positive number",
            ));
        }

        let index = self
            .records
            .iter()
            .position(|r| r.id_signal == id_signal && r.is_open())
            .ok_or_else(|| MiloError::TradeNotFound {
                id_signal: id_signal.to_string(),
            })?;

        let mut updated = self.records.clone();
        let record = &mut updated[index];
        let close = close_price.unwrap_or(if outcome == TradeStatus::Tp {
            record.tp_price
        } else {
            record.sl_price
        });
        let mut points = record.points_to(close);
        if outcome.is_stop_loss() && close_price.is_none() {
            points = 0.0;
        }
        record.status = outcome;
        record.close_price = Some(close);
        record.p_g_points = Some(points);

        self.store.save(&updated)?;
        self.records = updated;

        let record = &self.records[index];
        tracing::info!(
            id_signal,
            status = %record.status,
            points,
            "trade closed"
        );
        Ok(record)
    }
}
