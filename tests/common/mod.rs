#![allow(dead_code)]

use milo::domain::direction::Direction;
use milo::domain::error::MiloError;
use milo::domain::signal_request::SignalInput;
use milo::domain::trade_record::{TradeRecord, TradeStatus};
use milo::ports::ledger_port::LedgerPort;
use std::cell::RefCell;
use std::rc::Rc;

/// In-memory ledger. Clones share the same storage, so a test can keep a
/// handle after boxing one into a registry.
#[derive(Clone, Default)]
pub struct MockLedger {
    pub stored: Rc<RefCell<Vec<TradeRecord>>>,
    pub load_error: Option<String>,
    pub fail_saves: bool,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<TradeRecord>) -> Self {
        Self {
            stored: Rc::new(RefCell::new(records)),
            ..Self::default()
        }
    }

    pub fn corrupt(reason: &str) -> Self {
        Self {
            load_error: Some(reason.to_string()),
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> Vec<TradeRecord> {
        self.stored.borrow().clone()
    }
}

impl LedgerPort for MockLedger {
    fn load(&self) -> Result<Vec<TradeRecord>, MiloError> {
        if let Some(reason) = &self.load_error {
            return Err(MiloError::storage(reason.clone()));
        }
        Ok(self.stored.borrow().clone())
    }

    fn save(&self, records: &[TradeRecord]) -> Result<(), MiloError> {
        if self.fail_saves {
            return Err(MiloError::storage("save refused"));
        }
        *self.stored.borrow_mut() = records.to_vec();
        Ok(())
    }
}

pub fn make_record(id: &str, tag: &str, direction: Direction, atr: f64) -> TradeRecord {
    let (sl, tp) = match direction {
        Direction::Long => (98.0, 104.0),
        Direction::Short => (102.0, 96.0),
    };
    TradeRecord {
        id_signal: id.to_string(),
        instrument: "CRYPTO".to_string(),
        direction,
        entry_price: 100.0,
        sl_price: sl,
        tp_price: tp,
        setup_tag: tag.to_string(),
        atr_5d: atr,
        context: "Sin ruptura".to_string(),
        status: TradeStatus::Abierta,
        close_price: None,
        p_g_points: None,
    }
}

pub fn make_closed(tag: &str, status: TradeStatus, points: f64, atr: f64) -> TradeRecord {
    TradeRecord {
        status,
        close_price: Some(100.0 + points),
        p_g_points: Some(points),
        ..make_record("closed", tag, Direction::Long, atr)
    }
}

/// The worked reference case: CRYPTO long from the prior-day order block.
pub fn reference_input() -> SignalInput {
    SignalInput {
        id_signal: "0078".to_string(),
        instrument: "CRYPTO".to_string(),
        current_price: "95.5".to_string(),
        ohlc_yesterday: "100,120,80,110".to_string(),
        weekly_range: "130,70".to_string(),
        atr_5d: "50".to_string(),
    }
}
