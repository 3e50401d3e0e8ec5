//! Per-setup performance summary over the whole ledger.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::trade_record::{TradeRecord, TradeStatus};

#[derive(Debug, Clone, PartialEq)]
pub struct SetupSummary {
    pub setup_tag: String,
    pub total_ops: usize,
    pub won: usize,
    pub lost: usize,
    pub net_points: f64,
    /// won / lost, with zero losses counted as one.
    pub ratio: f64,
}

impl SetupSummary {
    fn new(setup_tag: &str) -> Self {
        SetupSummary {
            setup_tag: setup_tag.to_string(),
            total_ops: 0,
            won: 0,
            lost: 0,
            net_points: 0.0,
            ratio: 0.0,
        }
    }

    fn add(&mut self, record: &TradeRecord) {
        self.total_ops += 1;
        if record.status == TradeStatus::Tp {
            self.won += 1;
        } else if record.is_loss() {
            self.lost += 1;
        }
        self.net_points += record.p_g_points.unwrap_or(0.0);
    }
}

/// Rows sorted by ratio descending, then tag ascending. Open records count
/// towards the total and contribute zero points.
pub fn compute_per_setup(records: &[TradeRecord]) -> Vec<SetupSummary> {
    let mut by_tag: BTreeMap<&str, SetupSummary> = BTreeMap::new();
    for record in records {
        by_tag
            .entry(record.setup_tag.as_str())
            .or_insert_with(|| SetupSummary::new(&record.setup_tag))
            .add(record);
    }

    let mut rows: Vec<SetupSummary> = by_tag
        .into_values()
        .map(|mut row| {
            row.ratio = row.won as f64 / row.lost.max(1) as f64;
            row
        })
        .collect();

    rows.sort_by(|a, b| {
        b.ratio
            .partial_cmp(&a.ratio)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.setup_tag.cmp(&b.setup_tag))
    });
    rows
}
